//! Chat stats bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p stats-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use stats_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first so tracing can follow the environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        api_url = %config.chat.api_url,
        "Starting chat stats bot..."
    );

    if let Err(e) = stats_bot::run(config).await {
        error!(error = %e, code = e.error_code(), "Bot stopped");
        std::process::exit(1);
    }
}
