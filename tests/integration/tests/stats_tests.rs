//! Stats Integration Tests
//!
//! Runs the counting, walking, rebuild and reporting services end to end
//! against the in-memory chat server and counter store. No external services
//! are needed.
//!
//! Run with: cargo test -p integration-tests --test stats_tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use integration_tests::{bot, emote, invocation, member, message, user, TestHarness, GUILD_ID};
use parking_lot::Mutex;
use stats_cache::MemoryCounterStore;
use stats_core::entities::Channel;
use stats_core::{CounterStore, Snowflake, StatKind, StatScope};
use stats_service::commands::surface::MISSING_ROLE_REPLY;
use stats_service::services::RebuildStage;
use stats_service::{
    ChannelWalker, CommandSurface, EventCounter, NoopObserver, RebuildObserver, Rebuilder,
    Report, Reporter, ServiceResult, SurfaceSettings,
};

// ============================================================================
// Event Counting Tests
// ============================================================================

#[tokio::test]
async fn test_walk_counts_every_message_per_channel_and_author() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    let alice = user(10);
    h.chat.post_many(&general, &alice, 1_000, 250);

    let outcome = ChannelWalker::new(&h.ctx)
        .walk(&general, None, None)
        .await
        .expect("walk failed");

    assert_eq!(outcome.messages_seen, 250);
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "general").await, 250);
    assert_eq!(
        h.count(StatScope::User(alice.id), StatKind::Message, "general").await,
        250
    );
}

#[tokio::test]
async fn test_reactions_count_humans_once_and_skip_bots() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    let author = user(10);
    h.chat.post(message(1_000, &general, &author));

    let kek = emote("kek", 77);
    let humans = [user(21), user(22), user(23)];
    h.chat.react(1_000, &kek, &humans);
    h.chat.react(1_000, &kek, &[bot(99)]);

    ChannelWalker::new(&h.ctx)
        .walk(&general, None, None)
        .await
        .expect("walk failed");

    assert_eq!(h.count(StatScope::Global, StatKind::Emote, "kek").await, 3);
    for human in &humans {
        assert_eq!(h.count(StatScope::User(human.id), StatKind::Emote, "kek").await, 1);
    }
    assert!(h
        .counts(StatScope::User(Snowflake::new(99)), StatKind::Emote)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_unicode_reactions_are_not_counted() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    let msg = message(1_000, &general, &user(10))
        .with_reaction(stats_core::entities::Emoji::parse("👍"), 4);
    h.chat.post(msg.clone());

    let total = EventCounter::new(&h.ctx)
        .record_reactions(&msg)
        .await
        .expect("record failed");

    assert_eq!(total, 0);
    assert!(h.counts(StatScope::Global, StatKind::Emote).await.is_empty());
}

#[tokio::test]
async fn test_rewalking_the_same_range_doubles_counters() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    let alice = user(10);
    h.chat.post_many(&general, &alice, 1_000, 5);
    h.chat.react(1_002, &emote("pog", 5), &[user(30)]);

    let walker = ChannelWalker::new(&h.ctx);
    walker.walk(&general, None, None).await.unwrap();
    walker.walk(&general, None, None).await.unwrap();

    assert_eq!(h.count(StatScope::Global, StatKind::Message, "general").await, 10);
    assert_eq!(
        h.count(StatScope::User(alice.id), StatKind::Message, "general").await,
        10
    );
    assert_eq!(h.count(StatScope::Global, StatKind::Emote, "pog").await, 2);
}

// ============================================================================
// Watermark Tests
// ============================================================================

#[tokio::test]
async fn test_walk_sets_watermark_to_newest_message() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    h.chat.post_many(&general, &user(10), 1_000, 42);

    ChannelWalker::new(&h.ctx)
        .walk(&general, None, None)
        .await
        .unwrap();

    assert_eq!(h.watermark(general.id).await, Some(1_041));
}

#[tokio::test]
async fn test_incremental_rebuild_visits_only_newer_messages() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    let alice = user(10);
    h.chat.post_many(&general, &alice, 1_000, 30);

    Rebuilder::new(&h.ctx)
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();
    assert_eq!(h.watermark(general.id).await, Some(1_029));

    h.chat.post_many(&general, &alice, 2_000, 7);
    let summary = Rebuilder::new(&h.ctx)
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(summary.messages_seen(), 7);
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "general").await, 37);
    assert_eq!(h.watermark(general.id).await, Some(2_006));
}

#[tokio::test]
async fn test_incremental_rebuild_without_new_messages_is_a_no_op() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    h.chat.post_many(&general, &user(10), 1_000, 3);

    let rebuilder = Rebuilder::new(&h.ctx);
    rebuilder
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();
    let summary = rebuilder
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(summary.messages_seen(), 0);
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "general").await, 3);
    assert_eq!(h.watermark(general.id).await, Some(1_002));
}

#[tokio::test]
async fn test_unresolvable_watermark_falls_back_to_full_walk() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    h.chat.post_many(&general, &user(10), 1_000, 4);

    Rebuilder::new(&h.ctx)
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();
    h.chat.delete(1_003);

    let summary = Rebuilder::new(&h.ctx)
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();

    // The remaining three messages are walked (and counted) again.
    assert_eq!(summary.messages_seen(), 3);
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "general").await, 7);
    assert_eq!(h.watermark(general.id).await, Some(1_002));
}

#[tokio::test]
async fn test_garbage_watermark_is_treated_as_absent() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    h.chat.post_many(&general, &user(10), 1_000, 2);
    h.store
        .hash_set(stats_core::WATERMARK_KEY, &general.id.to_string(), "not-a-number")
        .await
        .unwrap();

    let summary = Rebuilder::new(&h.ctx)
        .incremental_rebuild_all(GUILD_ID, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(summary.messages_seen(), 2);
    assert_eq!(h.watermark(general.id).await, Some(1_001));
}

#[tokio::test]
async fn test_empty_walk_leaves_watermark_untouched() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    h.chat.post_many(&general, &user(10), 1_000, 2);

    let walker = ChannelWalker::new(&h.ctx);
    walker.walk(&general, None, None).await.unwrap();

    let outcome = walker
        .walk(&general, Some(Snowflake::new(1_001)), None)
        .await
        .unwrap();

    assert_eq!(outcome.messages_seen, 0);
    assert_eq!(outcome.newest, None);
    assert_eq!(h.watermark(general.id).await, Some(1_001));
}

#[tokio::test]
async fn test_failing_fetch_leaves_watermark_untouched() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    h.chat.post_many(&general, &user(10), 1_000, 2);

    let walker = ChannelWalker::new(&h.ctx);
    walker.walk(&general, None, None).await.unwrap();

    h.chat.post_many(&general, &user(10), 2_000, 2);
    h.chat.fail_history(true);

    let err = walker
        .walk(&general, Some(Snowflake::new(1_001)), None)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "HISTORY_FETCH_ERROR");
    assert!(h.chat.history_calls() > 0);
    assert_eq!(h.watermark(general.id).await, Some(1_001));
}

// ============================================================================
// Reset and Rebuild Tests
// ============================================================================

/// Records how many keys the store held when the first channel walk began
struct ClearedCheck {
    store: Arc<MemoryCounterStore>,
    stages: Mutex<Vec<RebuildStage>>,
    keys_before_walk: Mutex<Option<usize>>,
}

#[async_trait]
impl RebuildObserver for ClearedCheck {
    async fn stage(&self, stage: RebuildStage) -> ServiceResult<()> {
        self.stages.lock().push(stage);
        Ok(())
    }

    async fn channel_started(
        &self,
        _channel: &Channel,
        _resume_after: Option<Snowflake>,
    ) -> ServiceResult<()> {
        self.keys_before_walk
            .lock()
            .get_or_insert_with(|| self.store.key_count());
        Ok(())
    }
}

#[tokio::test]
async fn test_full_reset_clears_then_matches_from_scratch_walk() {
    let h = TestHarness::new();
    let general = h.chat.add_text_channel(100, "general");
    let random = h.chat.add_text_channel(101, "random");
    h.chat.add_category(102, "Text Channels");
    let (alice, bob) = (user(10), user(11));
    h.chat.post_many(&general, &alice, 1_000, 120);
    h.chat.post_many(&random, &bob, 5_000, 15);
    h.chat.react(1_050, &emote("kek", 7), &[alice.clone(), bob.clone()]);
    h.chat.react(5_001, &emote("pog", 8), &[alice.clone()]);

    // Stale state from earlier runs
    h.store.hash_increment("messages", "general", 999).await.unwrap();
    h.store.hash_increment("emotes", "gone", 3).await.unwrap();

    let observer = ClearedCheck {
        store: h.store.clone(),
        stages: Mutex::new(Vec::new()),
        keys_before_walk: Mutex::new(None),
    };
    let summary = Rebuilder::new(&h.ctx)
        .reset_and_rebuild_all(GUILD_ID, &observer)
        .await
        .expect("rebuild failed");

    assert_eq!(
        *observer.stages.lock(),
        vec![RebuildStage::Snapshot, RebuildStage::Clear]
    );
    assert_eq!(*observer.keys_before_walk.lock(), Some(0));
    assert_eq!(h.store.snapshot_count(), 1);
    assert_eq!(summary.channels.len(), 2);
    assert_eq!(summary.messages_seen(), 135);

    let scratch = h.with_fresh_store();
    let walker = ChannelWalker::new(&scratch.ctx);
    walker.walk(&general, None, None).await.unwrap();
    walker.walk(&random, None, None).await.unwrap();

    for kind in [StatKind::Message, StatKind::Emote] {
        for scope in [
            StatScope::Global,
            StatScope::User(alice.id),
            StatScope::User(bob.id),
        ] {
            assert_eq!(
                h.counts(scope, kind).await,
                scratch.counts(scope, kind).await,
                "{scope:?} {kind} differs"
            );
        }
    }
    assert_eq!(h.watermark(general.id).await, Some(1_119));
    assert_eq!(h.watermark(random.id).await, Some(5_014));
}

// ============================================================================
// Reporting Tests
// ============================================================================

#[tokio::test]
async fn test_report_chunks_are_sorted_and_bounded() {
    let counts: HashMap<String, i64> = (0..120)
        .map(|i| (format!("emote{i:03}"), i64::from(i) + 1))
        .collect();
    let report = Report::from_counts(StatScope::Global, StatKind::Emote, counts);

    let chunks = report.chunks(50);
    let lines: Vec<Vec<&str>> = chunks.iter().map(|c| c.lines().collect()).collect();
    assert_eq!(
        lines.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![50, 50, 20]
    );
    assert_eq!(lines[0][0], "* emote119: 120");
    assert_eq!(lines[2][19], "* emote000: 1");

    let counts: Vec<i64> = report.entries().iter().map(|e| e.count).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_empty_scope_reports_nothing() {
    let h = TestHarness::new();

    let report = Reporter::new(&h.ctx)
        .report(StatScope::User(Snowflake::new(404)), StatKind::Message)
        .await
        .expect("empty scope must not fail");

    assert!(report.is_empty());
    assert_eq!(report.render(), "");
    assert!(report.chunks(50).is_empty());
}

// ============================================================================
// Command Surface Tests
// ============================================================================

fn surface(h: &TestHarness) -> CommandSurface {
    CommandSurface::new(
        h.ctx.clone(),
        SurfaceSettings {
            prefix: "~".to_string(),
            admin_role: "Bot Admin".to_string(),
            calc_message_limit: 1_000,
            response_size: 50,
        },
    )
}

fn guild_with_admin(h: &TestHarness) -> (Channel, Channel) {
    let admin_role = h.chat.add_role(900, "Bot Admin");
    h.chat.add_member(member(&user(1), &[&admin_role]));
    h.chat.add_member(member(&user(2), &[]));

    let general = h.chat.add_text_channel(100, "general");
    let random = h.chat.add_text_channel(101, "random");
    h.chat.post_many(&general, &user(10), 1_000, 3);
    h.chat.post_many(&random, &user(11), 5_000, 1);
    (general, random)
}

#[tokio::test]
async fn test_store_stats_narrates_and_rebuilds() {
    let h = TestHarness::new();
    let (general, _) = guild_with_admin(&h);

    let handled = surface(&h)
        .handle(&invocation(general.id, 1, "~store-stats"))
        .await
        .unwrap();

    assert!(handled);
    assert_eq!(
        h.chat.sent(),
        vec![
            "Saving current db image to disk",
            "Flushing db",
            "Processing messages in channel: general",
            "Processing messages in channel: random",
            "Processed all messages!",
        ]
    );
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "general").await, 3);
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "random").await, 1);
}

#[tokio::test]
async fn test_store_stats_requires_admin_role() {
    let h = TestHarness::new();
    let (general, _) = guild_with_admin(&h);

    surface(&h)
        .handle(&invocation(general.id, 2, "~store-stats"))
        .await
        .unwrap();

    assert_eq!(h.chat.sent(), vec![MISSING_ROLE_REPLY]);
    assert_eq!(h.store.snapshot_count(), 0);
    assert!(h.counts(StatScope::Global, StatKind::Message).await.is_empty());
}

#[tokio::test]
async fn test_add_stats_resumes_from_watermarks() {
    let h = TestHarness::new();
    let (general, random) = guild_with_admin(&h);
    let surface = surface(&h);

    surface
        .handle(&invocation(general.id, 1, "~add-stats"))
        .await
        .unwrap();
    h.chat.clear_sent();
    h.chat.post_many(&random, &user(11), 6_000, 2);

    surface
        .handle(&invocation(general.id, 1, "~add-stats"))
        .await
        .unwrap();

    assert_eq!(
        h.chat.sent(),
        vec![
            "Processing messages in channel: general for message: 1002",
            "Processing messages in channel: random for message: 5000",
            "Processed all messages!",
        ]
    );
    assert_eq!(h.count(StatScope::Global, StatKind::Message, "random").await, 3);
}

#[tokio::test]
async fn test_get_stats_replies_per_mentioned_user() {
    let h = TestHarness::new();
    let (general, _) = guild_with_admin(&h);
    let surface = surface(&h);
    surface
        .handle(&invocation(general.id, 1, "~store-stats"))
        .await
        .unwrap();
    h.chat.clear_sent();

    surface
        .handle(&invocation(general.id, 2, "~get-stats messages <@10> <@!11>"))
        .await
        .unwrap();

    assert_eq!(
        h.chat.sent(),
        vec!["```\n* general: 3\n```", "```\n* random: 1\n```"]
    );
}

#[tokio::test]
async fn test_get_stats_rejects_unknown_stat() {
    let h = TestHarness::new();
    let (general, _) = guild_with_admin(&h);

    surface(&h)
        .handle(&invocation(general.id, 2, "~get-stats bananas"))
        .await
        .unwrap();

    let sent = h.chat.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("Error occurred processing your request : "));
    assert!(sent[0].contains("bananas"));
}

#[tokio::test]
async fn test_calc_stats_tallies_without_writing() {
    let h = TestHarness::new();
    let (general, _) = guild_with_admin(&h);
    h.chat.react(1_001, &emote("kek", 7), &[user(20), user(21), bot(99)]);
    h.chat.react(1_002, &emote("pog", 8), &[user(20)]);

    surface(&h)
        .handle(&invocation(general.id, 2, "~calc-stats 100 1"))
        .await
        .unwrap();

    assert_eq!(
        h.chat.sent(),
        vec!["```\n* kek: 2\n```", "```\n* pog: 1\n```"]
    );
    assert_eq!(h.store.key_count(), 0);
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let h = TestHarness::new();
    let (general, _) = guild_with_admin(&h);

    let handled = surface(&h)
        .handle(&invocation(general.id, 2, "~dance"))
        .await
        .unwrap();

    assert!(!handled);
    assert!(h.chat.sent().is_empty());
}
