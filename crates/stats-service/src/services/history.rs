//! Lazy channel history stream
//!
//! Pages through a channel one request at a time. Without a starting message
//! it walks backward from the newest message with a `before` cursor; with one
//! it walks forward with an `after` cursor.

use futures::stream::{self, Stream, TryStreamExt};
use stats_core::entities::Message;
use stats_core::{ChatClient, DomainError, HistoryQuery, Snowflake, MAX_PAGE_SIZE};

/// Paging state between two history requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryCursor {
    before: Option<Snowflake>,
    after: Option<Snowflake>,
    remaining: Option<usize>,
    exhausted: bool,
}

impl HistoryCursor {
    pub(crate) fn new(after: Option<Snowflake>, limit: Option<usize>) -> Self {
        Self {
            before: None,
            after,
            remaining: limit,
            exhausted: limit == Some(0),
        }
    }

    /// Query for the next page, or `None` once the walk is over
    pub(crate) fn next_query(&self) -> Option<HistoryQuery> {
        if self.exhausted {
            return None;
        }
        let size = self.remaining.map_or(MAX_PAGE_SIZE, |r| r.min(MAX_PAGE_SIZE));
        Some(match self.after {
            Some(after) => HistoryQuery::forward(after, size),
            None => HistoryQuery::backward(self.before, size),
        })
    }

    /// Consume a fetched page, trimming it to the remaining budget
    pub(crate) fn advance(&mut self, requested: usize, page: &mut Vec<Message>) {
        if let Some(remaining) = self.remaining {
            page.truncate(remaining);
            let left = remaining - page.len();
            self.remaining = Some(left);
            if left == 0 {
                self.exhausted = true;
            }
        }

        if page.len() < requested {
            self.exhausted = true;
        }

        match self.after {
            Some(after) => match page.iter().map(|m| m.id).max() {
                Some(newest) if newest > after => self.after = Some(newest),
                _ => self.exhausted = true,
            },
            None => match page.iter().map(|m| m.id).min() {
                Some(oldest) if self.before.map_or(true, |b| oldest < b) => {
                    self.before = Some(oldest);
                }
                _ => self.exhausted = true,
            },
        }
    }
}

/// Stream every message of a channel in the requested window
///
/// `after` switches to forward paging strictly after that message; `limit`
/// caps the total number of messages yielded. A failing page request ends
/// the stream with that error.
pub fn channel_history<'a>(
    chat: &'a dyn ChatClient,
    channel_id: Snowflake,
    after: Option<Snowflake>,
    limit: Option<usize>,
) -> impl Stream<Item = Result<Message, DomainError>> + Send + 'a {
    stream::try_unfold(HistoryCursor::new(after, limit), move |mut cursor| async move {
        let Some(query) = cursor.next_query() else {
            return Ok(None);
        };

        let mut page = chat.fetch_messages(channel_id, query).await?;
        cursor.advance(query.limit, &mut page);

        tracing::trace!(
            channel_id = %channel_id,
            page = page.len(),
            "History page fetched"
        );

        Ok::<_, DomainError>(Some((
            stream::iter(page.into_iter().map(Ok::<Message, DomainError>)),
            cursor,
        )))
    })
    .try_flatten()
}
