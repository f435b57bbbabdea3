//! A chat client backed by the terminal.
//!
//! Lines typed on stdin become messages in the watched room; everything the
//! bot sends is printed to stdout.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, trace};

use neo::core::{Direction, EventId, MessagesPage};
use neo::prelude::*;

/// Sender of the messages typed on stdin.
pub const CONSOLE_USER: &str = "@console:localhost";

/// Messages waiting to be fetched by the bot.
pub type Inbox = Arc<Mutex<VecDeque<Event>>>;

/// A [`ChatClient`] reading room messages from an [`Inbox`].
pub struct ConsoleClient {
    user_id: String,
    inbox: Inbox,
    /// Number of inbox messages handed out so far; also the stream position.
    delivered: AtomicU64,
    sent: AtomicU64,
}

impl ConsoleClient {
    pub fn new(credentials: &Credentials, inbox: Inbox) -> Self {
        Self {
            user_id: credentials.user_id.clone(),
            inbox,
            delivered: AtomicU64::new(0),
            sent: AtomicU64::new(0),
        }
    }

    fn next_event_id(&self) -> EventId {
        format!("$out{}", self.sent.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl ChatClient for ConsoleClient {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn sync(&self) -> TransportResult<StreamToken> {
        Ok(StreamToken::new(
            self.delivered.load(Ordering::Relaxed).to_string(),
        ))
    }

    async fn own_display_name(&self) -> TransportResult<String> {
        Ok(localpart(&self.user_id).to_string())
    }

    async fn send_text(&self, room_id: &str, body: &str) -> TransportResult<EventId> {
        println!("[{room_id}] {}: {body}", localpart(&self.user_id));
        Ok(self.next_event_id())
    }

    async fn send_image(
        &self,
        room_id: &str,
        body: &str,
        uri: &ContentUri,
    ) -> TransportResult<EventId> {
        println!("[{room_id}] {}: {body} <{uri}>", localpart(&self.user_id));
        Ok(self.next_event_id())
    }

    async fn upload_link(&self, url: &str) -> TransportResult<ContentUri> {
        Ok(ContentUri::new(format!(
            "mxc://localhost/{}",
            url.rsplit('/').next().unwrap_or(url)
        )))
    }

    async fn set_typing(
        &self,
        room_id: &str,
        typing: bool,
        timeout: Duration,
    ) -> TransportResult<()> {
        trace!(room_id, typing, ?timeout, "typing");
        Ok(())
    }

    async fn messages(
        &self,
        room_id: &str,
        from: &StreamToken,
        _direction: Direction,
        limit: u32,
    ) -> TransportResult<MessagesPage> {
        let mut inbox = self.inbox.lock();
        let take = inbox.len().min(limit as usize);
        let chunk: Vec<Event> = inbox
            .drain(..take)
            .filter(|event| event.room_id == room_id)
            .collect();

        if take == 0 {
            return Ok(MessagesPage::default());
        }

        let delivered = self.delivered.fetch_add(take as u64, Ordering::Relaxed) + take as u64;
        Ok(MessagesPage {
            chunk,
            start: Some(from.clone()),
            end: Some(StreamToken::new(delivered.to_string())),
        })
    }
}

/// Pushes every line read from stdin into `inbox` as a message in `room_id`.
///
/// Returns when stdin is closed.
pub async fn read_stdin(room_id: String, inbox: Inbox) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut count = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        count += 1;
        inbox.lock().push_back(Event::text(
            format!("$in{count}"),
            room_id.as_str(),
            CONSOLE_USER,
            line,
        ));
    }

    debug!(messages = count, "stdin closed");
    Ok(())
}

fn localpart(user_id: &str) -> &str {
    user_id
        .trim_start_matches('@')
        .split(':')
        .next()
        .unwrap_or(user_id)
}
