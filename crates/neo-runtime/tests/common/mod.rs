//! Scripted chat client shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use neo_core::{
    BoxedClient, ChatClient, ContentUri, Direction, Event, EventId, MessagesPage, StreamToken,
    TransportError, TransportResult,
};
use neo_framework::{Context, Handler, HandlerResult};
use neo_runtime::{Bot, CancellationToken, NeoConfig, RuntimeResult};

pub const ROOM: &str = "!room:example.org";
pub const BOT: &str = "@neo:example.org";
pub const DISPLAY_NAME: &str = "Neo";
pub const INITIAL_POSITION: &str = "s0";

/// A recorded `messages` call.
#[derive(Debug, Clone)]
pub struct Fetch {
    pub from: StreamToken,
    pub direction: Direction,
    pub limit: u32,
    pub at: Instant,
}

/// A chat client that serves pre-scripted pages and records every call.
///
/// Once the script is exhausted, fetches return empty pages.
#[derive(Default)]
pub struct ScriptedClient {
    pages: Mutex<VecDeque<TransportResult<MessagesPage>>>,
    fetches: Mutex<Vec<Fetch>>,
    sent: Mutex<Vec<(String, String)>>,
    syncs: Mutex<u32>,
    fail_sync: AtomicBool,
}

impl ScriptedClient {
    pub fn new(script: Vec<TransportResult<MessagesPage>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(script.into()),
            ..Default::default()
        })
    }

    pub fn boxed(self: &Arc<Self>) -> BoxedClient {
        Arc::clone(self) as BoxedClient
    }

    pub fn fail_sync(&self) {
        self.fail_sync.store(true, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> Vec<Fetch> {
        self.fetches.lock().clone()
    }

    pub fn fetch_positions(&self) -> Vec<String> {
        self.fetches
            .lock()
            .iter()
            .map(|f| f.from.as_str().to_string())
            .collect()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, body)| body.clone()).collect()
    }

    pub fn syncs(&self) -> u32 {
        *self.syncs.lock()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    fn user_id(&self) -> &str {
        BOT
    }

    async fn sync(&self) -> TransportResult<StreamToken> {
        *self.syncs.lock() += 1;
        if self.fail_sync.load(Ordering::SeqCst) {
            return Err(TransportError::connection(
                "https://matrix.example.org",
                "connection refused",
            ));
        }
        Ok(StreamToken::new(INITIAL_POSITION))
    }

    async fn own_display_name(&self) -> TransportResult<String> {
        Ok(DISPLAY_NAME.to_string())
    }

    async fn send_text(&self, room_id: &str, body: &str) -> TransportResult<EventId> {
        let mut sent = self.sent.lock();
        sent.push((room_id.to_string(), body.to_string()));
        Ok(format!("$sent{}", sent.len()))
    }

    async fn send_image(
        &self,
        room_id: &str,
        body: &str,
        _uri: &ContentUri,
    ) -> TransportResult<EventId> {
        self.send_text(room_id, body).await
    }

    async fn upload_link(&self, url: &str) -> TransportResult<ContentUri> {
        Ok(ContentUri::new(format!("mxc://example.org/{}", url.len())))
    }

    async fn set_typing(
        &self,
        _room_id: &str,
        _typing: bool,
        _timeout: Duration,
    ) -> TransportResult<()> {
        Ok(())
    }

    async fn messages(
        &self,
        _room_id: &str,
        from: &StreamToken,
        direction: Direction,
        limit: u32,
    ) -> TransportResult<MessagesPage> {
        self.fetches.lock().push(Fetch {
            from: from.clone(),
            direction,
            limit,
            at: Instant::now(),
        });
        self.pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(MessagesPage::default()))
    }
}

pub fn config() -> NeoConfig {
    let mut config = NeoConfig::new("https://matrix.example.org", BOT, "token");
    config.fetch_retry.max_retries = 2;
    config.fetch_retry.initial_delay_ms = 100;
    config.fetch_retry.max_delay_ms = 400;
    config
}

pub fn text(event_id: &str, sender: &str, body: &str) -> Event {
    Event::text(event_id, ROOM, sender, body)
}

pub fn page(events: Vec<Event>, end: Option<&str>) -> TransportResult<MessagesPage> {
    Ok(MessagesPage {
        chunk: events,
        start: None,
        end: end.map(StreamToken::new),
    })
}

pub fn empty_page() -> TransportResult<MessagesPage> {
    Ok(MessagesPage::default())
}

/// Handler recording the body of every event it sees.
pub fn recorder(seen: &Arc<Mutex<Vec<String>>>) -> impl Handler {
    let seen = Arc::clone(seen);
    move |ctx: Context| {
        let seen = Arc::clone(&seen);
        async move {
            seen.lock().push(ctx.body().to_string());
            HandlerResult::Ok(())
        }
    }
}

/// Runs `bot` in [`ROOM`] and cancels it after `duration`.
pub async fn run_for(bot: &Bot, duration: Duration) -> RuntimeResult<()> {
    let cancel = CancellationToken::new();
    let (result, ()) = tokio::join!(bot.run(cancel.clone(), ROOM), async {
        tokio::time::sleep(duration).await;
        cancel.cancel();
    });
    result
}

/// Runs `bot` in [`ROOM`], cancels it after `duration` and returns the result
/// together with the time `run` took to return once cancelled.
pub async fn cancel_after(bot: &Bot, duration: Duration) -> (RuntimeResult<()>, Duration) {
    let cancel = CancellationToken::new();
    let ((result, returned_at), cancelled_at) = tokio::join!(
        async {
            let result = bot.run(cancel.clone(), ROOM).await;
            (result, Instant::now())
        },
        async {
            tokio::time::sleep(duration).await;
            cancel.cancel();
            Instant::now()
        }
    );
    (result, returned_at.saturating_duration_since(cancelled_at))
}
