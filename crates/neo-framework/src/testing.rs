//! In-memory chat client used by the unit tests of this crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use neo_core::{
    BoxedClient, ChatClient, ContentUri, Direction, EventId, MessagesPage, StreamToken,
    TransportError, TransportResult,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SendText {
        room_id: String,
        body: String,
    },
    SendImage {
        room_id: String,
        body: String,
        uri: String,
    },
    UploadLink {
        url: String,
    },
    SetTyping {
        room_id: String,
        typing: bool,
        timeout: Duration,
    },
}

#[derive(Default)]
pub(crate) struct MockClient {
    calls: Mutex<Vec<Call>>,
    fail_sends: AtomicBool,
}

impl MockClient {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn boxed(self: &Arc<Self>) -> BoxedClient {
        Arc::clone(self) as BoxedClient
    }

    pub(crate) fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub(crate) fn sent_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::SendText { body, .. } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatClient for MockClient {
    fn user_id(&self) -> &str {
        "@bot:example.org"
    }

    async fn sync(&self) -> TransportResult<StreamToken> {
        Ok(StreamToken::new("s0"))
    }

    async fn own_display_name(&self) -> TransportResult<String> {
        Ok("Mock Bot".into())
    }

    async fn send_text(&self, room_id: &str, body: &str) -> TransportResult<EventId> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("rejected by mock".into()));
        }
        let mut calls = self.calls.lock();
        calls.push(Call::SendText {
            room_id: room_id.into(),
            body: body.into(),
        });
        Ok(format!("$sent{}", calls.len()))
    }

    async fn send_image(
        &self,
        room_id: &str,
        body: &str,
        uri: &ContentUri,
    ) -> TransportResult<EventId> {
        let mut calls = self.calls.lock();
        calls.push(Call::SendImage {
            room_id: room_id.into(),
            body: body.into(),
            uri: uri.to_string(),
        });
        Ok(format!("$sent{}", calls.len()))
    }

    async fn upload_link(&self, url: &str) -> TransportResult<ContentUri> {
        self.calls.lock().push(Call::UploadLink { url: url.into() });
        let name = url.rsplit('/').next().unwrap_or_default();
        Ok(ContentUri::new(format!("mxc://example.org/{name}")))
    }

    async fn set_typing(
        &self,
        room_id: &str,
        typing: bool,
        timeout: Duration,
    ) -> TransportResult<()> {
        self.calls.lock().push(Call::SetTyping {
            room_id: room_id.into(),
            typing,
            timeout,
        });
        Ok(())
    }

    async fn messages(
        &self,
        _room_id: &str,
        _from: &StreamToken,
        _direction: Direction,
        _limit: u32,
    ) -> TransportResult<MessagesPage> {
        Ok(MessagesPage::default())
    }
}
