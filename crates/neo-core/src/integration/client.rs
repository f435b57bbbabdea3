//! Chat client capability.
//!
//! [`ChatClient`] is the only way the framework talks to the chat server. It
//! mirrors the small subset of the client-server API a polling bot needs:
//!
//! | Method | Server operation |
//! |--------|------------------|
//! | [`sync`](ChatClient::sync) | Initial sync, yields the starting stream position |
//! | [`own_display_name`](ChatClient::own_display_name) | Profile lookup for the bot user |
//! | [`messages`](ChatClient::messages) | Paginated room history after a position |
//! | [`send_text`](ChatClient::send_text) / [`send_image`](ChatClient::send_image) | Room message send |
//! | [`upload_link`](ChatClient::upload_link) | Fetch a remote file and store it as media |
//! | [`set_typing`](ChatClient::set_typing) | Typing notification with a timeout |
//!
//! Implementations wrap a pre-built client library; tests use in-memory mocks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::foundation::error::TransportResult;
use crate::foundation::event::{ContentUri, Event, EventId, StreamToken};

/// Credentials used to construct a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the home server, e.g. `https://matrix.example.org`.
    pub home_server: String,
    /// Fully qualified user id of the bot.
    pub user_id: String,
    /// Access token of the bot user.
    pub access_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("home_server", &self.home_server)
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Pagination direction for [`ChatClient::messages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Chronological order, oldest first.
    #[default]
    Forward,
    /// Reverse chronological order.
    Backward,
}

impl Direction {
    /// Returns the wire value of the direction (`f` or `b`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "f",
            Self::Backward => "b",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of room events.
#[derive(Debug, Clone, Default)]
pub struct MessagesPage {
    /// Events in the requested direction.
    pub chunk: Vec<Event>,
    /// Token the page starts at.
    pub start: Option<StreamToken>,
    /// Token to continue from. `None` when there are no further events yet.
    pub end: Option<StreamToken>,
}

impl MessagesPage {
    /// Returns `true` if the page holds no events.
    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    /// Returns the number of events in the page.
    pub fn len(&self) -> usize {
        self.chunk.len()
    }
}

/// The chat client capability.
///
/// All room-scoped operations take the room id explicitly; a client is not
/// bound to a room.
#[async_trait]
pub trait ChatClient: Send + Sync + 'static {
    /// Returns the user id the client is logged in as.
    fn user_id(&self) -> &str;

    /// Performs an initial sync and returns the position to continue from.
    async fn sync(&self) -> TransportResult<StreamToken>;

    /// Returns the display name of the logged in user.
    async fn own_display_name(&self) -> TransportResult<String>;

    /// Sends a plain text message to a room.
    async fn send_text(&self, room_id: &str, body: &str) -> TransportResult<EventId>;

    /// Sends an image message referencing already uploaded content.
    async fn send_image(
        &self,
        room_id: &str,
        body: &str,
        uri: &ContentUri,
    ) -> TransportResult<EventId>;

    /// Downloads `url` and stores it on the server, returning its content URI.
    async fn upload_link(&self, url: &str) -> TransportResult<ContentUri>;

    /// Starts or stops the typing notification in a room.
    async fn set_typing(
        &self,
        room_id: &str,
        typing: bool,
        timeout: Duration,
    ) -> TransportResult<()>;

    /// Fetches up to `limit` events of a room starting at `from`.
    async fn messages(
        &self,
        room_id: &str,
        from: &StreamToken,
        direction: Direction,
        limit: u32,
    ) -> TransportResult<MessagesPage>;
}

/// A shared chat client trait object.
pub type BoxedClient = Arc<dyn ChatClient>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::TransportError;

    struct OfflineClient;

    #[async_trait]
    impl ChatClient for OfflineClient {
        fn user_id(&self) -> &str {
            "@bot:example.org"
        }

        async fn sync(&self) -> TransportResult<StreamToken> {
            Ok(StreamToken::new("s0"))
        }

        async fn own_display_name(&self) -> TransportResult<String> {
            Ok("bot".into())
        }

        async fn send_text(&self, _room_id: &str, _body: &str) -> TransportResult<EventId> {
            Err(TransportError::SendFailed("offline".into()))
        }

        async fn send_image(
            &self,
            _room_id: &str,
            _body: &str,
            _uri: &ContentUri,
        ) -> TransportResult<EventId> {
            Err(TransportError::SendFailed("offline".into()))
        }

        async fn upload_link(&self, url: &str) -> TransportResult<ContentUri> {
            Err(TransportError::UploadFailed {
                url: url.into(),
                reason: "offline".into(),
            })
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
            _direction: Direction,
            _limit: u32,
        ) -> TransportResult<MessagesPage> {
            Ok(MessagesPage {
                chunk: Vec::new(),
                start: Some(from.clone()),
                end: None,
            })
        }
    }

    #[test]
    fn test_direction_wire_values() {
        assert_eq!(Direction::Forward.as_str(), "f");
        assert_eq!(Direction::Backward.to_string(), "b");
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = Credentials {
            home_server: "https://matrix.example.org".into(),
            user_id: "@bot:example.org".into(),
            access_token: "syt_secret".into(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("@bot:example.org"));
        assert!(!debug.contains("syt_secret"));
    }

    #[tokio::test]
    async fn test_client_as_trait_object() {
        let client: BoxedClient = Arc::new(OfflineClient);
        let token = client.sync().await.unwrap();
        let page = client
            .messages("!room:example.org", &token, Direction::Forward, 10)
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.start, Some(token));
        assert!(matches!(
            client.send_text("!room:example.org", "hi").await,
            Err(TransportError::SendFailed(_))
        ));
    }
}
