//! Chat event model.
//!
//! An [`Event`] is one room event as delivered by the chat server, using the
//! Matrix client-server field names so that a client implementation can
//! deserialize server responses directly:
//!
//! ```json
//! {
//!   "event_id": "$143273582443PhrSn:example.org",
//!   "type": "m.room.message",
//!   "room_id": "!636q39766251:example.com",
//!   "sender": "@example:example.org",
//!   "origin_server_ts": 1432735824653,
//!   "content": { "msgtype": "m.text", "body": "Do you copy?" }
//! }
//! ```
//!
//! Events are immutable once received; the dispatcher hands them to handlers
//! as `Arc<Event>`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event type of an ordinary room message.
pub const ROOM_MESSAGE: &str = "m.room.message";

/// Identifier of an event, as assigned by the server.
pub type EventId = String;

/// A single room event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Server-assigned event identifier. Empty for synthetic events.
    #[serde(default)]
    pub event_id: EventId,

    /// Fully qualified user id of the sender, e.g. `@alice:example.org`.
    #[serde(default)]
    pub sender: String,

    /// Room the event belongs to.
    #[serde(default)]
    pub room_id: String,

    /// Event type, e.g. `m.room.message`.
    #[serde(rename = "type", default)]
    pub event_type: String,

    /// Event content.
    #[serde(default)]
    pub content: MessageContent,

    /// Server timestamp in milliseconds since the Unix epoch.
    #[serde(default)]
    pub origin_server_ts: u64,
}

impl Event {
    /// Creates a synthetic event that only carries a room id.
    ///
    /// Used for contexts that are not triggered by a received event.
    pub fn for_room(room_id: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            sender: String::new(),
            room_id: room_id.into(),
            event_type: String::new(),
            content: MessageContent::default(),
            origin_server_ts: 0,
        }
    }

    /// Creates a plain text room message event.
    pub fn text(
        event_id: impl Into<String>,
        room_id: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            sender: sender.into(),
            room_id: room_id.into(),
            event_type: ROOM_MESSAGE.to_string(),
            content: MessageContent::text(body),
            origin_server_ts: 0,
        }
    }

    /// Returns the message body, or an empty string for non-message events.
    pub fn body(&self) -> &str {
        &self.content.body
    }

    /// Returns the message type (`m.text`, `m.image`, ...), if any.
    pub fn msgtype(&self) -> Option<&str> {
        self.content.msgtype.as_deref()
    }

    /// Returns `true` for `m.room.message` events.
    pub fn is_message(&self) -> bool {
        self.event_type == ROOM_MESSAGE
    }

    /// Returns `true` if this event was sent by `user_id`.
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender == user_id
    }

    /// Returns `true` if this event was built by [`Event::for_room`].
    pub fn is_synthetic(&self) -> bool {
        self.event_id.is_empty() && self.event_type.is_empty()
    }
}

/// Content of a room message.
///
/// Fields that the framework does not interpret are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Message type, e.g. `m.text` or `m.image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgtype: Option<String>,

    /// Textual body of the message.
    #[serde(default)]
    pub body: String,

    /// Content URI for media messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Any other content fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageContent {
    /// Creates `m.text` content.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            msgtype: Some("m.text".to_string()),
            body: body.into(),
            url: None,
            extra: Map::new(),
        }
    }

    /// Creates `m.image` content referencing an uploaded content URI.
    pub fn image(body: impl Into<String>, uri: &ContentUri) -> Self {
        Self {
            msgtype: Some("m.image".to_string()),
            body: body.into(),
            url: Some(uri.to_string()),
            extra: Map::new(),
        }
    }
}

// =============================================================================
// Opaque server tokens
// =============================================================================

/// Opaque pagination token marking a position in the room's event stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamToken(String);

impl StreamToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for StreamToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Server-side content identifier of uploaded media (`mxc://server/id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUri(String);

impl ContentUri {
    /// Wraps a raw content URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Returns the raw URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
