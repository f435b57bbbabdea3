//! Handler context for the neo framework.
//!
//! A [`Context`] is created fresh for every handler invocation. It bundles:
//!
//! - the event that triggered the handler (or a synthetic, room-only event for
//!   out-of-band contexts),
//! - the shared chat client,
//! - the tracing span the handler runs in.
//!
//! Its actions are thin pass-throughs to the client, scoped to the event's
//! room. They do not retry or validate anything.
//!
//! ```rust,ignore
//! async fn handle(ctx: Context) -> HandlerResult {
//!     ctx.set_typing(true).await?;
//!     let uri = ctx.upload_link("https://example.org/cat.png").await?;
//!     ctx.send_image("a cat", &uri).await?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::Span;

use crate::registry::HandlerId;
use neo_core::{BoxedClient, ContentUri, Event, EventId, TransportResult};

/// Timeout sent along with typing notifications.
pub const TYPING_TIMEOUT: Duration = Duration::from_millis(64);

/// The context object passed to handlers.
///
/// Cloning is cheap: the event and client are shared.
#[derive(Clone)]
pub struct Context {
    event: Arc<Event>,
    client: BoxedClient,
    span: Span,
    handler_id: Option<HandlerId>,
}

impl Context {
    /// Creates a context for a received event.
    pub fn new(event: Arc<Event>, client: BoxedClient) -> Self {
        Self {
            event,
            client,
            span: Span::current(),
            handler_id: None,
        }
    }

    /// Creates an out-of-band context bound to a room.
    ///
    /// The context carries a synthetic event holding only the room id.
    pub fn for_room(room_id: impl Into<String>, client: BoxedClient) -> Self {
        Self::new(Arc::new(Event::for_room(room_id)), client)
    }

    pub(crate) fn with_handler(mut self, handler_id: HandlerId, span: Span) -> Self {
        self.handler_id = Some(handler_id);
        self.span = span;
        self
    }

    /// Returns the event that triggered this context.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Returns a clone of the shared event.
    pub fn event_arc(&self) -> Arc<Event> {
        Arc::clone(&self.event)
    }

    /// Returns the room this context acts on.
    pub fn room_id(&self) -> &str {
        &self.event.room_id
    }

    /// Returns the body of the triggering message.
    pub fn body(&self) -> &str {
        self.event.body()
    }

    /// Returns the chat client.
    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    /// Returns the span the handler runs in.
    ///
    /// Events logged inside a handler are already recorded in this span; it
    /// is exposed for work the handler spawns elsewhere.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Returns the id of the handler this context was created for.
    pub fn handler_id(&self) -> Option<HandlerId> {
        self.handler_id
    }

    // ─── Actions ──────────────────────────────────────────────────────────────

    /// Sends a text message to the current room.
    pub async fn send_text(&self, body: &str) -> TransportResult<EventId> {
        self.client.send_text(self.room_id(), body).await
    }

    /// Sends an image message to the current room.
    ///
    /// `uri` must already be a server-side content URI, see
    /// [`upload_link`](Self::upload_link).
    pub async fn send_image(&self, body: &str, uri: &ContentUri) -> TransportResult<EventId> {
        self.client.send_image(self.room_id(), body, uri).await
    }

    /// Uploads a remote file to the chat server and returns its content URI.
    pub async fn upload_link(&self, url: &str) -> TransportResult<ContentUri> {
        self.client.upload_link(url).await
    }

    /// Indicates typing activity in the current room for [`TYPING_TIMEOUT`].
    pub async fn set_typing(&self, typing: bool) -> TransportResult<()> {
        self.set_typing_for(typing, TYPING_TIMEOUT).await
    }

    /// Indicates typing activity with an explicit timeout.
    pub async fn set_typing_for(&self, typing: bool, timeout: Duration) -> TransportResult<()> {
        self.client.set_typing(self.room_id(), typing, timeout).await
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("event", &self.event)
            .field("user_id", &self.client.user_id())
            .field("handler_id", &self.handler_id)
            .finish_non_exhaustive()
    }
}
