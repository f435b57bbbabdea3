//! Handler registry for the neo framework.
//!
//! The [`Registry`] maps generated [`HandlerId`]s to (matcher, handler) pairs
//! and dispatches events to them.
//!
//! # Dispatch Rules
//!
//! When an event is dispatched:
//!
//! 1. Entries are visited in registration order
//! 2. For each entry whose matcher accepts the event, a fresh [`Context`] is
//!    built and the handler is awaited
//! 3. The first handler error stops dispatch; later entries are skipped and
//!    the error is returned tagged with the failing handler's id
//!
//! ```rust,ignore
//! let registry = Registry::new();
//!
//! let id = registry.register(body_contains("you"), reply_handler);
//! registry.register(any(), log_handler);
//!
//! let fired = registry.dispatch(Arc::new(event), &client).await?;
//! registry.unregister(id);
//! ```
//!
//! # Thread Safety
//!
//! Entries live behind a lock. Dispatch takes a snapshot of the entry list
//! before running any handler, so registering or removing handlers while a
//! dispatch is in flight is safe and takes effect for the next event.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{Instrument, debug, info, info_span, trace, warn};
use uuid::Uuid;

use crate::context::Context;
use crate::error::{DispatchError, DispatchResult};
use crate::handler::{BoxedHandler, Handler, into_handler};
use crate::matcher::{IntoMatcher, Matcher};
use neo_core::{BoxedClient, Event};

/// Unique identifier of a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A registered (matcher, handler) pair.
#[derive(Clone)]
struct Entry {
    id: HandlerId,
    matcher: Matcher,
    handler: BoxedHandler,
}

/// The handler registry.
#[derive(Default)]
pub struct Registry {
    entries: RwLock<Vec<Entry>>,
}

impl Registry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Registers a handler that fires for every event accepted by `matcher`.
    ///
    /// Always succeeds and returns a freshly generated id.
    pub fn register<M, H>(&self, matcher: M, handler: H) -> HandlerId
    where
        M: IntoMatcher,
        H: Handler,
    {
        let id = HandlerId::generate();
        let matcher = matcher.into_matcher();
        let matcher_name = matcher.get_name().unwrap_or("custom").to_string();

        self.entries.write().push(Entry {
            id,
            matcher,
            handler: into_handler(handler),
        });

        info!(handler_id = %id, matcher = %matcher_name, "registered handler");
        id
    }

    /// Removes a handler. Returns `false` if the id was not registered.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;

        if removed {
            info!(handler_id = %id, "unregistered handler");
        } else {
            warn!(handler_id = %id, "attempted to unregister unknown handler");
        }
        removed
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: HandlerId) -> bool {
        self.entries.read().iter().any(|e| e.id == id)
    }

    /// Returns the ids of all registered handlers in registration order.
    pub fn ids(&self) -> Vec<HandlerId> {
        self.entries.read().iter().map(|e| e.id).collect()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Dispatches an event to every matching handler.
    ///
    /// Returns the number of handlers that fired. Stops at the first handler
    /// error and returns it.
    pub async fn dispatch(&self, event: Arc<Event>, client: &BoxedClient) -> DispatchResult<usize> {
        let span = info_span!(
            "dispatch",
            event_id = %event.event_id,
            room_id = %event.room_id
        );
        self.dispatch_inner(event, client).instrument(span).await
    }

    async fn dispatch_inner(&self, event: Arc<Event>, client: &BoxedClient) -> DispatchResult<usize> {
        // Snapshot so no lock is held across handler awaits.
        let entries = self.entries.read().clone();
        let mut fired = 0;

        for entry in &entries {
            if !entry.matcher.matches(&event) {
                trace!(handler_id = %entry.id, "matcher rejected event");
                continue;
            }

            info!(handler_id = %entry.id, "firing handler");
            let span = info_span!("handler", handler_id = %entry.id);
            let ctx = Context::new(Arc::clone(&event), Arc::clone(client))
                .with_handler(entry.id, span.clone());

            if let Err(source) = entry.handler.call(ctx).instrument(span).await {
                debug!(handler_id = %entry.id, error = %source, "handler failed, stopping dispatch");
                return Err(DispatchError {
                    handler_id: entry.id,
                    source,
                });
            }
            fired += 1;
        }

        Ok(fired)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("handler_count", &self.len())
            .finish()
    }
}
