//! Handler system for the neo framework.
//!
//! A handler is the action half of a registry entry: it receives a fresh
//! [`Context`] for every event its matcher accepts and returns a
//! [`HandlerResult`]. Any async function or closure taking a `Context` is a
//! handler through the blanket implementation:
//!
//! ```rust,ignore
//! async fn greet(ctx: Context) -> HandlerResult {
//!     ctx.send_text("hello").await?;
//!     Ok(())
//! }
//!
//! registry.register(any(), greet);
//! registry.register(any(), |ctx: Context| async move {
//!     tracing::info!(body = ctx.body(), "received message");
//!     Ok(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::context::Context;
use crate::error::HandlerResult;

/// The action invoked for a matched event.
pub trait Handler: Send + Sync + 'static {
    /// Runs the handler with the given context.
    fn call(&self, ctx: Context) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<'static, HandlerResult> {
        (self)(ctx).boxed()
    }
}

/// A type-erased handler that can be stored in the registry.
pub type BoxedHandler = Arc<dyn Handler>;

/// Converts a handler into a [`BoxedHandler`].
pub fn into_handler<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}
