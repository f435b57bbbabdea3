//! The bot: configuration, chat client, handler registry and run loop.
//!
//! ```rust,ignore
//! use neo_runtime::prelude::*;
//!
//! let bot = Bot::new(load_config()?, |credentials| MyClient::login(credentials))?;
//!
//! bot.register(body_contains("you"), |ctx: Context| async move {
//!     ctx.send_text("Who, me?").await?;
//!     Ok(())
//! });
//!
//! bot.run_until_shutdown("!room:example.org").await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{NeoConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult, StartupStage};
use crate::poller::PollLoop;
use crate::session::Session;
use neo_core::{BoxedClient, ChatClient, Credentials, Event, StreamToken, TransportResult};
use neo_framework::{Context, DispatchResult, Handler, HandlerId, IntoMatcher, Registry};

/// Builds the announcement sent to the room when the bot starts.
pub fn announcement(display_name: &str) -> String {
    format!("Hello, I'm {display_name} and now ready for service 🤖")
}

/// A polling chat bot.
pub struct Bot {
    config: NeoConfig,
    client: BoxedClient,
    registry: Arc<Registry>,
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl Bot {
    /// Validates `config` and builds the chat client with `connector`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Config`] if the configuration is invalid, in which
    /// case `connector` is never called. [`RuntimeError::Connect`] if the
    /// connector fails.
    pub fn new<C, F>(config: NeoConfig, connector: F) -> RuntimeResult<Self>
    where
        C: ChatClient,
        F: FnOnce(&Credentials) -> TransportResult<C>,
    {
        validate_config(&config)?;
        let client = connector(&config.credentials()).map_err(RuntimeError::Connect)?;
        Ok(Self::from_parts(config, Arc::new(client)))
    }

    /// Validates `config` and uses an already built client.
    pub fn with_client(config: NeoConfig, client: BoxedClient) -> RuntimeResult<Self> {
        validate_config(&config)?;
        Ok(Self::from_parts(config, client))
    }

    fn from_parts(config: NeoConfig, client: BoxedClient) -> Self {
        info!(
            home_server = %config.home_server,
            user_id = %config.user_id,
            polling_interval = ?config.polling_interval(),
            "bot created"
        );

        Self {
            config,
            client,
            registry: Arc::new(Registry::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NeoConfig {
        &self.config
    }

    /// Returns the chat client.
    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    /// Returns the handler registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Registers a handler. See [`Registry::register`].
    pub fn register<M, H>(&self, matcher: M, handler: H) -> HandlerId
    where
        M: IntoMatcher,
        H: Handler,
    {
        self.registry.register(matcher, handler)
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unregister(&self, id: HandlerId) -> bool {
        self.registry.unregister(id)
    }

    /// Dispatches an event to the matching handlers.
    ///
    /// Own events are not filtered here; that only happens in the run loop.
    pub async fn dispatch(&self, event: Event) -> DispatchResult<usize> {
        self.registry.dispatch(Arc::new(event), &self.client).await
    }

    /// Creates a context bound to `room_id`, for sends not tied to a
    /// received event.
    pub fn context(&self, room_id: impl Into<String>) -> Context {
        Context::for_room(room_id, Arc::clone(&self.client))
    }

    /// Returns the session of `room_id`, creating an empty one if needed.
    pub fn session(&self, room_id: &str) -> Arc<Session> {
        Arc::clone(
            self.sessions
                .lock()
                .entry(room_id.to_string())
                .or_insert_with(|| Arc::new(Session::new(room_id))),
        )
    }

    /// Makes the next [`run`](Self::run) for `room_id` continue from `token`
    /// instead of performing an initial sync.
    pub fn resume_from(&self, room_id: &str, token: impl Into<StreamToken>) {
        let token = token.into();
        debug!(room_id, position = %token, "resuming from stored position");
        self.session(room_id).set_position(token);
    }

    /// Runs the bot in `room_id` until `cancel` fires or an error occurs.
    ///
    /// Startup (sync, display name, announcement) happens before polling
    /// begins and any failure there is returned as [`RuntimeError::Startup`].
    /// Afterwards the polling loop runs in its own task; the first fetch or
    /// handler error stops it and is returned, even when cancellation fires
    /// at the same moment. Otherwise cancellation returns `Ok(())`.
    ///
    /// The polling task has finished when this returns.
    pub async fn run(&self, cancel: CancellationToken, room_id: &str) -> RuntimeResult<()> {
        let span = info_span!("bot", room_id, user_id = %self.config.user_id);
        self.run_inner(cancel, room_id).instrument(span).await
    }

    async fn run_inner(&self, cancel: CancellationToken, room_id: &str) -> RuntimeResult<()> {
        let session = self.session(room_id);
        let from = self.start(&session).await?;

        let poll_loop = PollLoop {
            client: Arc::clone(&self.client),
            registry: Arc::clone(&self.registry),
            session,
            from,
            page_size: self.config.page_size,
            interval: self.config.polling_interval(),
            retry: self.config.fetch_retry.clone(),
        };

        let (failure_tx, mut failure_rx) = mpsc::channel(1);
        let token = cancel.child_token();
        let task = tokio::spawn(
            poll_loop
                .run(token.clone(), failure_tx)
                .instrument(tracing::Span::current()),
        );

        let failure = tokio::select! {
            biased;
            failure = failure_rx.recv() => failure,
            () = cancel.cancelled() => None,
        };

        token.cancel();
        if let Err(join_error) = task.await {
            warn!(error = %join_error, "polling task did not finish cleanly");
            return Err(RuntimeError::TaskFailed(join_error.to_string()));
        }

        // A failure reported while cancellation was already under way.
        match failure.or_else(|| failure_rx.try_recv().ok()) {
            Some(err) => Err(err),
            None => {
                info!("bot stopped");
                Ok(())
            }
        }
    }

    /// Prepares `session` for polling and returns the starting position.
    async fn start(&self, session: &Session) -> RuntimeResult<StreamToken> {
        let from = match session.position() {
            Some(token) => {
                info!(position = %token, "continuing from stored position");
                token
            }
            None => {
                let token = self
                    .client
                    .sync()
                    .await
                    .map_err(|e| RuntimeError::startup(StartupStage::Sync, e))?;
                debug!(position = %token, "initial sync completed");
                session.set_position(token.clone());
                token
            }
        };

        let display_name = self
            .client
            .own_display_name()
            .await
            .map_err(|e| RuntimeError::startup(StartupStage::DisplayName, e))?;

        if self.config.announce {
            self.context(session.room_id())
                .send_text(&announcement(&display_name))
                .await
                .map_err(|e| RuntimeError::startup(StartupStage::Announce, e))?;
        }

        info!(display_name = %display_name, "bot ready");
        Ok(from)
    }

    /// Runs the bot until Ctrl+C or SIGTERM, then stops it gracefully.
    pub async fn run_until_shutdown(&self, room_id: &str) -> RuntimeResult<()> {
        self.run_until(room_id, wait_for_shutdown()).await
    }

    /// Runs the bot until `shutdown` completes, then stops it gracefully.
    ///
    /// A shutdown future resolving to an error stops the bot and returns
    /// that error.
    pub async fn run_until<F>(&self, room_id: &str, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = RuntimeResult<()>>,
    {
        let cancel = CancellationToken::new();
        let run = self.run(cancel.clone(), room_id);
        tokio::pin!(run);

        let shutdown_result = tokio::select! {
            result = &mut run => return result,
            result = shutdown => result,
        };

        cancel.cancel();
        run.await?;
        shutdown_result
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("user_id", &self.config.user_id)
            .field("home_server", &self.config.home_server)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() -> RuntimeResult<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}
