//! The steady-state polling loop.
//!
//! One [`PollLoop`] runs per [`Bot::run`](crate::Bot::run) call, inside its own
//! task. Each iteration fetches the page after the session position, hands
//! every foreign event to the registry, advances the position and sleeps for
//! the polling interval. The first unrecoverable error is sent through the
//! failure channel and ends the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::RetryConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::session::Session;
use neo_core::{BoxedClient, Direction, MessagesPage, StreamToken};
use neo_framework::Registry;

/// State of a running polling loop.
pub(crate) struct PollLoop {
    pub(crate) client: BoxedClient,
    pub(crate) registry: Arc<Registry>,
    pub(crate) session: Arc<Session>,
    /// Position the next fetch starts from.
    pub(crate) from: StreamToken,
    pub(crate) page_size: u32,
    pub(crate) interval: Duration,
    pub(crate) retry: RetryConfig,
}

impl PollLoop {
    /// Runs until cancelled or until the first unrecoverable error.
    pub(crate) async fn run(
        mut self,
        cancel: CancellationToken,
        failures: mpsc::Sender<RuntimeError>,
    ) {
        info!(
            position = %self.from,
            interval = ?self.interval,
            page_size = self.page_size,
            "polling started"
        );

        loop {
            let step = tokio::select! {
                () = cancel.cancelled() => break,
                step = self.poll_once() => step,
            };

            if let Err(err) = step {
                error!(error = %err, "polling stopped");
                let _ = failures.try_send(err);
                return;
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(position = %self.from, "polling cancelled");
    }

    /// Fetches one page and dispatches its events.
    async fn poll_once(&mut self) -> RuntimeResult<()> {
        let page = self.fetch_page().await?;
        self.session.record_page();

        if page.is_empty() {
            trace!(position = %self.from, "no new messages");
            return Ok(());
        }

        debug!(messages_count = page.len(), position = %self.from, "fetched messages");

        let own_user_id = self.client.user_id().to_string();
        for event in page.chunk {
            if event.is_from(&own_user_id) {
                trace!(event_id = %event.event_id, "skipping own event");
                continue;
            }

            self.registry
                .dispatch(Arc::new(event), &self.client)
                .await?;
            self.session.record_dispatch();
        }

        if let Some(end) = page.end {
            trace!(from = %self.from, to = %end, "advancing position");
            self.session.set_position(end.clone());
            self.from = end;
        }

        Ok(())
    }

    /// Fetches the next page, retrying failures with exponential backoff.
    async fn fetch_page(&self) -> RuntimeResult<MessagesPage> {
        let mut retry_count = 0;

        loop {
            let result = self
                .client
                .messages(
                    self.session.room_id(),
                    &self.from,
                    Direction::Forward,
                    self.page_size,
                )
                .await;

            match result {
                Ok(page) => return Ok(page),
                Err(source) if retry_count >= self.retry.max_retries => {
                    return Err(RuntimeError::Fetch {
                        attempts: retry_count + 1,
                        source,
                    });
                }
                Err(e) => {
                    retry_count += 1;
                    let delay = self.retry.delay_for(retry_count);
                    warn!(
                        error = %e,
                        retry = retry_count,
                        delay = ?delay,
                        "fetching messages failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
