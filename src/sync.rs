//! Debounced settings sync.
//!
//! The wizard pushes every changed `Settings` projection into a single worker
//! task. The worker waits for a quiet period, then writes the latest value.
//! Writes are serialized, so the last write sent is the last to land. Each
//! write takes the next client revision. A payload equal to the last one the
//! store accepted is not sent again.
//!
//! Background write failures are logged and dropped; the next edit retries.
//! `flush` is the explicit save boundary and reports its outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::ReportApi;
use crate::error::ConsoleError;
use crate::types::Settings;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

type Reply = oneshot::Sender<Result<u64, ConsoleError>>;

enum SyncCommand {
    Update(Settings),
    Flush(Reply),
    Shutdown(Reply),
}

struct SyncWorker {
    api: Arc<dyn ReportApi>,
    debounce: Duration,
    pending: Option<Settings>,
    deadline: Option<Instant>,
    last_written: Option<Settings>,
    revision: u64,
}

impl SyncWorker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SyncCommand>) {
        loop {
            let command = match self.deadline {
                Some(at) => tokio::select! {
                    command = rx.recv() => command,
                    _ = tokio::time::sleep_until(at) => {
                        // Outcome already logged.
                        let _ = self.write_pending().await;
                        continue;
                    }
                },
                None => rx.recv().await,
            };

            match command {
                Some(SyncCommand::Update(settings)) => {
                    self.pending = Some(settings);
                    self.deadline = Some(Instant::now() + self.debounce);
                }
                Some(SyncCommand::Flush(reply)) => {
                    let _ = reply.send(self.write_pending().await);
                }
                Some(SyncCommand::Shutdown(reply)) => {
                    let _ = reply.send(self.write_pending().await);
                    break;
                }
                None => {
                    let _ = self.write_pending().await;
                    break;
                }
            }
        }
        log::debug!("Settings sync stopped at revision {}", self.revision);
    }

    /// Write whatever is pending. Returns the revision the store now holds.
    async fn write_pending(&mut self) -> Result<u64, ConsoleError> {
        self.deadline = None;
        let Some(settings) = self.pending.take() else {
            return Ok(self.revision);
        };

        if self.last_written.as_ref() == Some(&settings) {
            log::debug!("Settings unchanged since revision {}, skipping write", self.revision);
            return Ok(self.revision);
        }

        let revision = self.revision + 1;
        match self.api.save_settings(&settings).await {
            Ok(_) => {
                self.revision = revision;
                self.last_written = Some(settings);
                log::info!("Settings revision {} saved", revision);
                Ok(revision)
            }
            Err(e) => {
                log::warn!("Settings revision {} not saved: {}", revision, e);
                Err(ConsoleError::Sync(e.to_string()))
            }
        }
    }
}

/// Owner side of the sync worker.
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Start the worker. `baseline` is the record just read from the store,
    /// so re-pushing it unchanged costs nothing.
    pub fn spawn(api: Arc<dyn ReportApi>, debounce: Duration, baseline: Option<Settings>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = SyncWorker {
            api,
            debounce,
            pending: None,
            deadline: None,
            last_written: baseline,
            revision: 0,
        };
        let task = tokio::spawn(worker.run(rx));
        Self { tx, task }
    }

    /// Queue the latest settings; the write happens after the quiet period.
    pub fn push(&self, settings: Settings) {
        if self.tx.send(SyncCommand::Update(settings)).is_err() {
            log::warn!("Settings sync worker is gone, edit not queued");
        }
    }

    /// Write any pending settings now.
    pub async fn flush(&self) -> Result<u64, ConsoleError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .send(SyncCommand::Flush(reply))
            .map_err(|_| ConsoleError::Sync("sync worker stopped".to_string()))?;
        outcome
            .await
            .map_err(|_| ConsoleError::Sync("sync worker stopped".to_string()))?
    }

    /// Flush, then stop the worker.
    pub async fn shutdown(self) -> Result<u64, ConsoleError> {
        let (reply, outcome) = oneshot::channel();
        let sent = self.tx.send(SyncCommand::Shutdown(reply)).is_ok();
        let result = if sent {
            outcome
                .await
                .map_err(|_| ConsoleError::Sync("sync worker stopped".to_string()))?
        } else {
            Err(ConsoleError::Sync("sync worker stopped".to_string()))
        };
        if let Err(e) = self.task.await {
            log::warn!("Settings sync task ended abnormally: {}", e);
        }
        result
    }
}
