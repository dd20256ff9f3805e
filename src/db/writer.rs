use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::store::{KeyValueStore, StorageError, StorageKey, StorageResult};

/// Commands processed in order by the writer task
enum WriterCommand {
    Write { key: StorageKey, value: String },
    /// Answered once every earlier write has been attempted
    Flush(oneshot::Sender<StorageResult<()>>),
}

/// Queue handle for persisting records in the background
#[derive(Clone)]
pub struct StorageWriter {
    command_tx: mpsc::UnboundedSender<WriterCommand>,
}

/// Handle for gracefully shutting down the storage writer
pub struct StorageWriterHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl StorageWriterHandle {
    /// Stops the writer after every queued write has reached storage
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        tracing::info!("Storage writer shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Storage writer task join error");
        }
    }
}

impl StorageWriter {
    /// Spawns the background task that owns all writes to `store`
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (Self, StorageWriterHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            Self::writer_task(store, command_rx, shutdown_rx).await;
        });

        (
            Self { command_tx },
            StorageWriterHandle { shutdown_tx, task },
        )
    }

    /// Background task that processes writer commands.
    ///
    /// Failed writes are logged and remembered; the first failure since the
    /// previous flush is reported to the next flush caller.
    async fn writer_task(
        store: Arc<dyn KeyValueStore>,
        mut command_rx: mpsc::UnboundedReceiver<WriterCommand>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        tracing::info!(backend = store.name(), "Storage writer task started");
        let mut first_failure: Option<StorageError> = None;
        // A dropped handle is not a shutdown request; keep serving the queue
        let mut shutdown_armed = true;

        loop {
            tokio::select! {
                biased;

                command = command_rx.recv() => match command {
                    Some(command) => {
                        Self::handle(store.as_ref(), command, &mut first_failure).await;
                    }
                    None => {
                        tracing::info!("Storage writer queue closed");
                        break;
                    }
                },
                signal = &mut shutdown_rx, if shutdown_armed => {
                    if signal.is_err() {
                        shutdown_armed = false;
                        continue;
                    }

                    tracing::info!("Storage writer shutting down, flushing remaining writes");

                    while let Ok(command) = command_rx.try_recv() {
                        Self::handle(store.as_ref(), command, &mut first_failure).await;
                    }

                    break;
                }
            }
        }

        tracing::info!("Storage writer task stopped");
    }

    async fn handle(
        store: &dyn KeyValueStore,
        command: WriterCommand,
        first_failure: &mut Option<StorageError>,
    ) {
        match command {
            WriterCommand::Write { key, value } => {
                if let Err(e) = store.set(&key, value).await {
                    tracing::error!(error = %e, key = %key, "Failed to persist record");
                    if first_failure.is_none() {
                        *first_failure = Some(StorageError::WriteFailed {
                            key: key.to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            WriterCommand::Flush(reply) => {
                let result = match first_failure.take() {
                    Some(e) => Err(e),
                    None => Ok(()),
                };
                let _ = reply.send(result);
            }
        }
    }

    /// Serializes `value` and queues it for writing without waiting.
    ///
    /// Errors are logged, never returned: callers keep their in-memory state.
    pub fn enqueue<T: serde::Serialize>(&self, key: &StorageKey, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Record serialization error");
                return;
            }
        };

        let command = WriterCommand::Write {
            key: key.clone(),
            value: json,
        };

        if self.command_tx.send(command).is_err() {
            tracing::error!(key = %key, "Storage writer is not running, write dropped");
        }
    }

    /// Waits for all writes queued so far and reports the first failure among them
    pub async fn flush(&self) -> StorageResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(WriterCommand::Flush(reply_tx))
            .map_err(|_| StorageError::WriterClosed)?;
        reply_rx.await.map_err(|_| StorageError::WriterClosed)?
    }
}
