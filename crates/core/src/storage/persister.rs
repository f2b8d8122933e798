use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::models::entry::Entry;

use super::manager::StorageManager;

enum Command {
    Save(Vec<Entry>),
    Flush(oneshot::Sender<()>),
}

/// Background writer for the entry collection.
///
/// Mutations hand over a snapshot and return immediately. A single tokio
/// task applies snapshots in the order they were scheduled; when several
/// are queued only the newest is written. Failed writes are logged and
/// never touch the in-memory state.
#[derive(Debug, Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<Command>,
}

impl Persister {
    /// Start the writer task. Must be called from within a tokio runtime.
    pub fn spawn(manager: StorageManager) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(manager, rx));
        Self { tx }
    }

    /// Queue a save of `entries`. Fire-and-forget.
    pub fn schedule(&self, entries: Vec<Entry>) {
        if self.tx.send(Command::Save(entries)).is_err() {
            warn!("persistence worker is gone, change kept in memory only");
        }
    }

    /// Wait until every save scheduled before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run(manager: StorageManager, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save(mut latest) => {
                // coalesce the backlog; a flush request ends the batch
                let mut waiting_flush = None;
                while let Ok(next) = rx.try_recv() {
                    match next {
                        Command::Save(entries) => latest = entries,
                        Command::Flush(done) => {
                            waiting_flush = Some(done);
                            break;
                        }
                    }
                }
                write(&manager, &latest).await;
                if let Some(done) = waiting_flush {
                    let _ = done.send(());
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = manager.key(), "persistence worker stopped");
}

async fn write(manager: &StorageManager, entries: &[Entry]) {
    match manager.save(entries).await {
        Ok(()) => debug!(key = manager.key(), count = entries.len(), "entries saved"),
        Err(e) => warn!(key = manager.key(), error = %e, "failed to save entries"),
    }
}
