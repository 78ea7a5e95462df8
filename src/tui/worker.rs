//! Background workers for the TUI.
//!
//! All network traffic happens on worker threads that report back over a
//! sync mpsc channel, which the crossterm event loop polls non-blocking.
//! Chat and snapshot fetches spawn a thread per request; the health poll is
//! a long-lived loop on its own cadence.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::client::{AgentClient, ChatReply, HealthCheck};
use crate::config::ModuleToggles;
use crate::snapshot::MemorySnapshot;

/// A completed background operation.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A chat turn finished.
    ChatReply(ChatReply),
    /// A chat turn failed; the transcript shows the message.
    ChatFailed { message: String },
    /// A health probe finished (either way).
    HealthReport(Result<HealthCheck, String>),
    /// A snapshot fetch finished. `seq` lets the view drop stale results.
    Snapshot {
        seq: u64,
        result: Result<MemorySnapshot, String>,
    },
}

/// Handle for dispatching background work and polling results.
pub struct Workers {
    client: Arc<AgentClient>,
    tx: mpsc::Sender<WorkerEvent>,
    rx: mpsc::Receiver<WorkerEvent>,
}

impl Workers {
    pub fn new(client: Arc<AgentClient>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { client, tx, rx }
    }

    /// Poll for the next completed operation (non-blocking).
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }

    /// Start the periodic health poll. The loop exits once the TUI (and with
    /// it the receiver) is gone.
    pub fn spawn_health_poll(&self, interval: Duration) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("health-poll".into())
            .spawn(move || {
                loop {
                    let report = client.health().map_err(|e| e.to_string());
                    if tx.send(WorkerEvent::HealthReport(report)).is_err() {
                        break;
                    }
                    thread::sleep(interval);
                }
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn health poll thread");
        }
    }

    /// Post a chat turn on a background thread.
    pub fn send_chat(
        &self,
        message: String,
        session_id: Option<String>,
        modules: ModuleToggles,
    ) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new().name("chat".into()).spawn(move || {
            let event = match client.chat(&message, session_id.as_deref(), &modules) {
                Ok(reply) => WorkerEvent::ChatReply(reply),
                Err(e) => WorkerEvent::ChatFailed {
                    message: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
        if let Err(e) = spawned {
            let _ = self.tx.send(WorkerEvent::ChatFailed {
                message: format!("failed to spawn chat thread: {e}"),
            });
        }
    }

    /// Fetch a memory snapshot on a background thread, tagged with its
    /// refresh sequence number.
    pub fn fetch_snapshot(&self, seq: u64) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("snapshot".into())
            .spawn(move || {
                let result = client.memory_snapshot().map_err(|e| e.to_string());
                let _ = tx.send(WorkerEvent::Snapshot { seq, result });
            });
        if let Err(e) = spawned {
            let _ = self.tx.send(WorkerEvent::Snapshot {
                seq,
                result: Err(format!("failed to spawn snapshot thread: {e}")),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn failed_requests_surface_as_events() {
        // Nothing listens on this port; the chat must fail, not hang the UI.
        let client = Arc::new(AgentClient::new(&BackendConfig {
            url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        }));
        let workers = Workers::new(client);
        workers.send_chat("hello".into(), None, ModuleToggles::defaults());

        let event = loop {
            if let Some(ev) = workers.try_recv() {
                break ev;
            }
            thread::sleep(Duration::from_millis(20));
        };
        assert!(matches!(event, WorkerEvent::ChatFailed { .. }));
    }
}
