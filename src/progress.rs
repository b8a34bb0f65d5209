// Progress events emitted while a batch runs

use crate::model::FetchMethod;
use log::info;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    BatchStarted {
        total: usize,
        target_version: String,
    },
    PluginStarted {
        index: usize,
        total: usize,
        name: String,
    },
    MethodAttempt {
        plugin: String,
        method: FetchMethod,
    },
    MethodSkipped {
        plugin: String,
        method: FetchMethod,
        reason: String,
    },
    MethodSucceeded {
        plugin: String,
        method: FetchMethod,
        versions: usize,
    },
    MethodFailed {
        plugin: String,
        method: FetchMethod,
        reason: String,
    },
    PluginFinished {
        index: usize,
        total: usize,
        name: String,
        outcome: PluginOutcome,
    },
    BatchFinished {
        total: usize,
        failed: usize,
    },
}

/// Short summary of a finished plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOutcome {
    Compatible { recommended: Option<String> },
    Incompatible { recommended: Option<String> },
    Failed,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::BatchStarted {
                total,
                target_version,
            } => write!(
                f,
                "Checking {} plugin(s) against version {}",
                total, target_version
            ),
            ProgressEvent::PluginStarted { index, total, name } => {
                write!(f, "[{}/{}] Checking {}...", index + 1, total, name)
            }
            ProgressEvent::MethodAttempt { plugin, method } => {
                write!(f, "  {}: trying {}", plugin, method)
            }
            ProgressEvent::MethodSkipped {
                plugin,
                method,
                reason,
            } => write!(f, "  {}: skipped {} ({})", plugin, method, reason),
            ProgressEvent::MethodSucceeded {
                plugin,
                method,
                versions,
            } => write!(
                f,
                "  {}: {} found {} version(s)",
                plugin, method, versions
            ),
            ProgressEvent::MethodFailed {
                plugin,
                method,
                reason,
            } => write!(f, "  {}: {} failed: {}", plugin, method, reason),
            ProgressEvent::PluginFinished {
                index,
                total,
                name,
                outcome,
            } => {
                write!(f, "[{}/{}] {}: ", index + 1, total, name)?;
                match outcome {
                    PluginOutcome::Compatible { recommended } => write!(
                        f,
                        "current version is compatible (recommended {})",
                        recommended.as_deref().unwrap_or("-")
                    ),
                    PluginOutcome::Incompatible {
                        recommended: Some(v),
                    } => write!(f, "upgrade needed, recommended {}", v),
                    PluginOutcome::Incompatible { recommended: None } => {
                        write!(f, "no compatible version found")
                    }
                    PluginOutcome::Failed => write!(f, "all fetch methods failed"),
                }
            }
            ProgressEvent::BatchFinished { total, failed } => {
                write!(f, "Checked {} plugin(s), {} failed", total, failed)
            }
        }
    }
}

/// Receives progress events in order
///
/// Implementations must not block and must not fail; the engine never waits
/// on a sink.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Writes every event to the log at info level
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, event: ProgressEvent) {
        info!("{}", event);
    }
}

/// Forwards events to a single consumer over an unbounded channel
///
/// Events sent after the receiver is dropped are discarded.
pub struct ChannelProgress {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_preserves_order_and_survives_closed_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelProgress::new(tx);

        sink.emit(ProgressEvent::BatchStarted {
            total: 1,
            target_version: "9.0".into(),
        });
        sink.emit(ProgressEvent::BatchFinished {
            total: 1,
            failed: 0,
        });

        assert!(matches!(
            rx.try_recv(),
            Ok(ProgressEvent::BatchStarted { .. })
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(ProgressEvent::BatchFinished { .. })
        ));

        drop(rx);
        sink.emit(ProgressEvent::BatchFinished {
            total: 1,
            failed: 0,
        });
    }

    #[test]
    fn test_display_lines() {
        let started = ProgressEvent::PluginStarted {
            index: 0,
            total: 3,
            name: "Gliffy".into(),
        };
        assert_eq!(started.to_string(), "[1/3] Checking Gliffy...");

        let failed = ProgressEvent::MethodFailed {
            plugin: "Gliffy".into(),
            method: FetchMethod::RestApi,
            reason: "HTTP 500".into(),
        };
        assert_eq!(failed.to_string(), "  Gliffy: rest-api failed: HTTP 500");

        let finished = ProgressEvent::PluginFinished {
            index: 2,
            total: 3,
            name: "Gliffy".into(),
            outcome: PluginOutcome::Incompatible {
                recommended: Some("4.2".into()),
            },
        };
        assert_eq!(finished.to_string(), "[3/3] Gliffy: upgrade needed, recommended 4.2");
    }
}
