// Error types for the compatibility engine

use crate::model::FetchMethod;
use std::fmt;

/// A single tier's failure, tagged with the tier that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub method: FetchMethod,
    pub reason: String,
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.method, self.reason)
    }
}

/// Engine errors
///
/// A single tier's failure is never an error of its own: the orchestrator
/// records it as a [`TierFailure`] and moves on to the next tier.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    /// Every tier failed for one plugin.
    #[error("All fetch methods failed: {}", join_failures(.failures))]
    AllMethodsExhausted { failures: Vec<TierFailure> },

    /// Upstream answered but not in a shape we can use.
    #[error("malformed upstream data: {0}")]
    MalformedUpstreamData(String),

    /// Batch input rejected before any network activity.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// The shared browser session could not be provisioned.
    #[error("browser session unavailable: {0}")]
    BrowserUnavailable(String),
}

impl CompatError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedUpstreamData(message.into())
    }

    /// Whether the error aborts a whole batch rather than one plugin
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::InputValidation(_) | Self::BrowserUnavailable(_))
    }
}

fn join_failures(failures: &[TierFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
