//! Resolves which marketplace plugin versions are certified compatible with a
//! Data Center platform release.
//!
//! Version data is acquired through three tiers tried in order (embedded page
//! state, the REST API, then a rendered browser DOM), and matched against the
//! target release with a permissive version comparator.

pub mod batch;
pub mod browser;
pub mod config;
pub mod constants;
pub mod error;
pub mod manifest;
pub mod model;
pub mod orchestrator;
pub mod progress;
pub mod result_builder;
pub mod sources;
pub mod version;

pub use batch::BatchRunner;
pub use config::EngineConfig;
pub use error::{CompatError, TierFailure};
pub use model::{
    CompatibleVersionEntry, FetchMethod, Identifiers, PluginDescriptor, PluginResult,
    RawVersionRecord,
};
pub use orchestrator::FetchOrchestrator;
