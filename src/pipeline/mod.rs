//! Change detection and delivery pipeline.
//!
//! A run enumerates tracked sources, extracts candidate announcements,
//! filters out those already delivered, sends the rest and records each
//! confirmed send. Collaborators are reached through traits so the pipeline
//! can be driven by in-memory fakes.

mod delivery;
mod detector;
mod fingerprint;
mod orchestrator;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use delivery::{DeliveryCoordinator, DeliveryReport};
pub use detector::ChangeDetector;
pub use fingerprint::fingerprint;
pub use orchestrator::{RunError, RunOrchestrator, RunReport, SeedReport, SourceProvider};
pub use store::{load_stats, SeenStore, StoreError};
