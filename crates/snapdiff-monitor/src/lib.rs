//! Change monitor for snapdiff.
//!
//! Glues the diff engine to its collaborators. For each observed snapshot the
//! [`ChangeMonitor`] fetches the previously stored version, stores the new
//! one, diffs the two, and publishes a change notification to every
//! configured subscriber when something meaningful changed.
//!
//! Collaborators are injected at construction; the monitor holds no global
//! clients.

pub mod config;
pub mod error;
pub mod monitor;

pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use monitor::{ChangeMonitor, Observation};
