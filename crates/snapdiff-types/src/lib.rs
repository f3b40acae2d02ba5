//! Foundation types for snapdiff.
//!
//! This crate provides the document model that every other snapdiff crate
//! compares, stores, and ships over the wire.
//!
//! # Key Types
//!
//! - [`Document`] -- Closed sum type over null, bool, number, string, list, and map
//! - [`Number`] -- JSON number that keeps its representation but compares by value
//! - [`DocumentKind`] -- The tag of a [`Document`], used in error reports
//! - [`Snapshot`] -- One observation of a remote document (id + timestamp + body)

pub mod document;
pub mod error;
pub mod number;
pub mod snapshot;

pub use document::{Document, DocumentKind, DEFAULT_MAX_DEPTH};
pub use error::TypeError;
pub use number::Number;
pub use snapshot::Snapshot;
