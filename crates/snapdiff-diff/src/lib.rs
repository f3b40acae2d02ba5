//! Structural diff engine for snapdiff.
//!
//! Compares two snapshots of a document and describes what changed as three
//! partial documents (added, changed old/new, deleted) that mirror the shape
//! of the compared documents at exactly the changed paths.
//!
//! The pipeline is a single pass:
//!
//! 1. [`DiffEngine::compute`] walks both documents in lock-step and emits
//!    atomic [`DiffEntry`] values.
//! 2. [`DiffEngine::reconstruct`] turns one entry into a nested fragment.
//! 3. [`DiffEngine::assemble`] merges all fragments into a [`DiffResult`].
//!
//! # Key Types
//!
//! - [`DiffEngine`] -- Exclusions and depth bound, plus the three pipeline stages
//! - [`DiffEntry`] / [`DiffAction`] / [`DiffPath`] -- One detected difference
//! - [`DiffResult`] / [`ChangedFragments`] -- The assembled three-way summary
//! - [`ExclusionSet`] -- Volatile field names ignored at any depth

pub mod assemble;
pub mod compute;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod path;
pub mod reconstruct;

pub use assemble::{ChangedFragments, DiffResult};
pub use config::{DiffOptions, ExclusionSet};
pub use engine::DiffEngine;
pub use entry::{DiffAction, DiffEntry};
pub use error::{DiffError, Result};
pub use path::{DiffPath, PathSegment};
pub use reconstruct::ValueSelector;

use snapdiff_types::Document;

/// Compute the atomic differences between two documents with default options.
pub fn compute(
    previous: &Document,
    current: &Document,
    excluded: &ExclusionSet,
) -> Result<Vec<DiffEntry>> {
    DiffEngine::new(excluded.clone()).compute(previous, current)
}

/// Compute and assemble the full three-way diff.
pub fn diff_documents(
    previous: &Document,
    current: &Document,
    excluded: &ExclusionSet,
    options: DiffOptions,
) -> Result<DiffResult> {
    DiffEngine::new(excluded.clone())
        .with_options(options)
        .diff(previous, current)
}
