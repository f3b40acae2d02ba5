//! Snapshot storage for snapdiff.
//!
//! Every watched document has at most one stored snapshot: the last version
//! that was observed. The monitor fetches it to diff against, then replaces
//! it with the version it just observed.
//!
//! # Storage Backends
//!
//! All backends implement the [`SnapshotStore`] trait:
//!
//! - [`InMemorySnapshotStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileSnapshotStore`] -- one JSON file per document id under a directory
//!
//! # Design Rules
//!
//! 1. A missing snapshot is `Ok(None)`, never an error: it means "new document".
//! 2. `save` replaces the previous snapshot for the id unconditionally.
//! 3. The store never interprets document contents.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;
pub use traits::SnapshotStore;
