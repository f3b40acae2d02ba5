use snapdiff_types::Document;

use crate::assemble::DiffResult;
use crate::config::{DiffOptions, ExclusionSet};
use crate::error::Result;

/// The diff engine: an exclusion list and a depth bound.
///
/// The engine holds no state between calls. [`compute`](Self::compute),
/// [`reconstruct`](Self::reconstruct) and [`assemble`](Self::assemble) are
/// pure functions of their arguments, so one engine can be shared freely
/// across threads.
#[derive(Clone, Debug, Default)]
pub struct DiffEngine {
    excluded: ExclusionSet,
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(excluded: ExclusionSet) -> Self {
        Self {
            excluded,
            options: DiffOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn excluded(&self) -> &ExclusionSet {
        &self.excluded
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compute and assemble in one call.
    pub fn diff(&self, previous: &Document, current: &Document) -> Result<DiffResult> {
        let entries = self.compute(previous, current)?;
        self.assemble(&entries, previous, current)
    }
}
