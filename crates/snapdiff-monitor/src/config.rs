use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use snapdiff_diff::{DiffEngine, DiffOptions, ExclusionSet};
use snapdiff_notify::Url;
use snapdiff_types::DEFAULT_MAX_DEPTH;

use crate::error::{MonitorError, MonitorResult};

/// Configuration for a [`ChangeMonitor`](crate::ChangeMonitor).
///
/// Loaded from TOML; every field is optional:
///
/// ```toml
/// excluded = ["last_edited_time"]
/// max_depth = 128
/// targets = ["https://hooks.example.com/notion"]
/// store_dir = "/var/lib/snapdiff"
/// request_timeout_secs = 10
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Field names ignored by the diff at any depth.
    pub excluded: ExclusionSet,
    /// Nesting bound for comparison and reconstruction.
    pub max_depth: usize,
    /// Subscriber endpoints that receive change notifications.
    pub targets: Vec<String>,
    /// Directory of the file-backed snapshot store.
    pub store_dir: Option<PathBuf>,
    /// Per-request timeout for notification delivery.
    pub request_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            excluded: ExclusionSet::reference(),
            max_depth: DEFAULT_MAX_DEPTH,
            targets: Vec::new(),
            store_dir: None,
            request_timeout_secs: 10,
        }
    }
}

impl MonitorConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> MonitorResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> MonitorResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| MonitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.max_depth == 0 {
            return Err(MonitorError::Config("max_depth must be at least 1".into()));
        }
        self.target_urls()?;
        Ok(())
    }

    /// Parse every configured target.
    pub fn target_urls(&self) -> MonitorResult<Vec<Url>> {
        self.targets
            .iter()
            .map(|t| {
                Url::parse(t).map_err(|e| MonitorError::Config(format!("invalid target {t:?}: {e}")))
            })
            .collect()
    }

    /// A diff engine honoring `excluded` and `max_depth`.
    pub fn diff_engine(&self) -> DiffEngine {
        DiffEngine::new(self.excluded.clone()).with_options(DiffOptions {
            max_depth: self.max_depth,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
