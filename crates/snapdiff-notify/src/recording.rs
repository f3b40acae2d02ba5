use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::{NotifyError, NotifyResult};
use crate::payload::ChangeNotification;
use crate::sink::NotificationSink;

/// One accepted publish.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub target: Url,
    pub payload: ChangeNotification,
}

/// Sink that keeps every accepted notification in memory.
///
/// Targets registered with [`fail_target`](Self::fail_target) reject every
/// publish, which lets callers test their delivery-failure handling.
#[derive(Debug, Default)]
pub struct RecordingSink {
    deliveries: RwLock<Vec<Delivery>>,
    failing: RwLock<HashSet<Url>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every publish to `target` fail.
    pub fn fail_target(&self, target: Url) {
        self.failing.write().expect("lock poisoned").insert(target);
    }

    /// All accepted deliveries, in publish order.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.read().expect("lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.deliveries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.read().expect("lock poisoned").is_empty()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, target: &Url, payload: &ChangeNotification) -> NotifyResult<()> {
        if self.failing.read().expect("lock poisoned").contains(target) {
            return Err(NotifyError::Delivery {
                target: target.to_string(),
                reason: "target configured to fail".into(),
            });
        }
        self.deliveries
            .write()
            .expect("lock poisoned")
            .push(Delivery {
                target: target.clone(),
                payload: payload.clone(),
            });
        Ok(())
    }
}
