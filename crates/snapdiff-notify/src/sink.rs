use async_trait::async_trait;
use reqwest::Url;

use crate::error::NotifyResult;
use crate::payload::ChangeNotification;

/// Delivery endpoint for change notifications.
///
/// `publish` returns `Ok(())` once the subscriber accepted the payload and
/// an error otherwise. Implementations never retry; retry policy belongs to
/// whoever drives the monitor.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, target: &Url, payload: &ChangeNotification) -> NotifyResult<()>;
}
