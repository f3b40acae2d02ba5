use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::{NotifyError, NotifyResult};
use crate::payload::ChangeNotification;
use crate::sink::NotificationSink;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers notifications as `POST` requests with a JSON body.
///
/// Any non-2xx status is a delivery error. The response body is never read.
#[derive(Clone, Debug)]
pub struct HttpNotificationSink {
    client: Client,
}

impl HttpNotificationSink {
    pub fn new(timeout: Duration) -> NotifyResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl NotificationSink for HttpNotificationSink {
    async fn publish(&self, target: &Url, payload: &ChangeNotification) -> NotifyResult<()> {
        debug!(%target, id = %payload.id, "sending change notification");
        let response = self
            .client
            .post(target.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery {
                target: target.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Delivery {
                target: target.to_string(),
                reason: format!("HTTP status {status}"),
            });
        }
        info!(%target, id = %payload.id, %status, "change notification delivered");
        Ok(())
    }
}
