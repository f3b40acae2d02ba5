//! Change notification delivery for snapdiff.
//!
//! A [`ChangeNotification`] is the JSON payload subscribers receive when a
//! watched document changed. Delivery is fire-and-forget: a sink reports
//! only whether the subscriber accepted the payload, never its response.

pub mod error;
pub mod http;
pub mod payload;
pub mod recording;
pub mod sink;

pub use error::{NotifyError, NotifyResult};
pub use http::HttpNotificationSink;
pub use payload::ChangeNotification;
pub use recording::{Delivery, RecordingSink};
pub use reqwest::Url;
pub use sink::NotificationSink;
