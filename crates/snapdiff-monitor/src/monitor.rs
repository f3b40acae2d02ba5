use std::sync::Arc;

use snapdiff_diff::DiffEngine;
use snapdiff_notify::{ChangeNotification, NotificationSink, Url};
use snapdiff_store::SnapshotStore;
use snapdiff_types::Snapshot;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorResult;

/// What a single observation led to.
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// No previous snapshot existed; the document was stored and not diffed.
    NewDocument,
    /// The document changed only in excluded fields, or not at all.
    Unchanged,
    /// A change notification was published to every target.
    Notified {
        notification: ChangeNotification,
        delivered: usize,
    },
}

/// Observes snapshots and notifies subscribers about changes.
pub struct ChangeMonitor {
    store: Arc<dyn SnapshotStore>,
    sink: Arc<dyn NotificationSink>,
    engine: DiffEngine,
    targets: Vec<Url>,
}

impl ChangeMonitor {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        sink: Arc<dyn NotificationSink>,
        config: &MonitorConfig,
    ) -> MonitorResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            sink,
            engine: config.diff_engine(),
            targets: config.target_urls()?,
        })
    }

    pub fn targets(&self) -> &[Url] {
        &self.targets
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Process one observed snapshot.
    ///
    /// The new snapshot is stored before diffing, so a failing diff never
    /// leaves the store behind. Store errors abort the observation. A diff
    /// error is returned after the save and nothing is published. Delivery
    /// is attempted for every target; the first failure is returned.
    pub async fn observe(&self, snapshot: &Snapshot) -> MonitorResult<Observation> {
        let id = snapshot.id.as_str();
        debug!(id, last_edited_time = %snapshot.last_edited_time, "observing snapshot");

        let previous = self.store.fetch_previous(id)?;
        self.store
            .save(id, &snapshot.last_edited_time, &snapshot.document)?;

        let Some(previous) = previous else {
            info!(id, "new document, stored without diff");
            return Ok(Observation::NewDocument);
        };

        let diff = match self.engine.diff(&previous.document, &snapshot.document) {
            Ok(diff) => diff,
            Err(e) => {
                warn!(id, error = %e, "diff failed, skipping notification");
                return Err(e.into());
            }
        };
        if diff.is_empty() {
            info!(id, "no meaningful changes");
            return Ok(Observation::Unchanged);
        }

        let notification =
            ChangeNotification::new(id, snapshot.last_edited_time.clone(), diff);
        let delivered = self.deliver(&notification).await?;
        info!(id, delivered, "change notification published");
        Ok(Observation::Notified {
            notification,
            delivered,
        })
    }

    /// Process many snapshots. One failing document does not stop the rest.
    pub async fn observe_batch(
        &self,
        snapshots: &[Snapshot],
    ) -> Vec<(String, MonitorResult<Observation>)> {
        let mut results = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let outcome = self.observe(snapshot).await;
            if let Err(e) = &outcome {
                warn!(id = %snapshot.id, error = %e, "observation failed");
            }
            results.push((snapshot.id.clone(), outcome));
        }
        results
    }

    async fn deliver(&self, notification: &ChangeNotification) -> MonitorResult<usize> {
        if self.targets.is_empty() {
            warn!(id = %notification.id, "changes detected but no targets configured");
        }

        let mut delivered = 0;
        let mut first_error = None;
        for target in &self.targets {
            match self.sink.publish(target, notification).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(%target, error = %e, "notification delivery failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(delivered),
        }
    }
}

impl std::fmt::Debug for ChangeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMonitor")
            .field("engine", &self.engine)
            .field("targets", &self.targets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use serde_json::{json, Value};
    use snapdiff_notify::RecordingSink;
    use snapdiff_store::{FileSnapshotStore, InMemorySnapshotStore, StoreError};
    use snapdiff_types::Document;

    const PAGE_ID: &str = "d2b8393e-2817-4009-8311-57f9dcac0185";
    const HOOK: &str = "https://example.com/hook";

    fn page_info(last_edited_time: &str) -> Value {
        json!({
            "object": "page",
            "id": PAGE_ID,
            "created_time": "2024-01-02T08:11:00.000Z",
            "last_edited_time": last_edited_time,
            "created_by": {"object": "user", "id": "ca7192dd-8e7a-4ccc-8faa-3e230d28778d"},
            "last_edited_by": {"object": "user", "id": "ca7192dd-8e7a-4ccc-8faa-3e230d28778d"},
            "cover": null,
            "icon": {"type": "emoji", "emoji": ""},
            "parent": {"type": "database_id", "database_id": "36142bf2-4820-4514-8891-12bcb8b8cf2"},
            "archive": false,
            "properties": {
                "Category": {"id": "%3AaT", "type": "multi_select", "multi_select": []},
                "Name": {
                    "id": "title",
                    "type": "title",
                    "title": [{
                        "type": "text",
                        "text": {"content": "bbb", "link": null},
                        "plain_text": "bbb",
                        "href": null
                    }]
                }
            },
            "url": "https://www.notion.so/bbb-xxxxxxxx",
            "public_url": null
        })
    }

    fn snapshot(value: Value) -> Snapshot {
        Snapshot::from_document(Document::from_json(&value).unwrap()).unwrap()
    }

    struct Harness {
        store: Arc<InMemorySnapshotStore>,
        sink: Arc<RecordingSink>,
        monitor: ChangeMonitor,
    }

    fn harness(targets: &[&str]) -> Harness {
        let store = Arc::new(InMemorySnapshotStore::new());
        let sink = Arc::new(RecordingSink::new());
        let config = MonitorConfig {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            ..MonitorConfig::default()
        };
        let monitor = ChangeMonitor::new(store.clone(), sink.clone(), &config).unwrap();
        Harness {
            store,
            sink,
            monitor,
        }
    }

    async fn seed(h: &Harness, value: Value) {
        let outcome = h.monitor.observe(&snapshot(value)).await.unwrap();
        assert_eq!(outcome, Observation::NewDocument);
    }

    fn delivered_json(h: &Harness) -> Vec<Value> {
        h.sink
            .deliveries()
            .iter()
            .map(|d| d.payload.to_json().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn new_document_is_stored_without_notification() {
        let h = harness(&[HOOK]);
        let event = page_info("2024-01-05T03:58:00.000Z");

        seed(&h, event.clone()).await;

        assert!(h.sink.is_empty());
        let stored = h.store.fetch_previous(PAGE_ID).unwrap().unwrap();
        assert_eq!(stored.document.to_json(), event);
    }

    #[tokio::test]
    async fn added_property_is_notified() {
        let h = harness(&[HOOK]);
        seed(&h, page_info("2024-01-05T00:00:00.000Z")).await;

        let mut event = page_info("2024-01-05T03:58:00.000Z");
        event["properties"]["Status"] = json!({
            "id": "Z%3ClH",
            "type": "status",
            "status": {"id": "86ddb6ec-0627-47f8-800d-b65afd28be13", "name": "Not started", "color": "default"}
        });
        let outcome = h.monitor.observe(&snapshot(event.clone())).await.unwrap();
        assert!(matches!(outcome, Observation::Notified { delivered: 1, .. }));

        assert_eq!(
            delivered_json(&h),
            vec![json!({
                "id": PAGE_ID,
                "last_edited_time": "2024-01-05T03:58:00.000Z",
                "added": {"properties": {"Status": event["properties"]["Status"]}},
                "changed": {},
                "deleted": {}
            })]
        );
        let stored = h.store.fetch_previous(PAGE_ID).unwrap().unwrap();
        assert_eq!(stored.document.to_json(), event);
    }

    #[tokio::test]
    async fn changed_property_is_notified() {
        let h = harness(&[HOOK]);
        let mut previous = page_info("2024-01-05T00:00:00.000Z");
        previous["properties"]["Price"] = json!({"id": "BJXx", "type": "number", "number": 2.5});
        seed(&h, previous.clone()).await;

        let mut event = previous;
        event["last_edited_time"] = json!("2024-01-05T03:58:00.000Z");
        event["properties"]["Price"]["number"] = json!(5);
        h.monitor.observe(&snapshot(event)).await.unwrap();

        assert_eq!(
            delivered_json(&h),
            vec![json!({
                "id": PAGE_ID,
                "last_edited_time": "2024-01-05T03:58:00.000Z",
                "added": {},
                "changed": {
                    "old": {"properties": {"Price": {"number": 2.5}}},
                    "new": {"properties": {"Price": {"number": 5}}}
                },
                "deleted": {}
            })]
        );
    }

    #[tokio::test]
    async fn deleted_property_is_notified() {
        let h = harness(&[HOOK]);
        seed(&h, page_info("2024-01-05T00:00:00.000Z")).await;

        let mut event = page_info("2024-01-05T03:58:00.000Z");
        event["properties"]
            .as_object_mut()
            .unwrap()
            .remove("Category");
        h.monitor.observe(&snapshot(event)).await.unwrap();

        assert_eq!(
            delivered_json(&h),
            vec![json!({
                "id": PAGE_ID,
                "last_edited_time": "2024-01-05T03:58:00.000Z",
                "added": {},
                "changed": {},
                "deleted": {
                    "properties": {
                        "Category": {"id": "%3AaT", "type": "multi_select", "multi_select": []}
                    }
                }
            })]
        );
    }

    #[tokio::test]
    async fn tag_added_to_list_is_a_change() {
        let h = harness(&[HOOK]);
        seed(&h, page_info("t1")).await;

        let mut event = page_info("t2");
        event["properties"]["Category"]["multi_select"] = json!([{"name": "comic"}]);
        h.monitor.observe(&snapshot(event)).await.unwrap();

        let payload = &delivered_json(&h)[0];
        assert_eq!(
            payload["changed"],
            json!({
                "old": {"properties": {"Category": {"multi_select": []}}},
                "new": {"properties": {"Category": {"multi_select": [{"name": "comic"}]}}}
            })
        );
    }

    #[tokio::test]
    async fn timestamp_only_edit_is_unchanged_but_stored() {
        let h = harness(&[HOOK]);
        seed(&h, page_info("t1")).await;

        let outcome = h.monitor.observe(&snapshot(page_info("t2"))).await.unwrap();
        assert_eq!(outcome, Observation::Unchanged);
        assert!(h.sink.is_empty());
        assert_eq!(
            h.store.fetch_previous(PAGE_ID).unwrap().unwrap().last_edited_time,
            "t2"
        );
    }

    #[tokio::test]
    async fn store_failure_aborts_before_notification() {
        let h = harness(&[HOOK]);
        h.store.set_unavailable(true);

        let err = h.monitor.observe(&snapshot(page_info("t1"))).await.unwrap_err();
        assert!(matches!(err, MonitorError::Store(_)));
        assert!(h.sink.is_empty());
    }

    #[tokio::test]
    async fn failed_diff_still_stores_snapshot() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let sink = Arc::new(RecordingSink::new());
        let config = MonitorConfig {
            max_depth: 2,
            targets: vec![HOOK.into()],
            ..MonitorConfig::default()
        };
        let monitor = ChangeMonitor::new(store.clone(), sink.clone(), &config).unwrap();

        monitor.observe(&snapshot(page_info("t1"))).await.unwrap();
        let mut event = page_info("t2");
        event["properties"]["Name"]["title"][0]["plain_text"] = json!("ccc");

        let err = monitor.observe(&snapshot(event)).await.unwrap_err();
        assert!(matches!(err, MonitorError::Diff(_)));
        assert!(sink.is_empty());
        assert_eq!(store.fetch_previous(PAGE_ID).unwrap().unwrap().last_edited_time, "t2");
    }

    #[tokio::test]
    async fn delivery_failure_is_reported_after_trying_all_targets() {
        let down = "https://down.example.com/hook";
        let h = harness(&[down, HOOK]);
        h.sink.fail_target(Url::parse(down).unwrap());
        seed(&h, page_info("t1")).await;

        let mut event = page_info("t2");
        event["archive"] = json!(true);
        let err = h.monitor.observe(&snapshot(event)).await.unwrap_err();

        assert!(matches!(err, MonitorError::Notify(_)));
        assert_eq!(h.sink.len(), 1);
        assert_eq!(h.sink.deliveries()[0].target.as_str(), HOOK);
    }

    #[tokio::test]
    async fn every_target_receives_the_notification() {
        let h = harness(&[HOOK, "https://other.example.com/"]);
        seed(&h, page_info("t1")).await;

        let mut event = page_info("t2");
        event["archive"] = json!(true);
        let outcome = h.monitor.observe(&snapshot(event)).await.unwrap();

        assert!(matches!(outcome, Observation::Notified { delivered: 2, .. }));
        assert_eq!(h.sink.len(), 2);
    }

    #[tokio::test]
    async fn batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSnapshotStore::open(dir.path()).unwrap());
        let sink = Arc::new(RecordingSink::new());
        let config = MonitorConfig {
            targets: vec![HOOK.into()],
            ..MonitorConfig::default()
        };
        let monitor = ChangeMonitor::new(store.clone(), sink, &config).unwrap();

        let mut bad = page_info("t1");
        bad["id"] = json!("bad.id");
        let results = monitor
            .observe_batch(&[snapshot(bad), snapshot(page_info("t1"))])
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "bad.id");
        assert!(matches!(
            results[0].1,
            Err(MonitorError::Store(StoreError::InvalidId(_)))
        ));
        assert_eq!(results[1].0, PAGE_ID);
        assert!(matches!(results[1].1, Ok(Observation::NewDocument)));
        assert!(store.contains(PAGE_ID).unwrap());
        assert_eq!(store.ids().unwrap(), vec![PAGE_ID.to_string()]);
    }

    #[tokio::test]
    async fn works_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSnapshotStore::open(dir.path()).unwrap());
        let sink = Arc::new(RecordingSink::new());
        let config = MonitorConfig {
            targets: vec![HOOK.into()],
            ..MonitorConfig::default()
        };
        let monitor = ChangeMonitor::new(store, sink.clone(), &config).unwrap();

        monitor.observe(&snapshot(page_info("t1"))).await.unwrap();
        let mut event = page_info("t2");
        event["cover"] = json!({"type": "external"});
        monitor.observe(&snapshot(event)).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(
            sink.deliveries()[0].payload.to_json().unwrap()["changed"]["new"],
            json!({"cover": {"type": "external"}})
        );
    }

    #[test]
    fn rejects_invalid_targets() {
        let config = MonitorConfig {
            targets: vec!["::nope::".into()],
            ..MonitorConfig::default()
        };
        let result = ChangeMonitor::new(
            Arc::new(InMemorySnapshotStore::new()),
            Arc::new(RecordingSink::new()),
            &config,
        );
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
