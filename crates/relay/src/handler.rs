//! The push handler.
//!
//! [`PushRelay`] runs one linear flow per inbound event:
//!
//! 1. classify the event shape and resolve the three fields (sentinels for gaps);
//! 2. stamp the record with the current UTC time;
//! 3. persist the record;
//! 4. render the notification;
//! 5. publish it;
//! 6. return [`HandlerResponse::success`].
//!
//! Steps never reorder. A failure in step 3 or 5 ends the invocation with a
//! [`RelayError`]; there is no retry and no rollback of an already-persisted
//! record.

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    HandlerResponse, InboundEvent, Notification, NotificationChannel, PushRecord, RecordStore,
    RelayError, Timestamp,
};

/// Records and announces image pushes.
///
/// Constructed once per process with long-lived client handles and shared by
/// reference across invocations. Holds no per-invocation state.
#[derive(Debug)]
pub struct PushRelay<S, N> {
    store: S,
    channel: N,
}

impl<S, N> PushRelay<S, N>
where
    S: RecordStore,
    N: NotificationChannel,
{
    pub fn new(store: S, channel: N) -> Self {
        Self { store, channel }
    }

    /// Handles one inbound event end to end.
    #[tracing::instrument(name = "push_relay.handle", skip_all, fields(shape = tracing::field::Empty))]
    pub async fn handle(&self, event: &Value) -> Result<HandlerResponse, RelayError> {
        let inbound = InboundEvent::classify(event);
        tracing::Span::current().record("shape", inbound.kind());

        let fields = inbound.normalize();
        if fields.defaulted_count() > 0 {
            debug!(
                repository_defaulted = fields.repository.is_sentinel(),
                image_tag_defaulted = fields.image_tag.is_sentinel(),
                pushed_by_defaulted = fields.pushed_by.is_sentinel(),
                "Event is missing fields; using sentinels"
            );
        }

        let record = PushRecord::new(fields, Timestamp::now());
        self.store.put_record(&record).await?;
        info!(
            repository = %record.repository,
            image_tag = %record.image_tag,
            pushed_by = %record.pushed_by,
            timestamp = %record.timestamp,
            "Push record stored"
        );

        let notification = Notification::for_record(&record);
        self.channel.publish(&notification).await?;
        debug!("Push notification published");

        Ok(HandlerResponse::success())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDateTime, Utc};
    use serde_json::json;

    use super::*;
    use crate::{PublishError, StoreError, TableName, TopicArn};

    /// Shared call log so tests can assert ordering across both ports.
    #[derive(Debug, Clone, Default)]
    struct Calls(Arc<Mutex<Vec<&'static str>>>);

    impl Calls {
        fn push(&self, call: &'static str) {
            self.0.lock().expect("lock").push(call);
        }

        fn snapshot(&self) -> Vec<&'static str> {
            self.0.lock().expect("lock").clone()
        }
    }

    #[derive(Debug, Default)]
    struct FakeStore {
        calls: Calls,
        records: Mutex<Vec<PushRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn put_record(&self, record: &PushRecord) -> Result<(), StoreError> {
            self.calls.push("put_record");
            if self.fail {
                let table = TableName::new("pushes").expect("non-empty");
                return Err(StoreError::new(table, "ProvisionedThroughputExceeded"));
            }
            self.records.lock().expect("lock").push(record.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct FakeChannel {
        calls: Calls,
        published: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationChannel for FakeChannel {
        async fn publish(&self, notification: &Notification) -> Result<(), PublishError> {
            self.calls.push("publish");
            if self.fail {
                let topic = TopicArn::new("arn:aws:sns:us-east-1:1:pushes").expect("non-empty");
                return Err(PublishError::new(topic, "AuthorizationError"));
            }
            self.published.lock().expect("lock").push(notification.clone());
            Ok(())
        }
    }

    fn relay(store_fails: bool, channel_fails: bool) -> (PushRelay<FakeStore, FakeChannel>, Calls) {
        let calls = Calls::default();
        let store = FakeStore {
            calls: calls.clone(),
            fail: store_fails,
            ..FakeStore::default()
        };
        let channel = FakeChannel {
            calls: calls.clone(),
            fail: channel_fails,
            ..FakeChannel::default()
        };
        (PushRelay::new(store, channel), calls)
    }

    fn stored(relay: &PushRelay<FakeStore, FakeChannel>) -> Vec<PushRecord> {
        relay.store.records.lock().expect("lock").clone()
    }

    fn fields(record: &PushRecord) -> (&str, &str, &str) {
        (
            record.repository.as_str(),
            record.image_tag.as_str(),
            record.pushed_by.as_str(),
        )
    }

    #[tokio::test]
    async fn bus_event_is_stored_and_announced() {
        let (relay, calls) = relay(false, false);
        let event = json!({
            "detail": { "image-tag": "v1.2", "repository-name": "myapp" },
            "account": "123456789012"
        });

        let response = relay.handle(&event).await.expect("success");

        assert_eq!(response, HandlerResponse::success());
        assert_eq!(calls.snapshot(), ["put_record", "publish"]);
        let records = stored(&relay);
        assert_eq!(records.len(), 1);
        assert_eq!(fields(&records[0]), ("myapp", "v1.2", "123456789012"));
    }

    #[tokio::test]
    async fn webhook_event_is_stored() {
        let (relay, _) = relay(false, false);
        let event = json!({ "image_tag": "latest", "repository": "svc", "pushed_by": "ci-bot" });

        relay.handle(&event).await.expect("success");

        assert_eq!(fields(&stored(&relay)[0]), ("svc", "latest", "ci-bot"));
    }

    #[tokio::test]
    async fn empty_event_still_succeeds_with_sentinels() {
        let (relay, _) = relay(false, false);

        let response = relay.handle(&json!({})).await.expect("success");

        assert_eq!(response.status_code, 200);
        assert_eq!(
            fields(&stored(&relay)[0]),
            ("unknown-repo", "unknown-tag", "unknown-user")
        );
    }

    #[tokio::test]
    async fn timestamp_is_processing_time_not_event_time() {
        let (relay, _) = relay(false, false);
        let event = json!({
            "detail": { "image-tag": "v1", "repository-name": "app" },
            "account": "acct1",
            "time": "2001-01-01T00:00:00Z"
        });

        let before = Utc::now();
        relay.handle(&event).await.expect("success");
        let after = Utc::now();

        let records = stored(&relay);
        let text = records[0].timestamp.to_iso8601();
        let parsed = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
            .expect("ISO-8601 timestamp")
            .and_utc();
        assert!(parsed.timestamp_micros() >= before.timestamp_micros());
        assert!(parsed.timestamp_micros() <= after.timestamp_micros());
    }

    #[tokio::test]
    async fn notification_embeds_the_stored_record() {
        let (relay, _) = relay(false, false);
        let event = json!({ "detail": {}, "account": "acct1" });

        relay.handle(&event).await.expect("success");

        let record = stored(&relay).remove(0);
        let published = relay.channel.published.lock().expect("lock").clone();
        assert_eq!(published, vec![Notification::for_record(&record)]);
        assert_eq!(published[0].subject, "ECR Image Push Notification");
    }

    #[tokio::test]
    async fn repeated_event_creates_distinct_records() {
        let (relay, _) = relay(false, false);
        let event = json!({ "image_tag": "latest", "repository": "svc", "pushed_by": "ci-bot" });

        relay.handle(&event).await.expect("first");
        relay.handle(&event).await.expect("second");

        assert_eq!(stored(&relay).len(), 2);
    }

    #[tokio::test]
    async fn persist_failure_skips_publish() {
        let (relay, calls) = relay(true, false);

        let err = relay.handle(&json!({})).await.expect_err("store fails");

        assert!(matches!(err, RelayError::Persist(_)));
        assert_eq!(calls.snapshot(), ["put_record"]);
        assert!(relay.channel.published.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn publish_failure_keeps_stored_record() {
        let (relay, calls) = relay(false, true);

        let err = relay.handle(&json!({})).await.expect_err("publish fails");

        assert!(matches!(err, RelayError::Publish(_)));
        assert_eq!(calls.snapshot(), ["put_record", "publish"]);
        assert_eq!(stored(&relay).len(), 1);
    }
}
