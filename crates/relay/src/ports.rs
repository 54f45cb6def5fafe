//! Outbound port traits.
//!
//! The handler depends only on these traits; the `store` and `notifier`
//! crates implement them over the managed cloud services.

use async_trait::async_trait;

use crate::{Notification, PublishError, PushRecord, StoreError};

/// Durable sink for push records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Writes `record` as a new item.
    ///
    /// No uniqueness is enforced; writing the same push twice yields two items.
    async fn put_record(&self, record: &PushRecord) -> Result<(), StoreError>;
}

/// Single pre-configured channel that push notifications are published to.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<(), PublishError>;
}
