//! Image push relay notification adapter.
//!
//! Implements the [`relay::NotificationChannel`] trait over SNS: every
//! notification is one `Publish` call to a single pre-configured topic.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request building and SDK error wrapping live here. The
//! [`relay`] crate sees only [`relay::NotificationChannel`].

use async_trait::async_trait;
use aws_sdk_sns::operation::publish::builders::PublishFluentBuilder;
use aws_sdk_sns::Client;
use relay::{Notification, NotificationChannel, PublishError, TopicArn};
use tracing::debug;

/// Publishes push notifications to one SNS topic.
#[derive(Debug, Clone)]
pub struct SnsNotificationChannel {
    client: Client,
    topic: TopicArn,
}

impl SnsNotificationChannel {
    /// Wraps an already-configured client. The client is reused for every publish.
    pub fn new(client: Client, topic: TopicArn) -> Self {
        Self { client, topic }
    }

    /// Builds the `Publish` request for `notification` without sending it.
    fn publish_request(&self, notification: &Notification) -> PublishFluentBuilder {
        self.client
            .publish()
            .topic_arn(self.topic.as_str())
            .subject(&notification.subject)
            .message(&notification.body)
    }
}

#[async_trait]
impl NotificationChannel for SnsNotificationChannel {
    #[tracing::instrument(name = "notifier.publish", skip_all, fields(topic = %self.topic))]
    async fn publish(&self, notification: &Notification) -> Result<(), PublishError> {
        let output = self
            .publish_request(notification)
            .send()
            .await
            .map_err(|e| PublishError::new(self.topic.clone(), e))?;

        debug!(message_id = output.message_id().unwrap_or_default(), "Publish succeeded");
        Ok(())
    }
}
