//! Shared value types for the image push relay domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the relay's observable outputs: the persisted [`PushRecord`], the
//! [`Notification`] announced for it, and the [`HandlerResponse`] envelope
//! returned to the invoker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ImageTag, PushFields, PushedBy, RepositoryName};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Formats as ISO-8601 without an offset suffix; the value is always UTC.
    ///
    /// The fraction is six digits (truncated to microseconds) and omitted
    /// entirely when the microsecond part is zero: `2024-05-01T09:30:00.000042`,
    /// `2024-05-01T09:30:00`. This is the representation written to the store
    /// and the notification.
    pub fn to_iso8601(self) -> String {
        let format = if self.0.timestamp_subsec_micros() == 0 {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M:%S%.6f"
        };
        self.0.format(format).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

// ---------------------------------------------------------------------------
// Push record
// ---------------------------------------------------------------------------

/// Attribute names of a persisted [`PushRecord`], in write order.
pub mod attribute {
    pub const REPOSITORY: &str = "Repository";
    pub const IMAGE_TAG: &str = "ImageTag";
    pub const PUSHED_BY: &str = "PushedBy";
    pub const TIMESTAMP: &str = "Timestamp";
}

/// The normalized fact recorded for one image push.
///
/// Built fresh per invocation, written once, never updated. Every field is
/// always populated: missing inbound values have already been replaced by
/// their sentinels, and `timestamp` is the handling time, not anything the
/// event claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    pub repository: RepositoryName,
    pub image_tag: ImageTag,
    pub pushed_by: PushedBy,
    pub timestamp: Timestamp,
}

impl PushRecord {
    /// Stamps resolved event fields with the time the push was handled.
    pub fn new(fields: PushFields, timestamp: Timestamp) -> Self {
        Self {
            repository: fields.repository,
            image_tag: fields.image_tag,
            pushed_by: fields.pushed_by,
            timestamp,
        }
    }

    /// The four string attributes of the stored item.
    pub fn attributes(&self) -> [(&'static str, String); 4] {
        [
            (attribute::REPOSITORY, self.repository.to_string()),
            (attribute::IMAGE_TAG, self.image_tag.to_string()),
            (attribute::PUSHED_BY, self.pushed_by.to_string()),
            (attribute::TIMESTAMP, self.timestamp.to_iso8601()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Subject line of every push notification.
pub const NOTIFICATION_SUBJECT: &str = "ECR Image Push Notification";

/// A human-readable announcement of a [`PushRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Renders the fixed five-line template for `record`.
    pub fn for_record(record: &PushRecord) -> Self {
        let body = format!(
            "Docker image pushed successfully!\n\
             Repository: {}\n\
             Tag: {}\n\
             Pushed By: {}\n\
             Timestamp: {}",
            record.repository,
            record.image_tag,
            record.pushed_by,
            record.timestamp.to_iso8601(),
        );
        Self {
            subject: NOTIFICATION_SUBJECT.to_owned(),
            body,
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

const SUCCESS_MESSAGE: &str = "Lambda executed successfully!";

/// Status envelope returned after a push has been recorded and announced.
///
/// `body` holds a JSON-encoded string, so the serialized form is
/// `{"statusCode":200,"body":"\"Lambda executed successfully!\""}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    /// The only response the handler produces.
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: format!("\"{SUCCESS_MESSAGE}\""),
        }
    }
}
