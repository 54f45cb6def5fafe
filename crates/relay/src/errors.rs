//! Error types for the image push relay.
//!
//! [`RelayError`] is what a failed invocation surfaces to its host. It wraps
//! the two port-level failures, [`StoreError`] and [`PublishError`], which the
//! infrastructure adapters construct from their SDK errors.
//!
//! [`ConfigError`] is a startup-time failure: the process never begins
//! handling events with an incomplete configuration.
//!
//! Missing event fields are not errors. They resolve to sentinels in
//! [`crate::event`] and are never surfaced.

use thiserror::Error;

use crate::{TableName, TopicArn};

/// Boxed error from an external client, kept as the `source` of a port error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// The relay configuration could not be loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required keys were unset or empty.
    ///
    /// Lists every missing key, not just the first one found.
    #[error("Missing required configuration: {}", .keys.join(", "))]
    MissingKeys {
        /// The missing keys, in declaration order.
        keys: Vec<&'static str>,
    },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Writing a push record to the store failed.
#[derive(Debug, Error)]
#[error("Failed to write push record to table '{table}'")]
pub struct StoreError {
    /// The table the write was addressed to.
    pub table: TableName,
    #[source]
    pub source: BoxError,
}

impl StoreError {
    pub fn new(table: TableName, source: impl Into<BoxError>) -> Self {
        Self {
            table,
            source: source.into(),
        }
    }
}

/// Publishing a notification failed.
#[derive(Debug, Error)]
#[error("Failed to publish notification to topic '{topic}'")]
pub struct PublishError {
    /// The topic the message was addressed to.
    pub topic: TopicArn,
    #[source]
    pub source: BoxError,
}

impl PublishError {
    pub fn new(topic: TopicArn, source: impl Into<BoxError>) -> Self {
        Self {
            topic,
            source: source.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Invocation errors
// ---------------------------------------------------------------------------

/// Errors that fail a single invocation.
///
/// Nothing is rolled back: a [`RelayError::Publish`] means the record was
/// already stored. Whether the event is redelivered is up to the host.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The record could not be persisted; no notification was attempted.
    #[error(transparent)]
    Persist(#[from] StoreError),

    /// The record was persisted but the notification could not be published.
    #[error(transparent)]
    Publish(#[from] PublishError),
}
