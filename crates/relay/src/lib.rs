//! Core domain for the image push relay.
//!
//! The relay turns one container-image-push event into a stored
//! [`PushRecord`] and a published [`Notification`]. This crate owns every
//! domain rule involved: event-shape selection, field defaulting, the record
//! model, message formatting, and configuration validation. Infrastructure
//! crates implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no cloud SDK
//! dependencies. It defines *what* is needed; the `store` and `notifier`
//! crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Record field and external identifier newtypes |
//! | [`event`] | Inbound event classification and normalization |
//! | [`types`] | `Timestamp`, `PushRecord`, `Notification`, `HandlerResponse` |
//! | [`config`] | Required configuration keys and loading |
//! | [`ports`] | `RecordStore` and `NotificationChannel` traits |
//! | [`handler`] | `PushRelay`, the per-event flow |
//! | [`errors`] | Configuration, port, and invocation errors |

pub mod config;
pub mod errors;
pub mod event;
pub mod handler;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::RelayConfig;
pub use errors::{BoxError, ConfigError, PublishError, RelayError, StoreError};
pub use event::{InboundEvent, PushFields};
pub use handler::PushRelay;
pub use identifiers::{ImageTag, InvocationId, PushedBy, RepositoryName, TableName, TopicArn};
pub use ports::{NotificationChannel, RecordStore};
pub use types::{attribute, HandlerResponse, Notification, PushRecord, Timestamp, NOTIFICATION_SUBJECT};
