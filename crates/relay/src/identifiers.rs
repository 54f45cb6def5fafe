//! Newtype domain identifiers.
//!
//! Every value that crosses the relay boundary is wrapped in a distinct newtype.
//! This prevents accidentally interchanging, for example, a [`RepositoryName`]
//! with an [`ImageTag`] even though both are `String` under the hood.
//!
//! Two families live here:
//!
//! - **Record fields** ([`RepositoryName`], [`ImageTag`], [`PushedBy`]) are
//!   always populated. A missing source value resolves to the field's sentinel.
//! - **External identifiers** ([`TableName`], [`TopicArn`]) name the managed
//!   services the relay writes to and are rejected when empty.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for record-field newtypes.
// Generates: struct, SENTINEL, new(), resolve(), is_sentinel(), as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! record_field {
    (
        $(#[$attr:meta])*
        $name:ident => $sentinel:literal
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Placeholder substituted when the inbound event carries no value.
            pub const SENTINEL: &'static str = $sentinel;

            /// Wraps a value taken from an inbound event. The empty string is kept.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Uses `value` when present, otherwise falls back to [`Self::SENTINEL`].
            pub fn resolve(value: Option<String>) -> Self {
                value.map_or_else(|| Self(Self::SENTINEL.to_owned()), Self)
            }

            /// Returns `true` if this field holds the sentinel placeholder.
            pub fn is_sentinel(&self) -> bool {
                self.0 == Self::SENTINEL
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for non-empty String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Record fields
// ---------------------------------------------------------------------------

record_field! {
    /// Name of the container image repository that received the push.
    RepositoryName => "unknown-repo"
}

record_field! {
    /// Tag (version label) of the pushed image.
    ImageTag => "unknown-tag"
}

record_field! {
    /// Actor responsible for the push.
    ///
    /// For bus events this is the cloud account id; for webhook events it is
    /// whatever username the CI system supplied.
    PushedBy => "unknown-user"
}

// ---------------------------------------------------------------------------
// External identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// Name of the key-value table that receives one item per push.
    TableName
}

string_id! {
    /// ARN of the pub/sub topic that receives push notifications.
    TopicArn
}

// ---------------------------------------------------------------------------

/// Identifies a single locally-triggered invocation of the handler.
///
/// Generated fresh for every `invoke` run so log lines and spans from one
/// replay can be correlated. Lambda invocations use the runtime's request id
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
