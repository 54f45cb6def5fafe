//! Inbound event classification and normalization.
//!
//! Two event shapes reach the relay:
//!
//! | Shape | Discriminant | Repository | Tag | Pushed by |
//! |-------|--------------|------------|-----|-----------|
//! | [`InboundEvent::Bus`] | top-level `detail` present | `detail.repository-name` | `detail.image-tag` | `account` |
//! | [`InboundEvent::Webhook`] | no `detail` | `repository` | `image_tag` | `pushed_by` |
//!
//! The shape is chosen once, by [`InboundEvent::classify`]; after
//! [`InboundEvent::normalize`] no code looks at the raw payload again.
//!
//! ## Field values
//!
//! Strings are taken verbatim. Numbers and booleans are rendered as their JSON
//! text. `null`, arrays and objects count as absent and resolve to the
//! field's sentinel, as does any key that is missing.

use serde_json::{Map, Value};

use crate::{ImageTag, PushedBy, RepositoryName};

const DETAIL: &str = "detail";

/// Keys read from a bus event.
mod bus {
    pub const IMAGE_TAG: &str = "image-tag";
    pub const REPOSITORY: &str = "repository-name";
    pub const ACCOUNT: &str = "account";
}

/// Keys read from a webhook event.
mod webhook {
    pub const IMAGE_TAG: &str = "image_tag";
    pub const REPOSITORY: &str = "repository";
    pub const PUSHED_BY: &str = "pushed_by";
}

/// An inbound push event, discriminated by shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InboundEvent<'a> {
    /// Structured envelope from the cloud event bus.
    Bus {
        /// The nested `detail` payload; may be any JSON value.
        detail: &'a Value,
        /// The enclosing event, for envelope fields such as `account`.
        envelope: &'a Map<String, Value>,
    },
    /// Flat custom payload posted by a CI system.
    ///
    /// `None` when the payload was not a JSON object at all.
    Webhook {
        payload: Option<&'a Map<String, Value>>,
    },
}

/// The three event-derived fields of a push record, already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFields {
    pub repository: RepositoryName,
    pub image_tag: ImageTag,
    pub pushed_by: PushedBy,
}

impl PushFields {
    /// Number of fields that fell back to their sentinel.
    pub fn defaulted_count(&self) -> usize {
        [
            self.repository.is_sentinel(),
            self.image_tag.is_sentinel(),
            self.pushed_by.is_sentinel(),
        ]
        .into_iter()
        .filter(|defaulted| *defaulted)
        .count()
    }
}

impl<'a> InboundEvent<'a> {
    /// Picks the event shape. Presence of a top-level `detail` key selects
    /// [`InboundEvent::Bus`] regardless of its value; anything else is a
    /// [`InboundEvent::Webhook`].
    pub fn classify(event: &'a Value) -> Self {
        match event.as_object() {
            Some(envelope) => match envelope.get(DETAIL) {
                Some(detail) => Self::Bus { detail, envelope },
                None => Self::Webhook {
                    payload: Some(envelope),
                },
            },
            None => Self::Webhook { payload: None },
        }
    }

    /// Short label for logs and span fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bus { .. } => "bus",
            Self::Webhook { .. } => "webhook",
        }
    }

    /// Resolves the three record fields, substituting sentinels for anything
    /// missing. Never fails.
    pub fn normalize(&self) -> PushFields {
        match *self {
            Self::Bus { detail, envelope } => {
                let detail = detail.as_object();
                PushFields {
                    repository: RepositoryName::resolve(text(detail, bus::REPOSITORY)),
                    image_tag: ImageTag::resolve(text(detail, bus::IMAGE_TAG)),
                    pushed_by: PushedBy::resolve(text(Some(envelope), bus::ACCOUNT)),
                }
            }
            Self::Webhook { payload } => PushFields {
                repository: RepositoryName::resolve(text(payload, webhook::REPOSITORY)),
                image_tag: ImageTag::resolve(text(payload, webhook::IMAGE_TAG)),
                pushed_by: PushedBy::resolve(text(payload, webhook::PUSHED_BY)),
            },
        }
    }
}

/// Reads `key` from `map` as text, per the rules in the module docs.
fn text(map: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    match map?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
