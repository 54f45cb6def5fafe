//! Process-wide relay configuration.
//!
//! Loaded once at cold start and validated eagerly. An unset key and a key
//! set to the empty string are treated the same way: both are missing.

use crate::{ConfigError, TableName, TopicArn};

/// Environment key naming the table that receives push records.
pub const TABLE_KEY: &str = "DYNAMODB_TABLE";

/// Environment key holding the ARN of the notification topic.
pub const TOPIC_KEY: &str = "SNS_TOPIC_ARN";

/// Identifiers of the two external services the relay writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub table_name: TableName,
    pub topic_arn: TopicArn,
}

impl RelayConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// Every required key is checked before returning, so the error names all
    /// of the missing ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = lookup(TABLE_KEY).and_then(TableName::new);
        let topic_arn = lookup(TOPIC_KEY).and_then(TopicArn::new);

        match (table_name, topic_arn) {
            (Some(table_name), Some(topic_arn)) => Ok(Self {
                table_name,
                topic_arn,
            }),
            (table_name, topic_arn) => {
                let mut keys = Vec::new();
                if table_name.is_none() {
                    keys.push(TABLE_KEY);
                }
                if topic_arn.is_none() {
                    keys.push(TOPIC_KEY);
                }
                Err(ConfigError::MissingKeys { keys })
            }
        }
    }
}
