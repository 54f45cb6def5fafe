//! Image push relay record store adapter.
//!
//! Implements the [`relay::RecordStore`] trait over DynamoDB. Each record
//! becomes one `PutItem` call carrying four string attributes:
//! `Repository`, `ImageTag`, `PushedBy`, `Timestamp`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Item encoding and SDK error wrapping live here. The
//! [`relay`] crate sees only [`relay::RecordStore`].
//!
//! Whether a second write for the same repository and tag adds an item or
//! replaces one depends on the table's key schema, which this crate does not
//! manage. The relay never reads or deletes items.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::put_item::builders::PutItemFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use relay::{PushRecord, RecordStore, StoreError, TableName};
use tracing::debug;

/// Writes push records to a single DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: Client,
    table: TableName,
}

impl DynamoRecordStore {
    /// Wraps an already-configured client. The client is reused for every write.
    pub fn new(client: Client, table: TableName) -> Self {
        Self { client, table }
    }

    /// Builds the `PutItem` request for `record` without sending it.
    fn put_request(&self, record: &PushRecord) -> PutItemFluentBuilder {
        self.client
            .put_item()
            .table_name(self.table.as_str())
            .set_item(Some(record_item(record)))
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    #[tracing::instrument(name = "store.put_record", skip_all, fields(table = %self.table))]
    async fn put_record(&self, record: &PushRecord) -> Result<(), StoreError> {
        self.put_request(record)
            .send()
            .await
            .map_err(|e| StoreError::new(self.table.clone(), e))?;

        debug!("PutItem succeeded");
        Ok(())
    }
}

/// Encodes `record` as a DynamoDB item of string attributes.
pub fn record_item(record: &PushRecord) -> HashMap<String, AttributeValue> {
    record
        .attributes()
        .into_iter()
        .map(|(name, value)| (name.to_owned(), AttributeValue::S(value)))
        .collect()
}
