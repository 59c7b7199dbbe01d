use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

pub mod hosted;
pub mod memory;

pub use hosted::HostedStore;
pub use memory::MemoryStore;

/// A flat record as stored by the remote service: field name -> JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// System-assigned identifier column, present on every stored record.
pub const ID_FIELD: &str = "Id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("store rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Operator {
    EqualTo,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereClause {
    pub field_name: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl WhereClause {
    pub fn new(field_name: &str, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.to_string(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn eq(field_name: &str, value: impl Into<String>) -> Self {
        Self::new(field_name, Operator::EqualTo, value)
    }
}

/// Query half of the store protocol: a field projection plus optional filters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchParams {
    pub fields: Vec<String>,
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty")]
    pub where_clauses: Vec<WhereClause>,
}

impl FetchParams {
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            where_clauses: Vec::new(),
        }
    }

    pub fn filtered(mut self, clauses: Vec<WhereClause>) -> Self {
        self.where_clauses.extend(clauses);
        self
    }
}

/// Field-level validation failure reported by the store for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_label: String,
    pub message: String,
}

/// Outcome of one record inside a batch write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl RecordResult {
    pub fn ok(data: Record) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub results: Vec<RecordResult>,
}

impl BatchOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &RecordResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn any_success(&self) -> bool {
        self.results.iter().any(|r| r.success)
    }

    /// Data of the first successful record, if the batch succeeded at all.
    pub fn first_success(&self) -> Option<&Record> {
        self.results
            .iter()
            .find(|r| r.success)
            .and_then(|r| r.data.as_ref())
    }
}

/// The remote record store's five operations over named tables.
///
/// Implementations are injected into the domain services; nothing in the
/// crate reaches for a global client.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, StoreError>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> Result<Option<Record>, StoreError>;

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchOutcome, StoreError>;

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchOutcome, StoreError>;

    async fn delete_records(&self, table: &str, ids: Vec<i64>)
    -> Result<BatchOutcome, StoreError>;
}
