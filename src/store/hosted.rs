use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{BatchOutcome, FetchParams, Record, RecordResult, RecordStore, StoreError};
use async_trait::async_trait;

/// Client for the hosted record store. Credentials travel as headers on
/// every request; the store itself decides what the key is allowed to touch.
pub struct HostedStore {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    public_key: String,
}

/// Response envelope shared by all store endpoints. Reads carry `data`,
/// writes carry per-record `results`.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    results: Option<Vec<RecordResult>>,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    fn rejection(&self) -> StoreError {
        StoreError::Rejected(
            self.message
                .clone()
                .unwrap_or_else(|| "request refused".to_string()),
        )
    }
}

impl HostedStore {
    pub fn new(base_url: &str, project_id: &str, public_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            public_key: public_key.to_string(),
        }
    }

    fn table_url(&self, table: &str, suffix: &str) -> String {
        format!("{}/tables/{}/{}", self.base_url, table, suffix)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("X-Project-Id", &self.project_id)
            .header("X-Public-Key", &self.public_key)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Envelope, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        let envelope: Envelope = response.json().await?;
        debug!(%status, success = envelope.success, "store response");
        Ok(envelope)
    }

    fn batch_outcome(envelope: Envelope) -> Result<BatchOutcome, StoreError> {
        if !envelope.success {
            return Err(envelope.rejection());
        }
        Ok(BatchOutcome {
            results: envelope.results.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl RecordStore for HostedStore {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table, "fetch");
        let envelope = self
            .send(self.request(reqwest::Method::POST, url).json(params))
            .await?;

        if !envelope.success {
            return Err(envelope.rejection());
        }
        match envelope.data {
            Some(serde_json::Value::Array(rows)) => rows
                .into_iter()
                .map(|row| serde_json::from_value(row).map_err(StoreError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> Result<Option<Record>, StoreError> {
        let url = self.table_url(table, &format!("records/{id}"));
        let response = self
            .request(reqwest::Method::POST, url)
            .json(params)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: Envelope = response.json().await?;
        if !envelope.success {
            return Err(envelope.rejection());
        }
        match envelope.data {
            Some(value @ serde_json::Value::Object(_)) => {
                Ok(Some(serde_json::from_value(value)?))
            }
            _ => Ok(None),
        }
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchOutcome, StoreError> {
        let url = self.table_url(table, "records");
        let envelope = self
            .send(
                self.request(reqwest::Method::POST, url)
                    .json(&json!({ "records": records })),
            )
            .await?;
        Self::batch_outcome(envelope)
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchOutcome, StoreError> {
        let url = self.table_url(table, "records");
        let envelope = self
            .send(
                self.request(reqwest::Method::PUT, url)
                    .json(&json!({ "records": records })),
            )
            .await?;
        Self::batch_outcome(envelope)
    }

    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<i64>,
    ) -> Result<BatchOutcome, StoreError> {
        let url = self.table_url(table, "records");
        let envelope = self
            .send(
                self.request(reqwest::Method::DELETE, url)
                    .json(&json!({ "RecordIds": ids })),
            )
            .await?;
        Self::batch_outcome(envelope)
    }
}
