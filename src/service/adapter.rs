use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::error;

use crate::notify::Notifier;
use crate::store::{
    BatchOutcome, FetchParams, ID_FIELD, Record, RecordStore, StoreError, WhereClause,
};

/// Uniform pass-through adapter between one domain entity and one store
/// table. Every write is funneled through the entity's typed patch, so only
/// allow-listed fields can ever reach the store.
pub struct RecordAdapter {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    table: &'static str,
    fields: &'static [&'static str],
    /// Capitalized entity label used in notification texts ("Employee").
    entity: &'static str,
}

/// Serializes a patch into the record to send. `strip_empty` drops
/// empty-string values too (create policy); updates keep them.
fn writable_fields<P: Serialize>(patch: &P, strip_empty: bool) -> Record {
    let mut record = match serde_json::to_value(patch) {
        Ok(Value::Object(map)) => map,
        _ => Record::new(),
    };
    record.retain(|_, v| !v.is_null());
    if strip_empty {
        record.retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
    }
    record
}

impl RecordAdapter {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        table: &'static str,
        fields: &'static [&'static str],
        entity: &'static str,
    ) -> Self {
        Self {
            store,
            notifier,
            table,
            fields,
            entity,
        }
    }

    fn label(&self) -> String {
        self.entity.to_lowercase()
    }

    fn notify_batch_failures(&self, outcome: &BatchOutcome, fallback: &str) {
        for failed in outcome.failures() {
            if !failed.errors.is_empty() {
                for err in &failed.errors {
                    self.notifier
                        .failure(&format!("{}: {}", err.field_label, err.message));
                }
            } else {
                self.notifier
                    .failure(failed.message.as_deref().unwrap_or(fallback));
            }
        }
    }

    fn decode<T: DeserializeOwned>(record: Record) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }

    /// Strict read, for callers that must tell failure apart from an
    /// empty table before deciding on a write. Failures are logged and
    /// notified before propagating.
    pub async fn try_fetch_all<T: DeserializeOwned>(
        &self,
        filters: Vec<WhereClause>,
    ) -> Result<Vec<T>, StoreError> {
        let params = FetchParams::with_fields(self.fields).filtered(filters);
        let rows = self
            .store
            .fetch_records(self.table, &params)
            .await
            .inspect_err(|e| {
                error!(error = %e, table = self.table, "fetch failed");
                self.notifier
                    .failure(&format!("Failed to load {}s", self.label()));
            })?;
        rows.into_iter()
            .map(Self::decode)
            .collect::<Result<Vec<T>, StoreError>>()
            .inspect_err(|e| {
                error!(error = %e, table = self.table, "fetch decode failed");
                self.notifier
                    .failure(&format!("Failed to load {}s", self.label()));
            })
    }

    /// Never fails from the caller's point of view: any store or decode
    /// problem is logged, notified once, and collapsed to an empty list.
    pub async fn fetch_all<T: DeserializeOwned>(&self, filters: Vec<WhereClause>) -> Vec<T> {
        self.try_fetch_all(filters).await.unwrap_or_default()
    }

    /// Absence and failure both come back as `None`; the distinction only
    /// shows in the notification text.
    pub async fn get_by_id<T: DeserializeOwned>(&self, id: i64) -> Option<T> {
        let params = FetchParams::with_fields(self.fields);
        match self.store.get_record_by_id(self.table, id, &params).await {
            Ok(Some(record)) => match Self::decode(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    error!(error = %e, table = self.table, id, "record decode failed");
                    self.notifier
                        .failure(&format!("Failed to load {} details", self.label()));
                    None
                }
            },
            Ok(None) => {
                self.notifier.failure(&format!("{} not found", self.entity));
                None
            }
            Err(e) => {
                error!(error = %e, table = self.table, id, "record fetch failed");
                self.notifier
                    .failure(&format!("Failed to load {} details", self.label()));
                None
            }
        }
    }

    /// Batch-of-one create. `Ok(None)` means the store rejected the record
    /// (already notified); `Err` is transport-level and also notified.
    pub async fn create<T, P>(&self, patch: &P) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let record = writable_fields(patch, true);
        let fallback = format!("Failed to create {}", self.label());
        let outcome = self
            .store
            .create_records(self.table, vec![record])
            .await
            .inspect_err(|e| {
                error!(error = %e, table = self.table, "create failed");
                self.notifier.failure(&fallback);
            })?;

        self.notify_batch_failures(&outcome, &fallback);
        match outcome.first_success() {
            Some(data) => {
                let item = Self::decode(data.clone()).inspect_err(|e| {
                    error!(error = %e, table = self.table, "create decode failed");
                    self.notifier.failure(&fallback);
                })?;
                self.notifier
                    .success(&format!("{} created successfully!", self.entity));
                Ok(Some(item))
            }
            None => {
                self.notifier.failure(&fallback);
                Ok(None)
            }
        }
    }

    /// Same policy as create, except the identifier field is always sent
    /// and empty strings survive.
    pub async fn update<T, P>(&self, id: i64, patch: &P) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let mut record = writable_fields(patch, false);
        record.insert(ID_FIELD.to_string(), json!(id));
        let fallback = format!("Failed to update {}", self.label());
        let outcome = self
            .store
            .update_records(self.table, vec![record])
            .await
            .inspect_err(|e| {
                error!(error = %e, table = self.table, id, "update failed");
                self.notifier.failure(&fallback);
            })?;

        self.notify_batch_failures(&outcome, &fallback);
        match outcome.first_success() {
            Some(data) => {
                let item = Self::decode(data.clone()).inspect_err(|e| {
                    error!(error = %e, table = self.table, id, "update decode failed");
                    self.notifier.failure(&fallback);
                })?;
                self.notifier
                    .success(&format!("{} updated successfully!", self.entity));
                Ok(Some(item))
            }
            None => {
                self.notifier.failure(&fallback);
                Ok(None)
            }
        }
    }

    /// `Ok(true)` iff at least one deletion in the batch-of-one succeeded.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let fallback = format!("Failed to delete {}", self.label());
        let outcome = self
            .store
            .delete_records(self.table, vec![id])
            .await
            .inspect_err(|e| {
                error!(error = %e, table = self.table, id, "delete failed");
                self.notifier.failure(&fallback);
            })?;

        self.notify_batch_failures(&outcome, &fallback);
        if outcome.any_success() {
            self.notifier
                .success(&format!("{} deleted successfully!", self.entity));
            Ok(true)
        } else {
            self.notifier.failure(&fallback);
            Ok(false)
        }
    }
}
