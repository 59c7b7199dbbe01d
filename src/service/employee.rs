use std::sync::Arc;

use crate::model::employee::{self, Employee, EmployeePatch, EmployeeStatus};
use crate::notify::Notifier;
use crate::store::{RecordStore, StoreError, WhereClause};

use super::adapter::RecordAdapter;

pub struct EmployeeService {
    adapter: RecordAdapter,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            adapter: RecordAdapter::new(
                store,
                notifier,
                employee::TABLE,
                employee::FIELDS,
                "Employee",
            ),
        }
    }

    pub async fn fetch_all(&self, filters: Vec<WhereClause>) -> Vec<Employee> {
        self.adapter.fetch_all(filters).await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Employee> {
        self.adapter.get_by_id(id).await
    }

    pub async fn create(&self, mut patch: EmployeePatch) -> Result<Option<Employee>, StoreError> {
        if patch.name.is_none() {
            if let (Some(first), Some(last)) = (&patch.first_name, &patch.last_name) {
                patch.name = Some(format!("{first} {last}"));
            }
        }
        patch.status.get_or_insert(EmployeeStatus::Active);
        self.adapter.create(&patch).await
    }

    pub async fn update(
        &self,
        id: i64,
        patch: EmployeePatch,
    ) -> Result<Option<Employee>, StoreError> {
        self.adapter.update(id, &patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.adapter.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::notify::{NoticeKind, RecordingNotifier};
    use crate::store::{
        BatchOutcome, FetchParams, FieldError, MemoryStore, Record, RecordResult, RecordStore,
        StoreError,
    };

    use super::*;

    fn service(store: Arc<dyn RecordStore>) -> (EmployeeService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (EmployeeService::new(store, notifier.clone()), notifier)
    }

    fn seeded_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::demo())
    }

    /// Store whose every call dies at the transport level.
    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn fetch_records(
            &self,
            _table: &str,
            _params: &FetchParams,
        ) -> Result<Vec<Record>, StoreError> {
            Err(StoreError::Rejected("store unavailable".into()))
        }

        async fn get_record_by_id(
            &self,
            _table: &str,
            _id: i64,
            _params: &FetchParams,
        ) -> Result<Option<Record>, StoreError> {
            Err(StoreError::Rejected("store unavailable".into()))
        }

        async fn create_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> Result<BatchOutcome, StoreError> {
            Err(StoreError::Rejected("store unavailable".into()))
        }

        async fn update_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> Result<BatchOutcome, StoreError> {
            Err(StoreError::Rejected("store unavailable".into()))
        }

        async fn delete_records(
            &self,
            _table: &str,
            _ids: Vec<i64>,
        ) -> Result<BatchOutcome, StoreError> {
            Err(StoreError::Rejected("store unavailable".into()))
        }
    }

    fn obj(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    /// Answers every write with a canned batch; reads are empty.
    struct CannedWriteStore {
        outcome: BatchOutcome,
    }

    #[async_trait]
    impl RecordStore for CannedWriteStore {
        async fn fetch_records(
            &self,
            _table: &str,
            _params: &FetchParams,
        ) -> Result<Vec<Record>, StoreError> {
            Ok(Vec::new())
        }

        async fn get_record_by_id(
            &self,
            _table: &str,
            _id: i64,
            _params: &FetchParams,
        ) -> Result<Option<Record>, StoreError> {
            Ok(None)
        }

        async fn create_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> Result<BatchOutcome, StoreError> {
            Ok(self.outcome.clone())
        }

        async fn update_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> Result<BatchOutcome, StoreError> {
            Ok(self.outcome.clone())
        }

        async fn delete_records(
            &self,
            _table: &str,
            _ids: Vec<i64>,
        ) -> Result<BatchOutcome, StoreError> {
            Ok(self.outcome.clone())
        }
    }

    #[actix_web::test]
    async fn fetch_all_returns_empty_on_store_failure() {
        let (service, notifier) = service(Arc::new(BrokenStore));

        let employees = service.fetch_all(Vec::new()).await;

        assert!(employees.is_empty());
        assert_eq!(notifier.failure_count(), 1);
    }

    #[actix_web::test]
    async fn get_by_id_missing_yields_none_and_one_failure_notice() {
        let (service, notifier) = service(seeded_store());

        let employee = service.get_by_id(999).await;

        assert!(employee.is_none());
        let notices = notifier.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Failure);
        assert_eq!(notices[0].message, "Employee not found");
    }

    #[actix_web::test]
    async fn create_appends_fourth_employee_with_defaults() {
        let (service, notifier) = service(seeded_store());
        assert_eq!(service.fetch_all(Vec::new()).await.len(), 3);

        let created = service
            .create(EmployeePatch {
                first_name: Some("David".into()),
                last_name: Some("Kim".into()),
                email: Some("david.kim@company.com".into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .expect("create should succeed");

        assert_eq!(created.id, 4);
        assert_eq!(created.name, "David Kim");
        assert_eq!(created.status, EmployeeStatus::Active);
        assert_eq!(service.fetch_all(Vec::new()).await.len(), 4);
        assert!(
            notifier
                .take()
                .iter()
                .any(|n| n.kind == NoticeKind::Success)
        );
    }

    #[actix_web::test]
    async fn create_strips_empty_string_fields() {
        let store = seeded_store();
        let (service, _) = service(store.clone());

        let created = service
            .create(EmployeePatch {
                first_name: Some("Ana".into()),
                last_name: Some("Silva".into()),
                email: Some("ana.silva@company.com".into()),
                position: Some(String::new()),
                department: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap()
            .expect("create should succeed");

        let record = store
            .get_record_by_id(
                employee::TABLE,
                created.id,
                &FetchParams::default(),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(record.get("position").is_none());
        assert!(record.get("department").is_none());
    }

    #[actix_web::test]
    async fn update_always_sends_identifier() {
        let (service, _) = service(seeded_store());

        // An all-empty patch still reaches the store because Id is kept.
        let updated = service
            .update(2, EmployeePatch::default())
            .await
            .unwrap()
            .expect("update should succeed");
        assert_eq!(updated.id, 2);

        // Empty strings are preserved on update, unlike create.
        let updated = service
            .update(
                2,
                EmployeePatch {
                    position: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("update should succeed");
        assert_eq!(updated.position.as_deref(), Some(""));
    }

    #[actix_web::test]
    async fn partial_batch_failure_notifies_each_field_error_and_returns_the_success() {
        let store = CannedWriteStore {
            outcome: BatchOutcome {
                results: vec![
                    RecordResult {
                        success: false,
                        data: None,
                        message: Some("Validation failed".into()),
                        errors: vec![
                            FieldError {
                                field_label: "Email".into(),
                                message: "is not a valid email".into(),
                            },
                            FieldError {
                                field_label: "Hire Date".into(),
                                message: "is required".into(),
                            },
                        ],
                    },
                    RecordResult::ok(obj(json!({
                        "Id": 9,
                        "Name": "Ana Silva",
                        "first_name": "Ana",
                        "last_name": "Silva",
                        "email": "ana.silva@company.com",
                        "status": "active",
                    }))),
                ],
            },
        };
        let (service, notifier) = service(Arc::new(store));

        let created = service
            .create(EmployeePatch {
                first_name: Some("Ana".into()),
                last_name: Some("Silva".into()),
                email: Some("ana.silva@company.com".into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .expect("first success should still be returned");

        assert_eq!(created.id, 9);
        let notices = notifier.take();
        let failures: Vec<_> = notices
            .iter()
            .filter(|n| n.kind == NoticeKind::Failure)
            .collect();
        // One notice per field error; the record-level message is not used
        // when field errors are present.
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].message, "Email: is not a valid email");
        assert_eq!(failures[1].message, "Hire Date: is required");
        assert!(notices.iter().any(|n| n.kind == NoticeKind::Success));
    }

    #[actix_web::test]
    async fn undecodable_create_response_is_notified_before_erroring() {
        let store = CannedWriteStore {
            outcome: BatchOutcome {
                results: vec![RecordResult::ok(obj(json!({ "Id": "nine" })))],
            },
        };
        let (service, notifier) = service(Arc::new(store));

        let result = service
            .create(EmployeePatch {
                first_name: Some("Ana".into()),
                last_name: Some("Silva".into()),
                email: Some("ana.silva@company.com".into()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(StoreError::Decode(_))));
        let notices = notifier.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Failure);
        assert_eq!(notices[0].message, "Failed to create employee");
    }

    #[actix_web::test]
    async fn delete_reports_success_flag() {
        let (service, _) = service(seeded_store());

        assert!(service.delete(1).await.unwrap());
        assert!(!service.delete(1).await.unwrap());
    }

    #[actix_web::test]
    async fn status_filter_is_forwarded_to_the_store() {
        let (service, _) = service(seeded_store());
        service
            .update(
                3,
                EmployeePatch {
                    status: Some(EmployeeStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let active = service
            .fetch_all(vec![crate::store::WhereClause::eq("status", "active")])
            .await;

        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|e| e.status == EmployeeStatus::Active));
    }
}
