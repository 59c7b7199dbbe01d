use std::sync::Arc;

use crate::model::department::{self, Department, DepartmentPatch};
use crate::notify::Notifier;
use crate::store::{RecordStore, StoreError, WhereClause};

use super::adapter::RecordAdapter;

pub struct DepartmentService {
    adapter: RecordAdapter,
}

impl DepartmentService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            adapter: RecordAdapter::new(
                store,
                notifier,
                department::TABLE,
                department::FIELDS,
                "Department",
            ),
        }
    }

    pub async fn fetch_all(&self, filters: Vec<WhereClause>) -> Vec<Department> {
        self.adapter.fetch_all(filters).await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Department> {
        self.adapter.get_by_id(id).await
    }

    pub async fn create(&self, patch: DepartmentPatch) -> Result<Option<Department>, StoreError> {
        self.adapter.create(&patch).await
    }

    pub async fn update(
        &self,
        id: i64,
        patch: DepartmentPatch,
    ) -> Result<Option<Department>, StoreError> {
        self.adapter.update(id, &patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.adapter.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;

    use super::*;

    #[actix_web::test]
    async fn demo_catalog_has_six_departments() {
        let service = DepartmentService::new(
            Arc::new(MemoryStore::demo()),
            Arc::new(RecordingNotifier::new()),
        );

        let departments = service.fetch_all(Vec::new()).await;

        assert_eq!(departments.len(), 6);
        assert!(departments.iter().any(|d| d.name == "Engineering"));
    }

    #[actix_web::test]
    async fn create_then_rename() {
        let service = DepartmentService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
        );

        let created = service
            .create(DepartmentPatch {
                name: Some("Legal".into()),
            })
            .await
            .unwrap()
            .expect("create should succeed");

        let renamed = service
            .update(
                created.id,
                DepartmentPatch {
                    name: Some("Legal & Compliance".into()),
                },
            )
            .await
            .unwrap()
            .expect("update should succeed");

        assert_eq!(renamed.id, created.id);
        assert_eq!(renamed.name, "Legal & Compliance");
    }
}
