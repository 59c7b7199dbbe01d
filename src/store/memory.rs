use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Local;
use serde_json::{Value, json};

use super::{
    BatchOutcome, FetchParams, ID_FIELD, Operator, Record, RecordResult, RecordStore, StoreError,
    WhereClause,
};

/// In-memory record store: the injectable stand-in for the hosted service,
/// used by the test suite and by demo mode. Ids are assigned sequentially
/// per table, mirroring how the demo UI numbered its sample rows.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Table>>,
}

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<Record>,
}

impl Table {
    fn insert(&mut self, mut record: Record) -> Record {
        self.next_id += 1;
        record.insert(ID_FIELD.to_string(), json!(self.next_id));
        self.rows.push(record.clone());
        record
    }
}

/// Stringified view of a field value, for comparison against clause values.
/// Dates and times are stored as ISO strings, so lexicographic order matches
/// chronological order.
fn comparable(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches(record: &Record, clause: &WhereClause) -> bool {
    let Some(field) = record.get(&clause.field_name).and_then(comparable) else {
        return false;
    };
    clause.values.iter().any(|v| match clause.operator {
        Operator::EqualTo => field == *v,
        Operator::GreaterThanOrEqualTo => field >= *v,
        Operator::LessThanOrEqualTo => field <= *v,
    })
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    let mut out = Record::new();
    for field in fields {
        if let Some(value) = record.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    out
}

fn record_id(record: &Record) -> Option<i64> {
    record.get(ID_FIELD).and_then(Value::as_i64)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record without going through the batch protocol. Test and
    /// demo setup only; the assigned id is returned.
    pub fn seed(&self, table: &str, record: Record) -> i64 {
        let mut tables = self.inner.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default().insert(record);
        record_id(&stored).unwrap_or_default()
    }

    /// The sample data the dashboard shipped with: three employees, the
    /// department catalog, and today's attendance for each of them.
    pub fn demo() -> Self {
        let store = Self::new();
        let today = Local::now().date_naive().to_string();

        for (first, last, email, department, position, hire_date, avatar) in [
            (
                "Sarah",
                "Johnson",
                "sarah.johnson@company.com",
                "Engineering",
                "Senior Developer",
                "2022-03-15",
                "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face",
            ),
            (
                "Michael",
                "Chen",
                "michael.chen@company.com",
                "Marketing",
                "Marketing Manager",
                "2021-07-20",
                "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
            ),
            (
                "Emily",
                "Rodriguez",
                "emily.rodriguez@company.com",
                "HR",
                "HR Specialist",
                "2023-01-10",
                "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
            ),
        ] {
            store.seed(
                "employee",
                record(json!({
                    "Name": format!("{first} {last}"),
                    "first_name": first,
                    "last_name": last,
                    "email": email,
                    "department": department,
                    "position": position,
                    "status": "active",
                    "hire_date": hire_date,
                    "avatar": avatar,
                })),
            );
        }

        for name in ["Engineering", "Marketing", "HR", "Sales", "Finance", "Operations"] {
            store.seed("department", record(json!({ "Name": name })));
        }

        for (employee, check_in, check_out) in [
            (1, "09:00", Some("17:30")),
            (2, "08:45", Some("17:15")),
            (3, "09:15", None),
        ] {
            store.seed(
                "attendance",
                record(json!({
                    "Name": format!("{employee} - {today}"),
                    "employee": employee,
                    "date": today,
                    "check_in": check_in,
                    "check_out": check_out,
                    "status": "present",
                })),
            );
        }

        store
    }
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<Vec<Record>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let Some(table) = tables.get(table) else {
            return Ok(Vec::new());
        };
        Ok(table
            .rows
            .iter()
            .filter(|row| params.where_clauses.iter().all(|c| matches(row, c)))
            .map(|row| project(row, &params.fields))
            .collect())
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> Result<Option<Record>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.get(table).and_then(|t| {
            t.rows
                .iter()
                .find(|row| record_id(row) == Some(id))
                .map(|row| project(row, &params.fields))
        }))
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchOutcome, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let table = tables.entry(table.to_string()).or_default();
        Ok(BatchOutcome {
            results: records
                .into_iter()
                .map(|r| RecordResult::ok(table.insert(r)))
                .collect(),
        })
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchOutcome, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let table = tables.entry(table.to_string()).or_default();
        let results = records
            .into_iter()
            .map(|incoming| {
                let Some(id) = record_id(&incoming) else {
                    return RecordResult::failed("Missing record id");
                };
                match table.rows.iter_mut().find(|row| record_id(row) == Some(id)) {
                    Some(row) => {
                        for (key, value) in incoming {
                            row.insert(key, value);
                        }
                        RecordResult::ok(row.clone())
                    }
                    None => RecordResult::failed("Record not found"),
                }
            })
            .collect();
        Ok(BatchOutcome { results })
    }

    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<i64>,
    ) -> Result<BatchOutcome, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let table = tables.entry(table.to_string()).or_default();
        let results = ids
            .into_iter()
            .map(|id| {
                let before = table.rows.len();
                table.rows.retain(|row| record_id(row) != Some(id));
                if table.rows.len() < before {
                    RecordResult {
                        success: true,
                        data: None,
                        message: None,
                        errors: Vec::new(),
                    }
                } else {
                    RecordResult::failed("Record not found")
                }
            })
            .collect();
        Ok(BatchOutcome { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: Value) -> Record {
        record(value)
    }

    #[actix_web::test]
    async fn assigns_sequential_ids() {
        let store = MemoryStore::new();
        let outcome = store
            .create_records(
                "employee",
                vec![row(json!({ "Name": "A" })), row(json!({ "Name": "B" }))],
            )
            .await
            .unwrap();

        let ids: Vec<i64> = outcome
            .results
            .iter()
            .map(|r| record_id(r.data.as_ref().unwrap()).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[actix_web::test]
    async fn where_clauses_filter_and_combine() {
        let store = MemoryStore::new();
        for (employee, date) in [(1, "2024-05-06"), (1, "2024-05-08"), (2, "2024-05-06")] {
            store.seed("attendance", row(json!({ "employee": employee, "date": date })));
        }

        let params = FetchParams::with_fields(&["Id", "employee", "date"]).filtered(vec![
            WhereClause::eq("employee", "1"),
            WhereClause::new("date", Operator::GreaterThanOrEqualTo, "2024-05-06"),
            WhereClause::new("date", Operator::LessThanOrEqualTo, "2024-05-07"),
        ]);
        let rows = store.fetch_records("attendance", &params).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("date"), Some(&json!("2024-05-06")));
    }

    #[actix_web::test]
    async fn projection_keeps_only_requested_fields() {
        let store = MemoryStore::new();
        store.seed("employee", row(json!({ "Name": "A", "email": "a@b.c" })));

        let params = FetchParams::with_fields(&["Id", "Name"]);
        let rows = store.fetch_records("employee", &params).await.unwrap();

        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].get("email").is_none());
    }

    #[actix_web::test]
    async fn update_of_missing_record_fails_per_record() {
        let store = MemoryStore::new();
        let outcome = store
            .update_records("employee", vec![row(json!({ "Id": 42, "Name": "X" }))])
            .await
            .unwrap();

        assert!(!outcome.any_success());
        assert_eq!(outcome.results[0].message.as_deref(), Some("Record not found"));
    }

    #[actix_web::test]
    async fn delete_reports_each_id() {
        let store = MemoryStore::new();
        store.seed("department", row(json!({ "Name": "Sales" })));

        let outcome = store
            .delete_records("department", vec![1, 99])
            .await
            .unwrap();

        assert!(outcome.any_success());
        assert_eq!(outcome.failures().count(), 1);
    }
}
