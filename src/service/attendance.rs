use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{
    self, AttendancePatch, AttendanceRecord, AttendanceStatus, hhmm,
};
use crate::notify::Notifier;
use crate::store::{Operator, RecordStore, StoreError, WhereClause};

use super::adapter::RecordAdapter;

/// Result of the check-in/out toggle for one (employee, day).
///
/// The per-day state machine is NONE -> PRESENT_OPEN -> PRESENT_CLOSED,
/// driven only by this toggle. There is no transition out of CLOSED;
/// re-toggling a completed day is reported as `AlreadyCompleted` rather
/// than reopening or duplicating the record.
#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    CheckedIn(AttendanceRecord),
    CheckedOut(AttendanceRecord),
    AlreadyCompleted,
    /// The store refused the write; failure notices were already emitted.
    Rejected,
}

/// True iff a record exists for (employee, day) whose check-out is unset.
pub fn is_checked_in(records: &[AttendanceRecord], employee: i64, day: NaiveDate) -> bool {
    records
        .iter()
        .any(|r| r.employee == employee && r.date == day && r.check_out.is_none())
}

fn minute_precision(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

/// The Monday-started 7-day window containing `anchor`.
pub fn week_window(anchor: NaiveDate) -> [NaiveDate; 7] {
    let monday = anchor - Days::new(u64::from(anchor.weekday().num_days_from_monday()));
    std::array::from_fn(|i| monday + Days::new(i as u64))
}

/// One cell of the weekly attendance grid; empty when no record matches
/// that exact calendar day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayCell {
    pub date: NaiveDate,
    #[serde(with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub check_in: Option<NaiveTime>,
    #[serde(with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "17:30")]
    pub check_out: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
}

/// Read-side projection of an employee's records onto the week containing
/// `anchor`. Pure day-by-day lookup, no aggregation.
pub fn project_week(records: &[AttendanceRecord], employee: i64, anchor: NaiveDate) -> Vec<DayCell> {
    week_window(anchor)
        .into_iter()
        .map(|date| {
            let hit = records
                .iter()
                .find(|r| r.employee == employee && r.date == date);
            DayCell {
                date,
                check_in: hit.map(|r| r.check_in),
                check_out: hit.and_then(|r| r.check_out),
                status: hit.map(|r| r.status),
            }
        })
        .collect()
}

pub struct AttendanceService {
    adapter: RecordAdapter,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            adapter: RecordAdapter::new(
                store,
                notifier,
                attendance::TABLE,
                attendance::FIELDS,
                "Attendance record",
            ),
        }
    }

    pub async fn fetch_all(&self, filters: Vec<WhereClause>) -> Vec<AttendanceRecord> {
        self.adapter.fetch_all(filters).await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<AttendanceRecord> {
        self.adapter.get_by_id(id).await
    }

    pub async fn create(
        &self,
        mut patch: AttendancePatch,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        if patch.name.is_none() {
            if let (Some(employee), Some(date)) = (patch.employee, patch.date) {
                patch.name = Some(format!("{employee} - {date}"));
            }
        }
        patch.status.get_or_insert(AttendanceStatus::Present);
        self.adapter.create(&patch).await
    }

    pub async fn update(
        &self,
        id: i64,
        patch: AttendancePatch,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.adapter.update(id, &patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.adapter.delete(id).await
    }

    fn employee_filters(
        employee: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<WhereClause> {
        let mut filters = vec![WhereClause::eq("employee", employee.to_string())];
        if let Some(start) = start {
            filters.push(WhereClause::new(
                "date",
                Operator::GreaterThanOrEqualTo,
                start.to_string(),
            ));
        }
        if let Some(end) = end {
            filters.push(WhereClause::new(
                "date",
                Operator::LessThanOrEqualTo,
                end.to_string(),
            ));
        }
        filters
    }

    pub async fn fetch_for_employee(
        &self,
        employee: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<AttendanceRecord> {
        self.adapter
            .fetch_all(Self::employee_filters(employee, start, end))
            .await
    }

    pub async fn fetch_for_day(&self, day: NaiveDate) -> Vec<AttendanceRecord> {
        self.adapter
            .fetch_all(vec![WhereClause::eq("date", day.to_string())])
            .await
    }

    /// Flip the attendance state of `employee` for the day of `now`.
    ///
    /// The existence check must not be fooled by a failed read: treating
    /// a read error as "no record yet" would open a second record for a
    /// day that already has one. The read therefore propagates its error
    /// and the toggle aborts without writing.
    pub async fn toggle(
        &self,
        employee: i64,
        now: NaiveDateTime,
    ) -> Result<ToggleOutcome, StoreError> {
        let today = now.date();
        let records: Vec<AttendanceRecord> = self
            .adapter
            .try_fetch_all(Self::employee_filters(employee, Some(today), Some(today)))
            .await?;
        let existing = records.into_iter().find(|r| r.date == today);

        match existing {
            None => {
                let patch = AttendancePatch {
                    employee: Some(employee),
                    date: Some(today),
                    check_in: Some(minute_precision(now.time())),
                    status: Some(AttendanceStatus::Present),
                    ..Default::default()
                };
                Ok(match self.create(patch).await? {
                    Some(record) => ToggleOutcome::CheckedIn(record),
                    None => ToggleOutcome::Rejected,
                })
            }
            Some(record) if record.check_out.is_none() => {
                let patch = AttendancePatch {
                    check_out: Some(minute_precision(now.time())),
                    ..Default::default()
                };
                Ok(match self.update(record.id, patch).await? {
                    Some(record) => ToggleOutcome::CheckedOut(record),
                    None => ToggleOutcome::Rejected,
                })
            }
            Some(_) => Ok(ToggleOutcome::AlreadyCompleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::notify::RecordingNotifier;
    use crate::store::{BatchOutcome, FetchParams, MemoryStore, Record, RecordStore};

    use super::*;

    fn service() -> AttendanceService {
        AttendanceService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
        )
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        format!("{date}T{time}").parse().unwrap()
    }

    #[actix_web::test]
    async fn not_checked_in_without_a_record() {
        let records = service().fetch_for_day(at("2024-05-06", "09:00:00").date()).await;
        assert!(records.is_empty());
        assert!(!is_checked_in(&records, 1, at("2024-05-06", "09:00:00").date()));
    }

    #[actix_web::test]
    async fn first_toggle_creates_a_single_open_record() {
        let service = service();
        let now = at("2024-05-06", "09:03:27");

        let outcome = service.toggle(7, now).await.unwrap();

        let ToggleOutcome::CheckedIn(record) = outcome else {
            panic!("expected check-in");
        };
        assert_eq!(record.employee, 7);
        assert_eq!(record.date, now.date());
        assert_eq!(record.check_in, at("2024-05-06", "09:03:00").time());
        assert!(record.check_out.is_none());
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.name, "7 - 2024-05-06");

        let records = service.fetch_for_day(now.date()).await;
        assert_eq!(records.len(), 1);
        assert!(is_checked_in(&records, 7, now.date()));
    }

    #[actix_web::test]
    async fn second_toggle_closes_the_same_record() {
        let service = service();
        let day = at("2024-05-06", "09:00:00");
        service.toggle(7, day).await.unwrap();

        let outcome = service.toggle(7, at("2024-05-06", "17:31:45")).await.unwrap();

        let ToggleOutcome::CheckedOut(record) = outcome else {
            panic!("expected check-out");
        };
        assert_eq!(record.check_out, Some(at("2024-05-06", "17:31:00").time()));

        let records = service.fetch_for_day(day.date()).await;
        assert_eq!(records.len(), 1);
        assert!(!is_checked_in(&records, 7, day.date()));
    }

    #[actix_web::test]
    async fn third_toggle_is_refused_without_touching_the_record() {
        let service = service();
        service.toggle(7, at("2024-05-06", "09:00:00")).await.unwrap();
        service.toggle(7, at("2024-05-06", "17:00:00")).await.unwrap();

        let outcome = service.toggle(7, at("2024-05-06", "18:00:00")).await.unwrap();

        assert!(matches!(outcome, ToggleOutcome::AlreadyCompleted));
        let records = service.fetch_for_day(at("2024-05-06", "18:00:00").date()).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].check_out, Some(at("2024-05-06", "17:00:00").time()));
    }

    /// Reads die at the transport level while writes would still land.
    struct ReadFailingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl RecordStore for ReadFailingStore {
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
            table: &str,
            records: Vec<Record>,
        ) -> Result<BatchOutcome, StoreError> {
            self.inner.create_records(table, records).await
        }

        async fn update_records(
            &self,
            table: &str,
            records: Vec<Record>,
        ) -> Result<BatchOutcome, StoreError> {
            self.inner.update_records(table, records).await
        }

        async fn delete_records(
            &self,
            table: &str,
            ids: Vec<i64>,
        ) -> Result<BatchOutcome, StoreError> {
            self.inner.delete_records(table, ids).await
        }
    }

    #[actix_web::test]
    async fn toggle_aborts_when_todays_records_cannot_be_read() {
        let store = Arc::new(ReadFailingStore {
            inner: MemoryStore::new(),
        });
        let seeded = match json!({
            "Name": "7 - 2024-05-06",
            "employee": 7,
            "date": "2024-05-06",
            "check_in": "09:00",
            "check_out": null,
            "status": "present",
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        store.inner.seed("attendance", seeded);
        let notifier = Arc::new(RecordingNotifier::new());
        let service = AttendanceService::new(store.clone(), notifier.clone());

        let result = service.toggle(7, at("2024-05-06", "14:00:00")).await;

        // A failed existence check must never fall through to a write:
        // the day already has an open record.
        assert!(result.is_err());
        assert_eq!(notifier.failure_count(), 1);
        let todays = store
            .inner
            .fetch_records("attendance", &FetchParams::default())
            .await
            .unwrap();
        assert_eq!(todays.len(), 1);
    }

    #[actix_web::test]
    async fn toggle_on_a_new_day_opens_a_fresh_record() {
        let service = service();
        service.toggle(7, at("2024-05-06", "09:00:00")).await.unwrap();
        service.toggle(7, at("2024-05-06", "17:00:00")).await.unwrap();

        let outcome = service.toggle(7, at("2024-05-07", "08:55:00")).await.unwrap();

        assert!(matches!(outcome, ToggleOutcome::CheckedIn(_)));
        let week = service.fetch_for_employee(7, None, None).await;
        assert_eq!(week.len(), 2);
    }

    #[test]
    fn week_window_starts_on_monday() {
        // 2024-05-08 is a Wednesday.
        let window = week_window("2024-05-08".parse().unwrap());
        assert_eq!(window[0], "2024-05-06".parse::<NaiveDate>().unwrap());
        assert_eq!(window[6], "2024-05-12".parse::<NaiveDate>().unwrap());
    }

    #[actix_web::test]
    async fn week_projection_matches_exact_days_only() {
        let service = service();
        service.toggle(7, at("2024-05-06", "09:00:00")).await.unwrap();
        service.toggle(7, at("2024-05-06", "17:30:00")).await.unwrap();
        service.toggle(7, at("2024-05-08", "08:45:00")).await.unwrap();
        // Out-of-window and other-employee records must not bleed in.
        service.toggle(7, at("2024-05-13", "09:00:00")).await.unwrap();
        service.toggle(9, at("2024-05-08", "09:00:00")).await.unwrap();

        let records = service.fetch_for_employee(7, None, None).await;
        let grid = project_week(&records, 7, "2024-05-08".parse().unwrap());

        assert_eq!(grid.len(), 7);
        assert_eq!(grid[0].check_in, Some(at("2024-05-06", "09:00:00").time()));
        assert_eq!(grid[0].check_out, Some(at("2024-05-06", "17:30:00").time()));
        assert_eq!(grid[2].check_in, Some(at("2024-05-08", "08:45:00").time()));
        assert!(grid[2].check_out.is_none());
        assert!(grid[1].check_in.is_none());
        assert!(grid[6].check_in.is_none());
    }
}
