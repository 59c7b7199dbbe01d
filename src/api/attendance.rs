use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::{AttendancePatch, AttendanceRecord};
use crate::service::AttendanceService;
use crate::service::attendance::{DayCell, ToggleOutcome, project_week, week_window};
use crate::store::{Operator, WhereClause};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Restrict to one employee.
    pub employee: Option<i64>,
    /// Earliest date (inclusive), ISO format.
    pub start: Option<NaiveDate>,
    /// Latest date (inclusive), ISO format.
    pub end: Option<NaiveDate>,
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records (empty on store failure)", body = [AttendanceRecord])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<AttendanceService>,
    query: web::Query<AttendanceQuery>,
) -> impl Responder {
    let records = match query.employee {
        Some(employee) => {
            service
                .fetch_for_employee(employee, query.start, query.end)
                .await
        }
        None => {
            let mut filters = Vec::new();
            if let Some(start) = query.start {
                filters.push(WhereClause::new(
                    "date",
                    Operator::GreaterThanOrEqualTo,
                    start.to_string(),
                ));
            }
            if let Some(end) = query.end {
                filters.push(WhereClause::new(
                    "date",
                    Operator::LessThanOrEqualTo,
                    end.to_string(),
                ));
            }
            service.fetch_all(filters).await
        }
    };
    HttpResponse::Ok().json(records)
}

/// Today's attendance
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Records for the current day", body = [AttendanceRecord])
    ),
    tag = "Attendance"
)]
pub async fn today_attendance(service: web::Data<AttendanceService>) -> impl Responder {
    let today = Local::now().date_naive();
    HttpResponse::Ok().json(service.fetch_for_day(today).await)
}

/// Get attendance record by id
#[utoipa::path(
    get,
    path = "/api/v1/attendance/{id}",
    params(("id", Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Record found", body = AttendanceRecord),
        (status = 404, description = "Record not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<i64>,
) -> impl Responder {
    match service.get_by_id(path.into_inner()).await {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound().json(json!({
            "message": "Attendance record not found"
        })),
    }
}

/// Create attendance record
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = AttendancePatch,
    responses(
        (status = 201, description = "Record created", body = AttendanceRecord),
        (status = 422, description = "Record rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    service: web::Data<AttendanceService>,
    payload: web::Json<AttendancePatch>,
) -> actix_web::Result<impl Responder> {
    match service.create(payload.into_inner()).await {
        Ok(Some(record)) => Ok(HttpResponse::Created().json(record)),
        Ok(None) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to create attendance record"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

/// Update attendance record
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}",
    params(("id", Path, description = "Attendance record id")),
    request_body = AttendancePatch,
    responses(
        (status = 200, description = "Record updated", body = AttendanceRecord),
        (status = 422, description = "Record rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<i64>,
    payload: web::Json<AttendancePatch>,
) -> actix_web::Result<impl Responder> {
    match service.update(path.into_inner(), payload.into_inner()).await {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(record)),
        Ok(None) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to update attendance record"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

/// Delete attendance record
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{id}",
    params(("id", Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match service.delete(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({
            "message": "Successfully deleted"
        }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Attendance record not found"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleRequest {
    pub employee: i64,
}

/// Toggle check-in/out for today
#[utoipa::path(
    post,
    path = "/api/v1/attendance/toggle",
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Checked in or out", body = AttendanceRecord),
        (status = 409, description = "Already checked out today"),
        (status = 422, description = "Write rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn toggle_attendance(
    service: web::Data<AttendanceService>,
    payload: web::Json<ToggleRequest>,
) -> actix_web::Result<impl Responder> {
    let now = Local::now().naive_local();
    match service.toggle(payload.employee, now).await {
        Ok(ToggleOutcome::CheckedIn(record)) => Ok(HttpResponse::Ok().json(json!({
            "message": "Checked in successfully",
            "record": record
        }))),
        Ok(ToggleOutcome::CheckedOut(record)) => Ok(HttpResponse::Ok().json(json!({
            "message": "Checked out successfully",
            "record": record
        }))),
        Ok(ToggleOutcome::AlreadyCompleted) => Ok(HttpResponse::Conflict().json(json!({
            "message": "Already checked out today"
        }))),
        Ok(ToggleOutcome::Rejected) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to record attendance"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WeekQuery {
    /// Any date inside the wanted week; defaults to today.
    pub anchor: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeekResponse {
    pub employee: i64,
    pub days: Vec<DayCell>,
}

/// Weekly attendance grid for one employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/{employee_id}/week",
    params(
        ("employee_id", Path, description = "Employee id"),
        WeekQuery
    ),
    responses(
        (status = 200, description = "Seven day grid, Monday first", body = WeekResponse)
    ),
    tag = "Attendance"
)]
pub async fn week_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<i64>,
    query: web::Query<WeekQuery>,
) -> impl Responder {
    let employee = path.into_inner();
    let anchor = query.anchor.unwrap_or_else(|| Local::now().date_naive());
    let window = week_window(anchor);
    let records = service
        .fetch_for_employee(employee, Some(window[0]), Some(window[6]))
        .await;
    HttpResponse::Ok().json(WeekResponse {
        employee,
        days: project_week(&records, employee, anchor),
    })
}
