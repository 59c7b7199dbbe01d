use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::EmployeeStatus;
use crate::service::{AttendanceService, DepartmentService, EmployeeService};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 3)]
    pub total_employees: usize,
    #[schema(example = 3)]
    pub active_employees: usize,
    #[schema(example = 6)]
    pub departments: usize,
    #[schema(example = 3)]
    pub present_today: usize,
    #[schema(example = 1)]
    pub checked_in_now: usize,
}

/// Dashboard stats panel
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses(
        (status = 200, description = "Headline counts for the dashboard", body = DashboardStats)
    ),
    tag = "Dashboard"
)]
pub async fn stats(
    employees: web::Data<EmployeeService>,
    departments: web::Data<DepartmentService>,
    attendance: web::Data<AttendanceService>,
) -> impl Responder {
    let today = Local::now().date_naive();
    let (employees, departments, today_records) = futures::join!(
        employees.fetch_all(Vec::new()),
        departments.fetch_all(Vec::new()),
        attendance.fetch_for_day(today),
    );

    HttpResponse::Ok().json(DashboardStats {
        total_employees: employees.len(),
        active_employees: employees
            .iter()
            .filter(|e| e.status == EmployeeStatus::Active)
            .count(),
        departments: departments.len(),
        present_today: today_records.len(),
        checked_in_now: today_records
            .iter()
            .filter(|r| r.check_out.is_none())
            .count(),
    })
}
