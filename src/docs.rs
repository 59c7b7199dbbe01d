use crate::api::attendance::{ToggleRequest, WeekResponse};
use crate::api::dashboard::DashboardStats;
use crate::model::attendance::{AttendancePatch, AttendanceRecord, AttendanceStatus};
use crate::model::department::{Department, DepartmentPatch};
use crate::model::employee::{Employee, EmployeePatch, EmployeeStatus};
use crate::service::attendance::DayCell;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StaffHub API",
        version = "1.0.0",
        description = r#"
## StaffHub

Backend for a small employee-management dashboard.

### Key Features
- **Employee Management** — create, update, list, and view employee profiles
- **Department Catalog** — simple lookup table of department labels
- **Attendance Tracking** — one-tap daily check-in/out with a weekly grid
- **Dashboard** — headline counts for the analytics panel

### Persistence
All records live in an external hosted record store; this service is a
thin, allow-listed pass-through to it. Demo mode swaps in a seeded
in-memory store.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::attendance::list_attendance,
        crate::api::attendance::today_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::toggle_attendance,
        crate::api::attendance::week_attendance,

        crate::api::dashboard::stats
    ),
    components(
        schemas(
            Employee,
            EmployeePatch,
            EmployeeStatus,
            Department,
            DepartmentPatch,
            AttendanceRecord,
            AttendancePatch,
            AttendanceStatus,
            ToggleRequest,
            WeekResponse,
            DayCell,
            DashboardStats
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department catalog APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Dashboard", description = "Dashboard stats APIs"),
    )
)]
pub struct ApiDoc;
