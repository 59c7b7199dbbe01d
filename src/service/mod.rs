pub mod adapter;
pub mod attendance;
pub mod department;
pub mod employee;

pub use attendance::AttendanceService;
pub use department::DepartmentService;
pub use employee::EmployeeService;
