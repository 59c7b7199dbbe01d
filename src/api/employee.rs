use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::model::employee::{Employee, EmployeePatch};
use crate::service::EmployeeService;
use crate::store::WhereClause;

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeQuery {
    /// Filter by status ("active" / "inactive").
    pub status: Option<String>,
    /// Filter by department label.
    pub department: Option<String>,
}

impl EmployeeQuery {
    fn filters(&self) -> Vec<WhereClause> {
        let mut filters = Vec::new();
        if let Some(status) = &self.status {
            filters.push(WhereClause::eq("status", status.clone()));
        }
        if let Some(department) = &self.department {
            filters.push(WhereClause::eq("department", department.clone()));
        }
        filters
    }
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employee list (empty on store failure)", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    service: web::Data<EmployeeService>,
    query: web::Query<EmployeeQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(service.fetch_all(query.filters()).await)
}

/// Get employee by id
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id", Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<i64>,
) -> impl Responder {
    match service.get_by_id(path.into_inner()).await {
        Some(employee) => HttpResponse::Ok().json(employee),
        None => HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })),
    }
}

/// Create employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeePatch,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 422, description = "Record rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    service: web::Data<EmployeeService>,
    payload: web::Json<EmployeePatch>,
) -> actix_web::Result<impl Responder> {
    match service.create(payload.into_inner()).await {
        Ok(Some(employee)) => Ok(HttpResponse::Created().json(employee)),
        Ok(None) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to create employee"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

/// Update employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id", Path, description = "Employee id")),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 422, description = "Record rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<i64>,
    payload: web::Json<EmployeePatch>,
) -> actix_web::Result<impl Responder> {
    match service.update(path.into_inner(), payload.into_inner()).await {
        Ok(Some(employee)) => Ok(HttpResponse::Ok().json(employee)),
        Ok(None) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to update employee"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id", Path, description = "Employee id")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match service.delete(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({
            "message": "Successfully deleted"
        }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}
