use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::json;

use crate::model::department::{Department, DepartmentPatch};
use crate::service::DepartmentService;

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Department catalog (empty on store failure)", body = [Department])
    ),
    tag = "Department"
)]
pub async fn list_departments(service: web::Data<DepartmentService>) -> impl Responder {
    HttpResponse::Ok().json(service.fetch_all(Vec::new()).await)
}

/// Get department by id
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id", Path, description = "Department id")),
    responses(
        (status = 200, description = "Department found", body = Department),
        (status = 404, description = "Department not found")
    ),
    tag = "Department"
)]
pub async fn get_department(
    service: web::Data<DepartmentService>,
    path: web::Path<i64>,
) -> impl Responder {
    match service.get_by_id(path.into_inner()).await {
        Some(department) => HttpResponse::Ok().json(department),
        None => HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })),
    }
}

/// Create department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = DepartmentPatch,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 422, description = "Record rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn create_department(
    service: web::Data<DepartmentService>,
    payload: web::Json<DepartmentPatch>,
) -> actix_web::Result<impl Responder> {
    match service.create(payload.into_inner()).await {
        Ok(Some(department)) => Ok(HttpResponse::Created().json(department)),
        Ok(None) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to create department"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

/// Update department
#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    params(("id", Path, description = "Department id")),
    request_body = DepartmentPatch,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 422, description = "Record rejected by the store"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn update_department(
    service: web::Data<DepartmentService>,
    path: web::Path<i64>,
    payload: web::Json<DepartmentPatch>,
) -> actix_web::Result<impl Responder> {
    match service.update(path.into_inner(), payload.into_inner()).await {
        Ok(Some(department)) => Ok(HttpResponse::Ok().json(department)),
        Ok(None) => Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "Failed to update department"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}

/// Delete department
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    params(("id", Path, description = "Department id")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn delete_department(
    service: web::Data<DepartmentService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    match service.delete(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({
            "message": "Successfully deleted"
        }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        }))),
        Err(_) => Err(ErrorInternalServerError("Internal Server Error")),
    }
}
