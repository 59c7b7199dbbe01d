use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};

mod api;
mod config;
mod docs;
mod model;
mod notify;
mod routes;
mod service;
mod store;

use config::{Config, StoreMode};
use notify::{LogNotifier, Notifier};
use service::{AttendanceService, DepartmentService, EmployeeService};
use store::{HostedStore, MemoryStore, RecordStore};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "StaffHub"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn RecordStore> = match config.store_mode {
        StoreMode::Hosted => Arc::new(HostedStore::new(
            &config.store_base_url,
            &config.store_project_id,
            &config.store_public_key,
        )),
        StoreMode::Demo => {
            info!("Demo mode: using seeded in-memory store");
            Arc::new(MemoryStore::demo())
        }
    };
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let employees = Data::new(EmployeeService::new(store.clone(), notifier.clone()));
    let departments = Data::new(DepartmentService::new(store.clone(), notifier.clone()));
    let attendance = Data::new(AttendanceService::new(store.clone(), notifier.clone()));

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(employees.clone())
            .app_data(departments.clone())
            .app_data(attendance.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
