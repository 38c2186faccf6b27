//! Bulk import/export endpoints.

use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;

use super::store_error_response;
use crate::AppState;
use crate::models::ImportRequest;

/// Full-hierarchy JSON export, served as a downloadable file.
async fn export_data(data: web::Data<AppState>) -> impl Responder {
    match data.stores.workspace.export_all() {
        Ok(export) => HttpResponse::Ok()
            .insert_header((
                "Content-Disposition",
                format!(
                    "attachment; filename=todo-export-{}.json",
                    Utc::now().format("%Y-%m-%d-%H-%M-%S")
                ),
            ))
            .json(export),
        Err(e) => store_error_response("Failed to export data", &e),
    }
}

/// All-or-nothing bulk import; any failure rolls back the whole batch.
async fn import_data(data: web::Data<AppState>, body: web::Json<ImportRequest>) -> impl Responder {
    match data.stores.workspace.import_workspaces(body.into_inner().workspaces) {
        Ok(imported) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Data imported successfully",
            "imported_workspaces": imported.len(),
        })),
        Err(e) => store_error_response("Failed to import data", &e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v1/export").route(web::get().to(export_data)));
    cfg.service(web::resource("/api/v1/import").route(web::post().to(import_data)));
}
