//! Workspace REST API.

use actix_web::{HttpResponse, Responder, web};

use super::store_error_response;
use crate::AppState;
use crate::models::Workspace;

async fn list_workspaces(data: web::Data<AppState>) -> impl Responder {
    match data.stores.workspace.list_all() {
        Ok(workspaces) => HttpResponse::Ok().json(workspaces),
        Err(e) => store_error_response("Failed to get workspaces", &e),
    }
}

async fn create_workspace(
    data: web::Data<AppState>,
    body: web::Json<Workspace>,
) -> impl Responder {
    match data.stores.workspace.create(body.into_inner()) {
        Ok(workspace) => HttpResponse::Created().json(workspace),
        Err(e) => store_error_response("Failed to create workspace", &e),
    }
}

async fn get_workspace(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match data.stores.workspace.get_by_id(&id) {
        Ok(workspace) => HttpResponse::Ok().json(workspace),
        Err(e) => store_error_response("Failed to get workspace", &e),
    }
}

async fn get_workspace_full(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match data.stores.workspace.get_with_full_hierarchy(&id) {
        Ok(workspace) => HttpResponse::Ok().json(workspace),
        Err(e) => store_error_response("Failed to get workspace", &e),
    }
}

async fn update_workspace(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Workspace>,
) -> impl Responder {
    let mut workspace = body.into_inner();
    // The path is authoritative for the id.
    workspace.id = path.into_inner();

    match data.stores.workspace.update(workspace) {
        Ok(workspace) => HttpResponse::Ok().json(workspace),
        Err(e) => store_error_response("Failed to update workspace", &e),
    }
}

async fn delete_workspace(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match data.stores.workspace.delete(&id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to delete workspace", &e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/workspaces")
            .route(web::get().to(list_workspaces))
            .route(web::post().to(create_workspace)),
    );
    cfg.service(
        web::resource("/api/v1/workspaces/{id}")
            .route(web::get().to(get_workspace))
            .route(web::put().to(update_workspace))
            .route(web::delete().to(delete_workspace)),
    );
    cfg.service(web::resource("/api/v1/workspaces/{id}/full").route(web::get().to(get_workspace_full)));
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::AppState;
    use crate::store::test_support::memory_stores;

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        stores: memory_stores(),
                    }))
                    .configure(super::config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_then_get_round_trip() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/v1/workspaces")
            .set_json(serde_json::json!({"id": "w1", "name": "Home"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let req = test::TestRequest::get().uri("/api/v1/workspaces/w1").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], "w1");
        assert_eq!(body["name"], "Home");
        assert_eq!(body["data"]["appConfig"]["title"], "Simple Todo App");
    }

    #[actix_web::test]
    async fn get_unknown_workspace_is_404() {
        let app = test_app!();

        let req = test::TestRequest::get().uri("/api/v1/workspaces/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn update_forces_id_from_path() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/v1/workspaces")
            .set_json(serde_json::json!({"id": "w1", "name": "Home"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::put()
            .uri("/api/v1/workspaces/w1")
            .set_json(serde_json::json!({"id": "other", "name": "Renamed"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], "w1");
        assert_eq!(body["name"], "Renamed");
    }

    #[actix_web::test]
    async fn delete_returns_204_then_404() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/v1/workspaces")
            .set_json(serde_json::json!({"id": "w1", "name": "Home"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::delete().uri("/api/v1/workspaces/w1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::delete().uri("/api/v1/workspaces/w1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
