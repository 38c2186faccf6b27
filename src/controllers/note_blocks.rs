//! Note block REST API.

use actix_web::{HttpResponse, Responder, web};

use super::{parse_id, store_error_response};
use crate::AppState;
use crate::models::NoteBlock;

async fn list_note_blocks(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let workspace_id = path.into_inner();

    match data.stores.note_block.list_by_workspace(&workspace_id) {
        Ok(blocks) => HttpResponse::Ok().json(blocks),
        Err(e) => store_error_response("Failed to get note blocks", &e),
    }
}

async fn create_note_block(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NoteBlock>,
) -> impl Responder {
    let workspace_id = path.into_inner();

    match data.stores.note_block.create(body.into_inner(), &workspace_id) {
        Ok(block) => HttpResponse::Created().json(block),
        Err(e) => store_error_response("Failed to create note block", &e),
    }
}

async fn get_note_block(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note_block.get_by_id(id) {
        Ok(block) => HttpResponse::Ok().json(block),
        Err(e) => store_error_response("Failed to get note block", &e),
    }
}

async fn update_note_block(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NoteBlock>,
) -> impl Responder {
    let mut block = body.into_inner();
    // The path is authoritative for the id.
    block.id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note_block.update(block) {
        Ok(block) => HttpResponse::Ok().json(block),
        Err(e) => store_error_response("Failed to update note block", &e),
    }
}

async fn delete_note_block(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note_block.delete(id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to delete note block", &e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/workspaces/{workspace_id}/noteblocks")
            .route(web::get().to(list_note_blocks))
            .route(web::post().to(create_note_block)),
    );
    cfg.service(
        web::resource("/api/v1/noteblocks/{id}")
            .route(web::get().to(get_note_block))
            .route(web::put().to(update_note_block))
            .route(web::delete().to(delete_note_block)),
    );
}
