//! Note REST API, including the priority/completion filter endpoints.

use actix_web::{HttpResponse, Responder, web};

use super::{parse_id, store_error_response};
use crate::AppState;
use crate::models::{Note, Priority};

async fn list_notes(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let block_id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.list_by_block(block_id) {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => store_error_response("Failed to get notes", &e),
    }
}

async fn create_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Note>,
) -> impl Responder {
    let block_id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.create(body.into_inner(), block_id) {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => store_error_response("Failed to create note", &e),
    }
}

async fn get_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path, "note") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.get_by_id(id) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => store_error_response("Failed to get note", &e),
    }
}

async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Note>,
) -> impl Responder {
    let mut note = body.into_inner();
    // The path is authoritative for the id.
    note.id = match parse_id(&path, "note") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.update(note) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => store_error_response("Failed to update note", &e),
    }
}

async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path, "note") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.delete(id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to delete note", &e),
    }
}

/// Flip the completed flag, then return the updated note.
async fn toggle_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path, "note") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(e) = data.stores.note.toggle_completed(id) {
        return store_error_response("Failed to toggle note completion", &e);
    }

    match data.stores.note.get_by_id(id) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => store_error_response("Failed to get updated note", &e),
    }
}

async fn list_notes_by_priority(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (raw_id, raw_priority) = path.into_inner();
    let block_id = match parse_id(&raw_id, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let Some(priority) = Priority::from_str(&raw_priority) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid priority: {}", raw_priority)
        }));
    };

    match data.stores.note.list_by_priority(block_id, priority) {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => store_error_response("Failed to get notes by priority", &e),
    }
}

async fn list_completed_notes(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let block_id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.list_completed(block_id) {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => store_error_response("Failed to get completed notes", &e),
    }
}

async fn list_pending_notes(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let block_id = match parse_id(&path, "note block") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.stores.note.list_pending(block_id) {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => store_error_response("Failed to get pending notes", &e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/noteblocks/{note_block_id}/notes")
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    );
    cfg.service(
        web::resource("/api/v1/noteblocks/{note_block_id}/notes/priority/{priority}")
            .route(web::get().to(list_notes_by_priority)),
    );
    cfg.service(
        web::resource("/api/v1/noteblocks/{note_block_id}/notes/completed")
            .route(web::get().to(list_completed_notes)),
    );
    cfg.service(
        web::resource("/api/v1/noteblocks/{note_block_id}/notes/pending")
            .route(web::get().to(list_pending_notes)),
    );
    cfg.service(
        web::resource("/api/v1/notes/{id}")
            .route(web::get().to(get_note))
            .route(web::put().to(update_note))
            .route(web::delete().to(delete_note)),
    );
    cfg.service(web::resource("/api/v1/notes/{id}/toggle").route(web::patch().to(toggle_note)));
}
