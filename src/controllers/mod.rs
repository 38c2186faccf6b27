//! HTTP adapter: thin actix-web controllers translating requests into store
//! calls and store results into responses.

pub mod health;
pub mod note_blocks;
pub mod notes;
pub mod transfer;
pub mod workspaces;

use actix_web::HttpResponse;

use crate::store::StoreError;

/// Parse a numeric id out of a path segment. Non-numeric input is a client
/// error, surfaced before any store call.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, HttpResponse> {
    raw.parse().map_err(|_| {
        HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid {} ID", what)
        }))
    })
}

/// Map a store failure to the client-visible response: NotFound conditions
/// become 404s, everything else is an opaque 500 with the cause logged.
pub(crate) fn store_error_response(context: &str, err: &StoreError) -> HttpResponse {
    if err.is_not_found() {
        HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string()
        }))
    } else {
        log::error!("{}: {}", context, err);
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("{}: {}", context, err)
        }))
    }
}
