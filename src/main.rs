use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod models;
mod store;

use db::Database;
use store::Stores;

/// Shared application state handed to every request handler.
pub struct AppState {
    pub stores: Stores,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = config::database_url();
    let db = Database::new(&database_url)
        .map_err(|e| std::io::Error::other(format!("failed to initialize database: {e}")))?;
    let db = Arc::new(db);

    let port = config::port();
    log::info!("Starting server on port {} (database: {})", port, database_url);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                stores: Stores::new(Arc::clone(&db)),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::workspaces::config)
            .configure(controllers::note_blocks::config)
            .configure(controllers::notes::config)
            .configure(controllers::transfer::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
