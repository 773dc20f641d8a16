use std::{io, path::Path, sync::Arc};

use axum::{http::StatusCode, routing::get_service, Router};
use deadpool::managed::Pool;
use diesel_async::{pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection};
use tower_http::services::ServeDir;

pub mod api;
pub mod auth;
pub mod clubs;
pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod identity;
pub mod models;
pub mod policy;
pub mod portal;
pub mod schema;
pub mod seed;
pub mod store;

pub use error::Error;
pub use portal::Portal;

pub type DbPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// The portal as handlers see it, installed with an `Extension` layer.
pub type SharedPortal = Arc<Portal>;

pub fn connect_to_db(db_url: &str) -> anyhow::Result<DbPool> {
    let db_config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
    Pool::builder(db_config)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build database pool: {e}"))
}

/// All routes. The caller layers `Extension(SharedPortal)` on top.
pub fn app(assets_dir: impl AsRef<Path>) -> Router {
    let serve = get_service(ServeDir::new(assets_dir)).handle_error(handle_error);
    Router::new()
        .nest("/api", api::app())
        .nest("/assets", serve)
}

async fn handle_error(_: io::Error) -> error::AppError {
    error::AppError::from(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch asset")
}
