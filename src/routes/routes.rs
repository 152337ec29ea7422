//! Defines routes for the book content API.
//!
//! ## Structure
//! - `GET /healthz` -> liveness probe
//! - `GET /get-book-content?fileName=<key>` -> stream a book from the object store

use crate::{
    handlers::{book_handlers::get_book_content, health_handlers::healthz},
    services::book_store::BookStore,
};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Build and return the router for the book content API.
///
/// The router carries the shared store handle (`Arc<dyn BookStore>`) to all
/// handlers, so tests can swap in a stub store with `with_state`.
pub fn routes() -> Router<Arc<dyn BookStore>> {
    Router::new()
        // health endpoint (mounted at root)
        .route("/healthz", get(healthz))
        // book content delivery
        .route("/get-book-content", get(get_book_content))
}
