//! Meeting Room Reservations
//!
//! A REST backend storing reservations as JSON documents in SQLite, plus the
//! client-side pieces (API client, list store, form validation, calendar views)
//! that talk to it.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use service::ReservationService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ReservationService,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Preflight handling; the handlers set the response CORS headers themselves.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let reservation_routes = Router::new()
        .route(
            "/reservations",
            get(api::list_reservations)
                .post(api::create_reservation)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/reservations/{id}",
            get(api::get_reservation)
                .put(api::update_reservation)
                .delete(api::delete_reservation)
                .fallback(api::method_not_allowed),
        );

    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health_check))
        .merge(reservation_routes)
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
