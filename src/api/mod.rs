//! HTTP entry layer.
//!
//! Thin axum bindings that turn an HTTP request into a [`HandlerRequest`] and the
//! resulting [`HandlerResponse`] back into an HTTP response.

mod reservations;

pub use reservations::*;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::handlers::{self, HandlerResponse};

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.body)).into_response()
    }
}

/// GET / - Service banner.
pub async fn index() -> Json<Value> {
    Json(json!({ "message": "Meeting room reservation API server" }))
}

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Fallback for paths no route matches.
pub async fn not_found() -> HandlerResponse {
    handlers::route_not_found()
}

/// Fallback for a known path requested with an unsupported method.
pub async fn method_not_allowed() -> HandlerResponse {
    handlers::method_not_allowed()
}
