//! Transport-independent request handlers.
//!
//! A handler takes a normalized [`HandlerRequest`] and produces a normalized
//! [`HandlerResponse`] (status, headers, JSON body). The axum routes in
//! [`crate::api`] and the standalone [`invoke`] entry point both go through
//! [`handle`], so a request behaves the same either way.

mod reservations;

pub use reservations::*;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ErrorBody;
use crate::service::ReservationService;

/// Normalized inbound request: the path id (if the route has one) and the raw body.
#[derive(Debug, Clone, Default)]
pub struct HandlerRequest {
    pub id: Option<String>,
    pub body: Bytes,
}

impl HandlerRequest {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            body: Bytes::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Normalized response envelope.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl HandlerResponse {
    /// JSON response carrying the standard header set.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self {
                status,
                headers: response_headers(),
                body,
            },
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                Self::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "Failed to serialize response".to_string(),
                        error: Some(e.to_string()),
                    },
                )
            }
        }
    }

    /// Error response with a `{message, error?}` body.
    pub fn error(status: StatusCode, body: ErrorBody) -> Self {
        let body = serde_json::json!(body);
        Self {
            status,
            headers: response_headers(),
            body,
        }
    }
}

/// Header set carried by every handler response.
pub fn response_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers
}

/// One handler per reservation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListReservations,
    GetReservation,
    CreateReservation,
    UpdateReservation,
    DeleteReservation,
}

/// Why a request did not match any route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMiss {
    /// No pattern matches the path.
    NotFound,
    /// A pattern matches the path but not with this method.
    MethodNotAllowed,
}

/// The route table: (method, path pattern) → handler.
pub const ROUTES: [(Method, &str, Route); 5] = [
    (Method::GET, "/reservations", Route::ListReservations),
    (Method::POST, "/reservations", Route::CreateReservation),
    (Method::GET, "/reservations/{id}", Route::GetReservation),
    (Method::PUT, "/reservations/{id}", Route::UpdateReservation),
    (Method::DELETE, "/reservations/{id}", Route::DeleteReservation),
];

impl Route {
    /// Find the route for a method and path, returning the captured id if any.
    ///
    /// The id is percent-decoded. One that does not decode to UTF-8 is `NotFound`.
    pub fn resolve(method: &Method, path: &str) -> Result<(Route, Option<String>), RouteMiss> {
        let path = path.split('?').next().unwrap_or_default();
        let mut path_matched = false;

        for (route_method, pattern, route) in ROUTES {
            if let Some(id) = match_pattern(pattern, path) {
                if &route_method == method {
                    let id = id
                        .map(|raw| decode_segment(&raw).ok_or(RouteMiss::NotFound))
                        .transpose()?;
                    return Ok((route, id));
                }
                path_matched = true;
            }
        }

        if path_matched {
            Err(RouteMiss::MethodNotAllowed)
        } else {
            Err(RouteMiss::NotFound)
        }
    }
}

/// Percent-decode a captured segment the way axum's `Path` extractor does.
fn decode_segment(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Match `path` against a pattern whose `{..}` segment captures one non-empty value.
fn match_pattern(pattern: &str, path: &str) -> Option<Option<String>> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut captured = None;
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        if expected.starts_with('{') && expected.ends_with('}') {
            if actual.is_empty() {
                return None;
            }
            captured = Some(actual.to_string());
        } else if expected != actual {
            return None;
        }
    }
    Some(captured)
}

/// Run the handler for `route`.
pub async fn handle(
    service: &ReservationService,
    route: Route,
    request: HandlerRequest,
) -> HandlerResponse {
    let id = request.id.as_deref().unwrap_or_default();

    match route {
        Route::ListReservations => list_reservations(service).await,
        Route::GetReservation => get_reservation(service, id).await,
        Route::CreateReservation => create_reservation(service, &request.body).await,
        Route::UpdateReservation => update_reservation(service, id, &request.body).await,
        Route::DeleteReservation => delete_reservation(service, id).await,
    }
}

/// Resolve and run a request without any web server in between.
pub async fn invoke(
    service: &ReservationService,
    method: &Method,
    path: &str,
    body: impl Into<Bytes>,
) -> HandlerResponse {
    match Route::resolve(method, path) {
        Ok((route, id)) => {
            let request = HandlerRequest {
                id,
                body: body.into(),
            };
            handle(service, route, request).await
        }
        Err(RouteMiss::NotFound) => route_not_found(),
        Err(RouteMiss::MethodNotAllowed) => method_not_allowed(),
    }
}

pub fn route_not_found() -> HandlerResponse {
    HandlerResponse::error(StatusCode::NOT_FOUND, ErrorBody::new("Route not found"))
}

pub fn method_not_allowed() -> HandlerResponse {
    HandlerResponse::error(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorBody::new("Method not allowed"),
    )
}
