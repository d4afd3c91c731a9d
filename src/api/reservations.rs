//! Reservation API endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
};

use crate::handlers::{self, handle, HandlerRequest, HandlerResponse, Route};
use crate::AppState;

type IdPath = Result<Path<String>, PathRejection>;

/// The decoded path id. An id that fails to decode matches no route.
fn path_id(path: IdPath) -> Result<String, HandlerResponse> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Rejected path id: {}", rejection);
            Err(handlers::route_not_found())
        }
    }
}

/// GET /reservations - List all reservations.
pub async fn list_reservations(State(state): State<AppState>) -> HandlerResponse {
    handle(
        &state.service,
        Route::ListReservations,
        HandlerRequest::default(),
    )
    .await
}

/// GET /reservations/:id - Get a single reservation.
pub async fn get_reservation(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<HandlerResponse, HandlerResponse> {
    let request = HandlerRequest::with_id(path_id(path)?);
    Ok(handle(&state.service, Route::GetReservation, request).await)
}

/// POST /reservations - Create a new reservation.
pub async fn create_reservation(State(state): State<AppState>, body: Bytes) -> HandlerResponse {
    let request = HandlerRequest::default().with_body(body);
    handle(&state.service, Route::CreateReservation, request).await
}

/// PUT /reservations/:id - Update a reservation.
pub async fn update_reservation(
    State(state): State<AppState>,
    path: IdPath,
    body: Bytes,
) -> Result<HandlerResponse, HandlerResponse> {
    let request = HandlerRequest::with_id(path_id(path)?).with_body(body);
    Ok(handle(&state.service, Route::UpdateReservation, request).await)
}

/// DELETE /reservations/:id - Delete a reservation.
pub async fn delete_reservation(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<HandlerResponse, HandlerResponse> {
    let request = HandlerRequest::with_id(path_id(path)?);
    Ok(handle(&state.service, Route::DeleteReservation, request).await)
}
