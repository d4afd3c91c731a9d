//! Reservation handlers: create, read-one, read-all, update, delete.

use axum::http::StatusCode;

use super::HandlerResponse;
use crate::errors::{AppError, ErrorBody};
use crate::models::{DeleteResponse, ReservationPatch};
use crate::service::ReservationService;

const LIST_FAILED: &str = "An error occurred while fetching reservations";
const GET_FAILED: &str = "An error occurred while fetching the reservation";
const CREATE_FAILED: &str = "An error occurred while creating the reservation";
const UPDATE_FAILED: &str = "An error occurred while updating the reservation";
const DELETE_FAILED: &str = "An error occurred while deleting the reservation";

/// GET /reservations - List all reservations.
pub async fn list_reservations(service: &ReservationService) -> HandlerResponse {
    match service.list_all().await {
        Ok(reservations) => HandlerResponse::json(StatusCode::OK, &reservations),
        Err(e) => failure(LIST_FAILED, e),
    }
}

/// GET /reservations/:id - Get a single reservation.
pub async fn get_reservation(service: &ReservationService, id: &str) -> HandlerResponse {
    match service.get_by_id(id).await {
        Ok(Some(reservation)) => HandlerResponse::json(StatusCode::OK, &reservation),
        Ok(None) => rejection(AppError::reservation_not_found(id)),
        Err(e) => failure(GET_FAILED, e),
    }
}

/// POST /reservations - Create a new reservation.
pub async fn create_reservation(service: &ReservationService, body: &[u8]) -> HandlerResponse {
    let data = match ReservationPatch::from_body(body) {
        Ok(data) => data,
        Err(e) => return failure(CREATE_FAILED, e),
    };

    if let Some(field) = data.first_missing_field() {
        return rejection(AppError::MissingField(field.to_string()));
    }

    match service.create(data).await {
        Ok(reservation) => HandlerResponse::json(StatusCode::CREATED, &reservation),
        Err(e) => failure(CREATE_FAILED, e),
    }
}

/// PUT /reservations/:id - Merge fields into an existing reservation.
pub async fn update_reservation(
    service: &ReservationService,
    id: &str,
    body: &[u8],
) -> HandlerResponse {
    let data = match ReservationPatch::from_body(body) {
        Ok(data) => data,
        Err(e) => return failure(UPDATE_FAILED, e),
    };

    if let Some(field) = data.first_missing_field() {
        return rejection(AppError::MissingField(field.to_string()));
    }

    match service.get_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return rejection(AppError::reservation_not_found(id)),
        Err(e) => return failure(UPDATE_FAILED, e),
    }

    // A delete landing between the check above and this call surfaces as a 500.
    match service.update(id, data).await {
        Ok(reservation) => HandlerResponse::json(StatusCode::OK, &reservation),
        Err(e) => failure(UPDATE_FAILED, e),
    }
}

/// DELETE /reservations/:id - Delete a reservation.
pub async fn delete_reservation(service: &ReservationService, id: &str) -> HandlerResponse {
    match service.get_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return rejection(AppError::reservation_not_found(id)),
        Err(e) => return failure(DELETE_FAILED, e),
    }

    match service.delete(id).await {
        Ok(confirmation) => HandlerResponse::json(
            StatusCode::OK,
            &DeleteResponse {
                message: format!("Reservation {} was deleted", confirmation.id),
                id: confirmation.id,
            },
        ),
        Err(e) => failure(DELETE_FAILED, e),
    }
}

/// 400/404: the message names the field or id.
fn rejection(err: AppError) -> HandlerResponse {
    tracing::debug!("Rejected request: {}", err);
    HandlerResponse::error(err.status_code(), ErrorBody::new(err.message()))
}

/// 500: generic message plus the underlying error text.
fn failure(message: &str, err: AppError) -> HandlerResponse {
    tracing::error!("{}: {}", message, err);
    HandlerResponse::error(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::with_cause(message, &err),
    )
}
