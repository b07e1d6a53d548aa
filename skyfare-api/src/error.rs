use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skyfare_booking::BookingError;
use skyfare_inventory::StoreError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ForbiddenError(String),
    NotFoundError(String),
    ConflictError(String),
    UnprocessableError(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ForbiddenError(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            ApiError::UnprocessableError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::InternalServerError(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InsufficientInventory { .. }
            | BookingError::ReservationConflict { .. } => ApiError::ConflictError(err.to_string()),
            BookingError::NotOwner => ApiError::ForbiddenError(err.to_string()),
            BookingError::InvalidState { .. }
            | BookingError::FlightNotBookable { .. }
            | BookingError::EmptyGroup
            | BookingError::Schedule(_) => ApiError::UnprocessableError(err.to_string()),
            BookingError::FlightNotFound(_) => ApiError::NotFoundError(err.to_string()),
            BookingError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TicketNotFound(_)
            | StoreError::FlightNotFound(_)
            | StoreError::SeatNotFound { .. }
            | StoreError::NoSuchClass { .. } => ApiError::NotFoundError(err.to_string()),
            StoreError::InventoryExists(_) | StoreError::FlightExists(_) => {
                ApiError::ConflictError(err.to_string())
            }
            // The booking components consume version conflicts; one leaking
            // this far is an engine bug, not a client error.
            StoreError::VersionConflict { .. } => {
                ApiError::InternalServerError(anyhow::anyhow!(err))
            }
        }
    }
}
