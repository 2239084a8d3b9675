use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Image host failure: {0}")]
    ImageHost(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TourResult<T> = Result<T, TourError>;

impl TourError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        TourError::NotFound(format!("{entity} {id} not found"))
    }
}

/// Convert TourError to AppError for standardized error responses
impl From<TourError> for AppError {
    fn from(err: TourError) -> Self {
        match err {
            TourError::NotFound(msg) => AppError::NotFound(msg),
            TourError::Validation(msg) => AppError::BadRequest(msg),
            TourError::Conflict(msg) => AppError::Conflict(msg),
            TourError::ImageHost(msg) => AppError::BadGateway(msg),
            TourError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TourError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for TourError {
    fn from(err: mongodb::error::Error) -> Self {
        TourError::Database(err.to_string())
    }
}

impl From<media::MediaError> for TourError {
    fn from(err: media::MediaError) -> Self {
        TourError::ImageHost(err.to_string())
    }
}
