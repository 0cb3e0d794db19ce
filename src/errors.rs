use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use registry::model::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Boundary error, the only place domain failures are turned into status codes
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Not found")]
    NotFound,

    #[error("Request worker was cancelled: {0}")]
    Blocking(#[from] BlockingError),
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    error: String,
    message: String,
}

impl ApiError {
    /// Read and update paths answer 404 for any failure
    pub fn into_not_found(self) -> ApiError {
        log::info!("Answering 404 for: {}", self);

        ApiError::NotFound
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::InvalidNumericInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::NotFound(_)) | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Domain(DomainError::Store(_)) | ApiError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Not found carries no body
        if status == StatusCode::NOT_FOUND {
            return HttpResponse::NotFound().finish();
        }

        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let body = ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.to_string(),
        };

        HttpResponse::build(status).json(body)
    }
}

/// Unwraps the result of a `web::block` call
pub fn flatten<T>(result: Result<Result<T, DomainError>, BlockingError>) -> Result<T, ApiError> {
    Ok(result??)
}
