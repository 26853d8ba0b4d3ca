use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Not authorized to access this order")]
    Forbidden,

    #[error("Invalid coupon code")]
    InvalidCoupon,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Conflict: the resource changed since it was read")]
    Conflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::InvalidCoupon => AppError::InvalidCoupon,
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Conflict => AppError::Conflict,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });
        match self {
            AppError::Unauthorized => HttpResponse::Unauthorized().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::Forbidden => HttpResponse::Forbidden().json(body),
            AppError::InvalidCoupon => HttpResponse::BadRequest().json(body),
            AppError::Validation(_) => HttpResponse::UnprocessableEntity().json(body),
            AppError::Conflict => HttpResponse::Conflict().json(body),
            AppError::Internal(msg) => {
                log::error!("internal error: {msg}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Internal server error" }))
            }
        }
    }
}
