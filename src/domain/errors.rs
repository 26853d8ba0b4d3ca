use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Not authorized to access this order")]
    Forbidden,
    #[error("Invalid coupon code")]
    InvalidCoupon,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Cart was modified by a concurrent request")]
    Conflict,
    #[error("Internal error: {0}")]
    Internal(String),
}
