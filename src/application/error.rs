use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("book payload is missing or malformed")]
    InvalidPayload,

    #[error("store lock poisoned")]
    LockPoisoned,
}
