use safeguard_types::Feature;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("user not found")]
    NotFound,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("{0} is not implemented yet")]
    NotImplemented(Feature),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
