use thiserror::Error;

/// Errors surfaced by session and listing operations.
///
/// Every variant is recoverable: the caller renders it and retries with
/// corrected input. The filter engine never produces one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account suspended: {0}")]
    AccountSuspended(String),

    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl MarketError {
    pub fn property_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Property",
            id: id.to_string(),
        }
    }

    pub fn user_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "User",
            id: id.to_string(),
        }
    }

    pub fn request_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Verification request",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
