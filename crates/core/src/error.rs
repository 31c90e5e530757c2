use crate::types::DbId;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The hosted backend credentials are missing from the environment.
    #[error("Backend not configured: {0}")]
    Unconfigured(String),

    /// An operation exceeded its deadline. The message is user-facing.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The hosted backend answered with an unexpected failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
