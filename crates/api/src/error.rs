use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marches_core::error::CoreError;
use serde::Serialize;

/// Error type of every HTTP handler.
///
/// Domain failures arrive as [`CoreError`], query failures as
/// [`sqlx::Error`]. Rendered as `{ "success": false, "error", "code" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input caught in the handler itself.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// A two-step write stopped halfway. The message says what went through.
    #[error("Partial update: {0}")]
    PartialUpdate(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    code: &'static str,
}

/// Status, machine code and client-facing message of one failure.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Rendered {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Internal details go to the log only.
    fn internal(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = match &self {
            AppError::Core(err) => render_core(err),
            AppError::Database(err) => render_sqlx(err),
            AppError::BadRequest(msg) => Rendered::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => Rendered::internal(msg),
            AppError::PartialUpdate(msg) => {
                Rendered::new(StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_UPDATE", msg)
            }
        };

        let body = ErrorBody {
            success: false,
            error: rendered.message,
            code: rendered.code,
        };
        (rendered.status, Json(body)).into_response()
    }
}

fn render_core(err: &CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => Rendered::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Rendered::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
        }
        CoreError::Conflict(msg) => Rendered::new(StatusCode::CONFLICT, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => {
            Rendered::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
        }
        CoreError::Forbidden(msg) => Rendered::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Unconfigured(msg) => {
            Rendered::new(StatusCode::SERVICE_UNAVAILABLE, "BACKEND_UNCONFIGURED", msg)
        }
        CoreError::Timeout(msg) => Rendered::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", msg),
        CoreError::Upstream(msg) => {
            tracing::warn!(error = %msg, "Auth service call failed");
            Rendered::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg)
        }
        CoreError::Internal(msg) => Rendered::internal(msg),
    }
}

/// Map a query failure onto a response.
///
/// | sqlx / SQLSTATE             | Status | Code                    |
/// |-----------------------------|--------|-------------------------|
/// | `RowNotFound`               | 404    | `NOT_FOUND`             |
/// | `23505` on a `uq_*` index   | 409    | `CONFLICT`              |
/// | `23503` foreign key         | 400    | `FOREIGN_KEY_VIOLATION` |
/// | `23514` check constraint    | 400    | `VALIDATION_ERROR`      |
/// | anything else               | 500    | `INTERNAL_ERROR`        |
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => db_err,
        other => return Rendered::internal(other),
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Rendered::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        // Referenced row missing, or the row is still referenced.
        Some("23503") => Rendered::new(
            StatusCode::BAD_REQUEST,
            "FOREIGN_KEY_VIOLATION",
            format!("Operation violates reference constraint: {constraint}"),
        ),
        Some("23514") => Rendered::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        _ => Rendered::internal(db_err),
    }
}
