//! Request handlers, one module per resource.

pub mod auth;
pub mod contracts;
pub mod delais;
pub mod expenses;
pub mod markets;
pub mod reports;
pub mod settlements;
pub mod users;

use std::str::FromStr;

use marches_core::error::CoreError;
use marches_core::status::validate_label;
use marches_core::types::Date;

use crate::error::{AppError, AppResult};

/// Reject an unknown status label before it reaches the `CHECK` constraint.
pub(crate) fn check_label<T>(value: Option<&str>) -> AppResult<()>
where
    T: FromStr<Err = CoreError>,
{
    if let Some(label) = value {
        validate_label::<T>(label)?;
    }
    Ok(())
}

pub(crate) fn require_text(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} est obligatoire")));
    }
    Ok(())
}

/// Calendar date used for every derived field of a request.
pub(crate) fn today() -> Date {
    chrono::Utc::now().date_naive()
}
