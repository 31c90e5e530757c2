//! Shared query parameter types for API handlers.

use marches_core::filtering::{ListFilter, SortKey};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// List parameters shared by markets and contracts
/// (`?search=&status=&service=&sort=`).
///
/// `status` and `service` accept the sentinel `all`; `sort` defaults to
/// `start_date`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub service: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn filter(&self) -> ListFilter {
        ListFilter::new(
            self.search.as_deref(),
            self.status.as_deref(),
            self.service.as_deref(),
        )
    }

    pub fn sort_key(&self) -> AppResult<SortKey> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(SortKey::default()),
            Some(raw) => raw.parse().map_err(AppError::Core),
        }
    }
}

/// `?format=json|csv`
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}
