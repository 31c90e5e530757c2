use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use marches_core::types::{Date, DbId, Timestamp};

/// A row from the `delais` table: an initial period, extension or
/// suspension attached to a contract.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Delai {
    pub id: DbId,
    pub contract_id: DbId,
    pub delai_type: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDelai {
    pub delai_type: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDelai {
    pub delai_type: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub reason: Option<String>,
    pub status: Option<String>,
}
