//! Procurement market (solicitation) model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use marches_core::types::{Date, DbId, Timestamp};

/// A row from the `markets` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Market {
    pub id: DbId,
    pub number: String,
    pub object: String,
    pub service: Option<String>,
    pub contract_type: Option<String>,
    pub procurement_method: Option<String>,
    pub status: String,
    pub estimated_amount: Decimal,
    pub currency: String,
    pub budget_source: Option<String>,
    pub publication_date: Option<Date>,
    pub submission_deadline: Option<Date>,
    pub expected_start_date: Option<Date>,
    pub expected_end_date: Option<Date>,
    pub awardee_name: Option<String>,
    pub awardee_email: Option<String>,
    pub awardee_phone: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a market.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMarket {
    pub number: String,
    pub object: String,
    pub service: Option<String>,
    pub contract_type: Option<String>,
    pub procurement_method: Option<String>,
    /// Defaults to `draft`.
    pub status: Option<String>,
    pub estimated_amount: Option<Decimal>,
    /// Defaults to `MAD`.
    pub currency: Option<String>,
    pub budget_source: Option<String>,
    pub publication_date: Option<Date>,
    pub submission_deadline: Option<Date>,
    pub expected_start_date: Option<Date>,
    pub expected_end_date: Option<Date>,
    pub awardee_name: Option<String>,
    pub awardee_email: Option<String>,
    pub awardee_phone: Option<String>,
}

/// DTO for updating a market. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMarket {
    pub number: Option<String>,
    pub object: Option<String>,
    pub service: Option<String>,
    pub contract_type: Option<String>,
    pub procurement_method: Option<String>,
    pub status: Option<String>,
    pub estimated_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub budget_source: Option<String>,
    pub publication_date: Option<Date>,
    pub submission_deadline: Option<Date>,
    pub expected_start_date: Option<Date>,
    pub expected_end_date: Option<Date>,
    pub awardee_name: Option<String>,
    pub awardee_email: Option<String>,
    pub awardee_phone: Option<String>,
}
