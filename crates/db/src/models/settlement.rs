use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use marches_core::types::{Date, DbId, Timestamp};

/// A row from the `decomptes` table: one partial payment of a contract.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Settlement {
    pub id: DbId,
    pub contract_id: DbId,
    pub number: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub validation_date: Option<Date>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a settlement. The contract comes from the route path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSettlement {
    pub number: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub validation_date: Option<Date>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettlement {
    pub number: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub validation_date: Option<Date>,
    pub status: Option<String>,
}
