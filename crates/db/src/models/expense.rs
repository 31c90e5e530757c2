use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use marches_core::types::{Date, DbId, Timestamp};

/// A row from the `expenses` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: DbId,
    pub amount: Decimal,
    pub expense_date: Date,
    pub status: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    pub amount: Decimal,
    /// Defaults to the current date.
    pub expense_date: Option<Date>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}
