//! Contract model. Derived schedule and payment fields are computed by
//! `marches_core::contract_metrics`, never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use marches_core::contract_metrics::{evaluate_contract, ContractMetrics, ContractTerms};
use marches_core::types::{Date, DbId, Timestamp};

/// A row from the `contracts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contract {
    pub id: DbId,
    pub number: String,
    pub market_id: Option<DbId>,
    pub subject: String,
    pub awardee: Option<String>,
    pub initial_amount: Decimal,
    pub currency: String,
    pub notification_date: Option<Date>,
    pub start_date: Option<Date>,
    pub duration_days: Option<i32>,
    pub status: String,
    pub service: Option<String>,
    pub contract_type: Option<String>,
    pub procurement_method: Option<String>,
    pub budget_source: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contract {
    /// Inputs of the derived-field calculation. An unknown stored status
    /// is treated as not active.
    pub fn terms(&self) -> ContractTerms {
        ContractTerms {
            status: self.status.parse().ok(),
            start_date: self.start_date,
            duration_days: self.duration_days,
            initial_amount: self.initial_amount,
        }
    }
}

/// A contract with its derived fields, as served by list and detail views.
#[derive(Debug, Clone, Serialize)]
pub struct ContractWithMetrics {
    #[serde(flatten)]
    pub contract: Contract,
    #[serde(flatten)]
    pub metrics: ContractMetrics,
}

impl ContractWithMetrics {
    /// Run the derived-field calculation for one contract.
    pub fn evaluate<I>(contract: Contract, settlement_amounts: I, today: Date) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let metrics = evaluate_contract(&contract.terms(), settlement_amounts, today);
        Self { contract, metrics }
    }
}

/// DTO for creating a contract.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub number: String,
    pub market_id: Option<DbId>,
    pub subject: String,
    pub awardee: Option<String>,
    pub initial_amount: Decimal,
    pub currency: Option<String>,
    pub notification_date: Option<Date>,
    pub start_date: Option<Date>,
    pub duration_days: Option<i32>,
    pub status: Option<String>,
    pub service: Option<String>,
    pub contract_type: Option<String>,
    pub procurement_method: Option<String>,
    pub budget_source: Option<String>,
}

/// DTO for updating a contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContract {
    pub number: Option<String>,
    pub market_id: Option<DbId>,
    pub subject: Option<String>,
    pub awardee: Option<String>,
    pub initial_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub notification_date: Option<Date>,
    pub start_date: Option<Date>,
    pub duration_days: Option<i32>,
    pub status: Option<String>,
    pub service: Option<String>,
    pub contract_type: Option<String>,
    pub procurement_method: Option<String>,
    pub budget_source: Option<String>,
}
