//! Repository for the `contracts` table.

use sqlx::PgPool;
use marches_core::types::DbId;

use crate::models::contract::{Contract, CreateContract, UpdateContract};

/// Column list for contracts queries.
const COLUMNS: &str = "id, number, market_id, subject, awardee, initial_amount, currency, \
    notification_date, start_date, duration_days, status, service, contract_type, \
    procurement_method, budget_source, created_by, created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                (number, market_id, subject, awardee, initial_amount, currency,
                 notification_date, start_date, duration_days, status, service,
                 contract_type, procurement_method, budget_source, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'MAD'), $7, $8, $9,
                     COALESCE($10, 'draft'), $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(&input.number)
            .bind(input.market_id)
            .bind(&input.subject)
            .bind(&input.awardee)
            .bind(input.initial_amount)
            .bind(&input.currency)
            .bind(input.notification_date)
            .bind(input.start_date)
            .bind(input.duration_days)
            .bind(&input.status)
            .bind(&input.service)
            .bind(&input.contract_type)
            .bind(&input.procurement_method)
            .bind(&input.budget_source)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every contract, newest first. Filtering happens in memory.
    pub async fn list(pool: &PgPool) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts ORDER BY created_at DESC");
        sqlx::query_as::<_, Contract>(&query).fetch_all(pool).await
    }

    /// Contracts with status `active`, the only ones that can raise alerts.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts WHERE status = 'active' ORDER BY start_date ASC"
        );
        sqlx::query_as::<_, Contract>(&query).fetch_all(pool).await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM contracts WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                number = COALESCE($2, number),
                market_id = COALESCE($3, market_id),
                subject = COALESCE($4, subject),
                awardee = COALESCE($5, awardee),
                initial_amount = COALESCE($6, initial_amount),
                currency = COALESCE($7, currency),
                notification_date = COALESCE($8, notification_date),
                start_date = COALESCE($9, start_date),
                duration_days = COALESCE($10, duration_days),
                status = COALESCE($11, status),
                service = COALESCE($12, service),
                contract_type = COALESCE($13, contract_type),
                procurement_method = COALESCE($14, procurement_method),
                budget_source = COALESCE($15, budget_source)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(&input.number)
            .bind(input.market_id)
            .bind(&input.subject)
            .bind(&input.awardee)
            .bind(input.initial_amount)
            .bind(&input.currency)
            .bind(input.notification_date)
            .bind(input.start_date)
            .bind(input.duration_days)
            .bind(&input.status)
            .bind(&input.service)
            .bind(&input.contract_type)
            .bind(&input.procurement_method)
            .bind(&input.budget_source)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted. Fails with a foreign-key
    /// violation while settlements or délais still reference the contract.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
