//! Repository for the `markets` table.

use sqlx::PgPool;
use marches_core::types::DbId;

use crate::models::market::{CreateMarket, Market, UpdateMarket};

/// Column list for markets queries.
const COLUMNS: &str = "id, number, object, service, contract_type, procurement_method, \
    status, estimated_amount, currency, budget_source, publication_date, \
    submission_deadline, expected_start_date, expected_end_date, awardee_name, \
    awardee_email, awardee_phone, created_by, created_at, updated_at";

/// Provides CRUD operations for markets.
pub struct MarketRepo;

impl MarketRepo {
    /// Insert a market. `status` must already be validated.
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateMarket,
    ) -> Result<Market, sqlx::Error> {
        let query = format!(
            "INSERT INTO markets
                (number, object, service, contract_type, procurement_method, status,
                 estimated_amount, currency, budget_source, publication_date,
                 submission_deadline, expected_start_date, expected_end_date,
                 awardee_name, awardee_email, awardee_phone, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'draft'), COALESCE($7, 0),
                     COALESCE($8, 'MAD'), $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Market>(&query)
            .bind(&input.number)
            .bind(&input.object)
            .bind(&input.service)
            .bind(&input.contract_type)
            .bind(&input.procurement_method)
            .bind(&input.status)
            .bind(input.estimated_amount)
            .bind(&input.currency)
            .bind(&input.budget_source)
            .bind(input.publication_date)
            .bind(input.submission_deadline)
            .bind(input.expected_start_date)
            .bind(input.expected_end_date)
            .bind(&input.awardee_name)
            .bind(&input.awardee_email)
            .bind(&input.awardee_phone)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Market>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM markets WHERE id = $1");
        sqlx::query_as::<_, Market>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every market, newest first. Filtering happens in memory.
    pub async fn list(pool: &PgPool) -> Result<Vec<Market>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM markets ORDER BY created_at DESC");
        sqlx::query_as::<_, Market>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMarket,
    ) -> Result<Option<Market>, sqlx::Error> {
        let query = format!(
            "UPDATE markets SET
                number = COALESCE($2, number),
                object = COALESCE($3, object),
                service = COALESCE($4, service),
                contract_type = COALESCE($5, contract_type),
                procurement_method = COALESCE($6, procurement_method),
                status = COALESCE($7, status),
                estimated_amount = COALESCE($8, estimated_amount),
                currency = COALESCE($9, currency),
                budget_source = COALESCE($10, budget_source),
                publication_date = COALESCE($11, publication_date),
                submission_deadline = COALESCE($12, submission_deadline),
                expected_start_date = COALESCE($13, expected_start_date),
                expected_end_date = COALESCE($14, expected_end_date),
                awardee_name = COALESCE($15, awardee_name),
                awardee_email = COALESCE($16, awardee_email),
                awardee_phone = COALESCE($17, awardee_phone)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Market>(&query)
            .bind(id)
            .bind(&input.number)
            .bind(&input.object)
            .bind(&input.service)
            .bind(&input.contract_type)
            .bind(&input.procurement_method)
            .bind(&input.status)
            .bind(input.estimated_amount)
            .bind(&input.currency)
            .bind(&input.budget_source)
            .bind(input.publication_date)
            .bind(input.submission_deadline)
            .bind(input.expected_start_date)
            .bind(input.expected_end_date)
            .bind(&input.awardee_name)
            .bind(&input.awardee_email)
            .bind(&input.awardee_phone)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM markets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
