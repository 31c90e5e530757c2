//! Repository for the `decomptes` table (settlements).

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use marches_core::types::DbId;

use crate::models::settlement::{CreateSettlement, Settlement, UpdateSettlement};

/// Column list for decomptes queries.
const COLUMNS: &str = "id, contract_id, number, amount, description, validation_date, \
    status, created_at, updated_at";

pub struct SettlementRepo;

impl SettlementRepo {
    pub async fn create(
        pool: &PgPool,
        contract_id: DbId,
        input: &CreateSettlement,
    ) -> Result<Settlement, sqlx::Error> {
        let query = format!(
            "INSERT INTO decomptes (contract_id, number, amount, description, validation_date, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Settlement>(&query)
            .bind(contract_id)
            .bind(&input.number)
            .bind(input.amount)
            .bind(&input.description)
            .bind(input.validation_date)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Settlement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM decomptes WHERE id = $1");
        sqlx::query_as::<_, Settlement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_contract(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<Settlement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM decomptes WHERE contract_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Settlement>(&query)
            .bind(contract_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Settlement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM decomptes ORDER BY created_at ASC");
        sqlx::query_as::<_, Settlement>(&query).fetch_all(pool).await
    }

    /// Settlement amounts grouped by contract, for the derived-field pass.
    pub async fn amounts_by_contract(
        pool: &PgPool,
    ) -> Result<HashMap<DbId, Vec<Decimal>>, sqlx::Error> {
        let rows: Vec<(DbId, Decimal)> =
            sqlx::query_as("SELECT contract_id, amount FROM decomptes")
                .fetch_all(pool)
                .await?;

        let mut grouped: HashMap<DbId, Vec<Decimal>> = HashMap::new();
        for (contract_id, amount) in rows {
            grouped.entry(contract_id).or_default().push(amount);
        }
        Ok(grouped)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSettlement,
    ) -> Result<Option<Settlement>, sqlx::Error> {
        let query = format!(
            "UPDATE decomptes SET
                number = COALESCE($2, number),
                amount = COALESCE($3, amount),
                description = COALESCE($4, description),
                validation_date = COALESCE($5, validation_date),
                status = COALESCE($6, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Settlement>(&query)
            .bind(id)
            .bind(&input.number)
            .bind(input.amount)
            .bind(&input.description)
            .bind(input.validation_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM decomptes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
