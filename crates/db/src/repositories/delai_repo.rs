//! Repository for the `delais` table.

use sqlx::PgPool;
use marches_core::types::DbId;

use crate::models::delai::{CreateDelai, Delai, UpdateDelai};

const COLUMNS: &str =
    "id, contract_id, delai_type, start_date, end_date, reason, status, created_at, updated_at";

pub struct DelaiRepo;

impl DelaiRepo {
    pub async fn create(
        pool: &PgPool,
        contract_id: DbId,
        input: &CreateDelai,
    ) -> Result<Delai, sqlx::Error> {
        let query = format!(
            "INSERT INTO delais (contract_id, delai_type, start_date, end_date, reason, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delai>(&query)
            .bind(contract_id)
            .bind(&input.delai_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.reason)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_contract(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<Delai>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM delais WHERE contract_id = $1 ORDER BY start_date ASC"
        );
        sqlx::query_as::<_, Delai>(&query)
            .bind(contract_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDelai,
    ) -> Result<Option<Delai>, sqlx::Error> {
        let query = format!(
            "UPDATE delais SET
                delai_type = COALESCE($2, delai_type),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                reason = COALESCE($5, reason),
                status = COALESCE($6, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delai>(&query)
            .bind(id)
            .bind(&input.delai_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.reason)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM delais WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
