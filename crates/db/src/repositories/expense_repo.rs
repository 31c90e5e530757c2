//! Repository for the `expenses` table.

use sqlx::PgPool;
use marches_core::types::DbId;

use crate::models::expense::{CreateExpense, Expense};

const COLUMNS: &str = "id, amount, expense_date, status, category, description, \
    created_by, created_at, updated_at";

pub struct ExpenseRepo;

impl ExpenseRepo {
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (amount, expense_date, status, category, description, created_by)
             VALUES ($1, COALESCE($2, CURRENT_DATE), COALESCE($3, 'pending'), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(input.amount)
            .bind(input.expense_date)
            .bind(&input.status)
            .bind(&input.category)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Every expense, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses ORDER BY expense_date DESC");
        sqlx::query_as::<_, Expense>(&query).fetch_all(pool).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
