//! Repository for the `user_profiles` table.

use sqlx::PgPool;
use marches_core::types::DbId;

use crate::models::user_profile::{CreateUserProfile, UpdateUserProfile, UserProfile};

/// Column list for user_profiles queries.
const COLUMNS: &str =
    "id, email, full_name, role, service, phone, is_active, created_at, updated_at";

pub struct UserProfileRepo;

impl UserProfileRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (id, email, full_name, role, service, phone)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.role)
            .bind(&input.service)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Only the role column, for role resolution.
    ///
    /// Outer `None`: no row. Inner `None`: the row has an empty role.
    pub async fn find_role(pool: &PgPool, id: DbId) -> Result<Option<Option<String>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT NULLIF(TRIM(role), '') FROM user_profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All profiles, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles ORDER BY created_at DESC");
        sqlx::query_as::<_, UserProfile>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUserProfile,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles SET
                full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                service = COALESCE($4, service),
                phone = COALESCE($5, phone),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.role)
            .bind(&input.service)
            .bind(&input.phone)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
