//! Dashboard user profile model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use marches_core::types::{DbId, Timestamp};

/// A row from the `user_profiles` table. `id` equals the auth user id.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub service: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile fields written when a user is provisioned.
#[derive(Debug, Clone)]
pub struct CreateUserProfile {
    pub id: DbId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub service: Option<String>,
    pub phone: Option<String>,
}

/// DTO for updating a profile. `password` is not stored here; it is
/// forwarded to the auth service when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserProfile {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub service: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}
