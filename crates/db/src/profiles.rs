//! Postgres implementations of the profile traits from `marches_core`.

use async_trait::async_trait;
use marches_core::error::CoreError;
use marches_core::provisioning::{NewAccount, ProfileStore};
use marches_core::role_resolver::{ProfileLookup, ProfileLookupError};
use marches_core::types::DbId;

use crate::models::user_profile::{CreateUserProfile, UserProfile};
use crate::repositories::UserProfileRepo;
use crate::DbPool;

/// Reads roles straight from `user_profiles`.
#[derive(Clone)]
pub struct PgProfileLookup {
    pool: DbPool,
}

impl PgProfileLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileLookup for PgProfileLookup {
    async fn find_role(&self, user_id: DbId) -> Result<Option<String>, ProfileLookupError> {
        match UserProfileRepo::find_role(&self.pool, user_id).await {
            Ok(Some(role)) => Ok(role),
            Ok(None) => Err(ProfileLookupError::NotFound),
            Err(e) => Err(ProfileLookupError::Failed(e.to_string())),
        }
    }
}

/// Inserts profile rows for the provisioning saga.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: DbPool,
}

impl PgProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    type Profile = UserProfile;

    async fn insert_profile(
        &self,
        user_id: DbId,
        account: &NewAccount,
    ) -> Result<UserProfile, CoreError> {
        let input = CreateUserProfile {
            id: user_id,
            email: account.email.trim().to_string(),
            full_name: account.full_name.clone(),
            role: account.role.as_str().to_string(),
            service: account.service.clone(),
            phone: account.phone.clone(),
        };
        UserProfileRepo::create(&self.pool, &input)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                    CoreError::Conflict("Un profil existe déjà pour cet email".into())
                }
                _ => CoreError::Internal(format!("Failed to insert profile: {e}")),
            })
    }
}
