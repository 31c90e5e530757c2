//! User provisioning saga.
//!
//! Creating a dashboard user touches two systems with no shared
//! transaction: the hosted auth service (account) and the `user_profiles`
//! table (profile). The saga runs them in order and, when the profile step
//! fails, deletes the freshly created account.
//!
//! ```text
//! creating_auth --ok--> creating_profile --ok--> done
//!       |                     |
//!      err                   err
//!       v                     v
//!     failed  <--err--  rollback_auth --ok--> failed (compensated)
//! ```
//!
//! A failed compensation is only logged. The saga keeps
//! `compensation_pending = true` so the delete can be retried with
//! [`ProvisioningSaga::retry_compensation`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Minimum length accepted for a new account password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Privileged account management on the hosted auth service.
#[async_trait]
pub trait AuthAccounts: Send + Sync {
    /// Create a confirmed account and return its id.
    async fn create_account(&self, account: &NewAccount) -> Result<DbId, CoreError>;

    async fn delete_account(&self, user_id: DbId) -> Result<(), CoreError>;

    async fn update_password(&self, user_id: DbId, password: &str) -> Result<(), CoreError>;
}

/// Writes profile rows.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    type Profile: Send;

    async fn insert_profile(&self, user_id: DbId, account: &NewAccount)
        -> Result<Self::Profile, CoreError>;
}

/// Input of the saga.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub service: Option<String>,
    pub phone: Option<String>,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), CoreError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::Validation("Adresse email invalide".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CoreError::Validation(format!(
                "Le mot de passe doit contenir au moins {MIN_PASSWORD_LENGTH} caractères"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SagaState {
    CreatingAuth,
    CreatingProfile,
    RollbackAuth,
    Done,
    Failed,
}

impl SagaState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SagaState::Done | SagaState::Failed)
    }
}

pub struct ProvisioningSaga<S: ProfileStore> {
    accounts: Arc<dyn AuthAccounts>,
    profiles: Arc<S>,
    state: SagaState,
    history: Vec<SagaState>,
    user_id: Option<DbId>,
    compensation_pending: bool,
}

impl<S: ProfileStore> ProvisioningSaga<S> {
    pub fn new(accounts: Arc<dyn AuthAccounts>, profiles: Arc<S>) -> Self {
        Self {
            accounts,
            profiles,
            state: SagaState::CreatingAuth,
            history: vec![SagaState::CreatingAuth],
            user_id: None,
            compensation_pending: false,
        }
    }

    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Every state entered, in order.
    pub fn history(&self) -> &[SagaState] {
        &self.history
    }

    /// Id of the auth account created by this saga, if any.
    pub fn user_id(&self) -> Option<DbId> {
        self.user_id
    }

    /// `true` when an account was created, the profile failed, and the
    /// account could not be deleted yet.
    pub fn compensation_pending(&self) -> bool {
        self.compensation_pending
    }

    fn transition(&mut self, next: SagaState) {
        tracing::debug!(from = ?self.state, to = ?next, "Provisioning saga transition");
        self.state = next;
        self.history.push(next);
    }

    /// Run the saga once. The error returned is always the failure of the
    /// forward step; compensation errors are logged, never returned.
    pub async fn run(&mut self, account: &NewAccount) -> Result<S::Profile, CoreError> {
        if self.state != SagaState::CreatingAuth || self.history.len() > 1 {
            return Err(CoreError::Internal("provisioning saga already ran".into()));
        }

        let user_id = match self.accounts.create_account(account).await {
            Ok(id) => id,
            Err(e) => {
                tracing::info!(email = %account.email, error = %e, "Auth account creation failed");
                self.transition(SagaState::Failed);
                return Err(e);
            }
        };
        self.user_id = Some(user_id);
        self.transition(SagaState::CreatingProfile);

        match self.profiles.insert_profile(user_id, account).await {
            Ok(profile) => {
                self.transition(SagaState::Done);
                tracing::info!(user_id = %user_id, role = %account.role, "User provisioned");
                Ok(profile)
            }
            Err(e) => {
                tracing::info!(user_id = %user_id, error = %e, "Profile creation failed, rolling back account");
                self.transition(SagaState::RollbackAuth);
                self.compensate(user_id).await;
                Err(e)
            }
        }
    }

    /// Re-attempt the compensating delete after a failed rollback.
    ///
    /// Returns `Ok(())` once nothing is pending.
    pub async fn retry_compensation(&mut self) -> Result<(), CoreError> {
        if !self.compensation_pending {
            return Ok(());
        }
        let Some(user_id) = self.user_id else {
            self.compensation_pending = false;
            return Ok(());
        };

        self.transition(SagaState::RollbackAuth);
        match self.accounts.delete_account(user_id).await {
            Ok(()) => {
                self.compensation_pending = false;
                self.transition(SagaState::Failed);
                tracing::info!(user_id = %user_id, "Compensating account delete succeeded on retry");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Compensating account delete failed again");
                self.transition(SagaState::Failed);
                Err(e)
            }
        }
    }

    async fn compensate(&mut self, user_id: DbId) {
        match self.accounts.delete_account(user_id).await {
            Ok(()) => {
                self.compensation_pending = false;
                tracing::info!(user_id = %user_id, "Auth account rolled back");
            }
            Err(e) => {
                self.compensation_pending = true;
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Compensating account delete failed, account left without profile"
                );
            }
        }
        self.transition(SagaState::Failed);
    }
}
