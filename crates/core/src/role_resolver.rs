//! Effective-role resolution for an authenticated identity.
//!
//! Priority order, first match wins:
//!
//! 1. Profile row with a non-empty role label.
//! 2. No profile row at all, and the auth provider carries a role in its metadata.
//! 3. Inference from the email address.
//!
//! A failing profile lookup and an unconfigured backend both go straight to
//! step 3. Resolution never fails: every branch ends in one of the three roles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::identity::{Identity, ResolvedUser};
use crate::roles::{infer_role_from_email, parse_role_label, Role};
use crate::types::DbId;

/// Error returned by a [`ProfileLookup`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileLookupError {
    /// The backend explicitly reported that no profile row exists.
    #[error("profile not found")]
    NotFound,

    /// Any other failure (network, permissions, malformed row...).
    #[error("profile lookup failed: {0}")]
    Failed(String),
}

/// Reads the stored role of a user from the profile table.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// `Ok(None)` means the row exists but its role column is null.
    async fn find_role(&self, user_id: DbId) -> Result<Option<String>, ProfileLookupError>;
}

/// Applies the fallback chain described in the module docs.
///
/// Cheap to clone; the lookup is shared.
#[derive(Clone)]
pub struct RoleResolver {
    profiles: Option<Arc<dyn ProfileLookup>>,
}

impl RoleResolver {
    /// `None` models a client without backend credentials.
    pub fn new(profiles: Option<Arc<dyn ProfileLookup>>) -> Self {
        Self { profiles }
    }

    pub fn unconfigured() -> Self {
        Self { profiles: None }
    }

    pub fn is_configured(&self) -> bool {
        self.profiles.is_some()
    }

    /// Resolve an optional identity into a user. `None` in, `None` out.
    pub async fn resolve(&self, identity: Option<&Identity>) -> Option<ResolvedUser> {
        let identity = identity?;
        let role = self.resolve_role(identity).await;
        Some(ResolvedUser::new(identity, role))
    }

    /// Determine the effective role of `identity`.
    pub async fn resolve_role(&self, identity: &Identity) -> Role {
        let inferred = || infer_role_from_email(identity.email.as_deref());

        let Some(profiles) = &self.profiles else {
            return inferred();
        };

        match profiles.find_role(identity.id).await {
            Ok(Some(label)) => match parse_role_label(&label) {
                Some(Ok(role)) => role,
                Some(Err(_)) => {
                    tracing::warn!(
                        user_id = %identity.id,
                        label = %label,
                        "Profile carries an unknown role label, inferring from email"
                    );
                    inferred()
                }
                None => inferred(),
            },
            Ok(None) => inferred(),
            Err(ProfileLookupError::NotFound) => identity
                .metadata_role
                .as_deref()
                .and_then(parse_role_label)
                .and_then(Result::ok)
                .unwrap_or_else(inferred),
            Err(ProfileLookupError::Failed(msg)) => {
                tracing::warn!(
                    user_id = %identity.id,
                    error = %msg,
                    "Profile lookup failed, inferring role from email"
                );
                inferred()
            }
        }
    }
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("configured", &self.is_configured())
            .finish()
    }
}
