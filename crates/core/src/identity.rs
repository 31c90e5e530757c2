//! Identities issued by the hosted auth service and the users derived from them.

use serde::{Deserialize, Serialize};

use crate::roles::{display_name_from_email, Role};
use crate::types::{DbId, Timestamp};

/// Raw principal as reported by the auth service. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: DbId,
    pub email: Option<String>,
    /// Role carried in the auth provider's own user metadata, if any.
    pub metadata_role: Option<String>,
}

/// An authenticated session: the identity plus its opaque tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub identity: Identity,
}

/// Notifications emitted by a session source whenever the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    UserUpdated(Session),
    SignedOut,
}

impl SessionEvent {
    /// The session carried by the event, `None` after sign-out.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(s)
            | SessionEvent::TokenRefreshed(s)
            | SessionEvent::UserUpdated(s) => Some(s),
            SessionEvent::SignedOut => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn(_) => "signed_in",
            SessionEvent::TokenRefreshed(_) => "token_refreshed",
            SessionEvent::UserUpdated(_) => "user_updated",
            SessionEvent::SignedOut => "signed_out",
        }
    }
}

/// A user with an effective role. The role is never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUser {
    pub id: DbId,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
}

impl ResolvedUser {
    pub fn new(identity: &Identity, role: Role) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            name: display_name_from_email(identity.email.as_deref()),
            role,
        }
    }
}
