//! Dashboard roles and the email-based role heuristic.
//!
//! The `user_profiles.role` column is the authoritative source. When it is
//! unavailable the role is guessed from the email address, which is a weak
//! heuristic kept for compatibility with existing accounts.

use crate::error::CoreError;
use crate::status::define_status_enum;

pub const ROLE_AGENT: &str = "agent";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_ADMIN: &str = "admin";

define_status_enum! {
    /// Access level of a resolved user.
    Role {
        Agent = "agent",
        Manager = "manager",
        Admin = "admin",
    }
}

impl Role {
    /// Managers and admins may create and edit procurement records.
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// Only admins delete records and manage user accounts.
    pub fn can_administer(self) -> bool {
        self == Role::Admin
    }
}

/// Text before the first `@`, or the whole string when there is none.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Display names are never stored: they are the email local-part.
pub fn display_name_from_email(email: Option<&str>) -> String {
    email.map(email_local_part).unwrap_or_default().to_string()
}

/// Guess a role from an email address.
///
/// The lower-cased address and its local-part are both checked; `admin`
/// wins over `manager`, and anything else is an agent.
pub fn infer_role_from_email(email: Option<&str>) -> Role {
    let Some(email) = email else {
        return Role::Agent;
    };
    let lowered = email.to_lowercase();
    let local = email_local_part(&lowered);

    if lowered.contains(ROLE_ADMIN) || local.contains(ROLE_ADMIN) {
        Role::Admin
    } else if lowered.contains(ROLE_MANAGER) || local.contains(ROLE_MANAGER) {
        Role::Manager
    } else {
        Role::Agent
    }
}

/// Parse a stored role label, trimming whitespace. Empty labels are `None`.
pub fn parse_role_label(label: &str) -> Option<Result<Role, CoreError>> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.parse::<Role>())
    }
}
