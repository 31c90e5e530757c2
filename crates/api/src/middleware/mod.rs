//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in user behind a Bearer access token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireManager`] -- requires `manager` or `admin`.
//! - [`rbac::RequireAuth`] -- requires any signed-in user.

pub mod auth;
pub mod rbac;
