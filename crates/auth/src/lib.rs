//! Client for the hosted auth service (GoTrue-compatible API) and its REST
//! profile endpoint.
//!
//! - [`client::GoTrueClient`] -- password sign-in, refresh, sign-out, current user.
//! - [`session::AuthSession`] -- holds the current session and broadcasts changes.
//! - [`admin::AdminClient`] -- privileged account management (service-role key).
//! - [`profiles::RestProfileLookup`] -- role lookup through the REST API.

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod profiles;
pub mod session;
pub mod wire;

pub use admin::AdminClient;
pub use client::GoTrueClient;
pub use config::BackendConfig;
pub use error::AuthApiError;
pub use profiles::RestProfileLookup;
pub use session::AuthSession;
