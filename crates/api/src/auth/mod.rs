//! Access-token verification.

pub mod jwt;
