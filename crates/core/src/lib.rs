pub mod contract_metrics;
pub mod error;
pub mod export;
pub mod filtering;
pub mod identity;
pub mod provisioning;
pub mod role_resolver;
pub mod roles;
pub mod session;
pub mod statistics;
pub mod status;
pub mod timeouts;
pub mod types;
