//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod contract_repo;
pub mod delai_repo;
pub mod expense_repo;
pub mod market_repo;
pub mod settlement_repo;
pub mod user_profile_repo;

pub use contract_repo::ContractRepo;
pub use delai_repo::DelaiRepo;
pub use expense_repo::ExpenseRepo;
pub use market_repo::MarketRepo;
pub use settlement_repo::SettlementRepo;
pub use user_profile_repo::UserProfileRepo;
