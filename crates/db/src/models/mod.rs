//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Status columns are carried as `String` and validated against the closed
//! sets in `marches_core::status` before any write.

pub mod contract;
pub mod delai;
pub mod expense;
pub mod market;
pub mod settlement;
pub mod user_profile;
