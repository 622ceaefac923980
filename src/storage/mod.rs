mod balances;
mod database;
mod record_store;

pub use balances::*;
pub use database::*;
pub use record_store::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
