pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use application::SupplyChainLedger;
pub use domain::*;
pub use error::LedgerError;
