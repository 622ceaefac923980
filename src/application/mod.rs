// Application layer: one service per ledger, fronted by `SupplyChainLedger`.

mod claims;
mod documents;
mod ledger;
mod ownership;
mod shipments;

pub use claims::*;
pub use documents::*;
pub use ledger::*;
pub use ownership::*;
pub use shipments::*;
