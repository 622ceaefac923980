mod asset;
mod claim;
mod clock;
mod document;
mod integrity;
mod principal;
mod record;
mod shipment;

pub use asset::*;
pub use claim::*;
pub use clock::*;
pub use document::*;
pub use integrity::*;
pub use principal::*;
pub use record::*;
pub use shipment::*;
