use serde::Serialize;
use serde::de::DeserializeOwned;

/// Identifier assigned by a record store. Starts at 1 and never repeats within a store.
pub type RecordId = i64;

/// A record kept in a [`RecordStore`](crate::storage::RecordStore).
///
/// Records are stored as JSON bodies keyed by `(STORE, id)`, so the id is not part
/// of the record itself.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the store; also the name of its sequence counter.
    const STORE: &'static str;

    /// Singular noun used in error messages and logs.
    const KIND: &'static str;
}
