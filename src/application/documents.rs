use tracing::{debug, info, warn};

use crate::domain::{Document, Principal, RecordId, SequenceStats};
use crate::error::LedgerError;
use crate::storage::{Database, RecordStore};

/// Customs clearance: shippers submit documents, recipients approve them.
pub struct DocumentClearanceService {
    documents: RecordStore<Document>,
}

impl DocumentClearanceService {
    pub fn new(db: &Database) -> Self {
        Self {
            documents: RecordStore::new(db),
        }
    }

    /// Submit a document addressed to `recipient`. The caller becomes the shipper.
    pub async fn submit_document(
        &self,
        caller: &Principal,
        contents: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        recipient: Principal,
    ) -> Result<RecordId, LedgerError> {
        let document = Document::new(caller.clone(), recipient, contents, origin, destination);
        let id = self.documents.create(&document).await?;

        info!(
            document_id = id,
            shipper = %caller,
            recipient = %document.recipient,
            "Submitted document"
        );
        Ok(id)
    }

    /// Approve a pending document. Only its recipient may do so.
    pub async fn approve_document(
        &self,
        caller: &Principal,
        id: RecordId,
    ) -> Result<(), LedgerError> {
        self.documents
            .update(id, caller, Document::approver, |document| document.approve(id))
            .await
            .inspect_err(|err| {
                if err.is_unauthorized() {
                    warn!(document_id = id, caller = %caller, "Rejected document approval");
                }
            })?;

        info!(document_id = id, recipient = %caller, "Approved document");
        Ok(())
    }

    pub async fn get_document(&self, id: RecordId) -> Result<Document, LedgerError> {
        debug!(document_id = id, "Reading document");
        self.documents.get(id).await
    }

    pub async fn list_documents(&self) -> Result<Vec<(RecordId, Document)>, LedgerError> {
        Ok(self.documents.list().await?)
    }

    pub async fn sequence_stats(&self) -> Result<SequenceStats, LedgerError> {
        Ok(self.documents.sequence_stats().await?)
    }
}
