//! Persistence collaborator for enquiries.

use crate::error::Result;

use super::model::EnquiryRecord;

/// Durably stores enquiry records.
///
/// The transport is up to the implementation; the only contract is "store
/// one record or report why it could not be stored".
#[async_trait::async_trait]
pub trait EnquiryRepository: Send + Sync {
    /// Inserts one enquiry record.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The record was stored
    /// - `Err(SherpaError::Persistence)`: The service rejected or failed the insert
    async fn save(&self, record: &EnquiryRecord) -> Result<()>;
}
