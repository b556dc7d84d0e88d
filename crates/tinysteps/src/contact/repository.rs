use super::domain::ContactRequest;
use crate::ids::ContactId;
use crate::storage::RepositoryError;

pub trait ContactRepository: Send + Sync {
    fn insert_request(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError>;
    fn fetch_request(&self, id: ContactId) -> Result<Option<ContactRequest>, RepositoryError>;
    /// Newest first.
    fn requests(&self) -> Result<Vec<ContactRequest>, RepositoryError>;
}
