//! Storage abstraction over the remote store (spreadsheet API today, hosted
//! database later). One trait per entity so the service module can be
//! exercised in isolation and so no ambient mutable collection exists.
//!
//! Consistency contract: the deployment is a single small-business operator,
//! so the store is assumed single-writer-at-a-time per record and last write
//! wins. Repositories report failures; they never retry.

use super::domain::{PaymentId, PaymentRecord, Property, PropertyId, Tenancy, TenancyId};

/// Error enumeration for repository failures. `Unavailable` wraps whatever
/// the remote store reported (network failure, quota, etc.) and is always
/// surfaced to the caller, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait PropertyRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Property>, RepositoryError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn create(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    fn delete(&self, id: &PropertyId) -> Result<(), RepositoryError>;
}

pub trait TenancyRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Tenancy>, RepositoryError>;
    fn fetch(&self, id: &TenancyId) -> Result<Option<Tenancy>, RepositoryError>;
    fn create(&self, tenancy: Tenancy) -> Result<Tenancy, RepositoryError>;
    fn update(&self, tenancy: Tenancy) -> Result<(), RepositoryError>;
    /// Physical removal. The rental lifecycle ends tenancies softly via
    /// `update`; delete exists for the compensating write in
    /// [`super::service::RentalService::start_tenancy`].
    fn delete(&self, id: &TenancyId) -> Result<(), RepositoryError>;
}

pub trait PaymentRepository: Send + Sync {
    fn list(&self) -> Result<Vec<PaymentRecord>, RepositoryError>;
    fn fetch(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, RepositoryError>;
    fn create(&self, payment: PaymentRecord) -> Result<PaymentRecord, RepositoryError>;
    fn update(&self, payment: PaymentRecord) -> Result<(), RepositoryError>;
    /// Part of the per-entity CRUD contract; the rental lifecycle itself
    /// never deletes payment history.
    fn delete(&self, id: &PaymentId) -> Result<(), RepositoryError>;
}
