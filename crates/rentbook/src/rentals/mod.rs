//! Rental portfolio domain: occupancy derivation, rent-payment lifecycle,
//! and the orchestration around the backing store.
//!
//! Consistency assumption, stated rather than implied: the deployment serves
//! a single operator, so writes are single-writer-at-a-time per record and
//! last write wins. The engine performs no retries and no logging; both
//! belong to the layers around it.

pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BillingPeriod, PaymentId, PaymentRecord, PaymentStatus, PeriodPaymentStatus, Property,
    PropertyFilter, PropertyId, PropertyInput, PropertyKind, PropertyPurpose, RentalError,
    Tenancy, TenancyId, TenantInput, DEFAULT_DUE_DAY,
};
pub use repository::{PaymentRepository, PropertyRepository, RepositoryError, TenancyRepository};
pub use router::rental_router;
pub use service::{
    ActiveTenancyView, DashboardSummary, FinishedContractView, RentalOverview, RentalService,
    RentalServiceError, TenancyStart,
};
