use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    BillingPeriod, PaymentId, PaymentRecord, PaymentStatus, PeriodPaymentStatus, Property,
    PropertyFilter, PropertyId, PropertyInput, PropertyPurpose, RentalError, Tenancy, TenancyId,
    TenantInput, DEFAULT_DUE_DAY,
};
use super::engine;
use super::repository::{
    PaymentRepository, PropertyRepository, RepositoryError, TenancyRepository,
};

/// Service composing the three entity repositories with the pure engine.
/// Every operation is a single user action: it completes or fails before the
/// next one is issued, and the service never retries.
pub struct RentalService<P, T, Y> {
    properties: Arc<P>,
    tenancies: Arc<T>,
    payments: Arc<Y>,
    default_due_day: u8,
}

static PROPERTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TENANCY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_property_id() -> PropertyId {
    let id = PROPERTY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PropertyId(format!("prop-{id:06}"))
}

fn next_tenancy_id() -> TenancyId {
    let id = TENANCY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TenancyId(format!("ten-{id:06}"))
}

fn next_payment_id() -> PaymentId {
    let id = PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PaymentId(format!("pay-{id:06}"))
}

/// Result of a successful tenancy start: the contract and its first
/// installment, persisted as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyStart {
    pub tenancy: Tenancy,
    pub first_payment: PaymentRecord,
}

/// One active contract as shown on the rentals page.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveTenancyView {
    pub tenancy: Tenancy,
    pub property_address: Option<String>,
    pub rent_status: PeriodPaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_payment_id: Option<PaymentId>,
}

/// One finished contract as shown on the rentals page.
#[derive(Debug, Clone, Serialize)]
pub struct FinishedContractView {
    pub tenancy_id: TenancyId,
    pub name: String,
    pub property_address: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Everything the rentals page needs in one round trip.
#[derive(Debug, Clone, Serialize)]
pub struct RentalOverview {
    pub reference_date: NaiveDate,
    pub available: Vec<Property>,
    pub active: Vec<ActiveTenancyView>,
    pub finished: Vec<FinishedContractView>,
}

/// Portfolio statistics for the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_properties: usize,
    pub for_rent: usize,
    pub for_sale: usize,
    pub active_tenancies: usize,
    /// Active tenancies over rental listings, rounded to whole percent.
    pub occupancy_rate_pct: u32,
    pub pending_payments: usize,
    pub pending_amount: u64,
    pub portfolio_value: u64,
    pub monthly_rental_income: u64,
}

/// Error raised by the rental service.
#[derive(Debug, thiserror::Error)]
pub enum RentalServiceError {
    #[error(transparent)]
    Domain(#[from] RentalError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The tenancy write landed but the first payment write failed; the
    /// tenancy was deleted again, so the store is clean.
    #[error("tenancy {tenancy_id} rolled back: first payment failed to persist")]
    FirstPaymentFailed {
        tenancy_id: TenancyId,
        #[source]
        source: RepositoryError,
    },
    /// The payment write failed and the compensating delete failed too. The
    /// store now holds a tenancy with no payment record; the operator must
    /// clean up by hand. Never reported as a plain upstream failure.
    #[error("tenancy {tenancy_id} persisted without a payment record; manual cleanup required")]
    OrphanedTenancy {
        tenancy_id: TenancyId,
        #[source]
        source: RepositoryError,
    },
}

impl<P, T, Y> RentalService<P, T, Y>
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    pub fn new(properties: Arc<P>, tenancies: Arc<T>, payments: Arc<Y>) -> Self {
        Self::with_billing(properties, tenancies, payments, DEFAULT_DUE_DAY)
    }

    /// Like [`RentalService::new`] but with a configured fallback due day for
    /// onboarding requests that omit one.
    pub fn with_billing(
        properties: Arc<P>,
        tenancies: Arc<T>,
        payments: Arc<Y>,
        default_due_day: u8,
    ) -> Self {
        Self {
            properties,
            tenancies,
            payments,
            default_due_day,
        }
    }

    /// List properties, optionally narrowed by the page filters.
    pub fn list_properties(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<Property>, RentalServiceError> {
        let properties = self.properties.list()?;
        Ok(engine::filter_properties(&properties, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn add_property(&self, input: PropertyInput) -> Result<Property, RentalServiceError> {
        let property = normalize_property(next_property_id(), input);
        Ok(self.properties.create(property)?)
    }

    pub fn update_property(
        &self,
        id: &PropertyId,
        input: PropertyInput,
    ) -> Result<Property, RentalServiceError> {
        self.properties
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        let property = normalize_property(id.clone(), input);
        self.properties.update(property.clone())?;
        Ok(property)
    }

    /// Delete a listing. Refused while an active tenancy references it; the
    /// tenancy must be ended first.
    pub fn delete_property(&self, id: &PropertyId) -> Result<(), RentalServiceError> {
        self.properties
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        let tenancies = self.tenancies.list()?;
        if !engine::can_delete_property(id, &tenancies) {
            return Err(RentalError::PropertyOccupied(id.clone()).into());
        }
        Ok(self.properties.delete(id)?)
    }

    /// Rental listings with no active tenancy, in store order.
    pub fn available_properties(&self) -> Result<Vec<Property>, RentalServiceError> {
        let properties = self.properties.list()?;
        let tenancies = self.tenancies.list()?;
        Ok(engine::available_for_rent(&properties, &tenancies)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Start a tenancy and persist its first installment as a unit.
    ///
    /// Two dependent writes against a store without multi-record
    /// transactions: if the payment write fails, the just-created tenancy is
    /// deleted again. When even that compensation fails the error names the
    /// orphaned tenancy so the operator can intervene.
    pub fn start_tenancy(
        &self,
        property_id: &PropertyId,
        input: &TenantInput,
        reference_date: NaiveDate,
    ) -> Result<TenancyStart, RentalServiceError> {
        let property = self
            .properties
            .fetch(property_id)?
            .ok_or(RepositoryError::NotFound)?;
        let tenancies = self.tenancies.list()?;

        let input = TenantInput {
            due_day: input.due_day.or(Some(self.default_due_day)),
            ..input.clone()
        };
        let (tenancy, payment) = engine::start_tenancy(
            &property,
            &tenancies,
            &input,
            next_tenancy_id(),
            next_payment_id(),
            reference_date,
        )?;

        let tenancy = self.tenancies.create(tenancy)?;
        let first_payment = match self.payments.create(payment) {
            Ok(payment) => payment,
            Err(source) => {
                return Err(match self.tenancies.delete(&tenancy.id) {
                    Ok(()) => RentalServiceError::FirstPaymentFailed {
                        tenancy_id: tenancy.id,
                        source,
                    },
                    Err(_) => RentalServiceError::OrphanedTenancy {
                        tenancy_id: tenancy.id,
                        source,
                    },
                });
            }
        };

        Ok(TenancyStart {
            tenancy,
            first_payment,
        })
    }

    /// Soft-end a contract. Payment history stays queryable; the property
    /// shows up as available again.
    pub fn end_tenancy(
        &self,
        tenancy_id: &TenancyId,
        reference_date: NaiveDate,
    ) -> Result<Tenancy, RentalServiceError> {
        let tenancy = self
            .tenancies
            .fetch(tenancy_id)?
            .ok_or(RepositoryError::NotFound)?;
        let ended = engine::end_tenancy(&tenancy, reference_date)?;
        self.tenancies.update(ended.clone())?;
        Ok(ended)
    }

    /// Record a rent payment. Marking an already-paid record again is a
    /// no-op: the stored record comes back unchanged and nothing is written.
    pub fn mark_paid(
        &self,
        payment_id: &PaymentId,
        payment_date: NaiveDate,
    ) -> Result<PaymentRecord, RentalServiceError> {
        let payment = self
            .payments
            .fetch(payment_id)?
            .ok_or(RepositoryError::NotFound)?;
        if payment.is_paid() {
            return Ok(payment);
        }
        let paid = engine::mark_paid(&payment, payment_date);
        self.payments.update(paid.clone())?;
        Ok(paid)
    }

    /// Full installment history for one contract, in store order.
    pub fn payments_for_tenancy(
        &self,
        tenancy_id: &TenancyId,
    ) -> Result<Vec<PaymentRecord>, RentalServiceError> {
        self.tenancies
            .fetch(tenancy_id)?
            .ok_or(RepositoryError::NotFound)?;
        let payments = self.payments.list()?;
        Ok(payments
            .into_iter()
            .filter(|payment| payment.tenancy_id == *tenancy_id)
            .collect())
    }

    /// Payment standing of one contract for the month of `reference_date`.
    pub fn payment_status(
        &self,
        tenancy_id: &TenancyId,
        reference_date: NaiveDate,
    ) -> Result<PeriodPaymentStatus, RentalServiceError> {
        self.tenancies
            .fetch(tenancy_id)?
            .ok_or(RepositoryError::NotFound)?;
        let payments = self.payments.list()?;
        Ok(engine::current_period_payment_status(
            tenancy_id,
            &payments,
            reference_date,
        ))
    }

    /// Create the missing Unpaid installment for every active tenancy that
    /// has no record for the month of `reference_date`. Amounts come from the
    /// tenancy's rent snapshot, not the property's current price. Returns the
    /// records created by this call.
    pub fn roll_billing_period(
        &self,
        reference_date: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, RentalServiceError> {
        let period = BillingPeriod::from_date(reference_date);
        let tenancies = self.tenancies.list()?;
        let payments = self.payments.list()?;

        let mut created = Vec::new();
        for tenancy in tenancies.iter().filter(|tenancy| tenancy.is_active()) {
            let covered = payments
                .iter()
                .any(|payment| payment.tenancy_id == tenancy.id && payment.period == period);
            if covered {
                continue;
            }

            let record = self.payments.create(PaymentRecord {
                id: next_payment_id(),
                tenancy_id: tenancy.id.clone(),
                property_id: tenancy.property_id.clone(),
                amount: tenancy.monthly_rent,
                period,
                status: PaymentStatus::Unpaid,
                payment_date: None,
            })?;
            created.push(record);
        }

        Ok(created)
    }

    /// Build the rentals page data: available listings, active contracts with
    /// their current-month standing, and finished contracts. `search` narrows
    /// the active list by tenant name or property address.
    pub fn rental_overview(
        &self,
        reference_date: NaiveDate,
        search: Option<&str>,
    ) -> Result<RentalOverview, RentalServiceError> {
        let properties = self.properties.list()?;
        let tenancies = self.tenancies.list()?;
        let payments = self.payments.list()?;

        let available = engine::available_for_rent(&properties, &tenancies)
            .into_iter()
            .cloned()
            .collect();

        let address_of = |property_id: &PropertyId| {
            properties
                .iter()
                .find(|property| property.id == *property_id)
                .map(|property| property.address.clone())
        };

        let period = BillingPeriod::from_date(reference_date);
        let query = search.map(str::to_lowercase);

        let active = tenancies
            .iter()
            .filter(|tenancy| tenancy.is_active())
            .filter(|tenancy| match &query {
                None => true,
                Some(query) => {
                    tenancy.name.to_lowercase().contains(query)
                        || address_of(&tenancy.property_id)
                            .is_some_and(|address| address.to_lowercase().contains(query))
                }
            })
            .map(|tenancy| ActiveTenancyView {
                tenancy: tenancy.clone(),
                property_address: address_of(&tenancy.property_id),
                rent_status: engine::current_period_payment_status(
                    &tenancy.id,
                    &payments,
                    reference_date,
                ),
                current_payment_id: payments
                    .iter()
                    .find(|payment| payment.tenancy_id == tenancy.id && payment.period == period)
                    .map(|payment| payment.id.clone()),
            })
            .collect();

        let finished = tenancies
            .iter()
            .filter_map(|tenancy| {
                tenancy.end_date.map(|end_date| FinishedContractView {
                    tenancy_id: tenancy.id.clone(),
                    name: tenancy.name.clone(),
                    property_address: address_of(&tenancy.property_id),
                    start_date: tenancy.start_date,
                    end_date,
                })
            })
            .collect();

        Ok(RentalOverview {
            reference_date,
            available,
            active,
            finished,
        })
    }

    /// Portfolio statistics for the dashboard page.
    pub fn dashboard_summary(&self) -> Result<DashboardSummary, RentalServiceError> {
        let properties = self.properties.list()?;
        let tenancies = self.tenancies.list()?;
        let payments = self.payments.list()?;

        let for_rent = properties
            .iter()
            .filter(|property| property.purpose == PropertyPurpose::ForRent)
            .count();
        let for_sale = properties
            .iter()
            .filter(|property| property.purpose == PropertyPurpose::ForSale)
            .count();
        let active_tenancies = tenancies.iter().filter(|tenancy| tenancy.is_active()).count();

        let occupancy_rate_pct = if for_rent > 0 {
            ((active_tenancies as f64 / for_rent as f64) * 100.0).round() as u32
        } else {
            0
        };

        let pending: Vec<_> = payments.iter().filter(|payment| !payment.is_paid()).collect();
        let pending_amount = pending.iter().map(|payment| u64::from(payment.amount)).sum();

        let portfolio_value = properties
            .iter()
            .filter(|property| property.purpose == PropertyPurpose::ForSale)
            .map(|property| u64::from(property.sale_price))
            .sum();
        let monthly_rental_income = properties
            .iter()
            .filter(|property| property.purpose == PropertyPurpose::ForRent)
            .map(|property| u64::from(property.rental_price))
            .sum();

        Ok(DashboardSummary {
            total_properties: properties.len(),
            for_rent,
            for_sale,
            active_tenancies,
            occupancy_rate_pct,
            pending_payments: pending.len(),
            pending_amount,
            portfolio_value,
            monthly_rental_income,
        })
    }
}

/// Zero out the price that does not match the purpose so exactly one price is
/// active per listing.
fn normalize_property(id: PropertyId, input: PropertyInput) -> Property {
    let (sale_price, rental_price) = match input.purpose {
        PropertyPurpose::ForSale => (input.sale_price, 0),
        PropertyPurpose::ForRent => (0, input.rental_price),
    };

    Property {
        id,
        address: input.address,
        purpose: input.purpose,
        owner: input.owner,
        kind: input.kind,
        sale_price,
        rental_price,
    }
}
