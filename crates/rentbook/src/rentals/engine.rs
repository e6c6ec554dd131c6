//! Pure occupancy and payment-state derivation. No I/O, no clock access, no
//! logging; every function takes the collections and the reference date it
//! needs and returns plain data or a [`RentalError`].

use chrono::NaiveDate;

use super::domain::{
    BillingPeriod, PaymentId, PaymentRecord, PaymentStatus, PeriodPaymentStatus, Property,
    PropertyFilter, PropertyId, PropertyPurpose, RentalError, Tenancy, TenancyId, TenantInput,
    DEFAULT_DUE_DAY,
};

/// True iff some tenancy references the property and has no end date. A
/// property whose only tenancies have ended is not occupied.
pub fn is_occupied(property_id: &PropertyId, tenancies: &[Tenancy]) -> bool {
    tenancies
        .iter()
        .any(|tenancy| tenancy.property_id == *property_id && tenancy.is_active())
}

/// Properties listed for rent with no active tenancy, in input order.
pub fn available_for_rent<'a>(
    properties: &'a [Property],
    tenancies: &[Tenancy],
) -> Vec<&'a Property> {
    properties
        .iter()
        .filter(|property| {
            property.purpose == PropertyPurpose::ForRent && !is_occupied(&property.id, tenancies)
        })
        .collect()
}

/// A property can be deleted only while unoccupied.
pub fn can_delete_property(property_id: &PropertyId, tenancies: &[Tenancy]) -> bool {
    !is_occupied(property_id, tenancies)
}

/// Listing filters, preserving input order.
pub fn filter_properties<'a>(
    properties: &'a [Property],
    filter: &PropertyFilter,
) -> Vec<&'a Property> {
    properties
        .iter()
        .filter(|property| filter.matches(property))
        .collect()
}

/// Payment standing for the calendar month containing `reference_date`.
/// Matches on the structured `(month, year)` key, never on a label string.
pub fn current_period_payment_status(
    tenancy_id: &TenancyId,
    payments: &[PaymentRecord],
    reference_date: NaiveDate,
) -> PeriodPaymentStatus {
    let period = BillingPeriod::from_date(reference_date);
    match payments
        .iter()
        .find(|payment| payment.tenancy_id == *tenancy_id && payment.period == period)
    {
        Some(payment) if payment.is_paid() => PeriodPaymentStatus::Paid,
        Some(_) => PeriodPaymentStatus::Unpaid,
        None => PeriodPaymentStatus::NoRecord,
    }
}

/// Build the tenancy and its first payment record for a rental property.
///
/// The monthly rent and the first installment amount are both snapshots of the
/// property's current rental price. Callers are expected to check occupancy
/// first; the engine re-validates anyway so a stale caller cannot double-let a
/// property.
pub fn start_tenancy(
    property: &Property,
    tenancies: &[Tenancy],
    input: &TenantInput,
    tenancy_id: TenancyId,
    payment_id: PaymentId,
    reference_date: NaiveDate,
) -> Result<(Tenancy, PaymentRecord), RentalError> {
    if property.purpose != PropertyPurpose::ForRent {
        return Err(RentalError::NotForRent(property.id.clone()));
    }
    if is_occupied(&property.id, tenancies) {
        return Err(RentalError::PropertyOccupied(property.id.clone()));
    }

    let due_day = input.due_day.unwrap_or(DEFAULT_DUE_DAY);
    if !(1..=31).contains(&due_day) {
        return Err(RentalError::InvalidDueDay(due_day));
    }

    let tenancy = Tenancy {
        id: tenancy_id,
        name: input.name.clone(),
        property_id: property.id.clone(),
        due_day,
        monthly_rent: property.rental_price,
        start_date: reference_date,
        end_date: None,
        email: input.email.clone(),
        phone: input.phone.clone(),
    };

    let payment = PaymentRecord {
        id: payment_id,
        tenancy_id: tenancy.id.clone(),
        property_id: property.id.clone(),
        amount: property.rental_price,
        period: BillingPeriod::from_date(reference_date),
        status: PaymentStatus::Unpaid,
        payment_date: None,
    };

    Ok((tenancy, payment))
}

/// Close a tenancy. Active -> Ended is terminal; a property is re-let by
/// creating a new tenancy, never by reopening an ended one. Existing payment
/// records are untouched.
pub fn end_tenancy(tenancy: &Tenancy, reference_date: NaiveDate) -> Result<Tenancy, RentalError> {
    if let Some(ended_on) = tenancy.end_date {
        return Err(RentalError::AlreadyEnded(tenancy.id.clone(), ended_on));
    }

    let mut ended = tenancy.clone();
    ended.end_date = Some(reference_date);
    Ok(ended)
}

/// Flip an installment to Paid with the given date. Idempotent: a record that
/// is already Paid is returned unchanged, original payment date included.
pub fn mark_paid(payment: &PaymentRecord, payment_date: NaiveDate) -> PaymentRecord {
    if payment.is_paid() {
        return payment.clone();
    }

    let mut paid = payment.clone();
    paid.status = PaymentStatus::Paid;
    paid.payment_date = Some(payment_date);
    paid
}
