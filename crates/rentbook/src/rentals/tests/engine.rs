use super::common::*;
use crate::rentals::domain::{
    BillingPeriod, PaymentId, PaymentStatus, PeriodPaymentStatus, PropertyFilter, PropertyId,
    PropertyKind, PropertyPurpose, RentalError, TenancyId, TenantInput, DEFAULT_DUE_DAY,
};
use crate::rentals::engine;

#[test]
fn occupancy_requires_an_active_tenancy() {
    let property_id = PropertyId("p1".to_string());
    let mut tenancies = vec![ended(
        tenancy_for("t1", "p1", date(2024, 1, 1)),
        date(2024, 12, 31),
    )];

    assert!(
        !engine::is_occupied(&property_id, &tenancies),
        "ended tenancies must not count as occupancy"
    );

    tenancies.push(tenancy_for("t2", "p1", date(2025, 1, 1)));
    assert!(engine::is_occupied(&property_id, &tenancies));
}

#[test]
fn availability_excludes_sale_listings_and_occupied_rentals() {
    let properties = vec![
        rental_property("p1", "12 Flores St", 2500),
        sale_property("p2", "80 Central Ave", 450_000),
        rental_property("p3", "7 Lagoa Rd", 1800),
    ];
    let tenancies = vec![tenancy_for("t1", "p3", date(2025, 1, 1))];

    let available = engine::available_for_rent(&properties, &tenancies);
    let ids: Vec<_> = available.iter().map(|property| property.id.0.as_str()).collect();
    assert_eq!(ids, vec!["p1"]);
}

#[test]
fn availability_preserves_input_order() {
    let properties = vec![
        rental_property("p3", "7 Lagoa Rd", 1800),
        rental_property("p1", "12 Flores St", 2500),
        rental_property("p2", "3 Ipe Ct", 2100),
    ];

    let available = engine::available_for_rent(&properties, &[]);
    let ids: Vec<_> = available.iter().map(|property| property.id.0.as_str()).collect();
    assert_eq!(ids, vec!["p3", "p1", "p2"]);
}

#[test]
fn delete_is_blocked_only_while_occupied() {
    let property_id = PropertyId("p1".to_string());
    let tenancies = vec![tenancy_for("t1", "p1", date(2025, 1, 1))];
    assert!(!engine::can_delete_property(&property_id, &tenancies));

    let tenancies = vec![ended(
        tenancy_for("t1", "p1", date(2025, 1, 1)),
        date(2025, 6, 30),
    )];
    assert!(engine::can_delete_property(&property_id, &tenancies));
}

#[test]
fn start_tenancy_snapshots_rent_and_opens_unpaid_period() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let (tenancy, payment) = engine::start_tenancy(
        &property,
        &[],
        &tenant_input("Maria"),
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    )
    .expect("property is free");

    assert_eq!(tenancy.monthly_rent, 2500);
    assert_eq!(tenancy.start_date, date(2025, 3, 1));
    assert_eq!(tenancy.end_date, None);
    assert_eq!(tenancy.due_day, DEFAULT_DUE_DAY);

    assert_eq!(payment.amount, 2500);
    assert_eq!(payment.status, PaymentStatus::Unpaid);
    assert_eq!(payment.payment_date, None);
    assert_eq!(
        payment.period,
        BillingPeriod {
            month: 3,
            year: 2025
        }
    );
}

#[test]
fn start_tenancy_rejects_sale_listings() {
    let property = sale_property("p2", "80 Central Ave", 450_000);
    match engine::start_tenancy(
        &property,
        &[],
        &tenant_input("Maria"),
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    ) {
        Err(RentalError::NotForRent(id)) => assert_eq!(id.0, "p2"),
        other => panic!("expected not-for-rent error, got {other:?}"),
    }
}

#[test]
fn start_tenancy_revalidates_occupancy() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let tenancies = vec![tenancy_for("t1", "p1", date(2025, 1, 1))];

    match engine::start_tenancy(
        &property,
        &tenancies,
        &tenant_input("Joana"),
        TenancyId("t2".to_string()),
        PaymentId("pay2".to_string()),
        date(2025, 3, 1),
    ) {
        Err(RentalError::PropertyOccupied(id)) => assert_eq!(id.0, "p1"),
        other => panic!("expected occupied error, got {other:?}"),
    }
}

#[test]
fn property_can_be_relet_after_its_tenancy_ends() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let mut tenancies = vec![tenancy_for("t1", "p1", date(2025, 1, 1))];

    let ended_tenancy =
        engine::end_tenancy(&tenancies[0], date(2025, 6, 30)).expect("first end succeeds");
    tenancies[0] = ended_tenancy;

    let (tenancy, _) = engine::start_tenancy(
        &property,
        &tenancies,
        &tenant_input("Joana"),
        TenancyId("t2".to_string()),
        PaymentId("pay2".to_string()),
        date(2025, 7, 1),
    )
    .expect("property became available again");
    assert!(tenancy.is_active());
}

#[test]
fn start_tenancy_validates_due_day_range() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let input = TenantInput {
        due_day: Some(32),
        ..tenant_input("Maria")
    };

    match engine::start_tenancy(
        &property,
        &[],
        &input,
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    ) {
        Err(RentalError::InvalidDueDay(32)) => {}
        other => panic!("expected due day error, got {other:?}"),
    }
}

#[test]
fn end_tenancy_is_terminal() {
    let tenancy = tenancy_for("t1", "p1", date(2025, 1, 1));
    let ended_once = engine::end_tenancy(&tenancy, date(2025, 6, 30)).expect("first end succeeds");
    assert_eq!(ended_once.end_date, Some(date(2025, 6, 30)));

    match engine::end_tenancy(&ended_once, date(2025, 7, 1)) {
        Err(RentalError::AlreadyEnded(id, on)) => {
            assert_eq!(id.0, "t1");
            assert_eq!(on, date(2025, 6, 30));
        }
        other => panic!("expected already-ended error, got {other:?}"),
    }
}

#[test]
fn current_period_status_matches_month_and_year_exactly() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let (tenancy, payment) = engine::start_tenancy(
        &property,
        &[],
        &tenant_input("Maria"),
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    )
    .expect("starts");
    let payments = vec![payment];

    assert_eq!(
        engine::current_period_payment_status(&tenancy.id, &payments, date(2025, 3, 10)),
        PeriodPaymentStatus::Unpaid
    );
    // Same month, different year: must not match.
    assert_eq!(
        engine::current_period_payment_status(&tenancy.id, &payments, date(2026, 3, 10)),
        PeriodPaymentStatus::NoRecord
    );
    assert_eq!(
        engine::current_period_payment_status(&tenancy.id, &payments, date(2025, 4, 10)),
        PeriodPaymentStatus::NoRecord
    );
}

#[test]
fn mark_paid_sets_status_and_date() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let (_, payment) = engine::start_tenancy(
        &property,
        &[],
        &tenant_input("Maria"),
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    )
    .expect("starts");

    let paid = engine::mark_paid(&payment, date(2025, 3, 5));
    assert_eq!(paid.status, PaymentStatus::Paid);
    assert_eq!(paid.payment_date, Some(date(2025, 3, 5)));
}

#[test]
fn mark_paid_is_idempotent() {
    let property = rental_property("p1", "12 Flores St", 2500);
    let (_, payment) = engine::start_tenancy(
        &property,
        &[],
        &tenant_input("Maria"),
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    )
    .expect("starts");

    let paid = engine::mark_paid(&payment, date(2025, 3, 5));
    let paid_again = engine::mark_paid(&paid, date(2025, 3, 20));
    assert_eq!(paid_again, paid, "second call must not touch the record");
    assert_eq!(paid_again.payment_date, Some(date(2025, 3, 5)));
}

#[test]
fn payment_amount_is_a_snapshot_of_the_rent_at_creation() {
    let mut property = rental_property("p1", "12 Flores St", 2500);
    let (tenancy, payment) = engine::start_tenancy(
        &property,
        &[],
        &tenant_input("Maria"),
        TenancyId("t1".to_string()),
        PaymentId("pay1".to_string()),
        date(2025, 3, 1),
    )
    .expect("starts");

    property.rental_price = 3100;
    assert_eq!(tenancy.monthly_rent, 2500);
    assert_eq!(payment.amount, 2500);
}

#[test]
fn billing_period_renders_a_readable_label() {
    let period = BillingPeriod::from_date(date(2025, 3, 14));
    assert_eq!(period.label(), "March 2025");
    assert_eq!(period.to_string(), "March 2025");
}

#[test]
fn filters_match_address_owner_and_kind() {
    let properties = vec![
        rental_property("p1", "12 Flores St", 2500),
        sale_property("p2", "80 Central Ave", 450_000),
    ];

    let by_address = PropertyFilter {
        query: Some("flores".to_string()),
        ..PropertyFilter::default()
    };
    assert_eq!(engine::filter_properties(&properties, &by_address).len(), 1);

    let by_owner = PropertyFilter {
        query: Some("helena".to_string()),
        ..PropertyFilter::default()
    };
    assert_eq!(engine::filter_properties(&properties, &by_owner).len(), 2);

    let by_kind_label = PropertyFilter {
        query: Some("apartment".to_string()),
        ..PropertyFilter::default()
    };
    let hits = engine::filter_properties(&properties, &by_kind_label);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.0, "p2");
}

#[test]
fn filters_narrow_by_purpose_and_kind() {
    let properties = vec![
        rental_property("p1", "12 Flores St", 2500),
        sale_property("p2", "80 Central Ave", 450_000),
    ];

    let for_rent = PropertyFilter {
        purpose: Some(PropertyPurpose::ForRent),
        ..PropertyFilter::default()
    };
    let hits = engine::filter_properties(&properties, &for_rent);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.0, "p1");

    let houses = PropertyFilter {
        kind: Some(PropertyKind::House),
        ..PropertyFilter::default()
    };
    let hits = engine::filter_properties(&properties, &houses);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.0, "p1");
}
