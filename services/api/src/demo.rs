use crate::infra::{
    InMemoryPaymentRepository, InMemoryPropertyRepository, InMemoryTenancyRepository,
};
use chrono::{Local, Months, NaiveDate};
use clap::Args;
use rentbook::error::AppError;
use rentbook::rentals::{
    PropertyInput, PropertyKind, PropertyPurpose, RentalOverview, RentalService, TenantInput,
};
use std::sync::Arc;

type DemoService =
    RentalService<InMemoryPropertyRepository, InMemoryTenancyRepository, InMemoryPaymentRepository>;

#[derive(Args, Debug, Default)]
pub(crate) struct OverviewArgs {
    /// Reference date for occupancy and payment standing (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) on: Option<NaiveDate>,
    /// Narrow the active contracts by tenant name or property address
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date driving the walkthrough (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) on: Option<NaiveDate>,
    /// Print the installment history of every contract at the end
    #[arg(long)]
    pub(crate) list_payments: bool,
}

pub(crate) fn run_overview(args: OverviewArgs) -> Result<(), AppError> {
    let OverviewArgs { on, search } = args;
    let today = on.unwrap_or_else(|| Local::now().date_naive());

    let service = seeded_portfolio(today)?;
    let overview = service.rental_overview(today, search.as_deref())?;
    render_overview(&overview);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { on, list_payments } = args;
    let today = on.unwrap_or_else(|| Local::now().date_naive());

    println!("Rental portfolio demo (reference date {today})");
    let service = seeded_portfolio(today)?;

    let overview = service.rental_overview(today, None)?;
    render_overview(&overview);

    let summary = service.dashboard_summary()?;
    println!("\nDashboard");
    println!(
        "- {} properties ({} for rent, {} for sale)",
        summary.total_properties, summary.for_rent, summary.for_sale
    );
    println!(
        "- {} active contracts | {}% occupancy",
        summary.active_tenancies, summary.occupancy_rate_pct
    );
    println!(
        "- {} pending installments totalling {}",
        summary.pending_payments, summary.pending_amount
    );
    println!(
        "- portfolio value {} | monthly rental income {}",
        summary.portfolio_value, summary.monthly_rental_income
    );

    if list_payments {
        println!("\nInstallment history");
        for entry in overview.active.iter().map(|view| &view.tenancy) {
            let history = service.payments_for_tenancy(&entry.id)?;
            println!("- {} ({} installments)", entry.name, history.len());
            for payment in history {
                let status = match payment.payment_date {
                    Some(date) => format!("paid on {date}"),
                    None => "unpaid".to_string(),
                };
                println!("  - {}: {} ({status})", payment.period, payment.amount);
            }
        }
    }

    Ok(())
}

/// A small but representative portfolio: one occupied rental with a paid
/// history, one available rental, one sale listing, and one finished contract.
fn seeded_portfolio(today: NaiveDate) -> Result<Arc<DemoService>, AppError> {
    let service = Arc::new(RentalService::new(
        Arc::new(InMemoryPropertyRepository::default()),
        Arc::new(InMemoryTenancyRepository::default()),
        Arc::new(InMemoryPaymentRepository::default()),
    ));

    let occupied = service.add_property(PropertyInput {
        address: "12 Flores St".to_string(),
        purpose: PropertyPurpose::ForRent,
        owner: "Helena Duarte".to_string(),
        kind: PropertyKind::House,
        sale_price: 0,
        rental_price: 2500,
    })?;
    service.add_property(PropertyInput {
        address: "7 Lagoa Rd".to_string(),
        purpose: PropertyPurpose::ForRent,
        owner: "Helena Duarte".to_string(),
        kind: PropertyKind::Apartment,
        sale_price: 0,
        rental_price: 1800,
    })?;
    service.add_property(PropertyInput {
        address: "80 Central Ave".to_string(),
        purpose: PropertyPurpose::ForSale,
        owner: "Rui Anjos".to_string(),
        kind: PropertyKind::Apartment,
        sale_price: 450_000,
        rental_price: 0,
    })?;
    let relet = service.add_property(PropertyInput {
        address: "3 Ipe Ct".to_string(),
        purpose: PropertyPurpose::ForRent,
        owner: "Rui Anjos".to_string(),
        kind: PropertyKind::Studio,
        sale_price: 0,
        rental_price: 1200,
    })?;

    let two_months_ago = today
        .checked_sub_months(Months::new(2))
        .unwrap_or(today);
    let start = service.start_tenancy(
        &occupied.id,
        &TenantInput {
            name: "Maria Souza".to_string(),
            email: Some("maria@example.com".to_string()),
            phone: None,
            due_day: None,
        },
        two_months_ago,
    )?;
    service.mark_paid(&start.first_payment.id, two_months_ago)?;
    service.roll_billing_period(today)?;

    let finished = service.start_tenancy(
        &relet.id,
        &TenantInput {
            name: "Carlos Lima".to_string(),
            email: None,
            phone: Some("+55 11 98888-0000".to_string()),
            due_day: Some(5),
        },
        two_months_ago,
    )?;
    service.mark_paid(&finished.first_payment.id, two_months_ago)?;
    let one_month_ago = today
        .checked_sub_months(Months::new(1))
        .unwrap_or(today);
    service.end_tenancy(&finished.tenancy.id, one_month_ago)?;

    Ok(service)
}

fn render_overview(overview: &RentalOverview) {
    println!("\nAvailable listings ({})", overview.available.len());
    for property in &overview.available {
        println!(
            "- {} | {} | {} at {}",
            property.address,
            property.kind.label(),
            property.purpose.label(),
            property.active_price()
        );
    }

    println!("\nActive contracts ({})", overview.active.len());
    for entry in &overview.active {
        let address = entry.property_address.as_deref().unwrap_or("unknown");
        println!(
            "- {} at {} | rent {} due day {} | this month: {}",
            entry.tenancy.name,
            address,
            entry.tenancy.monthly_rent,
            entry.tenancy.due_day,
            entry.rent_status.label()
        );
    }

    println!("\nFinished contracts ({})", overview.finished.len());
    for entry in &overview.finished {
        let address = entry.property_address.as_deref().unwrap_or("unknown");
        println!(
            "- {} at {} | {} to {}",
            entry.name, address, entry.start_date, entry.end_date
        );
    }
}
