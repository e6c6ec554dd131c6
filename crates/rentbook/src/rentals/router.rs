use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    PaymentId, PropertyFilter, PropertyId, PropertyInput, RentalError, TenancyId, TenantInput,
};
use super::repository::{
    PaymentRepository, PropertyRepository, RepositoryError, TenancyRepository,
};
use super::service::{RentalService, RentalServiceError};

/// Router builder exposing the rental API.
pub fn rental_router<P, T, Y>(service: Arc<RentalService<P, T, Y>>) -> Router
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/properties",
            get(list_properties_handler::<P, T, Y>).post(add_property_handler::<P, T, Y>),
        )
        .route(
            "/api/v1/properties/available",
            get(available_handler::<P, T, Y>),
        )
        .route(
            "/api/v1/properties/:property_id",
            put(update_property_handler::<P, T, Y>).delete(delete_property_handler::<P, T, Y>),
        )
        .route("/api/v1/tenancies", post(start_tenancy_handler::<P, T, Y>))
        .route(
            "/api/v1/tenancies/:tenancy_id/end",
            post(end_tenancy_handler::<P, T, Y>),
        )
        .route(
            "/api/v1/tenancies/:tenancy_id/payments",
            get(payments_handler::<P, T, Y>),
        )
        .route(
            "/api/v1/payments/:payment_id/paid",
            post(mark_paid_handler::<P, T, Y>),
        )
        .route(
            "/api/v1/payments/roll",
            post(roll_period_handler::<P, T, Y>),
        )
        .route(
            "/api/v1/rentals/overview",
            get(overview_handler::<P, T, Y>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<P, T, Y>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct StartTenancyRequest {
    pub property_id: PropertyId,
    pub tenant: TenantInput,
    /// Contract start and first billing period; defaults to today.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndTenancyRequest {
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkPaidRequest {
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RollPeriodRequest {
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub on: Option<NaiveDate>,
    #[serde(default)]
    pub search: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn error_response(err: RentalServiceError) -> Response {
    let status = match &err {
        RentalServiceError::Domain(RentalError::PropertyOccupied(_))
        | RentalServiceError::Domain(RentalError::AlreadyEnded(..)) => StatusCode::CONFLICT,
        RentalServiceError::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RentalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RentalServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RentalServiceError::Repository(RepositoryError::Unavailable(_))
        | RentalServiceError::FirstPaymentFailed { .. } => StatusCode::BAD_GATEWAY,
        RentalServiceError::OrphanedTenancy { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = match &err {
        RentalServiceError::OrphanedTenancy { tenancy_id, .. } => json!({
            "error": err.to_string(),
            "orphaned_tenancy_id": tenancy_id,
        }),
        _ => json!({ "error": err.to_string() }),
    };

    (status, axum::Json(body)).into_response()
}

pub(crate) async fn list_properties_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Query(filter): Query<PropertyFilter>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.list_properties(&filter) {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_property_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    axum::Json(input): axum::Json<PropertyInput>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.add_property(input) {
        Ok(property) => (StatusCode::CREATED, axum::Json(property)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_property_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Path(property_id): Path<String>,
    axum::Json(input): axum::Json<PropertyInput>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.update_property(&PropertyId(property_id), input) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_property_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Path(property_id): Path<String>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.delete_property(&PropertyId(property_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn available_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.available_properties() {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_tenancy_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    axum::Json(request): axum::Json<StartTenancyRequest>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    let reference_date = request.reference_date.unwrap_or_else(today);
    match service.start_tenancy(&request.property_id, &request.tenant, reference_date) {
        Ok(start) => (StatusCode::CREATED, axum::Json(start)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn end_tenancy_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Path(tenancy_id): Path<String>,
    axum::Json(request): axum::Json<EndTenancyRequest>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    let reference_date = request.reference_date.unwrap_or_else(today);
    match service.end_tenancy(&TenancyId(tenancy_id), reference_date) {
        Ok(tenancy) => (StatusCode::OK, axum::Json(tenancy)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn payments_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Path(tenancy_id): Path<String>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.payments_for_tenancy(&TenancyId(tenancy_id)) {
        Ok(payments) => (StatusCode::OK, axum::Json(payments)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn mark_paid_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Path(payment_id): Path<String>,
    axum::Json(request): axum::Json<MarkPaidRequest>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    let payment_date = request.payment_date.unwrap_or_else(today);
    match service.mark_paid(&PaymentId(payment_id), payment_date) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn roll_period_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    axum::Json(request): axum::Json<RollPeriodRequest>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    let reference_date = request.reference_date.unwrap_or_else(today);
    match service.roll_billing_period(reference_date) {
        Ok(created) => (StatusCode::OK, axum::Json(created)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn overview_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
    Query(query): Query<OverviewQuery>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    let reference_date = query.on.unwrap_or_else(today);
    match service.rental_overview(reference_date, query.search.as_deref()) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<P, T, Y>(
    State(service): State<Arc<RentalService<P, T, Y>>>,
) -> Response
where
    P: PropertyRepository + 'static,
    T: TenancyRepository + 'static,
    Y: PaymentRepository + 'static,
{
    match service.dashboard_summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}
