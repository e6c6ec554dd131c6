use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryPaymentRepository, InMemoryPropertyRepository, InMemoryTenancyRepository,
};
use crate::routes::with_rental_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rentbook::config::AppConfig;
use rentbook::error::AppError;
use rentbook::rentals::RentalService;
use rentbook::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(RentalService::with_billing(
        Arc::new(InMemoryPropertyRepository::default()),
        Arc::new(InMemoryTenancyRepository::default()),
        Arc::new(InMemoryPaymentRepository::default()),
        config.billing.default_due_day,
    ));

    let app = with_rental_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rental portfolio service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
