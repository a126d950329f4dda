use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAssessmentRepository};
use crate::routes::with_dignometro_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use portal_familia::config::AppConfig;
use portal_familia::error::AppError;
use portal_familia::telemetry;
use portal_familia::workflows::dignometro::{DignometroService, QuestionCatalog};
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

    let catalog = Arc::new(QuestionCatalog::standard());
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let completeness = config.assessment.completeness;
    let service = Arc::new(DignometroService::new(
        catalog.clone(),
        repository,
        completeness,
    ));

    let app = with_dignometro_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        questions = catalog.len(),
        completeness = completeness.label(),
        "portal da família assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
