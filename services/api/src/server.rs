use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredCatalog, InMemoryQuestionnaireStore};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use share_advisor::config::AppConfig;
use share_advisor::error::AppError;
use share_advisor::plans::PlanCatalogSource;
use share_advisor::telemetry;
use share_advisor::PlanAdvisorService;
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
    if let Some(path) = args.catalog.take() {
        config.catalog.path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = ConfiguredCatalog::resolve(config.catalog.path.clone())?;
    let snapshot = catalog.fetch_catalog()?;
    info!(
        source = %catalog.describe(),
        plans = snapshot.len(),
        "plan catalog loaded"
    );

    let store = Arc::new(InMemoryQuestionnaireStore::default());
    let advisor_service = Arc::new(PlanAdvisorService::new(
        Arc::new(catalog),
        store,
        config.recommendation.clone(),
    ));

    let app = with_advisor_routes(advisor_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "share plan advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
