use crate::cli::ServeArgs;
use crate::infra::{AppState, DetachedDecisionEngine};
use crate::routes::with_builder_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use screener_builder::config::AppConfig;
use screener_builder::error::AppError;
use screener_builder::library::LibraryCatalog;
use screener_builder::service::{CheckService, ScreenerService};
use screener_builder::store::{BlobStore, DocumentStore, InMemoryBlobStore, InMemoryDocumentStore};
use screener_builder::telemetry;
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
    if let Some(path) = args.library.take() {
        config.library.catalog_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let documents: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::default());
    let blobs: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::default());
    let library = match &config.library.catalog_path {
        Some(path) => LibraryCatalog::from_path(path)?,
        None => LibraryCatalog::load(documents.as_ref(), blobs.as_ref())?,
    };
    info!(checks = library.len(), "library catalog ready");
    let library = Arc::new(library);

    let screeners = Arc::new(ScreenerService::new(
        documents.clone(),
        blobs.clone(),
        library.clone(),
        Arc::new(DetachedDecisionEngine),
    ));
    let checks = Arc::new(CheckService::new(documents, blobs, library));

    let app = with_builder_routes(screeners, checks)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "screener builder ready");

    axum::serve(listener, app).await?;
    Ok(())
}
