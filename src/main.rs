use doctriage::{
    api::{self, AppState},
    config,
    extract::ocr::{DisabledOcr, HttpOcrClient, OcrEngine},
    fanout::FanoutOrchestrator,
    logging,
    metrics::IngestMetrics,
    notify::NotificationDispatcher,
    pipeline::{IngestionPipeline, TaskRegistry},
    store::{DataStore, HttpObjectStore, RestDataStore},
    summarize::Summarizer,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    config::init_config();
    logging::init_tracing();

    let metrics = Arc::new(IngestMetrics::new());
    let store: Arc<RestDataStore> =
        Arc::new(RestDataStore::new().expect("Failed to initialize data store client"));
    let data_store: Arc<dyn DataStore> = store.clone();
    let objects = Arc::new(HttpObjectStore::new().expect("Failed to initialize object store client"));
    let ocr: Arc<dyn OcrEngine> = match &config::get_config().ocr_url {
        Some(url) => Arc::new(HttpOcrClient::new(url.clone())),
        None => {
            tracing::warn!("No OCR engine configured; image uploads will fail extraction");
            Arc::new(DisabledOcr)
        }
    };

    let summarizer = Summarizer::from_config();
    let fanout = FanoutOrchestrator::new(summarizer, data_store.clone(), metrics.clone());
    let notifier = NotificationDispatcher::new(data_store.clone(), store.clone(), metrics.clone());
    let pipeline = IngestionPipeline::new(ocr, objects, data_store, fanout, notifier, metrics.clone());

    let state = Arc::new(AppState {
        pipeline: Arc::new(pipeline),
        registry: Arc::new(TaskRegistry::new()),
        metrics,
    });
    let app = api::create_router(state);

    let (listener, port) = bind_listener().await.expect("Failed to bind listener");
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.unwrap();
}

async fn bind_listener() -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    let config = config::get_config();
    if let Some(port) = config.server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 4300..=4399;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 4300-4399",
    ))
}
