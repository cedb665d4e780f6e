use anyhow::Result;
use event_api::{
    config::AppConfig,
    store::{
        DocumentStore, GridFsObjectStore, MemoryDocumentStore, MemoryObjectStore,
        MongoDocumentStore, ObjectStore, mongo,
    },
};
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = AppConfig::from_env_and_args()?;

    tracing::info!("Starting event-api with config: {:?}", cfg);

    // --- Initialize stores ---
    let (documents, objects): (Arc<dyn DocumentStore>, Arc<dyn ObjectStore>) = if cfg.in_memory {
        tracing::warn!("Running with in-memory stores; data is lost on exit");
        (
            Arc::new(MemoryDocumentStore::new(&cfg.database)),
            Arc::new(MemoryObjectStore::new()),
        )
    } else {
        tracing::debug!("Connecting to MongoDB => {}", cfg.redacted_mongodb_url());
        let db = mongo::connect(&cfg.mongodb_url, &cfg.database).await?;
        (
            Arc::new(MongoDocumentStore::new(db.clone())),
            Arc::new(GridFsObjectStore::new(&db)),
        )
    };

    // --- Build router ---
    let app = event_api::app(documents, objects);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
