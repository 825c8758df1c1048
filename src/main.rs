//! Claimcheck HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use claimcheck::config::Config;
use claimcheck::gateway::{AppState, create_router_with_state};
use claimcheck::pipeline::{FactChecker, ServiceConfig};
use claimcheck::vectordb::{PineconeClient, VectorIndex};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    let service = ServiceConfig::from_env();
    service.validate()?;
    if let Err(e) = service.papers.validate() {
        tracing::warn!("{}. Paper search needs a per-request core_api_key.", e);
    }

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        provider = %service.llm.provider,
        index = %service.pinecone.index_name,
        "Claimcheck starting"
    );

    let pinecone = PineconeClient::connect(&service.pinecone).await?;
    tracing::info!(host = %pinecone.host(), "Connected to vector index");
    let vector_index: Arc<dyn VectorIndex> = Arc::new(pinecone);

    let checker = FactChecker::build(&service, Arc::clone(&vector_index))?;

    let factory_index = Arc::clone(&vector_index);
    let state = AppState::new(Arc::new(checker)).with_overrides(Arc::new(
        move |core_api_key: Option<&str>, ai_api_key: Option<&str>| {
            let overridden = service.with_overrides(core_api_key, ai_api_key);
            FactChecker::build(&overridden, Arc::clone(&factory_index))
        },
    ));

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Claimcheck shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("CLAIMCHECK_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    probe_health(port).await
}

/// Exit code for a `GET /health` against the local server: 0 when healthy.
async fn probe_health(port: u16) -> i32 {
    let url = format!("http://127.0.0.1:{}/health", port);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .no_proxy()
        .build()
    {
        Ok(client) => client,
        Err(_) => return 1,
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
