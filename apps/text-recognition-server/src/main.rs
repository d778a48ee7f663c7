//! Text Recognition Server
//!
//! Accepts base64 images, runs them through AWS Textract and Rekognition in
//! parallel and answers with the most confident transcription.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use text_recognition_server::config::Config;
use text_recognition_server::ocr::OcrService;
use text_recognition_server::routes;
use text_recognition_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "text_recognition_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Text Recognition Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("AWS region: {}", config.aws.region);

    let ocr = OcrService::from_aws(&config.aws, &config.ocr.providers).await;
    tracing::info!("OCR providers: {}", ocr.services().join(", "));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    let app_state = AppState::new(config, ocr);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Text Recognition Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Signal that started the shutdown
#[derive(Debug, PartialEq, Eq)]
enum Shutdown {
    Interrupt,
    Terminate,
}

/// Resolve once the process is asked to stop
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = first_signal(interrupt, terminate).await;
    tracing::info!(?signal, "Starting graceful shutdown");
}

async fn first_signal<I, T>(interrupt: I, terminate: T) -> Shutdown
where
    I: Future<Output = ()>,
    T: Future<Output = ()>,
{
    tokio::select! {
        _ = interrupt => Shutdown::Interrupt,
        _ = terminate => Shutdown::Terminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};

    #[tokio::test]
    async fn test_interrupt_stops_server() {
        assert_eq!(first_signal(ready(()), pending()).await, Shutdown::Interrupt);
    }

    #[tokio::test]
    async fn test_terminate_stops_server() {
        assert_eq!(first_signal(pending(), ready(())).await, Shutdown::Terminate);
    }
}
