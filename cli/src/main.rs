//! CLI entrypoint for artrelay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use artrelay_application::{EmbeddingSource, RelayTextUseCase, TextToImageUseCase};
use artrelay_infrastructure::{
    ConfigLoader, FileConfig, ImageClient, LlmEmbeddingClient, NlpEmbeddingClient,
    ProviderContext, ProviderRegistry,
};
use artrelay_presentation::{
    bridge_router, client::parse_artifact_reply, BridgeState, Cli, Command, RelayClient,
    RelayServer,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    match cli.command {
        Command::Serve { provider, listen } => serve(config, provider, listen).await,
        Command::Send {
            text,
            addr,
            out_dir,
        } => send(&text, &addr, out_dir.as_deref()).await,
    }
}

async fn serve(
    config: FileConfig,
    provider_override: Option<String>,
    listen_override: Option<String>,
) -> Result<()> {
    let mut relay_settings = config.relay_settings();
    if let Some(provider) = provider_override {
        relay_settings.provider = provider.trim().to_lowercase();
    }
    if let Some(listen) = listen_override {
        relay_settings.listen_addr = listen;
    }
    let bridge_settings = config.bridge_settings();

    info!("Starting artrelay");

    // One HTTP client, one connection pool, shared by every adapter.
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    // === Dependency Injection ===
    // Resolve the backend first: an unknown provider must fail before
    // any socket is bound.
    let context = ProviderContext {
        settings: relay_settings.clone(),
        http: http.clone(),
    };
    let backend = ProviderRegistry::builtin()
        .resolve(&relay_settings.provider, &context)
        .context("Failed to resolve provider")?;
    info!(provider = backend.name(), "Backend resolved");

    let relay_use_case = Arc::new(RelayTextUseCase::new(
        backend,
        relay_settings.provider.clone(),
        relay_settings.timeout,
    ));

    // Orchestrator stack
    let text_to_image = Arc::new(TextToImageUseCase::new(
        vec![
            Arc::new(LlmEmbeddingClient::new(http.clone(), &bridge_settings))
                as Arc<dyn EmbeddingSource>,
            Arc::new(NlpEmbeddingClient::new(http.clone(), &bridge_settings)),
        ],
        Arc::new(ImageClient::new(http, &bridge_settings)),
        bridge_settings.width,
        bridge_settings.height,
    ));
    let router = bridge_router(BridgeState {
        use_case: text_to_image,
    });

    let shutdown = CancellationToken::new();

    let relay = RelayServer::bind(&relay_settings.listen_addr, relay_use_case)
        .await
        .context("Failed to bind relay listener")?;
    let relay_task = tokio::spawn(relay.run(shutdown.clone()));

    let http_listener = tokio::net::TcpListener::bind(&bridge_settings.listen_addr)
        .await
        .context("Failed to bind orchestrator listener")?;
    info!(addr = %http_listener.local_addr()?, "Orchestrator listening");
    let http_shutdown = shutdown.clone();
    let http_task = tokio::spawn(async move {
        axum::serve(http_listener, router)
            .with_graceful_shutdown(http_shutdown.cancelled_owned())
            .await
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    shutdown.cancel();

    relay_task.await.context("Relay task panicked")??;
    http_task.await.context("Orchestrator task panicked")??;
    info!("Stopped");
    Ok(())
}

async fn send(text: &str, addr: &str, out_dir: Option<&Path>) -> Result<()> {
    let mut client = RelayClient::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to {addr}"))?;
    let reply = client.request(text).await.context("Request failed")?;

    match parse_artifact_reply(&reply) {
        Some(envelope) if !envelope.is_empty() => {
            let dir = out_dir.unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let ext = extension_for(&envelope.mime);
            let artifacts = envelope.decode_artifacts();
            if artifacts.len() < envelope.images_base64.len() {
                warn!("Some artifacts could not be decoded and were skipped");
            }
            for (index, bytes) in artifacts.iter().enumerate() {
                let path = dir.join(format!("artifact_{}.{ext}", index + 1));
                std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
        }
        _ => println!("{reply}"),
    }
    Ok(())
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}
