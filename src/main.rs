use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use training_journal::{drafts::DraftStore, router, AppState, Config, DraftSlot, Journal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;

    let slot = DraftSlot::open(config.drafts_path.clone()).await;
    match slot.path() {
        Some(path) => info!("drafts stored at {}", path.display()),
        None => warn!("drafts are kept in memory only"),
    }
    let drafts = DraftStore::load(slot).await;
    info!(drafts = drafts.len(), policy = ?config.edit_policy, "journal loaded");

    let state = AppState::new(Journal::new(drafts, config.edit_policy));
    let app = router(state);

    info!("listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
