// Draft board backend entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Open the file-backed store and wrap it in the list service
// 4. Build the upstream players client
// 5. Bind and serve the HTTP API

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use draft_board::config;
use draft_board::lists::ListService;
use draft_board::players::fetch::PlayersClient;
use draft_board::server::{self, AppState};
use draft_board::store::{FileStore, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("draft board backend starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {}:{}, storage at {}",
        config.server.bind, config.server.port, config.storage.path
    );

    // 3. File-backed store behind the list service
    let store = FileStore::new(&config.storage.path);
    let service = ListService::new(Box::new(store) as Box<dyn Storage>);

    // 4. Upstream players client
    let players = PlayersClient::new(&config.upstream.players_url);

    let state = Arc::new(AppState { service, players });

    // 5. Serve until the process is stopped
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    server::run(&addr, state).await
}

/// Initialize tracing to stdout with an env-filter override
/// (`RUST_LOG=draft_board=debug` and friends).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_board=info,warn")),
        )
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
