use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkin_core::config::StoreConfig;
use checkin_store::store::CheckinStore;
use checkin_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin_server=info,checkin_store=info".into()),
        )
        .init();

    let config = StoreConfig::from_env()?;
    let store = CheckinStore::open(&config)?;
    tracing::info!(
        backend = %config.backend,
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "check-in store ready"
    );

    let app = checkin_server::app_router(AppState::new(store));

    let addr = std::env::var("CHECKIN_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    tracing::info!("check-in server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
