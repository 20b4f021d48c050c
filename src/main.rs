use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tugboat::config::AppConfig;
use tugboat::error::AppError;
use tugboat::routes::create_router;
use tugboat::services::{
    invoices::InvoiceStore, storage::JsonTripStore, trips::TripRepository,
};
use tugboat::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    let invoices = InvoiceStore::new(config.invoices_dir());
    invoices.ensure_structure().await?;

    let store = JsonTripStore::new(config.slot_path(), config.store_quota_bytes);
    info!("trip slot at {}", store.path().display());
    let trips = TripRepository::open(Arc::new(store)).await;

    let state = AppState::new(config.clone(), trips, invoices);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tugboat=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
