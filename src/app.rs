use std::sync::Arc;

use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::fetcher::LightningFetcher;
use crate::geocode_fetcher::OneMapClient;
use crate::services::{GeocodeService, LightningService};
use crate::snapshot::SnapshotStore;

/// Running HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Wire state from the given config into a router without binding a port
    pub fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
        let lightning_fetcher =
            LightningFetcher::new(config.lightning_api_url.clone(), config.http_timeout())?;
        let geocode_client =
            OneMapClient::new(config.geocode_api_url.clone(), config.http_timeout())?;

        Ok(AppState {
            lightning_service: LightningService::new(lightning_fetcher),
            geocode_service: GeocodeService::new(geocode_client),
            batch_delay: config.batch_delay(),
            snapshots: Arc::new(SnapshotStore::new()),
        })
    }

    /// Build the services and spawn the HTTP server
    ///
    /// Data is fetched on request; nothing runs in the background.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let app_state = Self::build_state(&config)?;
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
