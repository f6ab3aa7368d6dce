use std::sync::Arc;

use anyhow::Context;
use pool_service::api::{self, context::AppState};
use pool_service::config::Config;
use pool_service::entrypoint;
use pool_service::service::PoolService;
use pool_store::MemoryPoolStore;
use sendgrid_client::SendGridClient;
use tokio::net::TcpListener;

#[tokio::main]
#[tracing::instrument(err)]
async fn main() -> anyhow::Result<()> {
    let environment = pool_service::config::Environment::new_or_prod();
    entrypoint::init(environment);

    // Parse our configuration from the environment.
    let config = Config::from_env().context("expected to be able to generate config")?;
    tracing::trace!("initialized config");

    let store = MemoryPoolStore::new();
    let sendgrid_client = SendGridClient::new(
        config.sendgrid_api_key.clone(),
        config.sendgrid_from_email.clone(),
    );
    tracing::trace!("initialized sendgrid client");

    let service = PoolService::new(
        store.clone(),
        store.clone(),
        sendgrid_client,
        config.base_url.clone(),
    );

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .context("failed to bind to port")?;

    tracing::info!(
        "pool service is up and running with environment {:?} on port {}",
        &config.environment,
        &config.port
    );

    let service = api::service(AppState {
        service: Arc::new(service),
    });

    axum::serve(listener, service)
        .await
        .context("error starting service")?;

    Ok(())
}
