//! Service entry point
//!
//! Loads `config.toml` (overridable with `EMS_` environment variables),
//! picks the store, seeds the master account and serves until shutdown.

use anyhow::Context;
use employee_management::prelude::*;
use employee_management::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config).context("failed to initialise tracing")?;

    info!(
        service = %config.service.name,
        environment = %config.service.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting"
    );

    #[cfg(feature = "database")]
    if let Some(database) = &config.database {
        let pool = create_pool(database)
            .await
            .context("failed to connect to PostgreSQL")?;
        return run(config, PgStore::new(pool)).await;
    }

    warn!("No database configured, data is kept in memory only");
    run(config, InMemoryStore::new()).await
}

async fn run<S: Store>(config: Config, store: S) -> anyhow::Result<()> {
    info!(backend = store.backend(), "Store ready");

    let state = AppState::new(config.clone(), store).context("invalid security configuration")?;
    seed::run(state.store().employees(), state.hasher(), &state.config().seed).await;

    let app = router(state).context("failed to build routes")?;
    Server::new(config).serve(app).await?;
    Ok(())
}
