use std::sync::Arc;

use alpha_cart::{build_app, connect_store, CartService, PROFILE};
use alpha_core::config::ConfigSource;
use alpha_core::network::shutdown_signal;
use alpha_core::storage::redact_uri;
use alpha_core::telemetry::{self, metrics::install_recorder};
use alpha_core::{CommonArgs, NetworkModule, Settings};
use clap::Parser;
use tracing::{error, info, warn};

/// Shopping cart HTTP service.
#[derive(Debug, Parser)]
#[command(name = "cart-service", version)]
struct Cli {
    /// Redis connection string; `memory://` runs an in-process store.
    #[arg(long, env = "REDIS_URI")]
    redis_uri: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&PROFILE, &cli.common, cli.redis_uri)?;

    let telemetry = telemetry::init(&settings.telemetry)?;
    info!("{}", PROFILE.banner);
    if telemetry.tracing_enabled() {
        info!("Tracing enabled.");
    } else {
        info!("Tracing disabled.");
    }
    match &settings.source {
        ConfigSource::File(path) => info!(path = %path.display(), "Loaded config file"),
        ConfigSource::Defaults { searched } => {
            warn!(?searched, "No config file found, using defaults");
        }
    }

    let metrics = install_recorder()?;

    let store = connect_store(&settings.store_uri, settings.store_timeout)
        .await
        .inspect_err(|err| error!(error = %err, "Unable to initialize the cart store"))?;
    info!("Connected to {}", redact_uri(&settings.store_uri));

    let router = build_app(Arc::new(CartService::new(store)), metrics);

    let mut network = NetworkModule::new(settings.network);
    let port = network.start().await?;
    info!(port, "Cart service listening");
    network.serve(router, shutdown_signal()).await?;

    drop(telemetry);
    Ok(())
}
