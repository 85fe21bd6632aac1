use std::sync::Arc;

use alpha_article::{build_app, connect_store, ArticleService, PROFILE};
use alpha_core::config::ConfigSource;
use alpha_core::network::shutdown_signal;
use alpha_core::storage::redact_uri;
use alpha_core::telemetry::{self, metrics::install_recorder};
use alpha_core::{CommonArgs, NetworkModule, Settings};
use clap::Parser;
use tracing::{error, info, warn};

/// Article catalog HTTP service.
#[derive(Debug, Parser)]
#[command(name = "article-service", version)]
struct Cli {
    /// MongoDB connection string; `memory://` runs an in-process store.
    #[arg(long, env = "MONGODB_URI")]
    mongodb_uri: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&PROFILE, &cli.common, cli.mongodb_uri)?;

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
        .inspect_err(|err| error!(error = %err, "Unable to initialize the article store"))?;
    info!("Connected to {}", redact_uri(&settings.store_uri));

    let router = build_app(Arc::new(ArticleService::new(store)), metrics);

    let mut network = NetworkModule::new(settings.network);
    let port = network.start().await?;
    info!(port, "Article service listening");
    network.serve(router, shutdown_signal()).await?;

    drop(telemetry);
    Ok(())
}
