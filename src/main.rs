use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clusterwatch::config::LoggingSettings;
use clusterwatch::{AppContext, ClusterSource, Settings};

#[derive(Parser, Debug)]
#[command(name = "clusterwatch")]
#[command(about = "Dashboard backend for monitoring Couchbase cluster health")]
struct Args {
    /// Path to the settings file (JSON, TOML or YAML)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Address to listen on, overriding server.listen_addr
    #[arg(short, long)]
    listen: Option<String>,

    /// Run one aggregation pass, print the dashboard JSON and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    init_tracing(&settings.logging);

    let ctx = AppContext::new(
        ClusterSource::File(args.config.clone()),
        settings.timeouts.into(),
    );

    if args.once {
        return print_once(&ctx).await;
    }

    let listen_addr = args.listen.unwrap_or(settings.server.listen_addr);
    clusterwatch::server::serve(Arc::new(ctx), &listen_addr).await?;
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.ansi)
        .init();
}

async fn print_once(ctx: &AppContext) -> Result<()> {
    let clusters = ctx.dashboard().await?;
    println!("{}", serde_json::to_string_pretty(&clusters)?);
    Ok(())
}
