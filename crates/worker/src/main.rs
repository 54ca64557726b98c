use clap::{Parser, Subcommand};
use marketpulse_core::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod analyze;
mod fetch;
mod screen;

#[derive(Debug, Parser)]
#[command(name = "marketpulse_worker")]
struct Args {
    /// Directory holding market_data.json and ai_report.json. Overrides DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Refresh quotes and history for the asset catalog.
    Fetch,
    /// Write the daily commentary report.
    Analyze {
        /// Report date (YYYY-MM-DD). Defaults to today in the report zone.
        #[arg(long)]
        date: Option<String>,
    },
    /// Write the rule-based screening report.
    Screen {
        /// Report date (YYYY-MM-DD). Defaults to today in the report zone.
        #[arg(long)]
        date: Option<String>,
    },
}

// Steps run one asset after another; a single thread is all they need.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }

    let result = match args.command {
        Command::Fetch => fetch::run(&settings).await,
        Command::Analyze { date } => analyze::run(&settings, date.as_deref()).await,
        Command::Screen { date } => screen::run(&settings, date.as_deref()).await,
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "worker run failed");
    }
    result
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
