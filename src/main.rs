use anyhow::Context;
use clap::{Parser, Subcommand};
use gazette_core::archive::{resolve_calendar, ArchiveScope, CalendarOutcome};
use gazette_core::storage::{ArticleQuery, Fixture, InMemoryStorage, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use gazette::{app_router, logging, metrics, AppState, SiteConfig};

#[derive(Parser)]
#[command(name = "gazette")]
#[command(about = "University newspaper web site")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./gazette.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the archive calendar for a scope such as `news/2009`
    Calendar {
        #[arg(default_value = "")]
        scope: String,
    },
    /// Validate a content fixture and print what it holds
    CheckFixture {
        /// Fixture to check (defaults to the configured one)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let mut config = SiteConfig::load(cli.config.as_deref())?;

    logging::init_logging(&config.log_dir);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Commands::Calendar { scope } => {
            let fixture = Fixture::load(&config.fixture)
                .with_context(|| format!("loading fixture {}", config.fixture.display()))?;
            print_calendar(InMemoryStorage::from_fixture(fixture), &scope).await?;
        }
        Commands::CheckFixture { path } => {
            let path = path.unwrap_or_else(|| config.fixture.clone());
            let fixture =
                Fixture::load(&path).with_context(|| format!("checking fixture {}", path.display()))?;
            println!("✅ {} is valid", path.display());
            println!("{}", serde_json::to_string_pretty(&fixture.summary())?);
        }
    }
    Ok(())
}

async fn serve(config: SiteConfig) -> anyhow::Result<()> {
    let fixture = Fixture::load(&config.fixture)
        .with_context(|| format!("loading fixture {}", config.fixture.display()))?;
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::from_fixture(fixture));

    let bind_addr = config.bind_addr();
    let state = AppState::new(storage, config).with_metrics(metrics::init_metrics());
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("Gazette listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn print_calendar(storage: InMemoryStorage, scope: &str) -> anyhow::Result<()> {
    let mut scope = ArchiveScope::from_segments(scope.split('/'))?;
    loop {
        let dates = storage.publish_dates(&ArticleQuery::from_scope(&scope)).await?;
        match resolve_calendar(&scope, &dates) {
            CalendarOutcome::Calendar(grids) => {
                println!("{}\n", scope.path());
                for grid in grids {
                    println!("{grid}");
                }
                return Ok(());
            }
            CalendarOutcome::Redirect(wider) => {
                println!("Nothing under {}, trying {}", scope.path(), wider.path());
                scope = wider;
            }
            CalendarOutcome::NotFound => anyhow::bail!("no published articles"),
        }
    }
}
