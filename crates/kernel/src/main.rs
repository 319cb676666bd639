//! MyRent operator CLI
//!
//! Inspect the SQL a listing request compiles to, run listings against a
//! JSON fixture or PostgreSQL, and mint credentials for local testing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use myrent_kernel::auth::{AccountKind, TokenService, hash_password};
use myrent_kernel::config::Config;
use myrent_kernel::db;
use myrent_kernel::listing::{
    ListExecutor, ListParams, ListPipeline, ListQueryBuilder, ListResponse, MemoryListExecutor,
    PgListExecutor, RouteLinks,
};
use myrent_kernel::resources::{Resource, ResourceRegistry};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the COUNT and SELECT statements for a listing request
    Sql {
        /// Resource name (landlords, flats, tenants, agreements, settlements).
        resource: String,
        /// Query string, e.g. "id[gte]=3&sort=-id&page=2".
        #[arg(default_value = "")]
        query: String,
    },
    /// Run a listing request and print the JSON envelope
    List {
        resource: String,
        #[arg(default_value = "")]
        query: String,
        /// Read rows from a JSON array file instead of the database.
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Print an argon2 hash of a password
    HashPassword { password: String },
    /// Print a signed token for an account
    IssueToken {
        id: i64,
        #[arg(long, value_enum)]
        kind: Kind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Landlords,
    Tenants,
}

impl From<Kind> for AccountKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Landlords => AccountKind::Landlords,
            Kind::Tenants => AccountKind::Tenants,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let registry = ResourceRegistry::builtin();

    match cli.command {
        Command::Sql { resource, query } => {
            let resource = lookup(&registry, &resource)?;
            let pipeline = pipeline(&config, &registry);
            let plan = pipeline.plan(resource.as_ref(), &ListParams::from_query(&query));

            let builder = ListQueryBuilder::new(&plan.query);
            println!("{};", builder.build_count());
            println!("{};", builder.build(plan.page));
        }
        Command::List {
            resource,
            query,
            fixture,
        } => {
            let resource = lookup(&registry, &resource)?;
            let executor = executor(&config, fixture).await?;
            let pipeline = pipeline(&config, &registry);

            let page = pipeline
                .run(
                    resource.as_ref(),
                    executor.as_ref(),
                    &ListParams::from_query(&query),
                    &resource.endpoint(),
                )
                .await
                .context("listing failed")?;

            let body = serde_json::to_string_pretty(&ListResponse::from(page))
                .context("failed to serialize listing")?;
            println!("{body}");
        }
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
        Command::IssueToken { id, kind } => {
            let secret = config
                .secret_key
                .as_deref()
                .context("SECRET_KEY environment variable is required")?;
            let tokens = TokenService::new(secret.as_bytes(), config.jwt_expired_minutes)?;
            println!("{}", tokens.issue(id, kind.into())?);
        }
    }

    Ok(())
}

fn lookup(registry: &ResourceRegistry, name: &str) -> Result<Arc<dyn Resource>> {
    registry.get(name).with_context(|| {
        format!(
            "unknown resource '{name}' (expected one of: {})",
            registry.names().join(", ")
        )
    })
}

fn pipeline(config: &Config, registry: &ResourceRegistry) -> ListPipeline {
    let links = RouteLinks::for_registry(&config.api_version, registry);
    ListPipeline::new(config.listing_config(), Arc::new(links))
}

async fn executor(config: &Config, fixture: Option<PathBuf>) -> Result<Box<dyn ListExecutor>> {
    if let Some(path) = fixture {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        let executor = MemoryListExecutor::from_json(&json)?;
        info!(rows = executor.rows().len(), "fixture loaded");
        return Ok(Box::new(executor));
    }

    let pool = db::create_pool(config).await?;
    anyhow::ensure!(db::check_health(&pool).await, "database health check failed");
    info!("database connection established");
    Ok(Box::new(PgListExecutor::new(pool)))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
