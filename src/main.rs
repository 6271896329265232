use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use keyward::config::Config;
use keyward::db::{AppState, create_pool, init_db};
use keyward::keygen::UuidKeyGenerator;
use keyward::{handlers, license, util};

#[derive(Parser)]
#[command(name = "keyward", version, about = "Time-limited, single-device license key server")]
struct Cli {
    /// SQLite database path (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Issue a new key: 2_minutes, 2_hours or 1_day
    Issue { duration: String },
    /// Delete a key by id
    Revoke { id: i64 },
    /// Release the device bound to a key
    Unbind { id: i64 },
    /// Print every key with its expiry and binding
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyward=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    let pool = create_pool(&config.database_path, config.db_pool_size)
        .with_context(|| format!("failed to open database {}", config.database_path))?;
    let conn = pool.get()?;
    init_db(&conn).context("failed to initialize schema")?;
    drop(conn);
    let state = AppState::new(pool);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, state).await?,
        Command::Issue { duration } => {
            let license =
                license::issue(state.store.as_ref(), &UuidKeyGenerator, &duration, util::now())?;
            println!(
                "{}\t{}\texpires {}",
                license.id,
                license.key,
                util::to_iso8601(license.expires_at())
            );
        }
        Command::Revoke { id } => license::revoke(state.store.as_ref(), id)?,
        Command::Unbind { id } => {
            license::unbind(state.store.as_ref(), id)?;
        }
        Command::List => {
            let now = util::now();
            for license in state.store.list_all()? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    license.id,
                    license.key,
                    util::to_iso8601(license.expires_at()),
                    if license.is_expired(now) { "expired" } else { "active" },
                    license.device_id.as_deref().unwrap_or("-"),
                );
            }
        }
    }

    Ok(())
}

async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let app = handlers::app(state);

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;
    tracing::info!("Keyward listening on {}", config.addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
