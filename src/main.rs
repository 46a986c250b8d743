use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error_pipeline::{
    api::{create_router, router::AppState},
    BindError, Config, ConnectionError, Environment, ErrorFacade, ErrorHandlingConfig,
};

/// Demo service exercising every error category of the pipeline
#[derive(Debug, Parser)]
#[command(name = "error-pipeline-demo", version)]
struct Args {
    /// Address to listen on (overrides LISTEN_ADDR)
    #[arg(long)]
    listen: Option<String>,

    /// Run in production mode (overrides APP_ENV)
    #[arg(long)]
    production: bool,

    /// Postgres connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if environment.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration, command line wins over environment
    let mut config = Config::from_env();
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if args.production {
        config.environment = Environment::Production;
    }
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }
    config.validate().context("invalid configuration")?;

    init_tracing(config.environment);
    info!(environment = ?config.environment, "Starting error pipeline demo");

    let facade = Arc::new(ErrorFacade::with_tracing(
        ErrorHandlingConfig::for_environment(config.environment),
    ));

    // The database is optional; a failed connection is logged and skipped
    let state = match &config.database_url {
        Some(url) => {
            let connected = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
                .connect(url)
                .await;

            match connected {
                Ok(pool) => {
                    info!("Connected to database");
                    AppState::with_pool(pool)
                }
                Err(err) => {
                    facade.handle_database_connection_error(&ConnectionError::from(&err));
                    AppState::default()
                }
            }
        }
        None => AppState::default(),
    };

    let app = create_router(state, Arc::clone(&facade));

    let addr = config.listen_socket_addr()?;
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            facade.handle_server_error(&BindError::from_io(&err, addr));
            return Err(err).context(format!("failed to bind {}", addr));
        }
    };

    info!("Listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
