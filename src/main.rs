//! Bibliotheca - Library Management System
//!
//! Runs the console menu (default) or the web form server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::{io::BufReader, signal};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bibliotheca::{
    config::{AppConfig, LoggingConfig},
    console::Console,
    controllers::Controllers,
    repository::{Database, Repository},
    services::Services,
    web, AppState,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Track books, users and loans.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Interactive menu on stdin/stdout (default)
    Console,
    /// Serve the web forms
    Serve {
        /// Overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply the schema and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Console);

    let config = AppConfig::load().context("Failed to load configuration")?;
    let _guard = init_tracing(&config.logging, command == Command::Console);

    tracing::info!("Starting Bibliotheca v{}", env!("CARGO_PKG_VERSION"));

    let database = Database::connect(&config.database)
        .await
        .context("Could not connect to the database")?;

    database.migrate().await.context("Failed to run database migrations")?;

    if command == Command::Migrate {
        database.close().await;
        return Ok(());
    }

    let repository = Repository::new(database.clone());
    let services = Services::new(repository);
    let controllers = Controllers::new(&services);

    match command {
        Command::Serve { port } => {
            let addr = SocketAddr::new(
                config.server.host.parse().context("Invalid host address")?,
                port.unwrap_or(config.server.port),
            );

            let state = AppState {
                config: Arc::new(config),
                controllers: Arc::new(controllers),
                database: database.clone(),
            };
            let app = web::create_router(state);

            tracing::info!("Server listening on http://{}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server shutdown complete");
        }
        _ => {
            let stdin = BufReader::new(tokio::io::stdin());
            Console::new(controllers, stdin, tokio::io::stdout()).run().await?;
        }
    }

    database.close().await;
    Ok(())
}

/// Console mode logs to a daily file so records don't interleave with the menu.
///
/// The returned guard flushes the file writer when dropped.
fn init_tracing(logging: &LoggingConfig, to_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bibliotheca={},tower_http=debug", logging.level).into());

    let (writer, guard) = if to_file {
        let appender = tracing_appender::rolling::daily(&logging.directory, "bibliotheca.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        (BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stdout), None)
    };

    let layer = match logging.format.as_str() {
        "json" => fmt::layer().json().with_writer(writer).boxed(),
        "pretty" => fmt::layer().pretty().with_ansi(!to_file).with_writer(writer).boxed(),
        _ => fmt::layer().with_ansi(!to_file).with_writer(writer).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
    guard
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
