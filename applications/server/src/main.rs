/// Gatehouse Server - user registration, bearer-token login, and project CRUD
use clap::{Parser, Subcommand};
use gatehouse_core::Role;
use gatehouse_server::{api, config::ServerConfig, state::AppState};
use gatehouse_storage::Database;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gatehouse-server")]
#[command(about = "Gatehouse project API server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./gatehouse.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user (same rules as POST /register)
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long, env = "GATEHOUSE_NEW_USER_PASSWORD")]
        password: String,
        /// Role: admin or user
        #[arg(short, long, default_value = "user")]
        role: Role,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            username,
            password,
            role,
        } => {
            add_user(config, &username, &password, role).await?;
        }
        Commands::ListUsers => {
            list_users(config).await?;
        }
    }

    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<Arc<Database>> {
    let db = Database::open(&config.storage.database_url).await?;
    tracing::info!("Database connected");
    Ok(Arc::new(db))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Gatehouse Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!(
        "Access tokens expire after {} minutes",
        config.auth.token_expiration_minutes
    );

    let db = open_database(&config).await?;

    let app_state = AppState::from_config(&config, db)?;
    let app = api::create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn add_user(
    config: ServerConfig,
    username: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    let db = open_database(&config).await?;

    // The token secret is irrelevant here; only the hasher settings matter.
    let app_state = AppState::from_config(&config, db)?;
    let user = app_state.accounts.register(username, password, role).await?;

    println!("Created user {} ({}) with id {}", user.username, user.role, user.id);
    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let db = open_database(&config).await?;

    let app_state = AppState::from_config(&config, db)?;
    let users = app_state.accounts.list().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} ({})", user.id, user.username, user.role);
    }

    Ok(())
}
