//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use signet_core::auth::{AuthService, Navigator};
use signet_core::client::GraphqlClient;
use signet_core::config::{self, Config};
use signet_core::store::{FileStore, Store};

mod commands;

#[derive(Parser)]
#[command(name = "signet")]
#[command(version = "0.1")]
#[command(about = "Session manager for a GraphQL API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GraphQL endpoint (overrides SIGNET_ENDPOINT and config.toml)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in (prefills missing credentials from remember-me)
    Login {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,

        /// Account password
        #[arg(short, long)]
        password: Option<String>,

        /// Re-validate this session on the next startup
        #[arg(long)]
        keep_signed: bool,

        /// Cache the credentials for prefill
        #[arg(long)]
        remember: bool,
    },

    /// Create an account and sign in
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Check the current session against the endpoint
    Status,

    /// End the session locally
    Logout,

    /// Show or toggle the remember-me credential cache
    Remember {
        /// Enable remember-me
        #[arg(long, conflicts_with = "off")]
        on: bool,

        /// Disable remember-me and scrub cached credentials
        #[arg(long)]
        off: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Navigator standing in for the browser router: prints the intent.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, target: &str) {
        println!("navigate: {target}");
    }
}

fn build_service(endpoint_flag: Option<&str>) -> Result<AuthService> {
    let config = Config::load().context("load config")?;
    let endpoint = match endpoint_flag {
        Some(url) => url.to_string(),
        None => config::resolve_endpoint(config.endpoint.as_deref())?,
    };

    tracing::debug!(%endpoint, "resolved endpoint");

    let store: Arc<dyn Store> = Arc::new(FileStore::open().context("open session store")?);
    let client = GraphqlClient::new(&endpoint, Arc::clone(&store));
    let service = AuthService::new(client, store, Arc::new(PrintNavigator));

    if let Some(redirect) = config.redirect.as_deref() {
        service.set_redirect(redirect);
    }
    Ok(service)
}

async fn dispatch(cli: Cli) -> Result<()> {
    let service = build_service(cli.endpoint.as_deref())?;

    match cli.command {
        Commands::Login {
            email,
            password,
            keep_signed,
            remember,
        } => {
            commands::login::run(
                &service,
                commands::login::LoginOptions {
                    email: email.as_deref(),
                    password: password.as_deref(),
                    keep_signed,
                    remember,
                },
            )
            .await
        }
        Commands::Signup {
            name,
            email,
            password,
        } => commands::signup::run(&service, &name, &email, &password).await,
        Commands::Status => commands::status::run(&service).await,
        Commands::Logout => commands::logout::run(&service),
        Commands::Remember { on, off } => commands::remember::run(&service, on, off),
    }
}
