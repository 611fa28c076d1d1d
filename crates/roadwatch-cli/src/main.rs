//! Roadwatch CLI - command-line client for the road-damage reporting backend.
//!
//! This is the entry point for the `roadwatch` binary. The session lives in
//! a `RocksDB` directory so it survives between invocations.

mod commands;
mod terminal;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roadwatch_auth::{AuthConfig, Credentials, HttpAuthenticator};
use roadwatch_core::Role;
use roadwatch_gateway::{ApiRequest, GatewayConfig, HttpTransport, SessionGateway};
use roadwatch_store::RocksStore;
use tracing_subscriber::EnvFilter;

use terminal::TerminalNavigator;

/// Roadwatch CLI - report and track road damage from the terminal.
#[derive(Parser, Debug)]
#[command(name = "roadwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL.
    #[arg(
        long,
        global = true,
        env = "ROADWATCH_API_URL",
        default_value = "http://localhost:5000"
    )]
    api_url: String,

    /// Directory holding the stored session.
    #[arg(
        long,
        global = true,
        env = "ROADWATCH_DATA_DIR",
        default_value = ".roadwatch"
    )]
    data_dir: PathBuf,

    /// Enable debug logging.
    #[arg(long, global = true, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,

        /// Account password.
        #[arg(long, env = "ROADWATCH_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Clear the stored session.
    Logout,

    /// Show who is logged in.
    Whoami {
        /// Ask the backend instead of reading the stored session.
        #[arg(long)]
        remote: bool,
    },

    /// Send an authenticated GET.
    Get {
        /// Path relative to the API URL, e.g. `/api/citizen/reports`.
        path: String,

        /// Require this role before sending.
        #[arg(long)]
        role: Option<Role>,
    },

    /// Send an authenticated JSON POST.
    Post {
        /// Path relative to the API URL.
        path: String,

        /// Request body.
        #[arg(long)]
        json: String,

        /// Require this role before sending.
        #[arg(long)]
        role: Option<Role>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    init_tracing(args.debug);

    let config = GatewayConfig {
        api_base_url: args.api_url.clone(),
        ..GatewayConfig::default()
    };
    let auth_config = AuthConfig::with_base_url(&args.api_url);

    let store = RocksStore::open(&args.data_dir)
        .with_context(|| format!("failed to open session store at {}", args.data_dir.display()))?;
    let transport = HttpTransport::new(config.request_timeout())?;
    let gateway = SessionGateway::new(
        Arc::new(store),
        transport,
        Arc::new(TerminalNavigator),
        config,
    );

    tracing::debug!(api_url = %args.api_url, data_dir = %args.data_dir.display(), "Starting");

    let mut stdout = io::stdout().lock();
    let succeeded = match args.command {
        Command::Login { email, password } => {
            let authenticator = HttpAuthenticator::new(auth_config)?;
            let credentials = Credentials::new(email, password);
            commands::login(&gateway, &authenticator, &credentials, &mut stdout).await?
        }
        Command::Logout => commands::logout(&gateway, &mut stdout)?,
        Command::Whoami { remote } => {
            let remote = remote.then_some(&auth_config);
            commands::whoami(&gateway, remote, &mut stdout).await?
        }
        Command::Get { path, role } => {
            commands::send(&gateway, ApiRequest::get(path), role, &mut stdout).await?
        }
        Command::Post { path, json, role } => {
            let request = commands::post_request(&path, &json)?;
            commands::send(&gateway, request, role, &mut stdout).await?
        }
    };
    stdout.flush()?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Log to stderr. `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let default = if debug {
        "roadwatch_cli=debug,roadwatch_gateway=debug,roadwatch_auth=debug,roadwatch_store=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login() {
        let args = Args::try_parse_from([
            "roadwatch",
            "login",
            "--email",
            "citizen@test.com",
            "--password",
            "password_citizen",
        ])
        .unwrap();

        assert!(matches!(
            args.command,
            Command::Login { ref email, .. } if email == "citizen@test.com"
        ));
        assert_eq!(args.api_url, "http://localhost:5000");
    }

    #[test]
    fn parses_role_guard() {
        let args = Args::try_parse_from([
            "roadwatch",
            "get",
            "/api/official/work-reports",
            "--role",
            "official",
            "--api-url",
            "http://backend:5000",
        ])
        .unwrap();

        assert_eq!(args.api_url, "http://backend:5000");
        assert!(matches!(
            args.command,
            Command::Get { role: Some(Role::Official), .. }
        ));
    }

    #[test]
    fn rejects_unknown_role() {
        let result = Args::try_parse_from(["roadwatch", "get", "/api/x", "--role", "admin"]);
        assert!(result.is_err());
    }

    #[test]
    fn post_requires_body() {
        let result = Args::try_parse_from(["roadwatch", "post", "/api/citizen/reports"]);
        assert!(result.is_err());
    }
}
