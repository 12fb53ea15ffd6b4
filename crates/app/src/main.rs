//! Autonomos - terminal sign-in for the bookkeeping workspace
//!
//! Main entry point for the `autonomos` binary.

use std::io::{self, BufReader};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use autonomos_app::commands::{self, loopback_addr, CallbackInput, WatchOptions};
use autonomos_app::AppContext;
use autonomos_common::AuthError;
use autonomos_infra::{config, init_tracing};
use clap::{Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "autonomos", version, about = "Sign in to Autonomos and manage the session")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in through the identity provider
    Login {
        /// Seconds to wait for the loopback callback
        #[arg(long, default_value_t = 300)]
        timeout: u64,
        /// Paste the callback URL even when the redirect URI is local
        #[arg(long)]
        paste: bool,
    },
    /// Show the current session
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Sign out and print the identity provider logout URL
    Logout,
    /// Wait for the session to expire and sign out when it does
    Watch {
        /// Route to return to after signing in again
        #[arg(long, default_value = "/")]
        route: String,
        /// API endpoint to poll with the bearer token
        #[arg(long, env = "AUTONOMOS_WATCH_PROBE_URL")]
        probe: Option<Url>,
        /// Seconds between probe requests
        #[arg(long, default_value_t = 60)]
        probe_interval: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("warning: could not load .env: {err}");
        }
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load().context("failed to load configuration")?;
    if let Err(err) = init_tracing(&config.logging) {
        eprintln!("warning: {err}");
    }
    tracing::debug!(command = ?cli.command, "starting");

    let ctx = AppContext::new_with_config(config).context("failed to initialize")?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Login { timeout, paste } => {
            let input = match loopback_addr(&ctx.config.auth.redirect_uri) {
                Some(addr) if !paste => {
                    CallbackInput::Loopback { addr, timeout: Duration::from_secs(timeout) }
                }
                _ => CallbackInput::Paste(BufReader::new(io::stdin())),
            };
            commands::login(&ctx, input, &mut out).await?;
        }
        Command::Status { json } => {
            commands::status(&ctx, json, &mut out)?;
        }
        Command::Logout => {
            commands::logout(&ctx, &mut out)?;
        }
        Command::Watch { route, probe, probe_interval } => {
            let options = WatchOptions {
                route,
                probe,
                probe_interval: Duration::from_secs(probe_interval.max(1)),
            };
            let ctrl_c = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            commands::watch(&ctx, options, ctrl_c, &mut out).await?;
        }
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.chain().find_map(|cause| cause.downcast_ref::<AuthError>()) {
        Some(auth) => eprintln!("error [{}]: {err:#}", auth.kind()),
        None => eprintln!("error: {err:#}"),
    }
}
