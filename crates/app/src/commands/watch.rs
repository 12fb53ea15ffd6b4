//! `autonomos watch`
//!
//! Keeps a timeout coordinator mounted for the stored session until the
//! expiry warning opens, then acknowledges it the way the browser dialog's
//! confirm button would.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use autonomos_core::SessionTimeoutCoordinator;
use reqwest::Method;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::format_epoch;
use crate::context::AppContext;
use crate::terminal::{TerminalNavigator, TerminalPrompt};

/// Options for [`watch`]
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Route the user is considered to be on
    pub route: String,
    /// API endpoint polled with the bearer token; 401/403 trip the warning
    pub probe: Option<Url>,
    pub probe_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { route: "/".to_string(), probe: None, probe_interval: Duration::from_secs(60) }
    }
}

/// Watch the session until it expires or `shutdown` resolves.
///
/// Returns the login redirect target when the warning was acknowledged, or
/// `None` when there was no session or the watch was stopped.
///
/// # Errors
/// Returns an error if the probe client cannot be built or output fails.
pub async fn watch<W, S>(
    ctx: &AppContext,
    options: WatchOptions,
    shutdown: S,
    out: &mut W,
) -> anyhow::Result<Option<String>>
where
    W: Write,
    S: Future<Output = ()>,
{
    let Some(session) = ctx.refresh_session() else {
        writeln!(out, "Not signed in")?;
        return Ok(None);
    };

    let navigator = Arc::new(TerminalNavigator::at(options.route.as_str()));
    let prompt = Arc::new(TerminalPrompt::default());
    let coordinator =
        SessionTimeoutCoordinator::mount(ctx.coordinator_deps(navigator, prompt.clone()));

    writeln!(
        out,
        "Watching the session of {} (expires at {})",
        session.user.sub,
        format_epoch(session.tokens.expires_at_epoch_seconds)
    )?;
    out.flush()?;

    let probe = match options.probe {
        Some(url) => Some(spawn_probe(ctx, url, options.probe_interval)?),
        None => None,
    };

    let outcome = tokio::select! {
        trigger = prompt.wait_open() => {
            writeln!(out, "{}", trigger.describe())?;
            let target = coordinator.acknowledge();
            if let Some(target) = &target {
                writeln!(out, "Signed out. Sign in again at {target}")?;
            }
            target
        }
        () = shutdown => {
            debug!("watch interrupted");
            writeln!(out, "Stopped watching")?;
            coordinator.unmount();
            None
        }
    };

    if let Some(handle) = probe {
        handle.abort();
    }
    Ok(outcome)
}

fn spawn_probe(ctx: &AppContext, url: Url, interval: Duration) -> anyhow::Result<JoinHandle<()>> {
    let client = ctx.http_client_builder().max_attempts(1).build()?;
    Ok(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let request = client.request(Method::GET, url.clone());
            match client.send_authorized(request).await {
                Ok(response) => debug!(status = %response.status(), "session probe answered"),
                Err(err) => warn!(error = %err, "session probe failed"),
            }
        }
    }))
}
