//! `autonomos login`

use std::io::{BufRead, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{bail, Context};
use autonomos_common::auth::{parse_callback_url, AuthorizationCallback};
use autonomos_common::AuthSession;
use autonomos_domain::routes::CALLBACK_ROUTE;
use autonomos_infra::CallbackServer;
use tracing::{debug, info};
use url::Url;

use super::format_epoch;
use crate::context::AppContext;

/// How the redirect callback reaches this process
#[derive(Debug)]
pub enum CallbackInput<R> {
    /// Serve the redirect URI on a loopback address
    Loopback { addr: SocketAddr, timeout: Duration },
    /// Ask the user to paste the URL the browser landed on
    Paste(R),
}

/// Loopback address to serve when `redirect_uri` points at this machine.
///
/// Only plain `http` on `localhost`, `127.0.0.1` or `::1` with the callback
/// path qualifies. Anything else is handled by pasting.
#[must_use]
pub fn loopback_addr(redirect_uri: &str) -> Option<SocketAddr> {
    let url = Url::parse(redirect_uri).ok()?;
    if url.scheme() != "http" || url.path() != CALLBACK_ROUTE {
        return None;
    }
    let ip = match url.host_str()? {
        "localhost" | "127.0.0.1" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        "[::1]" => IpAddr::V6(std::net::Ipv6Addr::LOCALHOST),
        _ => return None,
    };
    Some(SocketAddr::new(ip, url.port_or_known_default()?))
}

/// Run a complete login and return the new session.
///
/// # Errors
/// Any `AuthError` from the flow, a failure to bind the loopback address, or
/// an unreadable paste.
pub async fn login<R, W>(
    ctx: &AppContext,
    input: CallbackInput<R>,
    out: &mut W,
) -> anyhow::Result<AuthSession>
where
    R: BufRead,
    W: Write,
{
    let callback = match input {
        CallbackInput::Loopback { addr, timeout } => {
            let mut server = CallbackServer::bind(addr)
                .await
                .with_context(|| format!("cannot listen for the login callback on {addr}"))?;
            let redirect = ctx.auth.start_login()?;
            writeln!(out, "Open this URL in your browser to sign in:\n\n  {}\n", redirect.url())?;
            writeln!(out, "Waiting for the identity provider on {} ...", server.redirect_uri())?;
            out.flush()?;

            let received = server.wait(timeout).await;
            server.shutdown().await?;
            received?
        }
        CallbackInput::Paste(reader) => {
            let redirect = ctx.auth.start_login()?;
            writeln!(out, "Open this URL in your browser to sign in:\n\n  {}\n", redirect.url())?;
            write!(out, "Paste the full URL you were redirected to: ")?;
            out.flush()?;
            read_pasted_callback(reader)?
        }
    };

    debug!("authorization callback received");
    let session = ctx.auth.finish_login(&callback).await?;
    ctx.current_session.set(session.clone());

    info!(expires_at = session.tokens.expires_at_epoch_seconds, "signed in");
    writeln!(out, "Signed in as {}", session.user.sub)?;
    if let Some(email) = &session.user.email {
        writeln!(out, "Email: {email}")?;
    }
    writeln!(out, "Session expires at {}", format_epoch(session.tokens.expires_at_epoch_seconds))?;
    Ok(session)
}

fn read_pasted_callback<R: BufRead>(mut reader: R) -> anyhow::Result<AuthorizationCallback> {
    let mut line = String::new();
    if reader.read_line(&mut line).context("failed to read the callback URL")? == 0 {
        bail!("no callback URL was entered");
    }
    Ok(parse_callback_url(line.trim())?)
}
