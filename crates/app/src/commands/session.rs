//! `autonomos status` and `autonomos logout`

use std::io::Write;

use serde::Serialize;
use tracing::info;

use super::format_epoch;
use crate::context::AppContext;

/// What `status` reports. Never carries token material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_epoch_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

/// Print the current session.
///
/// # Errors
/// Returns an error only if writing the output fails.
pub fn status<W: Write>(
    ctx: &AppContext,
    json: bool,
    out: &mut W,
) -> anyhow::Result<StatusReport> {
    let report = match ctx.refresh_session() {
        Some(session) => {
            let exp = session.tokens.expires_at_epoch_seconds;
            StatusReport {
                signed_in: true,
                subject: Some(session.user.sub),
                email: session.user.email,
                expires_at_epoch_seconds: Some(exp),
                expires_in_seconds: Some(exp - ctx.now()),
            }
        }
        None => StatusReport {
            signed_in: false,
            subject: None,
            email: None,
            expires_at_epoch_seconds: None,
            expires_in_seconds: None,
        },
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(report);
    }

    match (&report.subject, report.expires_at_epoch_seconds) {
        (Some(subject), Some(exp)) => {
            writeln!(out, "Signed in as {subject}")?;
            if let Some(email) = &report.email {
                writeln!(out, "Email: {email}")?;
            }
            writeln!(out, "Session expires at {}", format_epoch(exp))?;
        }
        _ => writeln!(out, "Not signed in")?,
    }
    Ok(report)
}

/// Sign out locally and print the identity provider logout URL.
///
/// # Errors
/// Returns an error only if writing the output fails.
pub fn logout<W: Write>(ctx: &AppContext, out: &mut W) -> anyhow::Result<String> {
    let redirect = ctx.auth.logout();
    ctx.current_session.clear();
    info!("local session cleared");

    writeln!(out, "Signed out locally.")?;
    writeln!(out, "To end the identity provider session too, open:\n\n  {}", redirect.url())?;
    Ok(redirect.into_url())
}
