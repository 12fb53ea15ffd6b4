//! Redirect callback parsing
//!
//! The identity provider sends the browser back with either
//! `?code=...&state=...` or `?error=...&error_description=...`. An `error`
//! always wins; anything else without both `code` and `state` is rejected.

use url::{form_urlencoded, Url};

use super::error::AuthError;
use super::types::AuthorizationCallback;

/// Parse the query string of a redirect callback.
///
/// A leading `?` is accepted.
///
/// # Errors
/// - [`AuthError::ProviderRejected`] if the query carries `error`
/// - [`AuthError::MissingCallbackParams`] if `code` or `state` is absent or
///   empty
pub fn parse_callback_query(query: &str) -> Result<AuthorizationCallback, AuthError> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut description = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AuthError::ProviderRejected { error, description });
    }

    match (code, state) {
        (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
            Ok(AuthorizationCallback { code, state })
        }
        _ => Err(AuthError::MissingCallbackParams),
    }
}

/// Parse a full redirect URL, e.g. one pasted from the browser address bar.
///
/// # Errors
/// Same as [`parse_callback_query`]. A string that is not a URL yields
/// [`AuthError::MissingCallbackParams`].
pub fn parse_callback_url(url: &str) -> Result<AuthorizationCallback, AuthError> {
    let parsed = Url::parse(url.trim()).map_err(|_| AuthError::MissingCallbackParams)?;
    parse_callback_query(parsed.query().unwrap_or_default())
}
