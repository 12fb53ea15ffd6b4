//! Application routes relevant to authentication
//!
//! Auth routes are the login page and the OAuth callback. Expiry warnings are
//! suppressed on them, and they are never remembered as a return target.

use crate::constants::RETURN_TO_PARAM;

pub const LOGIN_ROUTE: &str = "/login";
pub const CALLBACK_ROUTE: &str = "/auth/callback";

/// Whether `path` is the login page, the OAuth callback, or below either.
///
/// Query string and fragment are ignored.
#[must_use]
pub fn is_auth_route(path: &str) -> bool {
    let path = strip_query_and_fragment(path);
    [LOGIN_ROUTE, CALLBACK_ROUTE].iter().any(|route| {
        path.strip_prefix(route).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Login URL that returns the user to `current_path` after signing in.
///
/// Auth routes and empty paths are not remembered.
///
/// # Examples
/// ```
/// use autonomos_domain::routes::login_redirect_target;
///
/// assert_eq!(login_redirect_target("/invoices"), "/login?returnTo=%2Finvoices");
/// assert_eq!(login_redirect_target("/login"), "/login");
/// ```
#[must_use]
pub fn login_redirect_target(current_path: &str) -> String {
    if current_path.trim().is_empty() || is_auth_route(current_path) {
        return LOGIN_ROUTE.to_string();
    }
    format!("{LOGIN_ROUTE}?{RETURN_TO_PARAM}={}", urlencoding::encode(current_path))
}

fn strip_query_and_fragment(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
