//! Loopback HTTP server that receives the OAuth redirect callback

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use autonomos_common::auth::{parse_callback_query, AuthorizationCallback};
use autonomos_common::AuthError;
use autonomos_domain::routes::CALLBACK_ROUTE;
use autonomos_domain::AutonomosError;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

type CallbackResult = Result<AuthorizationCallback, AuthError>;
type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>;

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Autonomos - Signed in</title></head>
<body><h1>Authorization Successful</h1><p>You can close this window and return to the terminal.</p></body>
</html>"#;

const FAILURE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Autonomos - Sign-in failed</title></head>
<body><h1>Authorization Failed</h1><p>The identity provider did not return a usable callback. Start the login again.</p></body>
</html>"#;

/// Serves `GET /auth/callback` until the first callback arrives
///
/// Only the first callback is delivered to [`wait`](Self::wait); later hits
/// get the result page but are otherwise ignored.
pub struct CallbackServer {
    addr: SocketAddr,
    result_rx: Option<oneshot::Receiver<CallbackResult>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CallbackServer {
    /// Bind the server to `addr` and start serving.
    ///
    /// Port 0 picks an ephemeral port; see [`redirect_uri`](Self::redirect_uri).
    ///
    /// # Errors
    /// Returns `AutonomosError::Network` if the address cannot be bound.
    pub async fn bind(addr: SocketAddr) -> Result<Self, AutonomosError> {
        let listener = TcpListener::bind(addr).await.map_err(|err| {
            AutonomosError::Network(format!("failed to bind OAuth loopback server: {err}"))
        })?;
        let addr = listener
            .local_addr()
            .map_err(|err| AutonomosError::Network(format!("failed to determine port: {err}")))?;

        let (result_tx, result_rx) = oneshot::channel();
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(result_tx)));
        let app = Router::new().route(CALLBACK_ROUTE, get(handle_callback)).with_state(slot);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.await.ok();
                })
                .await
            {
                error!(error = %err, "OAuth callback server error");
            }
        });

        info!(%addr, "OAuth callback server listening");
        Ok(Self {
            addr,
            result_rx: Some(result_rx),
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL the identity provider should redirect to.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("http://{}{CALLBACK_ROUTE}", self.addr)
    }

    /// Wait for the first callback.
    ///
    /// # Errors
    /// The callback's own [`AuthError`] (`ProviderRejected`,
    /// `MissingCallbackParams`), or `AuthError::Network` on timeout, if the
    /// server stopped, or if the callback was already taken.
    pub async fn wait(&mut self, timeout: Duration) -> CallbackResult {
        let rx = self.result_rx.take().ok_or_else(|| {
            AuthError::Network("authorization callback already consumed".to_string())
        })?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AuthError::Network(
                "callback server stopped before the authorization callback arrived".to_string(),
            )),
            Err(_) => {
                Err(AuthError::Network("timed out waiting for authorization callback".to_string()))
            }
        }
    }

    /// Shut down the loopback server gracefully.
    ///
    /// # Errors
    /// Returns `AutonomosError::Internal` if the server task panicked.
    pub async fn shutdown(mut self) -> Result<(), AutonomosError> {
        if let Some(tx) = self.shutdown_tx.take() {
            tx.send(()).ok();
        }

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    return Err(AutonomosError::Internal(format!(
                        "OAuth callback server panicked: {err}"
                    )));
                }
            }
        }

        debug!("OAuth callback server stopped");
        Ok(())
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            tx.send(()).ok();
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

impl std::fmt::Debug for CallbackServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackServer")
            .field("addr", &self.addr)
            .field("waiting", &self.result_rx.is_some())
            .finish_non_exhaustive()
    }
}

async fn handle_callback(
    State(slot): State<CallbackSlot>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Html<&'static str>) {
    let parsed = parse_callback_query(query.as_deref().unwrap_or_default());
    let page = match &parsed {
        Ok(_) => (StatusCode::OK, Html(SUCCESS_PAGE)),
        Err(err) => {
            info!(kind = %err.kind(), "authorization callback carried an error");
            (StatusCode::BAD_REQUEST, Html(FAILURE_PAGE))
        }
    };

    let sender = slot.lock().take();
    match sender {
        Some(tx) => {
            if tx.send(parsed).is_err() {
                debug!("authorization callback arrived after the waiter gave up");
            }
        }
        None => debug!("duplicate authorization callback ignored"),
    }
    page
}
