//! End-to-end tests for the terminal commands
//!
//! Runs the commands against a wiremock identity provider and API, with the
//! durable store in a temporary directory.

use std::io::{self, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use autonomos_app::commands::{self, CallbackInput, WatchOptions};
use autonomos_app::AppContext;
use autonomos_common::testing::{test_jwt, test_jwt_with_exp, MockClock};
use autonomos_common::AuthTokens;
use autonomos_domain::{AppConfig, AuthSettings, LoggingSettings, StorageSettings};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW: i64 = 1_700_000_000;

/// Output sink that also streams what was written to a channel.
struct StreamingOut {
    written: Vec<u8>,
    tx: mpsc::UnboundedSender<String>,
}

impl Write for StreamingOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        let _ = self.tx.send(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn config(dir: &TempDir, provider: &str, port: u16) -> AppConfig {
    AppConfig {
        auth: AuthSettings {
            domain: provider.to_string(),
            client_id: "client-123".into(),
            redirect_uri: format!("http://127.0.0.1:{port}/auth/callback"),
            logout_uri: format!("http://127.0.0.1:{port}/"),
            identity_provider: None,
            token_exchange_timeout_secs: Some(5),
        },
        storage: StorageSettings {
            data_dir: dir.path().to_path_buf(),
            origin: format!("http://127.0.0.1:{port}"),
        },
        logging: LoggingSettings::default(),
    }
}

fn context(config: AppConfig) -> (AppContext, MockClock) {
    let clock = MockClock::new(NOW);
    let ctx = AppContext::new_with_clock(config, Arc::new(clock.clone())).unwrap();
    (ctx, clock)
}

fn store_session(ctx: &AppContext, exp: i64) {
    ctx.token_store
        .write(&AuthTokens {
            id_token: test_jwt_with_exp("user-9", exp),
            access_token: "access-9".into(),
            refresh_token: None,
            expires_at_epoch_seconds: exp,
        })
        .unwrap();
}

/// Plays the browser: waits for the authorize URL, then hits the callback.
async fn browser(mut rx: mpsc::UnboundedReceiver<String>, redirect_uri: String) {
    let mut seen = String::new();
    while let Some(chunk) = rx.recv().await {
        seen.push_str(&chunk);
        if seen.contains("Waiting for") {
            break;
        }
    }

    let authorize = seen
        .split_whitespace()
        .find(|word| word.contains("/oauth2/authorize?"))
        .map(|word| Url::parse(word).unwrap())
        .unwrap();
    let state = authorize.query_pairs().find(|(k, _)| k == "state").unwrap().1.into_owned();

    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
        .get(format!("{redirect_uri}?code=code-1&state={state}"))
        .send()
        .await
        .unwrap();
}

/// Validates login, status and logout through the loopback callback.
///
/// # Test Steps
/// 1. Mock the token endpoint
/// 2. Run `login` while a task plays the browser
/// 3. Run `status --json`, then `logout`, then `status`
///
/// Assertions:
/// - Login prints the subject and email, and persists the session.
/// - Status reports the subject and the remaining lifetime without tokens.
/// - Logout prints the provider logout URL and signs out locally.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_status_logout() {
    let provider = MockServer::start().await;
    let id_token = test_jwt(&json!({
        "sub": "user-9",
        "email": "ana@autonomos.example",
        "exp": NOW + 3_600
    }));
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-9",
            "id_token": id_token
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let dir = TempDir::new().unwrap();
    let port = free_port();
    let (ctx, _clock) = context(config(&dir, &provider.uri(), port));
    let redirect_uri = ctx.config.auth.redirect_uri.clone();
    let addr = commands::loopback_addr(&redirect_uri).unwrap();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut out = StreamingOut { written: Vec::new(), tx };
    let browser = tokio::spawn(browser(rx, redirect_uri));

    let input: CallbackInput<&[u8]> =
        CallbackInput::Loopback { addr, timeout: Duration::from_secs(10) };
    let session = commands::login(&ctx, input, &mut out).await.unwrap();
    browser.await.unwrap();

    let printed = String::from_utf8(out.written).unwrap();
    assert!(printed.contains("Signed in as user-9"));
    assert!(printed.contains("Email: ana@autonomos.example"));
    assert_eq!(session.user.email.as_deref(), Some("ana@autonomos.example"));
    assert!(ctx.current_session.is_signed_in());
    assert!(ctx.token_store.read().is_some());

    let mut status_out = Vec::new();
    let report = commands::status(&ctx, true, &mut status_out).unwrap();
    let status_json: serde_json::Value = serde_json::from_slice(&status_out).unwrap();
    assert!(report.signed_in);
    assert_eq!(status_json["subject"], "user-9");
    assert_eq!(status_json["expiresInSeconds"], 3_600);
    assert!(!String::from_utf8(status_out).unwrap().contains("access-9"));

    let mut logout_out = Vec::new();
    let logout_url = commands::logout(&ctx, &mut logout_out).unwrap();
    assert!(logout_url.starts_with(&format!("{}/logout?client_id=client-123", provider.uri())));
    assert!(!ctx.current_session.is_signed_in());

    let mut after = Vec::new();
    assert!(!commands::status(&ctx, false, &mut after).unwrap().signed_in);
    assert_eq!(String::from_utf8(after).unwrap(), "Not signed in\n");
}

/// Validates a pasted provider error.
///
/// # Test Steps
/// 1. Run `login` in paste mode with an `error=access_denied` URL
///
/// Assertions:
/// - The command fails with the provider's error and stores nothing.
#[tokio::test]
async fn test_pasted_provider_error_fails_login() {
    let dir = TempDir::new().unwrap();
    let (ctx, _clock) = context(config(&dir, "auth.autonomos.example", free_port()));

    let pasted = "http://127.0.0.1/auth/callback?error=access_denied\n".as_bytes();
    let mut out = Vec::new();
    let err = commands::login(&ctx, CallbackInput::Paste(pasted), &mut out).await.unwrap_err();

    let auth = err.downcast_ref::<autonomos_common::AuthError>().unwrap();
    assert_eq!(auth.kind(), autonomos_common::ErrorKind::ProviderRejected);
    assert_eq!(ctx.token_store.read(), None);
}

/// Validates the proactive timer path of `watch`.
///
/// # Test Steps
/// 1. Store a session expiring 31 s from the mocked now
/// 2. Watch from `/invoices`
///
/// Assertions:
/// - The warning opens about one second later.
/// - The session is cleared and the target remembers `/invoices`.
#[tokio::test]
async fn test_watch_signs_out_when_timer_fires() {
    let dir = TempDir::new().unwrap();
    let (ctx, _clock) = context(config(&dir, "auth.autonomos.example", free_port()));
    store_session(&ctx, NOW + 31);

    let options = WatchOptions { route: "/invoices".into(), ..WatchOptions::default() };
    let mut out = Vec::new();
    let target = tokio::time::timeout(
        Duration::from_secs(10),
        commands::watch(&ctx, options, std::future::pending(), &mut out),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(target.as_deref(), Some("/login?returnTo=%2Finvoices"));
    assert_eq!(ctx.token_store.read(), None);
    assert!(!ctx.current_session.is_signed_in());
    assert!(String::from_utf8(out).unwrap().contains("about to expire"));
}

/// Validates the API probe path of `watch`.
///
/// # Test Steps
/// 1. Store a session valid for an hour
/// 2. Watch with a probe endpoint that answers 401
///
/// Assertions:
/// - The probe carries the bearer token and its 401 opens the warning.
/// - The watch ends signed out.
#[tokio::test]
async fn test_watch_probe_unauthorized_signs_out() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&api)
        .await;

    let dir = TempDir::new().unwrap();
    let (ctx, _clock) = context(config(&dir, "auth.autonomos.example", free_port()));
    store_session(&ctx, NOW + 3_600);

    let options = WatchOptions {
        route: "/".into(),
        probe: Some(Url::parse(&format!("{}/api/me", api.uri())).unwrap()),
        probe_interval: Duration::from_secs(30),
    };
    let mut out = Vec::new();
    let target = tokio::time::timeout(
        Duration::from_secs(10),
        commands::watch(&ctx, options, std::future::pending(), &mut out),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(target.as_deref(), Some("/login?returnTo=%2F"));
    assert_eq!(ctx.token_store.read(), None);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("HTTP 401"));

    let requests = api.received_requests().await.unwrap();
    let authorization = requests[0].headers.get("authorization").unwrap();
    assert!(authorization.to_str().unwrap().starts_with("Bearer "));
}

/// Validates stopping `watch`.
///
/// # Test Steps
/// 1. Watch a valid session with a shutdown signal that is already set
/// 2. Watch with no session at all
///
/// Assertions:
/// - Stopping returns no target and keeps the session.
/// - Without a session the command reports it and returns at once.
#[tokio::test]
async fn test_watch_stops_and_requires_session() {
    let dir = TempDir::new().unwrap();
    let (ctx, _clock) = context(config(&dir, "auth.autonomos.example", free_port()));

    let mut out = Vec::new();
    let none = commands::watch(&ctx, WatchOptions::default(), async {}, &mut out).await.unwrap();
    assert_eq!(none, None);
    assert_eq!(String::from_utf8(out).unwrap(), "Not signed in\n");

    store_session(&ctx, NOW + 3_600);
    let mut out = Vec::new();
    let stopped = commands::watch(&ctx, WatchOptions::default(), async {}, &mut out).await.unwrap();
    assert_eq!(stopped, None);
    assert!(String::from_utf8(out).unwrap().contains("Stopped watching"));
    assert!(ctx.token_store.read().is_some());
}
