//! Bearer accessor and expiry reporting for API calls

use std::sync::Arc;

use autonomos_common::AuthSessionService;
use autonomos_core::SessionExpiryBus;
use autonomos_domain::SessionExpiredEvent;
use tracing::{debug, warn};

/// Bridges API responses and the session subsystem
#[derive(Clone)]
pub struct ApiSessionHook {
    service: AuthSessionService,
    bus: Arc<SessionExpiryBus>,
}

impl ApiSessionHook {
    #[must_use]
    pub const fn new(service: AuthSessionService, bus: Arc<SessionExpiryBus>) -> Self {
        Self { service, bus }
    }

    /// Identity token of the current valid session.
    ///
    /// Expired tokens are not returned, so an unauthenticated call still gets
    /// its 401 from the API.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.service.bearer_token()
    }

    /// `Bearer <token>` header value, if a session exists
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer_token().map(|token| format!("Bearer {token}"))
    }

    /// Report an API response status.
    ///
    /// 401 and 403 publish a [`SessionExpiredEvent::Http`]; anything else is
    /// ignored. Returns whether an event was published.
    pub fn report_status(&self, url: &str, status: u16) -> bool {
        let Some(event) = SessionExpiredEvent::from_http_status(status, url) else {
            return false;
        };
        warn!(status, url, "API rejected the session");
        let listeners = self.bus.publish(&event);
        debug!(listeners, "session expiry reported");
        true
    }
}

impl std::fmt::Debug for ApiSessionHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSessionHook").field("bus", &self.bus).finish_non_exhaustive()
    }
}
