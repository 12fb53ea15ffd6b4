//! Session timeout coordinator
//!
//! Owns the single expiry warning. It listens on the [`SessionExpiryBus`] for
//! reactive 401/403 reports, and it schedules a proactive timer that fires
//! [`EXPIRY_SAFETY_MARGIN_SECS`] before the current identity token expires.
//!
//! Rules:
//! - Only one warning is open at a time. Repeated events while `Triggered`
//!   are ignored.
//! - Events are ignored while the user is on an auth route.
//! - A new identity token always resets the machine and re-arms the timer,
//!   even if a stale timer or event is still in flight.
//!
//! The internal lock is never held while calling the prompt, the navigator or
//! the bus.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use autonomos_common::auth::{TokenStore, EXPIRY_SAFETY_MARGIN_SECS};
use autonomos_common::time::{timeout, Clock, TimerHandle};
use autonomos_common::AuthSession;
use autonomos_domain::routes::{is_auth_route, login_redirect_target};
use autonomos_domain::SessionExpiredEvent;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::bus::{SessionExpiryBus, Subscription};
use super::current::CurrentSession;
use super::ports::{ExpiryPrompt, Navigator};
use super::state::{CoordinatorState, WarningTrigger};

/// Collaborators the coordinator drives
#[derive(Clone)]
pub struct CoordinatorDeps {
    pub bus: Arc<SessionExpiryBus>,
    pub current_session: Arc<CurrentSession>,
    pub token_store: Arc<TokenStore>,
    pub navigator: Arc<dyn Navigator>,
    pub prompt: Arc<dyn ExpiryPrompt>,
    pub clock: Arc<dyn Clock>,
}

struct Machine {
    state: CoordinatorState,
    /// Bumped whenever the armed timer becomes stale
    generation: u64,
    id_token: Option<String>,
    timer: Option<TimerHandle>,
}

impl Machine {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

struct Shared {
    deps: CoordinatorDeps,
    machine: Mutex<Machine>,
}

/// Schedules the proactive expiry warning and de-duplicates expiry signals
///
/// Lives as long as the UI surface that mounted it. Dropping it (or calling
/// [`unmount`](Self::unmount)) cancels the timer and releases the bus
/// subscription.
#[must_use = "dropping the coordinator unmounts it"]
pub struct SessionTimeoutCoordinator {
    shared: Arc<Shared>,
    _subscription: Subscription,
}

impl SessionTimeoutCoordinator {
    /// Subscribe to the bus and arm for the session currently held, if any.
    pub fn mount(deps: CoordinatorDeps) -> Self {
        let initial = deps.current_session.get();
        let shared = Arc::new(Shared {
            deps,
            machine: Mutex::new(Machine {
                state: CoordinatorState::Idle,
                generation: 0,
                id_token: None,
                timer: None,
            }),
        });

        let weak = Arc::downgrade(&shared);
        let subscription = shared.deps.bus.subscribe(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_event(event);
            }
        });

        let coordinator = Self { shared, _subscription: subscription };
        if let Some(session) = initial {
            coordinator.session_changed(Some(&session));
        }
        debug!(state = coordinator.state().name(), "session timeout coordinator mounted");
        coordinator
    }

    /// Tell the coordinator the in-memory session changed.
    ///
    /// The same identity token as before is a no-op. A different token
    /// closes any open warning, returns to `Idle` and arms a fresh timer.
    /// `None` cancels the timer and leaves the machine `Idle`.
    pub fn session_changed(&self, session: Option<&AuthSession>) {
        self.shared.session_changed(session);
    }

    /// Confirm the open warning.
    ///
    /// Clears the token store and the in-memory session, closes the prompt
    /// and redirects to login, remembering the current route. Returns the
    /// redirect target, or `None` when no warning is open.
    pub fn acknowledge(&self) -> Option<String> {
        self.shared.acknowledge()
    }

    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.shared.machine.lock().state.clone()
    }

    /// Cancel the timer and release the bus subscription.
    pub fn unmount(self) {
        debug!("session timeout coordinator unmounted");
    }
}

impl Drop for SessionTimeoutCoordinator {
    fn drop(&mut self) {
        let mut machine = self.shared.machine.lock();
        machine.generation += 1;
        machine.cancel_timer();
    }
}

impl fmt::Debug for SessionTimeoutCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimeoutCoordinator").field("state", &self.state()).finish()
    }
}

impl Shared {
    fn handle_event(&self, event: &SessionExpiredEvent) {
        let route = self.deps.navigator.current_route();
        if is_auth_route(&route) {
            debug!(source = event.source(), route = %route, "session expiry ignored on auth route");
            return;
        }

        let trigger = WarningTrigger::from(event);
        {
            let mut machine = self.machine.lock();
            if machine.state.is_triggered() {
                debug!(source = event.source(), "session expiry ignored, warning already open");
                return;
            }
            // A timer event only counts for the expiry it was armed for.
            if let SessionExpiredEvent::Timer { expires_at_epoch_seconds } = event {
                let armed = CoordinatorState::Armed {
                    expires_at_epoch_seconds: *expires_at_epoch_seconds,
                };
                if machine.state != armed {
                    debug!(
                        expires_at = *expires_at_epoch_seconds,
                        state = machine.state.name(),
                        "stale session expiry timer event ignored"
                    );
                    return;
                }
            }
            info!(
                source = event.source(),
                from = machine.state.name(),
                "session expiry warning opened"
            );
            machine.cancel_timer();
            machine.state = CoordinatorState::Triggered { trigger: trigger.clone() };
        }
        self.deps.prompt.open(&trigger);
    }

    fn session_changed(self: &Arc<Self>, session: Option<&AuthSession>) {
        let token = session.map(|session| session.tokens.id_token.as_str());
        let close_prompt = {
            let mut machine = self.machine.lock();
            if machine.id_token.as_deref() == token {
                return;
            }

            machine.generation += 1;
            machine.cancel_timer();
            machine.id_token = token.map(str::to_owned);
            let was_triggered = machine.state.is_triggered();
            machine.state = CoordinatorState::Idle;

            match session {
                Some(session) => self.arm(&mut machine, session.tokens.expires_at_epoch_seconds),
                None => debug!("session cleared, coordinator idle"),
            }
            was_triggered
        };

        if close_prompt {
            info!("new session replaced the open expiry warning");
            self.deps.prompt.close();
        }
    }

    fn arm(self: &Arc<Self>, machine: &mut Machine, expires_at: i64) {
        let now = self.deps.clock.epoch_seconds();
        let delay_secs = (expires_at - EXPIRY_SAFETY_MARGIN_SECS - now).max(0);
        let generation = machine.generation;
        let weak = Arc::downgrade(self);

        let scheduled = timeout(Duration::from_secs(delay_secs.unsigned_abs()), move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_timer(generation, expires_at);
            }
        });

        match scheduled {
            Ok(handle) => {
                machine.timer = Some(handle);
                machine.state = CoordinatorState::Armed { expires_at_epoch_seconds: expires_at };
                debug!(expires_at, delay_secs, generation, "session expiry timer armed");
            }
            Err(err) => {
                warn!(error = %err, "could not arm session expiry timer");
            }
        }
    }

    fn on_timer(&self, generation: u64, expires_at: i64) {
        {
            let machine = self.machine.lock();
            let armed_for_this = machine.generation == generation
                && machine.state
                    == (CoordinatorState::Armed { expires_at_epoch_seconds: expires_at });
            if !armed_for_this {
                debug!(generation, "stale session expiry timer ignored");
                return;
            }
        }
        info!(expires_at, "session expiry timer fired");
        self.deps.bus.publish(&SessionExpiredEvent::timer(expires_at));
    }

    fn acknowledge(&self) -> Option<String> {
        {
            let mut machine = self.machine.lock();
            if !machine.state.is_triggered() {
                debug!(state = machine.state.name(), "acknowledge ignored, no open warning");
                return None;
            }
            machine.generation += 1;
            machine.cancel_timer();
            machine.state = CoordinatorState::Acknowledged;
        }

        if let Err(err) = self.deps.token_store.clear() {
            warn!(error = %err, "failed to clear stored tokens after session expiry");
        }
        self.deps.current_session.clear();
        self.deps.prompt.close();

        let target = login_redirect_target(&self.deps.navigator.current_route());
        info!(target = %target, "session expired, redirecting to login");
        self.deps.navigator.redirect(&target);
        Some(target)
    }
}
