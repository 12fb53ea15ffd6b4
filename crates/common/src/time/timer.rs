//! One-shot timers
//!
//! Provides cancellable timers on the current tokio runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::error::{CommonError, CommonResult};

/// A timer handle that can be used to cancel a timer
///
/// Cloning the handle shares the cancellation flag. Cancelling is idempotent
/// and also aborts the sleeping task so nothing lingers on the runtime.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TimerHandle {
    fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)), task: Arc::new(Mutex::new(None)) }
    }

    /// Cancel the timer
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }

    /// Check if the timer has been cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Run `callback` once after `duration` unless the returned handle is
/// cancelled first.
///
/// # Errors
/// Returns [`CommonError::Internal`] when called outside a tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use autonomos_common::time::timer::timeout;
///
/// #[tokio::main]
/// async fn main() {
///     let handle = timeout(Duration::from_secs(5), || {
///         tracing::info!("fired");
///     })
///     .expect("inside runtime");
///     handle.cancel();
/// }
/// ```
pub fn timeout<F>(duration: Duration, callback: F) -> CommonResult<TimerHandle>
where
    F: FnOnce() + Send + 'static,
{
    let runtime = Handle::try_current()
        .map_err(|err| CommonError::internal_with_context(err.to_string(), "timer"))?;

    let handle = TimerHandle::new();
    let flag = handle.cancelled.clone();

    let task = runtime.spawn(async move {
        sleep(duration).await;
        if !flag.load(Ordering::SeqCst) {
            callback();
        }
    });
    *handle.task.lock() = Some(task);

    Ok(handle)
}
