//! Recording doubles for the session UI ports.

use std::sync::Mutex;

use autonomos_core::{ExpiryPrompt, Navigator, WarningTrigger};

/// Navigator whose route tests set directly and that records redirects.
///
/// A redirect also becomes the current route, as it would in the browser.
#[derive(Debug)]
pub struct RecordingNavigator {
    route: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(route: &str) -> Self {
        Self { route: Mutex::new(route.to_string()), redirects: Mutex::new(Vec::new()) }
    }

    pub fn go_to(&self, route: &str) {
        *self.route.lock().unwrap() = route.to_string();
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_route(&self) -> String {
        self.route.lock().unwrap().clone()
    }

    fn redirect(&self, target: &str) {
        self.redirects.lock().unwrap().push(target.to_string());
        self.go_to(target);
    }
}

/// Prompt that records every open and close.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    opened: Mutex<Vec<WarningTrigger>>,
    closes: Mutex<usize>,
}

impl RecordingPrompt {
    pub fn opened(&self) -> Vec<WarningTrigger> {
        self.opened.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        *self.closes.lock().unwrap()
    }
}

impl ExpiryPrompt for RecordingPrompt {
    fn open(&self, trigger: &WarningTrigger) {
        self.opened.lock().unwrap().push(trigger.clone());
    }

    fn close(&self) {
        *self.closes.lock().unwrap() += 1;
    }
}
