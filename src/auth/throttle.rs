use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::settings::AuthSettings;

/// Failed login attempts per email inside a sliding window.
///
/// Lives in process memory, so counts reset on restart and are not shared
/// between instances.
pub struct LoginThrottle {
    max_failures: usize,
    window: Duration,
    failures: Mutex<HashMap<String, Vec<Instant>>>,
}

impl LoginThrottle {
    pub fn new(max_failures: usize, window: Duration) -> Self {
        Self {
            max_failures,
            window,
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            settings.max_failed_logins,
            Duration::from_secs(settings.failure_window_secs),
        )
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.is_locked_at(key, Instant::now())
    }

    pub fn is_locked_at(&self, key: &str, now: Instant) -> bool {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        let Some(attempts) = failures.get_mut(key) else {
            return false;
        };
        attempts.retain(|at| now.saturating_duration_since(*at) < self.window);
        if attempts.is_empty() {
            failures.remove(key);
            return false;
        }
        attempts.len() >= self.max_failures
    }

    pub fn record_failure(&self, key: &str) {
        self.record_failure_at(key, Instant::now());
    }

    /// Also drops every email whose failures all left the window, so the map
    /// only holds recently failing keys.
    pub fn record_failure_at(&self, key: &str, at: Instant) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.retain(|_, attempts| {
            attempts.retain(|t| at.saturating_duration_since(*t) < self.window);
            !attempts.is_empty()
        });
        failures.entry(key.to_string()).or_default().push(at);
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Forget the failures of `key`, called after a successful login.
    pub fn reset(&self, key: &str) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.remove(key);
    }
}
