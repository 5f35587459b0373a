use std::collections::HashMap;

use gloo::timers::callback::Timeout;

/// Keyed cancellable timers: scheduling under a key cancels whatever was
/// still pending under that key.
#[derive(Default)]
pub struct Debouncer {
    pending: HashMap<&'static str, Timeout>,
}

impl Debouncer {
    pub fn schedule<F>(&mut self, key: &'static str, delay_ms: u32, action: F)
    where
        F: FnOnce() + 'static,
    {
        if let Some(previous) = self.pending.insert(key, Timeout::new(delay_ms, action)) {
            let _ = previous.cancel();
        }
    }

    pub fn cancel(&mut self, key: &'static str) {
        if let Some(pending) = self.pending.remove(key) {
            let _ = pending.cancel();
        }
    }
}
