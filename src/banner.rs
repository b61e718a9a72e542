// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transient success/error banner with timed auto-dismissal.
//!
//! Showing a message cancels the pending dismissal of the previous one and
//! schedules a new one. A generation counter guards against a timer that has
//! already woken up clearing a newer message.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerMessage {
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Default)]
struct BannerSlot {
    message: Option<BannerMessage>,
    generation: u64,
}

#[derive(Debug)]
pub struct Banner {
    slot: Arc<Mutex<BannerSlot>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    dismiss_after: Duration,
}

impl Banner {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(BannerSlot::default())),
            timer: Mutex::new(None),
            dismiss_after,
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(BannerKind::Success, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(BannerKind::Error, text.into());
    }

    /// Message currently displayed, if any.
    pub fn current(&self) -> Option<BannerMessage> {
        lock(&self.slot).message.clone()
    }

    /// Hide the banner now and cancel its timer.
    pub fn dismiss(&self) {
        self.cancel_timer();
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.message = None;
    }

    fn show(&self, kind: BannerKind, text: String) {
        self.cancel_timer();

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.message = Some(BannerMessage { kind, text });
            slot.generation
        };

        // Outside a runtime (plain unit tests, shutdown) the message simply
        // stays until replaced.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime, banner will not auto-dismiss");
            return;
        };

        let slot = Arc::clone(&self.slot);
        let delay = self.dismiss_after;
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = lock(&slot);
            if slot.generation == generation {
                slot.message = None;
            }
        });
        *lock(&self.timer) = Some(task);
    }

    fn cancel_timer(&self) {
        if let Some(task) = lock(&self.timer).take() {
            task.abort();
        }
    }
}

impl Drop for Banner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Lock, ignoring poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
