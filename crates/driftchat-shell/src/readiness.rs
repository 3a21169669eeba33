use tokio::sync::watch;

/// One-shot liveness gate for client-side readiness.
///
/// Starts not-ready. [`ReadinessGate::mark_ready`] fires the single
/// false-to-true transition at the earliest point where client-only APIs
/// (document, storage) are safe to use; the transition never reverts for the
/// remaining process lifetime. While not ready, the root orchestrator renders
/// only the boot placeholder and performs no route dispatch or side effects.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    ready: watch::Sender<bool>,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessGate {
    #[must_use]
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self { ready }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Fire the transition. Returns `true` only for the call that flipped
    /// the gate; every later call is a no-op.
    pub fn mark_ready(&self) -> bool {
        self.ready.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    /// Await the transition. Returns immediately if the gate already fired.
    pub async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        while !*rx.borrow_and_update() {
            // The gate owns the sender, so `changed` can only fail once the
            // gate itself is gone.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
