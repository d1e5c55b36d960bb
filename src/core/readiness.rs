use tokio::sync::watch;

/// Creates the readiness pair. The setter goes to the health monitor, flags go
/// to anything gated on readiness.
pub fn readiness_channel() -> (ReadinessSetter, ReadinessFlag) {
    let (tx, rx) = watch::channel(false);
    (ReadinessSetter { tx }, ReadinessFlag { rx })
}

/// Sole writer of the readiness state. Can only move it from false to true.
#[derive(Debug)]
pub struct ReadinessSetter {
    tx: watch::Sender<bool>,
}

impl ReadinessSetter {
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }

    pub fn flag(&self) -> ReadinessFlag {
        ReadinessFlag {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReadinessFlag {
    rx: watch::Receiver<bool>,
}

impl ReadinessFlag {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the server has been observed ready. Returns false if the
    /// setter was dropped before that happened.
    pub async fn wait_ready(&self) -> bool {
        let mut rx = self.rx.clone();
        // the guard borrows `rx`, so it must drop first
        let changed = rx.wait_for(|ready| *ready).await;
        changed.is_ok()
    }
}
