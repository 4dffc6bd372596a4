use tokio::sync::broadcast;

/// Broadcast after any plan mutation so every open view converges:
/// subscribers drop their cached state for the owner and reload on their
/// next read.
#[derive(Clone, Debug)]
pub enum PlanEvent {
    Updated { owner_id: String },
}

/// Process-wide plan change feed. Cloning shares the underlying channel.
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<PlanEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: PlanEvent) {
        // Nobody listening is fine.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlanEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(16)
    }
}
