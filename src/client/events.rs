use super::session::Status;
use crate::protocol::RpcResponse;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

/// Notification published by the engine as state changes happen.
///
/// Events are sent synchronously at the point of transition or response
/// arrival, so delivery order matches transition order.
#[derive(Debug, Clone)]
pub enum Event {
    /// A status transition, one per change.
    Status(Status),
    /// A completed rpc exchange, keyed by its correlation id.
    Completion { id: u64, response: RpcResponse },
}

pub(crate) struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        EventBus { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: Event) {
        // A send with no subscribers is not an error.
        let _ = self.tx.send(event);
    }
}
