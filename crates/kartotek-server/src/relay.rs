use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// An opaque client event tagged with the connection that published it.
#[derive(Debug, Clone)]
pub struct RelayEvent {
    pub origin: Uuid,
    pub payload: String,
}

/// Best-effort fan-out of client events to all other connected clients.
///
/// A single broadcast channel carries every event; the websocket layer drops
/// events whose origin matches the receiving connection. No delivery
/// guarantees; lagging subscribers lose messages.
pub struct EventRelay {
    tx: broadcast::Sender<RelayEvent>,
}

impl EventRelay {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. No-op if nobody is subscribed.
    pub fn publish(&self, origin: Uuid, payload: String) {
        // Ignore send errors (no active receivers)
        let _ = self.tx.send(RelayEvent { origin, payload });
    }
}

impl Default for EventRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_and_receive() {
        let relay = EventRelay::new();
        let origin = Uuid::new_v4();

        let mut rx = relay.subscribe();
        relay.publish(origin, "hello".to_string());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.origin, origin);
        assert_eq!(event.payload, "hello");
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let relay = EventRelay::new();
        let origin = Uuid::new_v4();

        let mut rx1 = relay.subscribe();
        let mut rx2 = relay.subscribe();

        relay.publish(origin, "fan-out".to_string());

        assert_eq!(rx1.recv().await.unwrap().payload, "fan-out");
        assert_eq!(rx2.recv().await.unwrap().payload, "fan-out");
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers() {
        let relay = EventRelay::new();
        // Should not panic
        relay.publish(Uuid::new_v4(), "nobody listening".to_string());
    }

    #[tokio::test]
    async fn test_origin_distinguishes_publishers() {
        let relay = EventRelay::new();
        let sender_a = Uuid::new_v4();
        let sender_b = Uuid::new_v4();

        let mut rx = relay.subscribe();
        relay.publish(sender_a, "from a".to_string());
        relay.publish(sender_b, "from b".to_string());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.origin, sender_a);
        assert_eq!(second.origin, sender_b);
    }
}
