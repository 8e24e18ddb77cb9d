//! Per-subject multicast of generation events.
//!
//! Each subject gets its own `tokio::sync::broadcast` channel, created on
//! first subscription. Publishing to a subject with no subscribers is a
//! silent no-op; events are never queued for late joiners. Ordering follows
//! publish order per subject, which the registry makes single-writer.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::trace;

use forge_domain::GenerationEvent;

/// Buffer capacity per subject channel. A slow subscriber that falls more
/// than this far behind observes a `Lagged` error instead of blocking the
/// pipeline.
const CHANNEL_CAPACITY: usize = 64;

/// In-memory fan-out hub for generation events.
#[derive(Default)]
pub struct EventHub {
    channels: Mutex<HashMap<String, broadcast::Sender<GenerationEvent>>>,
}

impl EventHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all future events for a subject.
    ///
    /// Dropping the receiver unsubscribes; a subscriber that disconnects
    /// mid-job simply stops receiving events. Channels whose last receiver
    /// is gone are swept here before the new subscription is created.
    pub fn subscribe(&self, subject_id: &str) -> broadcast::Receiver<GenerationEvent> {
        let mut channels = self.channels.lock().expect("hub lock poisoned");
        channels.retain(|id, sender| sender.receiver_count() > 0 || id == subject_id);
        channels
            .entry(subject_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to every current subscriber of its subject.
    ///
    /// With zero subscribers the event is dropped and the subject's channel
    /// is pruned.
    pub fn publish(&self, event: GenerationEvent) {
        let mut channels = self.channels.lock().expect("hub lock poisoned");
        let subject_id = event.subject_id().to_string();
        if let Some(sender) = channels.get(&subject_id) {
            // A send error only means there are zero receivers
            if sender.send(event).is_err() {
                channels.remove(&subject_id);
                trace!(subject_id, "pruned idle event channel");
            }
        }
    }

    /// Number of live subscribers for a subject
    pub fn subscriber_count(&self, subject_id: &str) -> usize {
        self.channels
            .lock()
            .expect("hub lock poisoned")
            .get(subject_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_domain::ProgressEvent;

    fn progress(subject_id: &str, percent: u8) -> GenerationEvent {
        GenerationEvent::progress(subject_id, &ProgressEvent::new(percent, "stage", "msg"))
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_publish_order() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe("proj-1");

        hub.publish(progress("proj-1", 10));
        hub.publish(progress("proj-1", 25));

        assert_eq!(rx.recv().await.unwrap().percent(), Some(10));
        assert_eq!(rx.recv().await.unwrap().percent(), Some(25));
    }

    #[tokio::test]
    async fn test_subjects_are_isolated() {
        let hub = EventHub::new();
        let mut rx_one = hub.subscribe("proj-1");
        let mut rx_two = hub.subscribe("proj-2");

        hub.publish(progress("proj-1", 10));
        hub.publish(progress("proj-2", 95));

        assert_eq!(rx_one.recv().await.unwrap().subject_id(), "proj-1");
        assert_eq!(rx_two.recv().await.unwrap().subject_id(), "proj-2");
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_each_event_once() {
        let hub = EventHub::new();
        let mut rx_a = hub.subscribe("proj-1");
        let mut rx_b = hub.subscribe("proj-1");

        hub.publish(progress("proj-1", 40));

        assert_eq!(rx_a.recv().await.unwrap().percent(), Some(40));
        assert_eq!(rx_b.recv().await.unwrap().percent(), Some(40));
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_no_op() {
        let hub = EventHub::new();
        hub.publish(progress("proj-1", 10));
        assert_eq!(hub.subscriber_count("proj-1"), 0);

        // A later subscriber sees nothing from before subscription
        let mut rx = hub.subscribe("proj-1");
        hub.publish(progress("proj-1", 60));
        assert_eq!(rx.recv().await.unwrap().percent(), Some(60));
    }

    #[tokio::test]
    async fn test_dropped_subscriber_prunes_channel() {
        let hub = EventHub::new();
        let rx = hub.subscribe("proj-1");
        drop(rx);

        hub.publish(progress("proj-1", 10));
        assert_eq!(hub.subscriber_count("proj-1"), 0);
        assert!(!hub.channels.lock().unwrap().contains_key("proj-1"));
    }

    #[tokio::test]
    async fn test_subscribe_sweeps_receiverless_channels() {
        let hub = EventHub::new();
        let rx = hub.subscribe("proj-1");
        drop(rx);

        // Subscribing elsewhere reaps the abandoned channel without a publish
        let _rx_other = hub.subscribe("proj-2");
        assert!(!hub.channels.lock().unwrap().contains_key("proj-1"));
        assert!(hub.channels.lock().unwrap().contains_key("proj-2"));
    }
}
