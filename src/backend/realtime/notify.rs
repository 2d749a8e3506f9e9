/**
 * Change Notification Flow
 *
 * The glue between entity handlers and the hub: after a successful document
 * store write, the handler publishes the full new value to the scope that
 * owns the document. Notification strictly follows the write; a failed
 * write must never broadcast.
 */
use std::sync::Arc;

use serde_json::Value;

use crate::backend::realtime::hub::BroadcastHub;
use crate::shared::protocol::UpdateMessage;

/// Publishes stamped update frames to the hub
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    hub: Arc<BroadcastHub>,
}

impl ChangeNotifier {
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }

    /// Broadcast the full new value of a resource to its owning scope
    ///
    /// Returns the number of connections reached. Call this only after the
    /// store write has succeeded.
    pub fn publish(&self, scope: &str, kind: &str, data: Value) -> usize {
        let frame = UpdateMessage::update(kind, data).with_timestamp(now_rfc3339());
        let delivered = self.hub.broadcast(scope, &frame);
        tracing::info!(
            "[Notify] {} in scope {} reached {} connection(s)",
            kind,
            scope,
            delivered
        );
        delivered
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::realtime::hub::ConnectionId;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_publish_stamps_and_delivers() {
        let hub = Arc::new(BroadcastHub::new());
        let notifier = ChangeNotifier::new(hub.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register(ConnectionId::new(), "summer-fest", tx, None);

        let delivered = notifier.publish("summer-fest", "alert_update", json!({"level": "hold"}));
        assert_eq!(delivered, 1);

        let frame = UpdateMessage::from_json(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame.kind, "alert_update");
        assert_eq!(frame.data, Some(json!({"level": "hold"})));
        assert!(frame.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_publish_to_empty_scope_reaches_nobody() {
        let hub = Arc::new(BroadcastHub::new());
        let notifier = ChangeNotifier::new(hub);
        assert_eq!(notifier.publish("ghost-show", "alert_update", json!(null)), 0);
    }
}
