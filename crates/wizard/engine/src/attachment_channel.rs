//! Scoped hand-back channel for finished references
//!
//! The screen composing a post creates one channel per Reference
//! wizard it launches and keeps the receiving half. The wizard owns
//! the sending half, which is consumed by its single send, so an
//! instance can deliver at most one event.

use tokio::sync::oneshot;
use wizard_types::BridgeEvent;

/// Create a fresh channel for one Reference wizard run
pub fn attachment_channel() -> (AttachmentSender, AttachmentReceiver) {
    let (tx, rx) = oneshot::channel();
    (AttachmentSender { tx }, AttachmentReceiver { rx })
}

/// Wizard side of the channel
#[derive(Debug)]
pub struct AttachmentSender {
    tx: oneshot::Sender<BridgeEvent>,
}

impl AttachmentSender {
    /// Deliver the event. Returns `false` when the composing screen is gone.
    pub fn send(self, event: BridgeEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Attachment receiver dropped; event discarded");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Composing-screen side of the channel
#[derive(Debug)]
pub struct AttachmentReceiver {
    rx: oneshot::Receiver<BridgeEvent>,
}

impl AttachmentReceiver {
    /// Wait for the wizard to finish. `None` if it ended without an event.
    pub async fn recv(self) -> Option<BridgeEvent> {
        self.rx.await.ok()
    }

    /// Poll without waiting
    pub fn try_recv(&mut self) -> Option<BridgeEvent> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizard_types::{Attachment, ReferenceKind};

    #[tokio::test]
    async fn test_single_delivery() {
        let (tx, rx) = attachment_channel();
        let attachment = Attachment {
            kind: ReferenceKind::Link,
            normalized_text: "https://example.com/".into(),
        };
        assert!(tx.send(BridgeEvent::Attached(attachment.clone())));
        assert_eq!(rx.recv().await, Some(BridgeEvent::Attached(attachment)));
    }

    #[tokio::test]
    async fn test_dropped_sender_yields_none() {
        let (tx, rx) = attachment_channel();
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_dropped_receiver() {
        let (tx, mut rx) = attachment_channel();
        assert_eq!(rx.try_recv(), None);
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.send(BridgeEvent::Removed));
    }
}
