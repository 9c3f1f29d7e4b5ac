//! Finished references handed back to the composing screen

use crate::ReferenceKind;
use serde::{Deserialize, Serialize};

/// A finished link or citation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: ReferenceKind,
    pub normalized_text: String,
}

/// The single event a Reference wizard delivers to its caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeEvent {
    Attached(Attachment),
    Removed,
}

/// The composing screen's current attachment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachmentSlot {
    current: Option<Attachment>,
}

impl AttachmentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(attachment: Attachment) -> Self {
        Self {
            current: Some(attachment),
        }
    }

    pub fn apply(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Attached(a) => self.current = Some(a),
            BridgeEvent::Removed => self.current = None,
        }
    }

    pub fn current(&self) -> Option<&Attachment> {
        self.current.as_ref()
    }
}
