//! A host-neutral view of an outbound chat packet.
//!
//! Hosts map their packet structures onto [`Packet`]: a kind plus the typed
//! fields the packet carries, in declaration order. Only the text-bearing
//! field types matter to the decoder; everything else is carried as
//! [`Field::Other`] and written back untouched.

use serde::{Deserialize, Serialize};

use crate::bungee::BungeeComponent;

/// Packet kinds that carry chat text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    Chat,
    SystemChat,
    DisguisedChat,
    KickDisconnect,
}

/// A component wrapped by the host's protocol library, kept as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedChatComponent {
    pub json: String,
}

/// A component in the platform's own binary form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeComponent {
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// A plain string field; for chat packets, component JSON.
    Text(String),
    WrappedChat(WrappedChatComponent),
    /// Legacy chat components.
    Legacy(Vec<BungeeComponent>),
    Native(NativeComponent),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub kind: PacketKind,
    pub fields: Vec<Field>,
}

impl Packet {
    pub fn new(kind: PacketKind, fields: Vec<Field>) -> Self {
        Self { kind, fields }
    }

    pub(crate) fn count(&self, pred: impl Fn(&Field) -> bool) -> usize {
        self.fields.iter().filter(|f| pred(f)).count()
    }
}
