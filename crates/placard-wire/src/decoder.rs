//! Reading chat text out of packets and writing it back.
//!
//! The same chat packet kind arrives in different shapes depending on the
//! server version and which API produced it. [`WireFormatDecoder::decode`]
//! tries the shapes in a fixed order:
//!
//! 1. legacy components, when the packet has exactly one such field
//! 2. a wrapped chat component with non-empty JSON
//! 3. a raw string field holding component JSON
//! 4. a native component, when a [`NativeCodec`] is installed
//!
//! The first shape that yields text wins and, with caching on, is
//! remembered for the packet kind. A cached kind is only ever read with its
//! cached shape.

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use placard_render::{json, mini, RenderError, RichText};

use crate::bungee;
use crate::error::{Result, WireError};
use crate::packet::{Field, NativeComponent, Packet, PacketKind, WrappedChatComponent};

/// Where a packet keeps its chat text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireShape {
    LegacyComponents,
    WrappedComponent,
    JsonString,
    Native,
}

impl WireShape {
    /// Order in which shapes are tried.
    pub const ALL: [WireShape; 4] = [
        WireShape::LegacyComponents,
        WireShape::WrappedComponent,
        WireShape::JsonString,
        WireShape::Native,
    ];
}

/// Chat text lifted out of a packet.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub shape: WireShape,
    /// Index of the packet field the text was read from.
    pub field: usize,
    /// The component as mini markup, with content copied verbatim.
    pub text: String,
}

/// Converts the platform's native components to and from component JSON.
pub trait NativeCodec: Send + Sync {
    fn to_json(&self, component: &NativeComponent) -> std::result::Result<String, String>;
    fn from_json(&self, json: &str) -> std::result::Result<NativeComponent, String>;
}

pub struct WireFormatDecoder {
    cache: DashMap<PacketKind, WireShape>,
    cache_enabled: bool,
    native: Option<Arc<dyn NativeCodec>>,
}

impl std::fmt::Debug for WireFormatDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireFormatDecoder")
            .field("cached_kinds", &self.cache.len())
            .field("cache_enabled", &self.cache_enabled)
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl Default for WireFormatDecoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WireFormatDecoder {
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            cache: DashMap::new(),
            cache_enabled,
            native: None,
        }
    }

    pub fn with_native_codec(mut self, codec: Arc<dyn NativeCodec>) -> Self {
        self.native = Some(codec);
        self
    }

    /// The shape remembered for a packet kind, if any.
    pub fn cached_shape(&self, kind: PacketKind) -> Option<WireShape> {
        self.cache.get(&kind).map(|entry| *entry)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Extracts the chat text, or `None` when no shape yields any.
    pub fn decode(&self, packet: &Packet) -> Option<WireMessage> {
        if self.cache_enabled {
            if let Some(shape) = self.cached_shape(packet.kind) {
                debug!("{:?}: cached shape {:?}", packet.kind, shape);
                return self
                    .read(packet, shape)
                    .map(|(field, rich)| message(shape, field, &rich));
            }
        }

        for shape in WireShape::ALL {
            debug!("{:?}: trying {:?}", packet.kind, shape);
            if let Some((field, rich)) = self.read(packet, shape) {
                if self.cache_enabled {
                    self.cache.insert(packet.kind, shape);
                }
                return Some(message(shape, field, &rich));
            }
        }
        None
    }

    /// Reads one shape, returning the index of the field it came from.
    fn read(&self, packet: &Packet, shape: WireShape) -> Option<(usize, RichText)> {
        match shape {
            WireShape::LegacyComponents => {
                if packet.count(|f| matches!(f, Field::Legacy(_))) != 1 {
                    return None;
                }
                let (index, components) = find(packet, |f| match f {
                    Field::Legacy(components) => Some(components),
                    _ => None,
                })?;
                let rich = bungee::to_rich(components)
                    .map_err(|e| debug!("legacy components unreadable: {}", e))
                    .ok()?;
                Some((index, rich))
            }
            WireShape::WrappedComponent => {
                let (index, wrapped) = find(packet, |f| match f {
                    Field::WrappedChat(wrapped) if !wrapped.json.is_empty() => Some(wrapped),
                    _ => None,
                })?;
                let rich = json::from_str(&wrapped.json)
                    .map_err(|e| debug!("wrapped component unreadable: {}", e))
                    .ok()?;
                Some((index, rich))
            }
            WireShape::JsonString => {
                let (index, raw) = find(packet, |f| match f {
                    Field::Text(raw) if !raw.is_empty() => Some(raw),
                    _ => None,
                })?;
                let rich = match json::from_str(raw) {
                    Ok(rich) => rich,
                    Err(RenderError::Json(_)) => RichText::text(raw.as_str()),
                    Err(e) => {
                        debug!("json string not rewritable: {}", e);
                        return None;
                    }
                };
                Some((index, rich))
            }
            WireShape::Native => {
                let codec = self.native.as_ref()?;
                let (index, component) = find(packet, |f| match f {
                    Field::Native(component) => Some(component),
                    _ => None,
                })?;
                let text = codec
                    .to_json(component)
                    .map_err(|e| debug!("native component unreadable: {}", e))
                    .ok()?;
                let rich = json::from_str(&text)
                    .map_err(|e| debug!("native component json unreadable: {}", e))
                    .ok()?;
                Some((index, rich))
            }
        }
    }

    /// Writes `text` back into the field `source` was read from.
    pub fn encode(&self, packet: &mut Packet, source: &WireMessage, text: &RichText) -> Result<()> {
        let shape = source.shape;
        let slot = packet
            .fields
            .get_mut(source.field)
            .filter(|f| slot_matches(f, shape))
            .ok_or(WireError::MissingField(shape))?;

        *slot = match shape {
            WireShape::LegacyComponents => Field::Legacy(vec![bungee::from_rich(text)?]),
            WireShape::WrappedComponent => Field::WrappedChat(WrappedChatComponent {
                json: json::to_string(text),
            }),
            WireShape::JsonString => Field::Text(json::to_string(text)),
            WireShape::Native => {
                let codec = self.native.as_ref().ok_or(WireError::NoCodec)?;
                Field::Native(codec.from_json(&json::to_string(text)).map_err(WireError::Codec)?)
            }
        };
        Ok(())
    }
}

/// First field `pick` accepts, with its index.
fn find<'a, T>(packet: &'a Packet, pick: impl Fn(&'a Field) -> Option<T>) -> Option<(usize, T)> {
    packet
        .fields
        .iter()
        .enumerate()
        .find_map(|(index, f)| pick(f).map(|value| (index, value)))
}

fn slot_matches(field: &Field, shape: WireShape) -> bool {
    match shape {
        WireShape::LegacyComponents => matches!(field, Field::Legacy(_)),
        WireShape::WrappedComponent => matches!(field, Field::WrappedChat(_)),
        WireShape::JsonString => matches!(field, Field::Text(_)),
        WireShape::Native => matches!(field, Field::Native(_)),
    }
}

fn message(shape: WireShape, field: usize, rich: &RichText) -> WireMessage {
    WireMessage {
        shape,
        field,
        text: mini::serialize_verbatim(rich),
    }
}
