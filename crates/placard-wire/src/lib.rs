//! # Placard Wire - Chat Packet Plumbing
//!
//! `placard-wire` sits between a server's outbound chat packets and the
//! [`placard`] template engine.
//!
//! ## Core Concepts
//!
//! - [`Packet`]: a host-neutral view of a chat packet and its fields
//! - [`WireFormatDecoder`]: finds the chat text in whichever shape it travels
//! - [`BurstDetector`]: spots chat-clearing floods so effects can be muted
//! - [`ChatInterceptor`]: decode, resolve, write back, per packet
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use placard::{PlaceholderRegistry, Settings, TemplateEngine};
//! use placard_wire::{ChatInterceptor, Field, Outcome, Packet, PacketKind};
//! use uuid::Uuid;
//!
//! let engine = Arc::new(TemplateEngine::new(Arc::new(PlaceholderRegistry::new())));
//! let interceptor = ChatInterceptor::new(engine, &Settings::default());
//!
//! let mut packet = Packet::new(
//!     PacketKind::SystemChat,
//!     vec![Field::Text(r#"{"text":"$<gold>hi"}"#.to_string())],
//! );
//! assert_eq!(interceptor.on_packet(Uuid::new_v4(), &mut packet), Outcome::Rewritten);
//!
//! let Field::Text(json) = &packet.fields[0] else { unreachable!() };
//! let text = placard_render::json::from_str(json).unwrap();
//! assert_eq!(placard_render::Flavor::Legacy.encode(&text), "&6hi");
//! ```

pub mod bungee;
pub mod burst;
pub mod decoder;
mod error;
pub mod intercept;
pub mod packet;

pub use bungee::{BungeeClickEvent, BungeeComponent};
pub use burst::{BurstConfig, BurstDetector, Clock, ManualClock, SystemClock};
pub use decoder::{NativeCodec, WireFormatDecoder, WireMessage, WireShape};
pub use error::{Result, WireError};
pub use intercept::{ChatInterceptor, Outcome};
pub use packet::{Field, NativeComponent, Packet, PacketKind, WrappedChatComponent};
