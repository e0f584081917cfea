//! The outbound chat hook.
//!
//! [`ChatInterceptor::on_packet`] is what a host calls for every chat packet
//! it is about to send. Messages that start with the symbol prefix (after
//! any leading style tags) or reference a placeholder inline are resolved
//! through the template engine and written back in the shape they came in.

use std::sync::Arc;

use log::{debug, warn};
use placard::{ResolveContext, Settings, TemplateEngine};
use placard_markup::{Token, Tokenizer};
use uuid::Uuid;

use crate::burst::{BurstDetector, Clock, SystemClock};
use crate::decoder::{NativeCodec, WireFormatDecoder};
use crate::packet::Packet;

/// What happened to a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Left untouched.
    PassThrough,
    /// Text replaced by the resolved message.
    Rewritten,
    /// The message resolved to nothing; the host should drop the packet.
    Cancelled,
}

pub struct ChatInterceptor<C: Clock = SystemClock> {
    decoder: WireFormatDecoder,
    detector: BurstDetector<C>,
    engine: Arc<TemplateEngine>,
    symbol_prefix: String,
}

impl<C: Clock> std::fmt::Debug for ChatInterceptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatInterceptor")
            .field("decoder", &self.decoder)
            .field("symbol_prefix", &self.symbol_prefix)
            .finish_non_exhaustive()
    }
}

impl ChatInterceptor<SystemClock> {
    pub fn new(engine: Arc<TemplateEngine>, settings: &Settings) -> Self {
        Self::with_detector(engine, settings, BurstDetector::default())
    }
}

impl<C: Clock> ChatInterceptor<C> {
    pub fn with_detector(
        engine: Arc<TemplateEngine>,
        settings: &Settings,
        detector: BurstDetector<C>,
    ) -> Self {
        Self {
            decoder: WireFormatDecoder::new(settings.cache_wire_shapes),
            detector,
            engine,
            symbol_prefix: settings.symbol_prefix.clone(),
        }
    }

    pub fn with_native_codec(mut self, codec: Arc<dyn NativeCodec>) -> Self {
        self.decoder = self.decoder.with_native_codec(codec);
        self
    }

    pub fn decoder(&self) -> &WireFormatDecoder {
        &self.decoder
    }

    pub fn detector(&self) -> &BurstDetector<C> {
        &self.detector
    }

    /// Forgets per-session state when a player leaves.
    pub fn end_session(&self, session: Uuid) {
        self.detector.end_session(session);
    }

    /// Processes one outbound packet for `session`.
    pub fn on_packet(&self, session: Uuid, packet: &mut Packet) -> Outcome {
        let Some(message) = self.decoder.decode(packet) else {
            debug!("{:?}: no chat text", packet.kind);
            return Outcome::PassThrough;
        };
        if message.text.is_empty() {
            return Outcome::PassThrough;
        }

        let burst = self.detector.check(session, &message.text);

        let template = match strip_symbol(&message.text, &self.symbol_prefix) {
            Some(stripped) => stripped,
            None if message.text.contains("<p:") => message.text.clone(),
            None => {
                debug!("not marked for processing: {}", message.text);
                return Outcome::PassThrough;
            }
        };

        let ctx = ResolveContext::for_session(session).muted(burst);
        let resolved = self.engine.resolve(&template, ctx);
        if resolved.is_empty() {
            debug!("{:?}: resolved to nothing, cancelling", packet.kind);
            return Outcome::Cancelled;
        }

        match self.decoder.encode(packet, &message, &resolved) {
            Ok(()) => {
                debug!("{:?}: rewritten as {:?}", packet.kind, message.shape);
                Outcome::Rewritten
            }
            Err(e) => {
                warn!("could not write {:?} back: {}", message.shape, e);
                Outcome::PassThrough
            }
        }
    }
}

/// Removes the symbol prefix from the first text after any leading tags.
fn strip_symbol(message: &str, prefix: &str) -> Option<String> {
    let mut offset = 0;
    for token in Tokenizer::new(message) {
        match token {
            Token::Open(_) | Token::Close { .. } => offset += token.source().len(),
            _ => break,
        }
    }
    message[offset..].strip_prefix(prefix).map(|rest| {
        let mut out = String::with_capacity(message.len());
        out.push_str(&message[..offset]);
        out.push_str(rest);
        out
    })
}
