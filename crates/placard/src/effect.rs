//! Side effects requested by templates.
//!
//! The `title`, `subtitle`, `actionbar` and `sound` tags do not produce text.
//! They describe an [`Effect`] for the session being rendered, which the
//! engine hands to an [`EffectSink`].

use parking_lot::Mutex;
use placard_render::RichText;
use uuid::Uuid;

/// Title timings in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTimes {
    pub fade_in: u32,
    pub stay: u32,
    pub fade_out: u32,
}

impl Default for TitleTimes {
    fn default() -> Self {
        Self {
            fade_in: 10,
            stay: 70,
            fade_out: 20,
        }
    }
}

impl TitleTimes {
    /// Parses three tick counts, falling back per field to the defaults.
    pub fn parse(fade_in: &str, stay: &str, fade_out: &str) -> Self {
        let defaults = Self::default();
        let ticks = |s: &str, fallback: u32| s.trim().parse().unwrap_or(fallback);
        Self {
            fade_in: ticks(fade_in, defaults.fade_in),
            stay: ticks(stay, defaults.stay),
            fade_out: ticks(fade_out, defaults.fade_out),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Title {
        title: Option<RichText>,
        subtitle: Option<RichText>,
        times: TitleTimes,
    },
    ActionBar(RichText),
    Sound {
        id: String,
        volume: f32,
        pitch: f32,
    },
}

impl Effect {
    /// Whether the effect is suppressed while a burst is active.
    pub fn is_ambient(&self) -> bool {
        matches!(self, Effect::ActionBar(_) | Effect::Sound { .. })
    }
}

/// Performs effects for a session.
pub trait EffectSink: Send + Sync {
    fn perform(&self, session: Uuid, effect: Effect);
}

/// Drops every effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EffectSink for NoopSink {
    fn perform(&self, _session: Uuid, _effect: Effect) {}
}

/// Keeps every effect for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    effects: Mutex<Vec<(Uuid, Effect)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<(Uuid, Effect)> {
        std::mem::take(&mut *self.effects.lock())
    }

    pub fn len(&self) -> usize {
        self.effects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.lock().is_empty()
    }
}

impl EffectSink for RecordingSink {
    fn perform(&self, session: Uuid, effect: Effect) {
        self.effects.lock().push((session, effect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_times() {
        assert_eq!(TitleTimes::parse("5", "40", "5"), TitleTimes {
            fade_in: 5,
            stay: 40,
            fade_out: 5
        });
        assert_eq!(TitleTimes::parse("x", "40", "-1"), TitleTimes {
            fade_in: 10,
            stay: 40,
            fade_out: 20
        });
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        let session = Uuid::new_v4();
        sink.perform(session, Effect::ActionBar(RichText::text("hi")));
        assert_eq!(sink.len(), 1);
        let recorded = sink.take();
        assert_eq!(recorded[0].0, session);
        assert!(recorded[0].1.is_ambient());
        assert!(sink.is_empty());
    }
}
