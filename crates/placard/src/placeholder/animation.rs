use std::time::{SystemTime, UNIX_EPOCH};

use super::substitute_args;

/// Milliseconds per game tick.
pub const TICK_MILLIS: u64 = 50;

/// Frames cycled on wall-clock time, `interval` ticks per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationPlaceholder {
    frames: Vec<String>,
    interval: u64,
}

impl AnimationPlaceholder {
    pub const DEFAULT_INTERVAL: u64 = 20;

    pub fn new(frames: Vec<String>, interval: u64) -> Self {
        Self {
            frames,
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// The frame shown at `millis` since the epoch.
    pub fn frame_at(&self, millis: u64) -> Option<&str> {
        if self.frames.is_empty() {
            return None;
        }
        let step = millis / (self.interval * TICK_MILLIS);
        let index = (step % self.frames.len() as u64) as usize;
        self.frames.get(index).map(String::as_str)
    }

    pub(crate) fn resolve(&self, args: &[String]) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.frame_at(millis)
            .map(|frame| substitute_args(frame, args, 0))
            .unwrap_or_default()
    }
}
