//! Detection of blank-message bursts.
//!
//! Some plugins clear a player's chat by sending a flood of empty lines, or
//! lines made only of invisible formatting characters. Effects attached to
//! placeholders inside such a flood (titles, sounds, action bars) would fire
//! once per line, so the interceptor mutes them while a burst is active.
//!
//! A session becomes active on the first message carrying an invisible code
//! point, or after [`BurstConfig::threshold`] blank messages arriving no more
//! than [`BurstConfig::max_gap_ms`] apart. It returns to idle
//! [`BurstConfig::active_ms`] after the latest trigger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dashmap::DashMap;
use placard_markup::strip_tags;
use uuid::Uuid;

/// Millisecond time source.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Monotonic wall clock, counted from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock moved by hand, for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstConfig {
    /// Blank messages needed to trigger.
    pub threshold: u32,
    /// Largest gap between blanks that keeps the count going.
    pub max_gap_ms: u64,
    /// How long a trigger keeps the burst active.
    pub active_ms: u64,
    /// Sessions quiet for longer than this are dropped.
    pub idle_ms: u64,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            threshold: 20,
            max_gap_ms: 500,
            active_ms: 150,
            idle_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct BurstTracker {
    blank_count: u32,
    last_blank: Option<u64>,
    burst_start: Option<u64>,
    last_activity: u64,
}

impl BurstTracker {
    fn active_at(&self, now: u64, config: &BurstConfig) -> bool {
        self.burst_start
            .is_some_and(|start| now.saturating_sub(start) <= config.active_ms)
    }

    fn trigger(&mut self, now: u64) {
        self.burst_start = Some(now);
        self.blank_count = 0;
        self.last_blank = None;
    }
}

const INVISIBLE: &[char] = &[
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{180E}', '\u{00AD}',
    '\u{034F}', '\u{061C}', '\u{115F}', '\u{1160}', '\u{17B4}', '\u{17B5}',
];

/// Whether `c` is an invisible formatting code point.
pub fn is_invisible(c: char) -> bool {
    INVISIBLE.contains(&c) || ('\u{2061}'..='\u{2064}').contains(&c) || ('\u{206A}'..='\u{206F}').contains(&c)
}

fn is_blank(message: &str) -> bool {
    strip_tags(message).trim().is_empty()
}

/// Tracks per-session burst state.
#[derive(Debug)]
pub struct BurstDetector<C: Clock = SystemClock> {
    sessions: DashMap<Uuid, BurstTracker>,
    config: BurstConfig,
    clock: C,
}

impl Default for BurstDetector<SystemClock> {
    fn default() -> Self {
        Self::new(BurstConfig::default(), SystemClock::default())
    }
}

impl<C: Clock> BurstDetector<C> {
    pub fn new(config: BurstConfig, clock: C) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    /// Records one outbound message and reports whether the session is in a
    /// burst afterwards.
    pub fn check(&self, session: Uuid, message: &str) -> bool {
        let now = self.clock.now_millis();
        self.sweep(now);

        let mut tracker = self.sessions.entry(session).or_default();
        tracker.last_activity = now;

        if tracker.burst_start.is_some() && !tracker.active_at(now, &self.config) {
            tracker.burst_start = None;
        }

        if message.chars().any(is_invisible) {
            tracker.trigger(now);
            return true;
        }

        if is_blank(message) {
            let in_run = tracker
                .last_blank
                .is_some_and(|last| now.saturating_sub(last) <= self.config.max_gap_ms);
            tracker.blank_count = if in_run { tracker.blank_count + 1 } else { 1 };
            tracker.last_blank = Some(now);
            if tracker.blank_count >= self.config.threshold {
                tracker.trigger(now);
            }
        }

        tracker.active_at(now, &self.config)
    }

    /// Reports burst state without recording anything.
    pub fn is_active(&self, session: Uuid) -> bool {
        let now = self.clock.now_millis();
        self.sessions
            .get(&session)
            .is_some_and(|tracker| tracker.active_at(now, &self.config))
    }

    /// Ends any burst and clears the blank count.
    pub fn force_idle(&self, session: Uuid) {
        if let Some(mut tracker) = self.sessions.get_mut(&session) {
            tracker.burst_start = None;
            tracker.blank_count = 0;
            tracker.last_blank = None;
        }
    }

    /// Forgets a session, typically on disconnect.
    pub fn end_session(&self, session: Uuid) {
        self.sessions.remove(&session);
    }

    /// Number of sessions currently tracked.
    pub fn tracked(&self) -> usize {
        self.sessions.len()
    }

    fn sweep(&self, now: u64) {
        let idle = self.config.idle_ms;
        self.sessions
            .retain(|_, tracker| now.saturating_sub(tracker.last_activity) <= idle);
    }
}
