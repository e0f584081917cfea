//! Sorted interval lookup.
//!
//! A [`RangeIndex`] maps inclusive `i64` intervals to values. Intervals are
//! written as text keys in configuration:
//!
//! | Key | Interval |
//! |-----|----------|
//! | `10-20` | `[10, 20]` |
//! | `-20` | `[i64::MIN, 20]` |
//! | `10-` | `[10, i64::MAX]` |
//!
//! Building sorts by `(start, end)` and keeps an entry only when it starts
//! after the previously kept entry ends, so for overlapping input the entry
//! with the lower start wins. Dropped entries are reported as diagnostics.
//!
//! # Example
//!
//! ```rust
//! use placard::range::{RangeEntry, RangeIndex};
//!
//! let (index, dropped) = RangeIndex::build(vec![
//!     RangeEntry::parse("1-100", "A").unwrap(),
//!     RangeEntry::parse("50-60", "B").unwrap(),
//! ]);
//! assert_eq!(index.lookup(55), Some(&"A"));
//! assert_eq!(dropped.len(), 1);
//! ```

use std::fmt;

/// One interval and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry<V> {
    pub start: i64,
    pub end: i64,
    pub value: V,
    /// Key text the entry came from, for diagnostics.
    pub source: String,
}

/// Why a range key could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeKeyError {
    Malformed(String),
    Inverted { key: String, start: i64, end: i64 },
}

impl fmt::Display for RangeKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKeyError::Malformed(key) => {
                write!(f, "malformed range key '{}' (expected A-B, -B or A-)", key)
            }
            RangeKeyError::Inverted { key, start, end } => {
                write!(f, "range key '{}' starts after it ends ({} > {})", key, start, end)
            }
        }
    }
}

impl std::error::Error for RangeKeyError {}

/// Parses `A-B`, `-B` or `A-` into inclusive bounds.
pub fn parse_range_key(key: &str) -> Result<(i64, i64), RangeKeyError> {
    let trimmed = key.trim();
    let malformed = || RangeKeyError::Malformed(key.to_string());
    let number = |s: &str| s.trim().parse::<i64>().map_err(|_| malformed());

    let (start, end) = if let Some(end) = trimmed.strip_prefix('-') {
        (i64::MIN, number(end)?)
    } else if let Some(start) = trimmed.strip_suffix('-') {
        (number(start)?, i64::MAX)
    } else {
        let (start, end) = trimmed.split_once('-').ok_or_else(malformed)?;
        (number(start)?, number(end)?)
    };

    if start > end {
        return Err(RangeKeyError::Inverted {
            key: key.to_string(),
            start,
            end,
        });
    }
    Ok((start, end))
}

impl<V> RangeEntry<V> {
    pub fn new(start: i64, end: i64, value: V) -> Self {
        Self {
            start,
            end,
            value,
            source: format!("{}-{}", start, end),
        }
    }

    /// Builds an entry from its configuration key.
    pub fn parse(key: &str, value: V) -> Result<Self, RangeKeyError> {
        let (start, end) = parse_range_key(key)?;
        Ok(Self {
            start,
            end,
            value,
            source: key.to_string(),
        })
    }
}

/// Non-overlapping intervals compiled for binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeIndex<V> {
    starts: Vec<i64>,
    ends: Vec<i64>,
    values: Vec<V>,
}

impl<V> Default for RangeIndex<V> {
    fn default() -> Self {
        Self {
            starts: Vec::new(),
            ends: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<V> RangeIndex<V> {
    /// Sorts and compiles entries, returning a diagnostic for each dropped one.
    pub fn build(entries: impl IntoIterator<Item = RangeEntry<V>>) -> (Self, Vec<String>) {
        let mut entries: Vec<RangeEntry<V>> = entries.into_iter().collect();
        entries.sort_by_key(|e| (e.start, e.end));

        let mut index = Self::default();
        let mut diagnostics = Vec::new();
        let mut kept: Option<(i64, String)> = None;

        for entry in entries {
            if entry.start > entry.end {
                diagnostics.push(format!(
                    "range '{}' starts after it ends, skipped",
                    entry.source
                ));
                continue;
            }
            if let Some((prev_end, prev_source)) = &kept {
                if entry.start <= *prev_end {
                    diagnostics.push(format!(
                        "range '{}' overlaps '{}', skipped",
                        entry.source, prev_source
                    ));
                    continue;
                }
            }
            kept = Some((entry.end, entry.source));
            index.starts.push(entry.start);
            index.ends.push(entry.end);
            index.values.push(entry.value);
        }

        (index, diagnostics)
    }

    /// Finds the value whose interval contains `x`.
    pub fn lookup(&self, x: i64) -> Option<&V> {
        // Number of starts <= x; the candidate is the last of them.
        let count = self.starts.partition_point(|&start| start <= x);
        let i = count.checked_sub(1)?;
        (x <= self.ends[i]).then(|| &self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Kept intervals in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64, &V)> {
        self.starts
            .iter()
            .zip(&self.ends)
            .zip(&self.values)
            .map(|((s, e), v)| (*s, *e, v))
    }
}
