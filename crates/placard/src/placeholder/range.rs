use super::substitute_args;
use crate::range::{RangeEntry, RangeIndex};

/// Numeric lookup: `args[0]` is matched against configured intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePlaceholder {
    index: RangeIndex<String>,
    default: String,
}

impl RangePlaceholder {
    /// Builds from configuration keys, returning diagnostics for dropped ones.
    pub fn from_keys<I, K, V>(entries: I, default: impl Into<String>) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut diagnostics = Vec::new();
        let mut parsed = Vec::new();
        for (key, value) in entries {
            match RangeEntry::parse(key.as_ref(), value.into()) {
                Ok(entry) => parsed.push(entry),
                Err(err) => diagnostics.push(format!("{}, skipped", err)),
            }
        }
        let (index, dropped) = RangeIndex::build(parsed);
        diagnostics.extend(dropped);
        (
            Self {
                index,
                default: default.into(),
            },
            diagnostics,
        )
    }

    pub fn index(&self) -> &RangeIndex<String> {
        &self.index
    }

    pub(crate) fn resolve(&self, args: &[String]) -> String {
        let found = args
            .first()
            .and_then(|arg| arg.trim().parse::<i64>().ok())
            .and_then(|x| self.index.lookup(x));
        match found {
            Some(template) => substitute_args(template, args, 1),
            None => self.default.clone(),
        }
    }
}
