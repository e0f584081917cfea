//! The placeholder registry and the query argument protocol.
//!
//! The registry is read on every message and replaced wholesale on reload.
//! Readers take a snapshot through [`ArcSwap`] and never block the writer;
//! [`PlaceholderRegistry::replace_all`] swaps in a complete new set at once.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::placeholder::{Placeholder, PlaceholderType};

type Table = HashMap<String, Arc<Placeholder>>;

/// Placeholders by name.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    table: ArcSwap<Table>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding `placeholders`; later duplicates win.
    pub fn with_placeholders(placeholders: impl IntoIterator<Item = Placeholder>) -> Self {
        let registry = Self::new();
        registry.replace_all(placeholders);
        registry
    }

    pub fn get(&self, name: &str) -> Option<Arc<Placeholder>> {
        self.table.load().get(name).cloned()
    }

    /// Adds or replaces one placeholder. Returns the one it replaced.
    pub fn register(&self, placeholder: Placeholder) -> Option<Arc<Placeholder>> {
        let placeholder = Arc::new(placeholder);
        let mut replaced = None;
        self.table.rcu(|table| {
            let mut next = Table::clone(table);
            replaced = next.insert(placeholder.name().to_string(), Arc::clone(&placeholder));
            next
        });
        replaced
    }

    /// Atomically swaps in a whole new set.
    pub fn replace_all(&self, placeholders: impl IntoIterator<Item = Placeholder>) {
        let table: Table = placeholders
            .into_iter()
            .map(|p| (p.name().to_string(), Arc::new(p)))
            .collect();
        self.table.store(Arc::new(table));
    }

    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.load().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Splits like `String.split` in the JVM: trailing empty pieces are dropped,
/// except that an empty input yields one empty piece.
pub fn split_trimmed(text: &str, delimiter: &str) -> Vec<String> {
    let mut parts: Vec<String> = text.split(delimiter).map(str::to_string).collect();
    if text.is_empty() {
        return parts;
    }
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

fn is_flavor_keyword(arg: &str) -> bool {
    matches!(arg, "m" | "l" | "c" | "mini" | "legacy" | "console")
}

fn is_math_modifier(arg: &str) -> bool {
    arg.ends_with("dp") || matches!(arg, "commas" | "fixed" | "formatted")
}

/// Turns the `_`-separated query tokens that follow a placeholder name into
/// arguments for a placeholder of kind `kind`.
///
/// One token is split on `::`. With more tokens, the first is joined to the
/// rest with `::` when it is a selector the kind understands (a flavor for
/// Color and ColoredText, a modifier for Math) and with `_` otherwise; the
/// result is then split on `_` for ProgressBar and on `::` for every other
/// kind.
///
/// # Example
///
/// ```rust
/// use placard::placeholder::PlaceholderType;
/// use placard::registry::query_args;
///
/// assert_eq!(
///     query_args(PlaceholderType::Color, &["mini", "extra", "text"]),
///     vec!["mini", "extra_text"],
/// );
/// assert_eq!(
///     query_args(PlaceholderType::String, &["a::b", "c"]),
///     vec!["a", "b_c"],
/// );
/// ```
pub fn query_args(kind: PlaceholderType, params: &[&str]) -> Vec<String> {
    match params {
        [] => Vec::new(),
        [only] => split_trimmed(only, "::"),
        [first, rest @ ..] => {
            let lower = first.to_lowercase();
            let selector = match kind {
                PlaceholderType::Color | PlaceholderType::ColoredText => is_flavor_keyword(&lower),
                PlaceholderType::Math => is_math_modifier(&lower),
                _ => false,
            };
            let separator = if selector { "::" } else { "_" };
            let joined = format!("{}{}{}", first, separator, rest.join("_"));
            match kind {
                PlaceholderType::ProgressBar => split_trimmed(&joined, "_"),
                _ => split_trimmed(&joined, "::"),
            }
        }
    }
}
