//! External fragment resolution.
//!
//! Hosts plug their own variable system in through [`ExternalResolver`]. The
//! engine hands it `%fragment%` text and re-enters whatever comes back, so a
//! resolver may itself call back into the engine.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

/// Error returned by an external resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("{0}")]
    Failed(String),
    #[error("resolver unavailable")]
    Unavailable,
}

/// Resolves `%fragment%` tokens inside a string for a session.
pub trait ExternalResolver: Send + Sync {
    fn resolve(&self, session: Option<Uuid>, text: &str) -> Result<String, ResolverError>;
}

impl<F> ExternalResolver for F
where
    F: Fn(Option<Uuid>, &str) -> Result<String, ResolverError> + Send + Sync,
{
    fn resolve(&self, session: Option<Uuid>, text: &str) -> Result<String, ResolverError> {
        self(session, text)
    }
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl ExternalResolver for NoopResolver {
    fn resolve(&self, _session: Option<Uuid>, text: &str) -> Result<String, ResolverError> {
        Ok(text.to_string())
    }
}

static FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%([A-Za-z0-9_:.\-]+)%").expect("fragment pattern is valid"));

/// Replaces `%name%` tokens from a fixed table; unknown names stay as written.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    values: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl ExternalResolver for StaticResolver {
    fn resolve(&self, _session: Option<Uuid>, text: &str) -> Result<String, ResolverError> {
        Ok(FRAGMENT
            .replace_all(text, |caps: &regex::Captures<'_>| {
                self.values
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::new().with("player_name", "Steve");
        assert_eq!(
            resolver.resolve(None, "Hi %player_name%, %unknown%").unwrap(),
            "Hi Steve, %unknown%"
        );
        assert_eq!(resolver.resolve(None, "100%").unwrap(), "100%");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |_: Option<Uuid>, text: &str| -> Result<String, ResolverError> {
            if text.contains("boom") {
                Err(ResolverError::Failed("boom".into()))
            } else {
                Ok(text.to_uppercase())
            }
        };
        assert_eq!(resolver.resolve(None, "%x%").unwrap(), "%X%");
        assert_eq!(
            resolver.resolve(None, "%boom%").unwrap_err().to_string(),
            "boom"
        );
    }

    #[test]
    fn test_noop() {
        assert_eq!(NoopResolver.resolve(None, "%a%").unwrap(), "%a%");
    }
}
