use super::{flavored, ResolveEnv};
use crate::resolver::ResolverError;

/// A fixed template.
///
/// `args[0]` may name an output flavor (`legacy`, `console`, `mini`), in
/// which case the remaining arguments fill the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPlaceholder {
    template: String,
}

impl StringPlaceholder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Joins configuration lines with `\n`.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<S> = lines.into_iter().collect();
        let joined = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n");
        Self::new(joined)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn resolve(
        &self,
        env: &dyn ResolveEnv,
        args: &[String],
    ) -> Result<String, ResolverError> {
        flavored(env, &self.template, args)
    }
}
