use super::{flavored, ResolveEnv};
use crate::resolver::ResolverError;

/// A styled template meant to be exported in one of the text flavors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredTextPlaceholder {
    template: String,
}

impl ColoredTextPlaceholder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
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

#[cfg(test)]
mod tests {
    use super::super::testing::{args, PlainEnv};
    use super::*;

    #[test]
    fn test_flavors() {
        let p = ColoredTextPlaceholder::new("<green><bold>OK</bold> {0}");
        assert_eq!(
            p.resolve(&PlainEnv, &args(&["l", "now"])).unwrap(),
            "&a&lOK&a now"
        );
        assert_eq!(
            p.resolve(&PlainEnv, &args(&["console", "now"])).unwrap(),
            "§a§lOK§a now"
        );
        assert_eq!(
            p.resolve(&PlainEnv, &args(&["mini", "now"])).unwrap(),
            "<green><bold>OK</bold> now"
        );
        assert_eq!(
            p.resolve(&PlainEnv, &args(&["now"])).unwrap(),
            "<green><bold>OK</bold> now"
        );
    }
}
