//! Requirement rules gating placeholder output.
//!
//! A rule compares an *input* template against an *output* template. Both
//! get `{n}` substitution from the placeholder arguments and then pass
//! through the external resolver, so `%player_level%` style fragments work
//! on either side.
//!
//! | Kind | Comparison |
//! |------|------------|
//! | `==` `!=` `>` `>=` `<` `<=` | both sides parsed as `f64`; unparsable fails |
//! | `string equals`, `string equals ignorecase`, `string contains` | text |
//! | `regex matches` | input fully matches the output pattern |
//!
//! Text and regex kinds accept a leading `!` to negate.

use std::fmt;

use regex::Regex;

use crate::placeholder::{substitute_args, ResolveEnv};
use crate::resolver::ResolverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl NumberOp {
    fn apply(self, a: f64, b: f64) -> bool {
        match self {
            NumberOp::Eq => a == b,
            NumberOp::Ne => a != b,
            NumberOp::Gt => a > b,
            NumberOp::Ge => a >= b,
            NumberOp::Lt => a < b,
            NumberOp::Le => a <= b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Equals,
    EqualsIgnoreCase,
    Contains,
}

/// The comparison a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    Number(NumberOp),
    Text { op: TextOp, negated: bool },
    Regex { negated: bool },
}

impl RequirementKind {
    /// Parses a rule `type`, case-insensitively.
    pub fn parse(identifier: &str) -> Option<RequirementKind> {
        let lower = identifier.trim().to_lowercase();
        let number = match lower.as_str() {
            "==" => Some(NumberOp::Eq),
            "!=" => Some(NumberOp::Ne),
            ">" => Some(NumberOp::Gt),
            ">=" => Some(NumberOp::Ge),
            "<" => Some(NumberOp::Lt),
            "<=" => Some(NumberOp::Le),
            _ => None,
        };
        if let Some(op) = number {
            return Some(RequirementKind::Number(op));
        }

        let (negated, rest) = match lower.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, lower.as_str()),
        };
        match rest {
            "string equals" => Some(RequirementKind::Text {
                op: TextOp::Equals,
                negated,
            }),
            "string equals ignorecase" => Some(RequirementKind::Text {
                op: TextOp::EqualsIgnoreCase,
                negated,
            }),
            "string contains" => Some(RequirementKind::Text {
                op: TextOp::Contains,
                negated,
            }),
            "regex matches" => Some(RequirementKind::Regex { negated }),
            _ => None,
        }
    }

    fn compare(self, input: &str, output: &str) -> bool {
        match self {
            RequirementKind::Number(op) => {
                match (input.trim().parse::<f64>(), output.trim().parse::<f64>()) {
                    (Ok(a), Ok(b)) => op.apply(a, b),
                    _ => false,
                }
            }
            RequirementKind::Text { op, negated } => {
                let hit = match op {
                    TextOp::Equals => input == output,
                    TextOp::EqualsIgnoreCase => input.to_lowercase() == output.to_lowercase(),
                    TextOp::Contains => input.contains(output),
                };
                hit != negated
            }
            RequirementKind::Regex { negated } => match full_match(output) {
                Ok(pattern) => pattern.is_match(input) != negated,
                Err(_) => false,
            },
        }
    }
}

fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Why a rule could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    UnknownKind(String),
    InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for RequirementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementError::UnknownKind(kind) => write!(f, "unknown requirement type '{}'", kind),
            RequirementError::InvalidPattern { pattern, message } => {
                write!(f, "invalid regex '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for RequirementError {}

/// One requirement rule.
#[derive(Debug, Clone)]
pub struct Requirement {
    kind: RequirementKind,
    input: String,
    output: String,
    deny: String,
    /// Compiled once for regex rules whose pattern has nothing to resolve.
    pattern: Option<Regex>,
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.input == other.input
            && self.output == other.output
            && self.deny == other.deny
    }
}

impl Eq for Requirement {}

impl Requirement {
    /// Builds a rule.
    ///
    /// Static regex patterns are compiled here, once, so that a bad pattern
    /// is reported at load time. Patterns containing `{n}` or `%fragment%`
    /// are compiled on each check after resolving.
    pub fn new(
        kind: &str,
        input: impl Into<String>,
        output: impl Into<String>,
        deny: impl Into<String>,
    ) -> Result<Self, RequirementError> {
        let parsed =
            RequirementKind::parse(kind).ok_or_else(|| RequirementError::UnknownKind(kind.to_string()))?;
        let output = output.into();

        let pattern = if matches!(parsed, RequirementKind::Regex { .. }) && !output.contains(['{', '%']) {
            let compiled = full_match(&output).map_err(|e| RequirementError::InvalidPattern {
                pattern: output.clone(),
                message: e.to_string(),
            })?;
            Some(compiled)
        } else {
            None
        };

        Ok(Self {
            kind: parsed,
            input: input.into(),
            output,
            deny: deny.into(),
            pattern,
        })
    }

    pub fn kind(&self) -> RequirementKind {
        self.kind
    }

    pub fn deny(&self) -> &str {
        &self.deny
    }

    /// The pattern compiled at construction, if the rule has one.
    pub fn compiled_pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Resolves both sides and compares them.
    pub fn check(&self, env: &dyn ResolveEnv, args: &[String]) -> Result<bool, ResolverError> {
        let input = env.expand_external(&substitute_args(&self.input, args, 0))?;
        if let (RequirementKind::Regex { negated }, Some(pattern)) = (self.kind, &self.pattern) {
            return Ok(pattern.is_match(&input) != negated);
        }
        let output = env.expand_external(&substitute_args(&self.output, args, 0))?;
        Ok(self.kind.compare(&input, &output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::testing::{args, PlainEnv};

    fn passes(kind: &str, input: &str, output: &str) -> bool {
        Requirement::new(kind, input, output, "no")
            .unwrap()
            .check(&PlainEnv, &[])
            .unwrap()
    }

    // ==================== Kind Parsing Tests ====================

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            RequirementKind::parse(">="),
            Some(RequirementKind::Number(NumberOp::Ge))
        );
        assert_eq!(
            RequirementKind::parse("!String Equals IgnoreCase"),
            Some(RequirementKind::Text {
                op: TextOp::EqualsIgnoreCase,
                negated: true
            })
        );
        assert_eq!(
            RequirementKind::parse("regex matches"),
            Some(RequirementKind::Regex { negated: false })
        );
        assert_eq!(RequirementKind::parse("string starts"), None);
        assert_eq!(RequirementKind::parse("!=="), None);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert_eq!(
            Requirement::new("approx", "1", "1", "no"),
            Err(RequirementError::UnknownKind("approx".to_string()))
        );
    }

    #[test]
    fn test_invalid_static_regex_rejected() {
        assert!(matches!(
            Requirement::new("regex matches", "x", "(", "no"),
            Err(RequirementError::InvalidPattern { .. })
        ));
        assert!(Requirement::new("regex matches", "x", "({0}", "no").is_ok());
    }

    // ==================== Comparison Tests ====================

    #[test]
    fn test_number_comparisons() {
        assert!(passes(">=", "10", "10"));
        assert!(passes(">", "10.5", "10"));
        assert!(passes("<", "-1", "0"));
        assert!(passes("<=", " 3 ", "3"));
        assert!(passes("==", "2.0", "2"));
        assert!(passes("!=", "2", "3"));
        assert!(!passes(">=", "abc", "1"));
        assert!(!passes("!=", "abc", "1"));
    }

    #[test]
    fn test_text_comparisons() {
        assert!(passes("string equals", "Steve", "Steve"));
        assert!(!passes("string equals", "steve", "Steve"));
        assert!(passes("string equals ignorecase", "steve", "STEVE"));
        assert!(passes("!string equals", "a", "b"));
        assert!(passes("string contains", "survival", "viva"));
        assert!(!passes("!string contains", "survival", "viva"));
        assert!(!passes("!string equals ignorecase", "A", "a"));
    }

    #[test]
    fn test_regex_comparisons() {
        assert!(passes("regex matches", "abc123", "[a-z]+\\d+"));
        assert!(!passes("regex matches", "abc123x", "[a-z]+\\d+"));
        assert!(passes("!regex matches", "abc", "\\d+"));
    }

    #[test]
    fn test_static_regex_compiled_once() {
        let rule = Requirement::new("!regex matches", "{0}", "[a-z]+", "no").unwrap();
        assert_eq!(rule.compiled_pattern().map(Regex::as_str), Some("^(?:[a-z]+)$"));
        assert!(!rule.check(&PlainEnv, &args(&["abc"])).unwrap());
        assert!(rule.check(&PlainEnv, &args(&["ABC"])).unwrap());

        let templated = Requirement::new("regex matches", "x", "{0}", "no").unwrap();
        assert!(templated.compiled_pattern().is_none());
        assert!(Requirement::new("string equals", "a", "b", "no")
            .unwrap()
            .compiled_pattern()
            .is_none());
    }

    #[test]
    fn test_regex_resolved_at_check_time() {
        let rule = Requirement::new("regex matches", "{0}", "({1}", "no").unwrap();
        assert!(!rule.check(&PlainEnv, &args(&["a", "b"])).unwrap());
        let rule = Requirement::new("regex matches", "{0}", "{1}+", "no").unwrap();
        assert!(rule.check(&PlainEnv, &args(&["aaa", "a"])).unwrap());
    }

    #[test]
    fn test_args_substituted() {
        let rule = Requirement::new(">=", "{0}", "{1}", "no").unwrap();
        assert!(rule.check(&PlainEnv, &args(&["5", "4"])).unwrap());
        assert!(!rule.check(&PlainEnv, &args(&["3", "4"])).unwrap());
    }
}
