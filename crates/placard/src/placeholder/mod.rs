//! Placeholder definitions.
//!
//! A [`Placeholder`] is a named, configured value source. Each kind reads its
//! arguments differently (see the kind modules), but all share the same
//! lifecycle:
//!
//! 1. requirement rules run in order; the first failing rule's deny message
//!    is returned as is
//! 2. the kind produces its text, substituting `{0}`, `{1}`, ... from the
//!    arguments that remain after any leading selector argument
//!
//! Resolution needs a little help from the engine that owns the registry:
//! rendering nested markup for flavored output, and passing `%fragment%`
//! tokens to the external resolver. That help is the [`ResolveEnv`] trait.

mod animation;
mod color;
mod colored_text;
mod map;
mod math;
mod progress;
mod random;
mod range;
mod string;

use std::fmt;

use placard_render::RichText;

use crate::requirement::Requirement;
use crate::resolver::ResolverError;

pub use animation::AnimationPlaceholder;
pub use color::ColorPlaceholder;
pub use colored_text::ColoredTextPlaceholder;
pub use map::MapPlaceholder;
pub use math::{evaluate, MathModifier, MathPlaceholder};
pub use progress::ProgressBarPlaceholder;
pub use random::RandomPlaceholder;
pub use range::RangePlaceholder;
pub use string::StringPlaceholder;

/// What a placeholder needs from the engine while resolving.
pub trait ResolveEnv {
    /// Resolves a template (tags and all) into rich text.
    fn render(&self, template: &str) -> Result<RichText, ResolverError>;

    /// Replaces `%fragment%` tokens using the external resolver.
    fn expand_external(&self, text: &str) -> Result<String, ResolverError>;
}

/// The kind of a placeholder, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    String,
    Map,
    Range,
    Color,
    ColoredText,
    Math,
    ProgressBar,
    Random,
    Animation,
}

impl PlaceholderType {
    /// Parses the `type` value of a configuration entry.
    pub fn from_name(name: &str) -> Option<PlaceholderType> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "string" => Some(PlaceholderType::String),
            "map" => Some(PlaceholderType::Map),
            "range" => Some(PlaceholderType::Range),
            "color" | "colour" => Some(PlaceholderType::Color),
            "colored_text" | "coloredtext" | "colored" => Some(PlaceholderType::ColoredText),
            "math" => Some(PlaceholderType::Math),
            "progress_bar" | "progressbar" | "progress" => Some(PlaceholderType::ProgressBar),
            "random" => Some(PlaceholderType::Random),
            "animation" | "animated" => Some(PlaceholderType::Animation),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlaceholderType::String => "string",
            PlaceholderType::Map => "map",
            PlaceholderType::Range => "range",
            PlaceholderType::Color => "color",
            PlaceholderType::ColoredText => "colored_text",
            PlaceholderType::Math => "math",
            PlaceholderType::ProgressBar => "progress_bar",
            PlaceholderType::Random => "random",
            PlaceholderType::Animation => "animation",
        }
    }
}

impl fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a placeholder.
#[derive(Debug, Clone)]
pub enum PlaceholderKind {
    String(StringPlaceholder),
    Map(MapPlaceholder),
    Range(RangePlaceholder),
    Color(ColorPlaceholder),
    ColoredText(ColoredTextPlaceholder),
    Math(MathPlaceholder),
    ProgressBar(ProgressBarPlaceholder),
    Random(RandomPlaceholder),
    Animation(AnimationPlaceholder),
}

impl PlaceholderKind {
    pub fn placeholder_type(&self) -> PlaceholderType {
        match self {
            PlaceholderKind::String(_) => PlaceholderType::String,
            PlaceholderKind::Map(_) => PlaceholderType::Map,
            PlaceholderKind::Range(_) => PlaceholderType::Range,
            PlaceholderKind::Color(_) => PlaceholderType::Color,
            PlaceholderKind::ColoredText(_) => PlaceholderType::ColoredText,
            PlaceholderKind::Math(_) => PlaceholderType::Math,
            PlaceholderKind::ProgressBar(_) => PlaceholderType::ProgressBar,
            PlaceholderKind::Random(_) => PlaceholderType::Random,
            PlaceholderKind::Animation(_) => PlaceholderType::Animation,
        }
    }
}

/// A named placeholder with its requirement rules.
#[derive(Debug, Clone)]
pub struct Placeholder {
    name: String,
    kind: PlaceholderKind,
    requirements: Vec<Requirement>,
}

impl Placeholder {
    pub fn new(name: impl Into<String>, kind: PlaceholderKind) -> Self {
        Self {
            name: name.into(),
            kind,
            requirements: Vec::new(),
        }
    }

    /// Adds a requirement rule, evaluated after those already added.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PlaceholderKind {
        &self.kind
    }

    pub fn placeholder_type(&self) -> PlaceholderType {
        self.kind.placeholder_type()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns the deny message of the first failing requirement.
    pub fn check_requirements(
        &self,
        env: &dyn ResolveEnv,
        args: &[String],
    ) -> Result<Option<String>, ResolverError> {
        for requirement in &self.requirements {
            if !requirement.check(env, args)? {
                return Ok(Some(requirement.deny().to_string()));
            }
        }
        Ok(None)
    }

    /// Produces the placeholder's text for the given arguments.
    pub fn resolve(&self, env: &dyn ResolveEnv, args: &[String]) -> Result<String, ResolverError> {
        if let Some(deny) = self.check_requirements(env, args)? {
            return Ok(deny);
        }
        match &self.kind {
            PlaceholderKind::String(p) => p.resolve(env, args),
            PlaceholderKind::Map(p) => Ok(p.resolve(args)),
            PlaceholderKind::Range(p) => Ok(p.resolve(args)),
            PlaceholderKind::Color(p) => Ok(p.resolve(args)),
            PlaceholderKind::ColoredText(p) => p.resolve(env, args),
            PlaceholderKind::Math(p) => p.resolve(env, args),
            PlaceholderKind::ProgressBar(p) => Ok(p.resolve(args)),
            PlaceholderKind::Random(p) => Ok(p.resolve(args)),
            PlaceholderKind::Animation(p) => Ok(p.resolve(args)),
        }
    }
}

/// Replaces `{n}` with `args[offset + n]`.
///
/// Indices beyond the argument list and anything that is not `{digits}` are
/// left as written. Substituted text is never scanned again.
///
/// # Example
///
/// ```rust
/// use placard::placeholder::substitute_args;
///
/// let args = vec!["red".to_string(), "Steve".to_string()];
/// assert_eq!(substitute_args("Hi {0} {1}", &args, 1), "Hi Steve {1}");
/// ```
pub fn substitute_args(template: &str, args: &[String], offset: usize) -> String {
    let args = args.get(offset..).unwrap_or_default();
    if args.is_empty() || !template.contains('{') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = (digits > 0 && after[digits..].starts_with('}'))
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|i| args.get(i));

        match arg {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Shared output of the String and ColoredText kinds.
///
/// A leading flavor keyword renders the template and serializes it in that
/// flavor (`mini` keeps the raw template) before the remaining arguments are
/// substituted.
pub(crate) fn flavored(
    env: &dyn ResolveEnv,
    template: &str,
    args: &[String],
) -> Result<String, ResolverError> {
    let Some(first) = args.first() else {
        return Ok(template.to_string());
    };
    match placard_render::Flavor::from_keyword(first) {
        Some(placard_render::Flavor::Mini) => Ok(substitute_args(template, args, 1)),
        Some(flavor) => {
            let encoded = flavor.encode(&env.render(template)?);
            Ok(substitute_args(&encoded, args, 1))
        }
        None => Ok(substitute_args(template, args, 0)),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{args, PlainEnv};
    use super::*;

    // ==================== Substitution Tests ====================

    #[test]
    fn test_substitute_basic() {
        assert_eq!(substitute_args("{0} and {1}", &args(&["a", "b"]), 0), "a and b");
        assert_eq!(substitute_args("{0}{0}", &args(&["x"]), 0), "xx");
    }

    #[test]
    fn test_substitute_offset() {
        assert_eq!(substitute_args("{0}", &args(&["key", "v"]), 1), "v");
        assert_eq!(substitute_args("{0}", &args(&["key"]), 1), "{0}");
    }

    #[test]
    fn test_substitute_leaves_unknown() {
        let a = args(&["a"]);
        assert_eq!(substitute_args("{1} {x} {} {", &a, 0), "{1} {x} {} {");
        assert_eq!(substitute_args("{{0}}", &a, 0), "{a}");
    }

    #[test]
    fn test_substitute_does_not_rescan() {
        assert_eq!(substitute_args("{0} {1}", &args(&["{1}", "b"]), 0), "{1} b");
    }

    #[test]
    fn test_substitute_offset_past_end() {
        assert_eq!(substitute_args("{0}", &[], 3), "{0}");
    }

    // ==================== Type Name Tests ====================

    #[test]
    fn test_type_names() {
        assert_eq!(PlaceholderType::from_name("STRING"), Some(PlaceholderType::String));
        assert_eq!(PlaceholderType::from_name("colour"), Some(PlaceholderType::Color));
        assert_eq!(
            PlaceholderType::from_name("colored-text"),
            Some(PlaceholderType::ColoredText)
        );
        assert_eq!(
            PlaceholderType::from_name("progress_bar"),
            Some(PlaceholderType::ProgressBar)
        );
        assert_eq!(PlaceholderType::from_name("list"), None);
        for t in [PlaceholderType::Math, PlaceholderType::Animation] {
            assert_eq!(PlaceholderType::from_name(t.name()), Some(t));
        }
    }

    // ==================== Flavor Tests ====================

    #[test]
    fn test_flavored_without_args_is_raw() {
        assert_eq!(flavored(&PlainEnv, "<red>{0}", &[]).unwrap(), "<red>{0}");
    }

    #[test]
    fn test_flavored_plain_substitution() {
        assert_eq!(
            flavored(&PlainEnv, "<red>{0}", &args(&["Steve"])).unwrap(),
            "<red>Steve"
        );
    }

    #[test]
    fn test_flavored_keywords() {
        let a = args(&["legacy", "Steve"]);
        assert_eq!(flavored(&PlainEnv, "<red>Hi {0}", &a).unwrap(), "&cHi Steve");
        let a = args(&["C", "Steve"]);
        assert_eq!(flavored(&PlainEnv, "<red>Hi {0}", &a).unwrap(), "§cHi Steve");
        let a = args(&["m", "Steve"]);
        assert_eq!(flavored(&PlainEnv, "<red>Hi {0}", &a).unwrap(), "<red>Hi Steve");
    }

    // ==================== Requirement Gate Tests ====================

    #[test]
    fn test_failing_requirement_returns_deny() {
        let placeholder = Placeholder::new(
            "vip",
            PlaceholderKind::String(StringPlaceholder::new("welcome {0}")),
        )
        .with_requirement(
            Requirement::new(">=", "{0}", "10", "denied {0}").unwrap(),
        );

        let env = PlainEnv;
        assert_eq!(placeholder.resolve(&env, &args(&["12"])).unwrap(), "welcome 12");
        assert_eq!(placeholder.resolve(&env, &args(&["3"])).unwrap(), "denied {0}");
    }
}
