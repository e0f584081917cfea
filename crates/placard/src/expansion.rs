//! The query surface other plugins use to read placeholders.
//!
//! Queries are `_`-separated parameter strings, such as the `color_mini_x`
//! in `%placard_color_mini_x%`:
//!
//! | Query | Result |
//! |-------|--------|
//! | `parse_<template>[_<flavor>]` | the template resolved and serialized (`mini` by default) |
//! | `font_<latin\|smallcaps>_<text>` | the text in a substitution font |
//! | `<name>[_<args>]` | the placeholder's raw output |
//!
//! `$(fragment)$` inside a query is rewritten to `%fragment%` and the whole
//! query goes through the external resolver before it is split.

use std::sync::Arc;

use once_cell::sync::Lazy;
use placard_render::{Flavor, Font};
use regex::Regex;
use uuid::Uuid;

use crate::engine::{ResolveContext, TemplateEngine};
use crate::registry::{query_args, split_trimmed};
use crate::{ILLEGAL_ARGUMENT, ILLEGAL_NUMBER_FORMAT, PLACEHOLDER_NOT_FOUND, UNKNOWN_FONT};

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\((.*?)\)\$").expect("bracket pattern is valid"));

/// Answers placeholder queries from other plugins.
#[derive(Debug, Clone)]
pub struct Expansion {
    engine: Arc<TemplateEngine>,
}

impl Expansion {
    pub fn new(engine: Arc<TemplateEngine>) -> Self {
        Self { engine }
    }

    /// Answers one query. Failures come back as fixed diagnostic strings.
    pub fn request(&self, session: Option<Uuid>, params: &str) -> String {
        let ctx = ResolveContext {
            session,
            mute_ambient_effects: false,
        };
        let params = BRACKETED.replace_all(params, "%$1%");
        let params = self.engine.expand_external(&params, ctx);

        let parts = split_trimmed(&params, "_");
        let Some(first) = parts.first() else {
            return ILLEGAL_ARGUMENT.to_string();
        };

        match first.to_lowercase().as_str() {
            "parse" => self.parse(&parts, ctx),
            "font" | "f" if parts.len() >= 3 => font(&parts),
            _ => self.placeholder(&parts, ctx),
        }
    }

    fn parse(&self, parts: &[String], ctx: ResolveContext) -> String {
        if parts.len() < 2 {
            return ILLEGAL_ARGUMENT.to_string();
        }
        let mut content = parts[1..].join("_");
        let mut flavor = Flavor::Mini;
        if let Some((head, last)) = content.rsplit_once('_') {
            if let Some(chosen) = Flavor::from_keyword(last) {
                flavor = chosen;
                content = head.to_string();
            }
        }

        match self.engine.try_resolve(&content, ctx) {
            Ok(text) => flavor.encode(&text),
            Err(err) => format!("Parse Error: {}", err),
        }
    }

    fn placeholder(&self, parts: &[String], ctx: ResolveContext) -> String {
        let Some(placeholder) = self.engine.registry().get(&parts[0]) else {
            return PLACEHOLDER_NOT_FOUND.to_string();
        };
        let params: Vec<&str> = parts[1..].iter().map(String::as_str).collect();
        let args = query_args(placeholder.placeholder_type(), &params);
        self.engine.resolve_placeholder(&placeholder, &args, ctx)
    }
}

fn font(parts: &[String]) -> String {
    let Some(font) = Font::from_name(&parts[1]) else {
        return UNKNOWN_FONT.to_string();
    };
    let text = parts[2..].join("_");
    font.apply(&text)
        .unwrap_or_else(|| ILLEGAL_NUMBER_FORMAT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{
        ColorPlaceholder, MapPlaceholder, Placeholder, PlaceholderKind, ProgressBarPlaceholder,
        StringPlaceholder,
    };
    use crate::registry::PlaceholderRegistry;
    use crate::resolver::{ResolverError, StaticResolver};
    use placard_render::Decoration;

    fn expansion() -> Expansion {
        let registry = PlaceholderRegistry::with_placeholders([
            Placeholder::new(
                "greet",
                PlaceholderKind::String(StringPlaceholder::new("<gold>Hi {0}")),
            ),
            Placeholder::new(
                "color",
                PlaceholderKind::Color(ColorPlaceholder::new("red", [Decoration::Bold])),
            ),
            Placeholder::new(
                "rank",
                PlaceholderKind::Map(MapPlaceholder::new([("a_b", "ab")], "none", false)),
            ),
            Placeholder::new(
                "bar",
                PlaceholderKind::ProgressBar(ProgressBarPlaceholder {
                    symbol: "#".into(),
                    length: 2,
                    ..Default::default()
                }),
            ),
        ]);
        let resolver = StaticResolver::new().with("player_name", "Steve");
        let engine = TemplateEngine::new(Arc::new(registry)).with_resolver(Arc::new(resolver));
        Expansion::new(Arc::new(engine))
    }

    // ==================== Placeholder Query Tests ====================

    #[test]
    fn test_placeholder_queries() {
        let e = expansion();
        assert_eq!(e.request(None, "greet"), "<gold>Hi {0}");
        assert_eq!(e.request(None, "greet_Alex"), "<gold>Hi Alex");
        assert_eq!(e.request(None, "greet_legacy::Alex"), "&6Hi Alex");
        assert_eq!(e.request(None, "nothing"), PLACEHOLDER_NOT_FOUND);
    }

    #[test]
    fn test_underscores_rejoined_for_plain_kinds() {
        let e = expansion();
        assert_eq!(e.request(None, "rank_a_b"), "ab");
    }

    #[test]
    fn test_color_flavor_splits_on_double_colon() {
        let e = expansion();
        assert_eq!(e.request(None, "color_mini_extra_text"), "<red><bold></red></bold>");
        assert_eq!(e.request(None, "color_legacy"), "&c&l");
    }

    #[test]
    fn test_progress_bar_query() {
        let e = expansion();
        assert_eq!(e.request(None, "bar_1_2"), "&a#&e#&7");
    }

    #[test]
    fn test_external_fragments() {
        let e = expansion();
        assert_eq!(e.request(None, "greet_$(player_name)$"), "<gold>Hi Steve");
        assert_eq!(e.request(None, "greet_%player_name%"), "<gold>Hi Steve");
    }

    #[test]
    fn test_empty_query() {
        let e = expansion();
        assert_eq!(e.request(None, "_"), ILLEGAL_ARGUMENT);
        assert_eq!(e.request(None, ""), PLACEHOLDER_NOT_FOUND);
    }

    // ==================== Parse Query Tests ====================

    #[test]
    fn test_parse_queries() {
        let e = expansion();
        assert_eq!(e.request(None, "parse_<red>hi"), "<red>hi</red>");
        assert_eq!(e.request(None, "parse_<red>hi_legacy"), "&chi");
        assert_eq!(e.request(None, "parse_<red>hi_C"), "§chi");
        assert_eq!(e.request(None, "parse_<p:greet:Bo>_l"), "&6Hi Bo");
        assert_eq!(e.request(None, "parse_snake_case"), "snake_case");
        assert_eq!(e.request(None, "parse"), ILLEGAL_ARGUMENT);
    }

    #[test]
    fn test_parse_error() {
        let failing = |_: Option<Uuid>, text: &str| -> Result<String, ResolverError> {
            if text.contains("%down%") {
                Err(ResolverError::Failed("server down".into()))
            } else {
                Ok(text.to_string())
            }
        };
        let engine = TemplateEngine::new(Arc::new(PlaceholderRegistry::new()))
            .with_resolver(Arc::new(failing));
        let e = Expansion::new(Arc::new(engine));
        assert_eq!(e.request(None, "parse_<papi:down>"), "Parse Error: server down");
    }

    // ==================== Font Query Tests ====================

    #[test]
    fn test_font_queries() {
        let e = expansion();
        assert_eq!(e.request(None, "font_latin_12"), "XII");
        assert_eq!(e.request(None, "f_smallcaps_Hi_there"), "ʜɪ_ᴛʜᴇʀᴇ");
        assert_eq!(e.request(None, "font_latin_x"), ILLEGAL_NUMBER_FORMAT);
        assert_eq!(e.request(None, "font_gothic_x"), UNKNOWN_FONT);
        assert_eq!(e.request(None, "font_latin"), PLACEHOLDER_NOT_FOUND);
    }
}
