//! Template resolution.
//!
//! [`TemplateEngine`] turns a template into [`RichText`]. On top of the
//! standard style tags (colors, decorations, click, hover, ...) it resolves:
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `<p:name:args..>` | placeholder output, re-entered; a Color placeholder opens a span closed by `</p>` |
//! | `<papi:fragment>` | external resolver output for `%fragment%`, re-entered |
//! | `<title:..>` `<subtitle:..>` `<actionbar:..>` `<sound:..>` | an [`Effect`] for the session; no text |
//! | `<smallcaps:text>` `<latin:n>` | substitution fonts |
//!
//! Anything else that looks like a tag is kept as literal text.
//!
//! Output that is re-entered is rendered on its own and appended beneath the
//! current style, so tags left open inside a placeholder do not leak into the
//! rest of the template. Re-entry is bounded by a depth limit; past it the
//! literal [`RECURSION_LIMIT`] is emitted instead.
//!
//! Once the tree is complete, `&` color codes in text content become `§`
//! codes and a leading `&f` is dropped from click values.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use placard::{
//!     Placeholder, PlaceholderKind, PlaceholderRegistry, ResolveContext, StringPlaceholder,
//!     TemplateEngine,
//! };
//!
//! let registry = PlaceholderRegistry::with_placeholders([Placeholder::new(
//!     "greet",
//!     PlaceholderKind::String(StringPlaceholder::new("<gold>Hello {0}")),
//! )]);
//! let engine = TemplateEngine::new(Arc::new(registry));
//!
//! let text = engine.resolve("<p:greet:Steve>!", ResolveContext::default());
//! assert_eq!(text.plain(), "Hello Steve!");
//! ```

use std::sync::Arc;

use log::{debug, warn};
use placard_markup::{Tag, Token, Tokenizer};
use placard_render::legacy::{translate_alternate_codes, AMPERSAND};
use placard_render::mini::{is_closable, standard_tag};
use placard_render::{Font, MiniBuilder, RichText};
use uuid::Uuid;

use crate::effect::{Effect, EffectSink, NoopSink, TitleTimes};
use crate::placeholder::{Placeholder, PlaceholderKind, ResolveEnv};
use crate::registry::PlaceholderRegistry;
use crate::resolver::{ExternalResolver, NoopResolver, ResolverError};
use crate::{ILLEGAL_NUMBER_FORMAT, RECURSION_LIMIT, UNKNOWN_PLACEHOLDER};

/// Per-call resolution settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Session effects are performed for; `None` skips effects.
    pub session: Option<Uuid>,
    /// Resolve `sound` and `actionbar` tags without performing them.
    pub mute_ambient_effects: bool,
}

impl ResolveContext {
    pub fn for_session(session: Uuid) -> Self {
        Self {
            session: Some(session),
            mute_ambient_effects: false,
        }
    }

    pub fn muted(mut self, mute: bool) -> Self {
        self.mute_ambient_effects = mute;
        self
    }
}

/// Resolves templates against a placeholder registry.
pub struct TemplateEngine {
    registry: Arc<PlaceholderRegistry>,
    resolver: Arc<dyn ExternalResolver>,
    effects: Arc<dyn EffectSink>,
    max_depth: usize,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("placeholders", &self.registry.len())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl TemplateEngine {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn new(registry: Arc<PlaceholderRegistry>) -> Self {
        Self {
            registry,
            resolver: Arc::new(NoopResolver),
            effects: Arc::new(NoopSink),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ExternalResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_effects(mut self, effects: Arc<dyn EffectSink>) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &Arc<PlaceholderRegistry> {
        &self.registry
    }

    /// Resolves a template. Resolver failures leave the fragment as written.
    pub fn resolve(&self, template: &str, ctx: ResolveContext) -> RichText {
        let mut text = self.pass(ctx, false).build_lenient(template);
        post_process(&mut text);
        text
    }

    /// Resolves a template, failing on the first resolver error.
    pub fn try_resolve(&self, template: &str, ctx: ResolveContext) -> Result<RichText, ResolverError> {
        self.pass(ctx, true).render_final(template)
    }

    /// Produces a placeholder's raw output, as the query surface reports it.
    pub fn resolve_placeholder(
        &self,
        placeholder: &Placeholder,
        args: &[String],
        ctx: ResolveContext,
    ) -> String {
        placeholder
            .resolve(&self.pass(ctx, false), args)
            .unwrap_or_default()
    }

    /// Runs text through the external resolver, keeping it on failure.
    pub fn expand_external(&self, text: &str, ctx: ResolveContext) -> String {
        self.pass(ctx, false)
            .external(text)
            .unwrap_or_else(|_| text.to_string())
    }

    fn pass(&self, ctx: ResolveContext, strict: bool) -> Pass<'_> {
        Pass {
            engine: self,
            ctx,
            strict,
            depth: 0,
        }
    }
}

/// One resolution in progress.
#[derive(Clone, Copy)]
struct Pass<'e> {
    engine: &'e TemplateEngine,
    ctx: ResolveContext,
    strict: bool,
    depth: usize,
}

impl ResolveEnv for Pass<'_> {
    fn render(&self, template: &str) -> Result<RichText, ResolverError> {
        self.render_final(template)
    }

    fn expand_external(&self, text: &str) -> Result<String, ResolverError> {
        self.external(text)
    }
}

impl<'e> Pass<'e> {
    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    fn render_final(self, template: &str) -> Result<RichText, ResolverError> {
        let mut text = self.build(template)?;
        post_process(&mut text);
        Ok(text)
    }

    fn build(self, template: &str) -> Result<RichText, ResolverError> {
        if self.depth > self.engine.max_depth {
            warn!(
                "template nesting exceeded {} levels, stopping at '{}'",
                self.engine.max_depth, template
            );
            return Ok(RichText::text(RECURSION_LIMIT));
        }
        let mut builder = MiniBuilder::new();
        self.feed(template, &mut builder)?;
        Ok(builder.finish())
    }

    /// Builds a template, degrading a failed subtree to its literal text.
    ///
    /// Only a strict pass propagates resolver errors, so on a lenient pass
    /// this keeps every fragment the resolver could answer.
    fn build_lenient(self, template: &str) -> RichText {
        self.build(template).unwrap_or_else(|err| {
            warn!("could not resolve '{}': {}", template, err);
            RichText::text(template)
        })
    }

    /// Renders re-entered output and appends it in place.
    fn insert(self, output: &str, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        let nested = self.deeper().build(output)?;
        builder.append(&nested);
        Ok(())
    }

    fn external(self, text: &str) -> Result<String, ResolverError> {
        match self.engine.resolver.resolve(self.ctx.session, text) {
            Ok(resolved) => Ok(resolved),
            Err(err) if self.strict => Err(err),
            Err(err) => {
                warn!("external resolver failed on '{}': {}", text, err);
                Ok(text.to_string())
            }
        }
    }

    fn feed(self, input: &str, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        for token in Tokenizer::new(input) {
            match token {
                Token::Text(text) | Token::Invalid(text) => builder.text(text),
                Token::Escaped(c) => builder.text(c.encode_utf8(&mut [0; 4])),
                Token::Open(tag) => self.open(&tag, builder)?,
                Token::Close { name, raw } => {
                    let key = name.trim_start_matches('!').to_ascii_lowercase();
                    if key == "p" || is_closable(&key) {
                        builder.close(&key);
                    } else {
                        builder.text(raw);
                    }
                }
            }
        }
        Ok(())
    }

    fn open(self, tag: &Tag<'_>, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        let key = tag.key();
        match key.as_str() {
            "p" => self.placeholder(tag, builder),
            "papi" => self.papi(tag, builder),
            "title" | "subtitle" | "actionbar" | "sound" => self.effect(&key, tag, builder),
            "smallcaps" | "latin" => {
                self.font(&key, tag, builder);
                Ok(())
            }
            _ => self.standard(&key, tag, builder),
        }
    }

    fn placeholder(self, tag: &Tag<'_>, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        let Some(name) = tag.arg(0) else {
            builder.text(tag.raw);
            return Ok(());
        };
        let Some(placeholder) = self.engine.registry.get(name) else {
            debug!("unknown placeholder '{}'", name);
            builder.text(UNKNOWN_PLACEHOLDER);
            return Ok(());
        };
        let args = &tag.args[1..];
        let env = self.deeper();

        if let PlaceholderKind::Color(color) = placeholder.kind() {
            if let Some(deny) = placeholder.check_requirements(&env, args)? {
                return self.insert(&deny, builder);
            }
            builder.open("p", &color.style().unwrap_or_default());
            return Ok(());
        }

        let output = placeholder.resolve(&env, args)?;
        self.insert(&output, builder)
    }

    fn papi(self, tag: &Tag<'_>, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        if tag.args.is_empty() {
            builder.text(tag.raw);
            return Ok(());
        }
        let fragment = format!("%{}%", tag.args.join(":"));
        let resolved = self.external(&fragment)?.replace('§', "&");
        self.insert(&resolved, builder)
    }

    fn font(self, key: &str, tag: &Tag<'_>, builder: &mut MiniBuilder) {
        let (Some(font), false) = (Font::from_name(key), tag.args.is_empty()) else {
            builder.text(tag.raw);
            return;
        };
        match font.apply(&tag.args.join(":")) {
            Some(out) => builder.text(&out),
            None => builder.text(ILLEGAL_NUMBER_FORMAT),
        }
    }

    fn effect(self, key: &str, tag: &Tag<'_>, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        let args = &tag.args;
        let text = |i: usize| self.deeper().render_final(&args[i]);
        let timed = || TitleTimes::parse(&args[0], &args[1], &args[2]);
        let factor = |i: usize| args[i].trim().parse::<f32>().unwrap_or(1.0);

        let effect = match (key, args.len()) {
            ("title", 1) => Effect::Title {
                title: Some(text(0)?),
                subtitle: None,
                times: TitleTimes::default(),
            },
            ("title", 2) => Effect::Title {
                title: Some(text(0)?),
                subtitle: Some(text(1)?),
                times: TitleTimes::default(),
            },
            ("title", 4) => Effect::Title {
                title: Some(text(3)?),
                subtitle: None,
                times: timed(),
            },
            ("title", 5) => Effect::Title {
                title: Some(text(3)?),
                subtitle: Some(text(4)?),
                times: timed(),
            },
            ("subtitle", 1) => Effect::Title {
                title: None,
                subtitle: Some(text(0)?),
                times: TitleTimes::default(),
            },
            ("subtitle", 4) => Effect::Title {
                title: None,
                subtitle: Some(text(3)?),
                times: timed(),
            },
            ("actionbar", 1) => Effect::ActionBar(text(0)?),
            ("sound", 1) => Effect::Sound {
                id: args[0].clone(),
                volume: 1.0,
                pitch: 1.0,
            },
            ("sound", 3) => Effect::Sound {
                id: args[0].clone(),
                volume: factor(1),
                pitch: factor(2),
            },
            _ => {
                builder.text(&format!("Invalid {} tag arguments", key));
                return Ok(());
            }
        };

        self.perform(effect);
        Ok(())
    }

    fn perform(self, effect: Effect) {
        if self.ctx.mute_ambient_effects && effect.is_ambient() {
            debug!("muted {:?}", effect);
            return;
        }
        match self.ctx.session {
            Some(session) => self.engine.effects.perform(session, effect),
            None => debug!("no session, dropping {:?}", effect),
        }
    }

    fn standard(self, key: &str, tag: &Tag<'_>, builder: &mut MiniBuilder) -> Result<(), ResolverError> {
        let mut failure = None;
        let interpreted = standard_tag(tag, &mut |hover: &str| {
            match self.deeper().build(hover) {
                Ok(text) => text,
                Err(err) => {
                    failure.get_or_insert(err);
                    RichText::empty()
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        match interpreted {
            Some(interpreted) => builder.apply(key, interpreted),
            None => builder.text(tag.raw),
        }
        Ok(())
    }
}

/// Translates `&` codes in content and strips a leading `&f` from click
/// values, including inside hover text.
fn post_process(text: &mut RichText) {
    text.walk_mut(&mut |node: &mut RichText| {
        if node.content.contains(AMPERSAND) {
            node.content = translate_alternate_codes(AMPERSAND, &node.content);
        }
        if let Some(click) = node.style.click.as_mut() {
            if let Some(rest) = click.value.strip_prefix("&f") {
                click.value = rest.to_string();
            }
        }
        if let Some(hover) = node.style.hover.as_mut() {
            post_process(hover);
        }
    });
}
