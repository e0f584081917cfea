//! # Placard - Placeholders for Chat
//!
//! `placard` resolves chat templates: markup with style tags plus tags that
//! pull in configured placeholders, external fragments and side effects.
//!
//! ## Core Concepts
//!
//! - [`Placeholder`]: a named value source of one [`PlaceholderType`]
//! - [`PlaceholderRegistry`]: the live set, swapped atomically on reload
//! - [`TemplateEngine`]: template to [`RichText`](placard_render::RichText)
//! - [`ExternalResolver`]: the host's `%fragment%` variables
//! - [`EffectSink`]: where titles, action bars and sounds go
//! - [`Config`]: YAML loading of settings and placeholders
//! - [`Expansion`]: the `_`-separated query surface for other plugins
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use placard::{Config, PlaceholderRegistry, ResolveContext, TemplateEngine};
//! use placard_render::Flavor;
//!
//! let config = Config::from_yaml(
//!     r#"
//! custom-placeholder:
//!   rank:
//!     type: map
//!     ignorecase: true
//!     default: "<gray>Member"
//!     values:
//!       vip: "<gold>VIP"
//! "#,
//!     "inline",
//! )
//! .unwrap();
//!
//! let registry = Arc::new(PlaceholderRegistry::with_placeholders(config.placeholders));
//! let engine = TemplateEngine::new(registry);
//!
//! let text = engine.resolve("[<p:rank:VIP>] Steve", ResolveContext::default());
//! assert_eq!(Flavor::Legacy.encode(&text), "[&6VIP&r] Steve");
//! ```

pub mod config;
pub mod effect;
pub mod engine;
pub mod expansion;
pub mod placeholder;
pub mod range;
pub mod registry;
pub mod requirement;
pub mod resolver;

pub use config::{Config, ConfigError, Settings};
pub use effect::{Effect, EffectSink, NoopSink, RecordingSink, TitleTimes};
pub use engine::{ResolveContext, TemplateEngine};
pub use expansion::Expansion;
pub use placeholder::{
    AnimationPlaceholder, ColorPlaceholder, ColoredTextPlaceholder, MapPlaceholder,
    MathPlaceholder, Placeholder, PlaceholderKind, PlaceholderType, ProgressBarPlaceholder,
    RandomPlaceholder, RangePlaceholder, ResolveEnv, StringPlaceholder,
};
pub use range::{RangeEntry, RangeIndex};
pub use registry::PlaceholderRegistry;
pub use requirement::{Requirement, RequirementError, RequirementKind};
pub use resolver::{ExternalResolver, NoopResolver, ResolverError, StaticResolver};

/// Emitted for a `p` tag naming no registered placeholder.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown Placeholder";
/// Emitted where re-entry goes deeper than the engine allows.
pub const RECURSION_LIMIT: &str = "Recursion Limit Reached";
pub const ILLEGAL_ARGUMENT: &str = "Illegal Argument";
pub const ILLEGAL_NUMBER_FORMAT: &str = "Illegal Number Format";
pub const PLACEHOLDER_NOT_FOUND: &str = "Placeholder not found";
pub const UNKNOWN_FONT: &str = "Unknown Font";
