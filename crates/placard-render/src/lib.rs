//! # Placard Render - Rich Chat Text
//!
//! `placard-render` holds the styled text model shared by the template engine
//! and the packet layer, plus every encoding that text can travel in.
//!
//! ## Core Concepts
//!
//! - [`RichText`]: a tree of styled text nodes, compared through its [`Run`]s
//! - [`Style`]: color, tri-state decorations, click/hover, font, insertion
//! - [`TextColor`]: one of the sixteen named chat colors or an RGB value
//! - [`mini`]: the `<tag>` markup, with a [`MiniBuilder`] for incremental parsing
//! - [`legacy`]: `&`/`§` format codes
//! - [`json`]: chat component JSON
//! - [`Flavor`]: the output encoder that picks one of the above
//!
//! ## Quick Start
//!
//! ```rust
//! use placard_render::{mini, Flavor};
//!
//! let text = mini::parse("<gold>Welcome, <bold>Steve</bold>!");
//!
//! assert_eq!(Flavor::Plain.encode(&text), "Welcome, Steve!");
//! assert_eq!(Flavor::Legacy.encode(&text), "&6Welcome, &6&lSteve&6!");
//! ```
//!
//! ## Round Trips
//!
//! Every flavor except plain and legacy keeps the full style, so
//! `mini::parse(&Flavor::Mini.encode(&t)).runs() == t.runs()` and the same
//! holds through [`json::from_str`]. Legacy keeps color and decorations only.

pub mod color;
pub mod encode;
mod error;
pub mod font;
pub mod json;
pub mod legacy;
pub mod mini;
pub mod style;
pub mod text;
mod util;

pub use color::{NamedColor, TextColor};
pub use encode::{encode, Flavor};
pub use error::{RenderError, Result};
pub use font::Font;
pub use mini::{MiniBuilder, StandardTag};
pub use style::{ClickEvent, Decoration, Style};
pub use text::{RichText, Run};
pub use util::{rgb_to_ansi256, text_color_to_ansi256};
