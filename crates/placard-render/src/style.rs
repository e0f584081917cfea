//! Text styles: color, decorations and interactive attributes.

use crate::color::TextColor;
use crate::text::RichText;

/// Text decorations with a legacy format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Obfuscated,
    Bold,
    Strikethrough,
    Underlined,
    Italic,
}

impl Decoration {
    pub const ALL: [Decoration; 5] = [
        Decoration::Obfuscated,
        Decoration::Bold,
        Decoration::Strikethrough,
        Decoration::Underlined,
        Decoration::Italic,
    ];

    /// Legacy format code (`k`, `l`, `m`, `n`, `o`).
    pub fn code(self) -> char {
        match self {
            Decoration::Obfuscated => 'k',
            Decoration::Bold => 'l',
            Decoration::Strikethrough => 'm',
            Decoration::Underlined => 'n',
            Decoration::Italic => 'o',
        }
    }

    pub fn from_code(code: char) -> Option<Decoration> {
        Decoration::ALL
            .into_iter()
            .find(|d| d.code() == code.to_ascii_lowercase())
    }

    /// Canonical name, used both as markup tag and component JSON key.
    pub fn name(self) -> &'static str {
        match self {
            Decoration::Obfuscated => "obfuscated",
            Decoration::Bold => "bold",
            Decoration::Strikethrough => "strikethrough",
            Decoration::Underlined => "underlined",
            Decoration::Italic => "italic",
        }
    }

    /// Looks up a decoration by canonical name or short alias.
    pub fn from_name(name: &str) -> Option<Decoration> {
        match name.to_ascii_lowercase().as_str() {
            "obfuscated" | "obf" => Some(Decoration::Obfuscated),
            "bold" | "b" => Some(Decoration::Bold),
            "strikethrough" | "st" => Some(Decoration::Strikethrough),
            "underlined" | "u" => Some(Decoration::Underlined),
            "italic" | "i" | "em" => Some(Decoration::Italic),
            _ => None,
        }
    }
}

/// A click action attached to a span of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub action: String,
    pub value: String,
}

/// Style attributes of a text node.
///
/// Every field is optional: `None` means "inherit from the parent node".
/// Decorations are tri-state so a child can explicitly switch off a
/// decoration its parent turned on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub color: Option<TextColor>,
    decorations: [Option<bool>; 5],
    pub click: Option<ClickEvent>,
    pub hover: Option<Box<RichText>>,
    pub font: Option<String>,
    pub insertion: Option<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: TextColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn decorate(mut self, decoration: Decoration, state: bool) -> Self {
        self.set_decoration(decoration, Some(state));
        self
    }

    pub fn click(mut self, action: impl Into<String>, value: impl Into<String>) -> Self {
        self.click = Some(ClickEvent {
            action: action.into(),
            value: value.into(),
        });
        self
    }

    pub fn hover(mut self, text: RichText) -> Self {
        self.hover = Some(Box::new(text));
        self
    }

    pub fn font(mut self, key: impl Into<String>) -> Self {
        self.font = Some(key.into());
        self
    }

    pub fn insertion(mut self, text: impl Into<String>) -> Self {
        self.insertion = Some(text.into());
        self
    }

    pub fn decoration(&self, decoration: Decoration) -> Option<bool> {
        self.decorations[decoration as usize]
    }

    pub fn set_decoration(&mut self, decoration: Decoration, state: Option<bool>) {
        self.decorations[decoration as usize] = state;
    }

    /// Decorations explicitly switched on.
    pub fn active_decorations(&self) -> impl Iterator<Item = Decoration> + '_ {
        Decoration::ALL
            .into_iter()
            .filter(|d| self.decoration(*d) == Some(true))
    }

    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }

    /// Returns this style with unset fields filled from `parent`.
    pub fn inherit(&self, parent: &Style) -> Style {
        let mut decorations = self.decorations;
        for (slot, inherited) in decorations.iter_mut().zip(parent.decorations) {
            if slot.is_none() {
                *slot = inherited;
            }
        }
        Style {
            color: self.color.or(parent.color),
            decorations,
            click: self.click.clone().or_else(|| parent.click.clone()),
            hover: self.hover.clone().or_else(|| parent.hover.clone()),
            font: self.font.clone().or_else(|| parent.font.clone()),
            insertion: self.insertion.clone().or_else(|| parent.insertion.clone()),
        }
    }

    /// Style as seen by a legacy client: `Some(false)` decorations are
    /// indistinguishable from unset ones.
    pub fn normalized(&self) -> Style {
        let mut style = self.clone();
        for slot in style.decorations.iter_mut() {
            if *slot == Some(false) {
                *slot = None;
            }
        }
        style
    }
}
