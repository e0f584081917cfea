//! Legacy chat components.
//!
//! The component objects older chat APIs put in packets. They share the
//! component JSON layout, so conversion to and from rich text goes through
//! [`placard_render::json`].

use placard_render::{json, RichText};
use serde::{Deserialize, Serialize};

use crate::error::WireError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BungeeClickEvent {
    pub action: String,
    pub value: String,
}

/// One legacy component and its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BungeeComponent {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_event: Option<BungeeClickEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_event: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<BungeeComponent>,
}

impl BungeeComponent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Reads a list of sibling components as one rich text.
pub fn to_rich(components: &[BungeeComponent]) -> Result<RichText, WireError> {
    let mut root = RichText::empty();
    for component in components {
        let value = serde_json::to_value(component)?;
        root.children.push(json::from_value(&value)?);
    }
    Ok(root)
}

/// Writes rich text as a single component.
pub fn from_rich(text: &RichText) -> Result<BungeeComponent, WireError> {
    Ok(serde_json::from_value(json::to_value(text))?)
}
