//! Chat component JSON.
//!
//! Reads the three shapes a component can take on the wire:
//!
//! - a bare string: `"hello"`
//! - an array: `["a", {"text": "b", "color": "red"}]` where the first element
//!   is the parent and the rest become its children
//! - an object: `{"text": "...", "color": "...", "bold": true, "extra": [...]}`
//!
//! Both the older `clickEvent`/`hoverEvent` keys and the newer
//! `click_event`/`hover_event` keys are accepted; output uses the older ones.
//!
//! A `translate` component anywhere in the tree is rejected with
//! [`RenderError::Translatable`]: its text lives client side, so there is
//! nothing to rewrite and re-encoding would drop the key and its `with`
//! arguments.

use serde_json::{Map, Value};

use crate::color::TextColor;
use crate::error::{RenderError, Result};
use crate::style::{ClickEvent, Decoration, Style};
use crate::text::RichText;

/// Parses component JSON text.
pub fn from_str(json: &str) -> Result<RichText> {
    let value: Value = serde_json::from_str(json)?;
    from_value(&value)
}

/// Converts a parsed JSON value into rich text.
pub fn from_value(value: &Value) -> Result<RichText> {
    match value {
        Value::String(s) => Ok(RichText::text(s.as_str())),
        Value::Number(n) => Ok(RichText::text(n.to_string())),
        Value::Bool(b) => Ok(RichText::text(b.to_string())),
        Value::Array(items) => {
            let mut iter = items.iter();
            let Some(first) = iter.next() else {
                return Ok(RichText::empty());
            };
            let mut parent = from_value(first)?;
            for item in iter {
                parent.children.push(from_value(item)?);
            }
            Ok(parent)
        }
        Value::Object(map) => from_object(map),
        Value::Null => Err(RenderError::Component("null".to_string())),
    }
}

fn from_object(map: &Map<String, Value>) -> Result<RichText> {
    if let Some(key) = map.get("translate") {
        let key = key.as_str().map_or_else(|| key.to_string(), str::to_string);
        return Err(RenderError::Translatable(key));
    }
    let content = match map.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(other @ (Value::Number(_) | Value::Bool(_))) => other.to_string(),
        _ => String::new(),
    };

    let mut style = Style::new();
    if let Some(color) = map.get("color").and_then(Value::as_str) {
        style.color = TextColor::parse(color).ok();
    }
    for decoration in Decoration::ALL {
        if let Some(state) = map.get(decoration.name()).and_then(Value::as_bool) {
            style.set_decoration(decoration, Some(state));
        }
    }
    if let Some(click) = map.get("clickEvent").or_else(|| map.get("click_event")) {
        style.click = click_event(click);
    }
    if let Some(hover) = map.get("hoverEvent").or_else(|| map.get("hover_event")) {
        style.hover = hover_text(hover)?.map(Box::new);
    }
    style.font = map.get("font").and_then(Value::as_str).map(str::to_string);
    style.insertion = map
        .get("insertion")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut text = RichText::styled(content, style);
    if let Some(Value::Array(extra)) = map.get("extra") {
        for child in extra {
            text.children.push(from_value(child)?);
        }
    }
    Ok(text)
}

fn click_event(value: &Value) -> Option<ClickEvent> {
    let action = value.get("action")?.as_str()?;
    let target = ["value", "url", "command", "page"]
        .iter()
        .find_map(|key| value.get(*key))?;
    let target = match target {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(ClickEvent {
        action: action.to_string(),
        value: target,
    })
}

fn hover_text(value: &Value) -> Result<Option<RichText>> {
    if value.get("action").and_then(Value::as_str) != Some("show_text") {
        return Ok(None);
    }
    match value.get("contents").or_else(|| value.get("value")) {
        Some(contents) => from_value(contents).map(Some),
        None => Ok(None),
    }
}

/// Converts rich text into a component JSON value.
pub fn to_value(text: &RichText) -> Value {
    let mut map = Map::new();
    map.insert("text".to_string(), Value::String(text.content.clone()));

    let style = &text.style;
    if let Some(color) = style.color {
        map.insert("color".to_string(), Value::String(color.to_string()));
    }
    for decoration in Decoration::ALL {
        if let Some(state) = style.decoration(decoration) {
            map.insert(decoration.name().to_string(), Value::Bool(state));
        }
    }
    if let Some(click) = &style.click {
        map.insert(
            "clickEvent".to_string(),
            serde_json::json!({ "action": click.action, "value": click.value }),
        );
    }
    if let Some(hover) = &style.hover {
        map.insert(
            "hoverEvent".to_string(),
            serde_json::json!({ "action": "show_text", "contents": to_value(hover) }),
        );
    }
    if let Some(font) = &style.font {
        map.insert("font".to_string(), Value::String(font.clone()));
    }
    if let Some(insertion) = &style.insertion {
        map.insert("insertion".to_string(), Value::String(insertion.clone()));
    }
    if !text.children.is_empty() {
        map.insert(
            "extra".to_string(),
            Value::Array(text.children.iter().map(to_value).collect()),
        );
    }
    Value::Object(map)
}

/// Serializes rich text as compact component JSON.
pub fn to_string(text: &RichText) -> String {
    to_value(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    #[test]
    fn test_bare_string() {
        assert_eq!(from_str("\"hi\"").map(|t| t.plain()).ok(), Some("hi".into()));
    }

    #[test]
    fn test_array_first_is_parent() {
        let text = from_str(r#"[{"text":"a","color":"red"},"b"]"#).map(|t| t.runs());
        let runs = text.ok().unwrap_or_default();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "ab");
        assert_eq!(runs[0].style.color, Some(TextColor::Named(NamedColor::Red)));
    }

    #[test]
    fn test_object_styles() {
        let json = r##"{"text":"x","color":"#102030","bold":true,"italic":false,
            "clickEvent":{"action":"open_url","value":"https://a.b"},
            "hoverEvent":{"action":"show_text","contents":{"text":"tip"}},
            "font":"minecraft:uniform","insertion":"ins",
            "extra":[{"text":"y"}]}"##;
        let text = from_str(json).ok().unwrap_or_default();
        let style = &text.style;
        assert_eq!(style.color, Some(TextColor::Rgb(0x10, 0x20, 0x30)));
        assert_eq!(style.decoration(Decoration::Bold), Some(true));
        assert_eq!(style.decoration(Decoration::Italic), Some(false));
        assert_eq!(style.click.as_ref().map(|c| c.value.as_str()), Some("https://a.b"));
        assert_eq!(style.hover.as_ref().map(|h| h.plain()), Some("tip".to_string()));
        assert_eq!(style.font.as_deref(), Some("minecraft:uniform"));
        assert_eq!(style.insertion.as_deref(), Some("ins"));
        assert_eq!(text.plain(), "xy");
    }

    #[test]
    fn test_new_event_keys() {
        let json = r#"{"text":"x","click_event":{"action":"run_command","command":"/spawn"},
            "hover_event":{"action":"show_text","value":"tip"}}"#;
        let text = from_str(json).ok().unwrap_or_default();
        assert_eq!(text.style.click.map(|c| c.value), Some("/spawn".to_string()));
        assert_eq!(text.style.hover.map(|h| h.plain()), Some("tip".to_string()));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(from_str("not json"), Err(RenderError::Json(_))));
        assert!(matches!(from_str("null"), Err(RenderError::Component(_))));
    }

    #[test]
    fn test_translatable_rejected() {
        let json = r#"{"translate":"chat.type.text","with":["Steve",{"text":"hi"}]}"#;
        assert!(matches!(
            from_str(json),
            Err(RenderError::Translatable(key)) if key == "chat.type.text"
        ));
        let nested = r#"{"text":"a","extra":[{"translate":"death.attack.fall","with":["x"]}]}"#;
        assert!(matches!(from_str(nested), Err(RenderError::Translatable(_))));
        let hover = r#"{"text":"a","hoverEvent":{"action":"show_text","contents":{"translate":"k"}}}"#;
        assert!(matches!(from_str(hover), Err(RenderError::Translatable(_))));
    }

    #[test]
    fn test_to_value_then_from_value_keeps_runs() {
        let text = crate::mini::parse(
            "<gold>a<bold>b</bold><click:run_command:/x><hover:show_text:h>c",
        );
        let again = from_value(&to_value(&text)).ok().unwrap_or_default();
        assert_eq!(again.runs(), text.runs());
    }

    #[test]
    fn test_to_string_is_compact() {
        let text = RichText::text("hi");
        assert_eq!(to_string(&text), r#"{"text":"hi"}"#);
    }
}
