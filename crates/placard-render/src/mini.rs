//! Mini markup: the angle-bracket styling syntax.
//!
//! This module gives the tokens produced by [`placard_markup`] their styling
//! meaning and turns rich text back into markup.
//!
//! # Standard Tags
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `<red>`, `<dark_aqua>`, ... | named color |
//! | `<#ff8800>` | RGB color |
//! | `<color:red>` (`colour`, `c`) | color from argument |
//! | `<bold>` (`b`), `<italic>` (`i`, `em`), `<underlined>` (`u`), `<strikethrough>` (`st`), `<obfuscated>` (`obf`) | decoration; `<!bold>` switches it off |
//! | `<click:action:value>` | click event |
//! | `<hover:show_text:text>` | hover text (itself markup) |
//! | `<insert:text>` | shift-click insertion |
//! | `<font:key>` | font |
//! | `<reset>` | closes every open tag |
//! | `<newline>` (`br`) | line break |
//!
//! Closing a tag also closes every tag opened after it. A closing tag that
//! matches nothing open is dropped; unknown tags stay in the text verbatim.
//!
//! # Example
//!
//! ```rust
//! use placard_render::mini;
//!
//! let text = mini::parse("<red>Hello <bold>world</bold>!</red>");
//! assert_eq!(text.plain(), "Hello world!");
//! assert_eq!(mini::serialize(&text), "<red>Hello </red><red><bold>world</bold></red><red>!</red>");
//! ```

use placard_markup::{escape, quote_arg, Tag, Token, Tokenizer};

use crate::color::TextColor;
use crate::style::{Decoration, Style};
use crate::text::{RichText, Run};

/// What a standard tag does when opened.
#[derive(Debug, Clone, PartialEq)]
pub enum StandardTag {
    /// Push a style span.
    Style(Style),
    /// Close every open span.
    Reset,
    /// Insert a line break.
    Newline,
}

/// Whether `key` names a standard tag that can be closed.
pub fn is_closable(key: &str) -> bool {
    matches!(
        key,
        "color" | "colour" | "c" | "click" | "hover" | "insert" | "insertion" | "font"
    ) || Decoration::from_name(key).is_some()
        || TextColor::parse(key).is_ok()
}

/// Interprets a standard tag.
///
/// `render_hover` turns the markup of a `hover` tag into rich text, letting
/// callers resolve more than the standard tags inside hover text.
pub fn standard_tag(
    tag: &Tag<'_>,
    render_hover: &mut dyn FnMut(&str) -> RichText,
) -> Option<StandardTag> {
    let key = tag.key();
    let style = match key.as_str() {
        "reset" => return Some(StandardTag::Reset),
        "newline" | "br" => return Some(StandardTag::Newline),
        "color" | "colour" | "c" => Style::new().color(TextColor::parse(tag.arg(0)?).ok()?),
        "click" => Style::new().click(tag.arg(0)?.to_ascii_lowercase(), tag.arg(1)?),
        "hover" => {
            if !tag.arg(0)?.eq_ignore_ascii_case("show_text") {
                return None;
            }
            Style::new().hover(render_hover(tag.arg(1)?))
        }
        "insert" | "insertion" => Style::new().insertion(tag.arg(0)?),
        "font" => Style::new().font(tag.arg(0)?),
        _ => match Decoration::from_name(&key) {
            Some(decoration) => {
                let state = !tag.is_negated() && tag.arg(0) != Some("false");
                Style::new().decorate(decoration, state)
            }
            None => Style::new().color(TextColor::parse(&key).ok()?),
        },
    };
    Some(StandardTag::Style(style))
}

#[derive(Debug, Clone)]
struct Frame {
    name: String,
    style: Style,
}

/// Accumulates styled text while tags are opened and closed.
#[derive(Debug, Clone, Default)]
pub struct MiniBuilder {
    stack: Vec<Frame>,
    runs: Vec<Run>,
}

impl MiniBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective style at the current position.
    pub fn current_style(&self) -> Style {
        self.stack
            .last()
            .map(|frame| frame.style.clone())
            .unwrap_or_default()
    }

    /// Appends text in the current style.
    pub fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let style = self.current_style();
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// Appends already styled text beneath the current style.
    pub fn append(&mut self, rich: &RichText) {
        let parent = self.current_style();
        for run in rich.runs() {
            self.stack.push(Frame {
                name: String::new(),
                style: run.style.inherit(&parent),
            });
            self.text(&run.text);
            self.stack.pop();
        }
    }

    /// Opens a span named `name`.
    pub fn open(&mut self, name: &str, style: &Style) {
        let style = style.inherit(&self.current_style());
        self.stack.push(Frame {
            name: name.to_ascii_lowercase(),
            style,
        });
    }

    /// Closes the innermost span named `name` and every span inside it.
    ///
    /// Returns `false` when no such span is open.
    pub fn close(&mut self, name: &str) -> bool {
        match self
            .stack
            .iter()
            .rposition(|frame| frame.name.eq_ignore_ascii_case(name))
        {
            Some(index) => {
                self.stack.truncate(index);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// Applies an interpreted standard tag.
    pub fn apply(&mut self, name: &str, tag: StandardTag) {
        match tag {
            StandardTag::Style(style) => self.open(name, &style),
            StandardTag::Reset => self.reset(),
            StandardTag::Newline => self.text("\n"),
        }
    }

    pub fn finish(self) -> RichText {
        RichText::from_runs(self.runs)
    }
}

/// Parses markup using only the standard tags.
pub fn parse(input: &str) -> RichText {
    let mut builder = MiniBuilder::new();
    for token in Tokenizer::new(input) {
        match token {
            Token::Text(text) | Token::Invalid(text) => builder.text(text),
            Token::Escaped(c) => builder.text(c.encode_utf8(&mut [0; 4])),
            Token::Open(tag) => match standard_tag(&tag, &mut |hover: &str| parse(hover)) {
                Some(standard) => builder.apply(&tag.key(), standard),
                None => builder.text(tag.raw),
            },
            Token::Close { name, raw } => {
                let key = name.trim_start_matches('!').to_ascii_lowercase();
                if is_closable(&key) {
                    builder.close(&key);
                } else {
                    builder.text(raw);
                }
            }
        }
    }
    builder.finish()
}

/// Opening tags for a style, each paired with the name that closes it.
fn style_tags(style: &Style) -> Vec<(String, String)> {
    let mut tags = Vec::new();

    match style.color {
        Some(TextColor::Named(named)) => {
            tags.push((format!("<{}>", named.name()), named.name().to_string()))
        }
        Some(color @ TextColor::Rgb(..)) => {
            let hex = color.to_hex();
            tags.push((format!("<{}>", hex), hex));
        }
        None => {}
    }

    for decoration in Decoration::ALL {
        let name = decoration.name();
        match style.decoration(decoration) {
            Some(true) => tags.push((format!("<{}>", name), name.to_string())),
            Some(false) => tags.push((format!("<!{}>", name), name.to_string())),
            None => {}
        }
    }

    if let Some(click) = &style.click {
        tags.push((
            format!(
                "<click:{}:{}>",
                quote_arg(&click.action),
                quote_arg(&click.value)
            ),
            "click".to_string(),
        ));
    }
    if let Some(hover) = &style.hover {
        tags.push((
            format!("<hover:show_text:{}>", quote_arg(&serialize(hover))),
            "hover".to_string(),
        ));
    }
    if let Some(insertion) = &style.insertion {
        tags.push((
            format!("<insert:{}>", quote_arg(insertion)),
            "insert".to_string(),
        ));
    }
    if let Some(font) = &style.font {
        tags.push((format!("<font:{}>", quote_arg(font)), "font".to_string()));
    }

    tags
}

/// Serializes rich text to markup that [`parse`] reads back into equal runs.
pub fn serialize(text: &RichText) -> String {
    write_runs(text, true)
}

/// Serializes like [`serialize`] but copies text content verbatim, so tags
/// written inside the content stay live when the result is parsed again.
///
/// ```rust
/// use placard_render::{mini, RichText};
///
/// let text = RichText::text("$<p:rank>");
/// assert_eq!(mini::serialize(&text), "$\\<p:rank>");
/// assert_eq!(mini::serialize_verbatim(&text), "$<p:rank>");
/// ```
pub fn serialize_verbatim(text: &RichText) -> String {
    write_runs(text, false)
}

fn write_runs(text: &RichText, escape_content: bool) -> String {
    let mut out = String::new();
    for run in text.runs() {
        let tags = style_tags(&run.style);
        for (open, _) in &tags {
            out.push_str(open);
        }
        if escape_content {
            out.push_str(&escape(&run.text));
        } else {
            out.push_str(&run.text);
        }
        for (_, close) in tags.iter().rev() {
            out.push_str("</");
            out.push_str(close);
            out.push('>');
        }
    }
    out
}
