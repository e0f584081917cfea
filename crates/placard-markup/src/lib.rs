//! Tokenizer for angle-bracket chat markup.
//!
//! This crate splits `<tag:arg:...>text</tag>` markup into a flat token
//! stream. It knows nothing about what a tag *means*: styling, placeholder
//! lookup and side effects are layered on top by the render and engine crates.
//!
//! # Example
//!
//! ```rust
//! use placard_markup::{Token, Tokenizer};
//!
//! let tokens: Vec<_> = Tokenizer::new("<p:rank:'a:b'>!</p>").collect();
//! match &tokens[0] {
//!     Token::Open(tag) => {
//!         assert_eq!(tag.name, "p");
//!         assert_eq!(tag.args, vec!["rank".to_string(), "a:b".to_string()]);
//!     }
//!     other => panic!("unexpected token {:?}", other),
//! }
//! assert_eq!(tokens[1], Token::Text("!"));
//! ```
//!
//! # Syntax
//!
//! | Form | Token |
//! |------|-------|
//! | `<name>` | [`Token::Open`] |
//! | `<name:a:b>` | [`Token::Open`] with two arguments |
//! | `<name/>` | [`Token::Open`] with `self_closing` set |
//! | `</name>` | [`Token::Close`] |
//! | `\<` and `\\` | [`Token::Escaped`] |
//! | any other `<` | [`Token::Invalid`] |
//!
//! Tag names:
//! - May start with `!` (negation, e.g. `<!bold>`)
//! - Then a letter, underscore or `#` (hex colors such as `<#ff8800>`)
//! - Followed by letters, digits, underscores or hyphens
//! - Matched case-insensitively by consumers; the tokenizer preserves case
//!
//! Arguments are separated by `:`. An argument wrapped in `'` or `"` may
//! contain `:`, `<` and `>`; a backslash inside a quoted argument escapes the
//! quote character or another backslash. An unquoted `<` inside a tag makes
//! the whole tag invalid: the `<` is emitted as [`Token::Invalid`] and
//! scanning resumes right after it.

use std::borrow::Cow;

/// An opening (or self-closing) tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Tag name as written, including a leading `!` if present.
    pub name: &'a str,
    /// Unquoted, unescaped arguments.
    pub args: Vec<String>,
    /// `true` for `<name/>`.
    pub self_closing: bool,
    /// The exact source text of the tag.
    pub raw: &'a str,
}

impl<'a> Tag<'a> {
    /// Lower-cased name without the negation marker.
    pub fn key(&self) -> String {
        self.name.trim_start_matches('!').to_ascii_lowercase()
    }

    /// Whether the tag was written as `<!name>`.
    pub fn is_negated(&self) -> bool {
        self.name.starts_with('!')
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text content.
    Text(&'a str),
    /// A character written with a backslash escape (`\<` or `\\`).
    Escaped(char),
    /// Opening tag: `<name:args>` or `<name/>`.
    Open(Tag<'a>),
    /// Closing tag: `</name>`.
    Close { name: &'a str, raw: &'a str },
    /// A `<` that does not start a well-formed tag.
    Invalid(&'a str),
}

impl Token<'_> {
    /// The source text that produced this token.
    pub fn source(&self) -> Cow<'_, str> {
        match self {
            Token::Text(text) | Token::Invalid(text) => Cow::Borrowed(text),
            Token::Escaped(c) => Cow::Owned(format!("\\{}", c)),
            Token::Open(tag) => Cow::Borrowed(tag.raw),
            Token::Close { raw, .. } => Cow::Borrowed(raw),
        }
    }
}

/// Streaming tokenizer over a markup string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Checks if a string is a valid tag name.
    pub fn is_valid_tag_name(s: &str) -> bool {
        let s = s.strip_prefix('!').unwrap_or(s);
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        if !first.is_ascii_alphabetic() && first != '_' && first != '#' {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    fn is_name_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'#' | b'!')
    }

    /// Attempts to read a tag at the start of `s` (which begins with `<`).
    ///
    /// Returns the token and the number of bytes it spans.
    fn parse_tag(s: &'a str) -> Option<(Token<'a>, usize)> {
        let bytes = s.as_bytes();
        let closing = bytes.get(1) == Some(&b'/');
        let mut i = if closing { 2 } else { 1 };

        let name_start = i;
        while i < bytes.len() && Self::is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &s[name_start..i];
        if !Self::is_valid_tag_name(name) {
            return None;
        }

        let mut args = Vec::new();
        let self_closing = loop {
            match bytes.get(i)? {
                b'>' => {
                    i += 1;
                    break false;
                }
                b'/' if !closing && bytes.get(i + 1) == Some(&b'>') => {
                    i += 2;
                    break true;
                }
                b':' => {
                    i += 1;
                    let (arg, len) = Self::parse_arg(&s[i..])?;
                    args.push(arg);
                    i += len;
                }
                _ => return None,
            }
        };

        let raw = &s[..i];
        let token = if closing {
            Token::Close { name, raw }
        } else {
            Token::Open(Tag {
                name,
                args,
                self_closing,
                raw,
            })
        };
        Some((token, i))
    }

    /// Reads one argument, stopping before its terminator (`:`, `>` or `/>`).
    fn parse_arg(s: &str) -> Option<(String, usize)> {
        match s.chars().next() {
            Some(quote @ ('\'' | '"')) => {
                let mut out = String::new();
                let mut escaped = false;
                for (idx, c) in s.char_indices().skip(1) {
                    if escaped {
                        if c != quote && c != '\\' {
                            out.push('\\');
                        }
                        out.push(c);
                        escaped = false;
                        continue;
                    }
                    if c == '\\' {
                        escaped = true;
                    } else if c == quote {
                        let end = idx + c.len_utf8();
                        return match s[end..].chars().next() {
                            Some(':' | '>' | '/') => Some((out, end)),
                            _ => None,
                        };
                    } else {
                        out.push(c);
                    }
                }
                None
            }
            _ => {
                for (idx, c) in s.char_indices() {
                    match c {
                        ':' | '>' => return Some((s[..idx].to_string(), idx)),
                        '/' if s[idx + 1..].starts_with('>') => {
                            return Some((s[..idx].to_string(), idx))
                        }
                        '<' => return None,
                        _ => {}
                    }
                }
                None
            }
        }
    }

    /// Length of the text run at the start of `s`.
    fn text_end(s: &str) -> usize {
        let bytes = s.as_bytes();
        for i in 1..bytes.len() {
            match bytes[i] {
                b'<' => return i,
                b'\\' if matches!(bytes.get(i + 1), Some(b'<' | b'\\')) => return i,
                _ => {}
            }
        }
        bytes.len()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];

        if let Some(rest) = remaining.strip_prefix('\\') {
            if let Some(c @ ('<' | '\\')) = rest.chars().next() {
                self.pos += 2;
                return Some(Token::Escaped(c));
            }
        }

        if remaining.starts_with('<') {
            if let Some((token, len)) = Self::parse_tag(remaining) {
                self.pos += len;
                return Some(token);
            }
            self.pos += 1;
            return Some(Token::Invalid(&remaining[..1]));
        }

        let end = Self::text_end(remaining);
        self.pos += end;
        Some(Token::Text(&remaining[..end]))
    }
}

/// Escapes text so that it tokenizes back to itself as plain content.
///
/// # Example
///
/// ```rust
/// use placard_markup::escape;
///
/// assert_eq!(escape("a<b"), "a\\<b");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '\\']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if c == '<' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Quotes a tag argument when it contains characters that would end it early.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty()
        || arg.starts_with(['\'', '"'])
        || arg.contains([':', '<', '>', '/', '\\']);
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}

/// Drops every tag and unescapes the rest.
///
/// Unknown tags are dropped too, so this is a structural strip rather than a
/// render.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for token in Tokenizer::new(input) {
        match token {
            Token::Text(text) | Token::Invalid(text) => out.push_str(text),
            Token::Escaped(c) => out.push(c),
            Token::Open(_) | Token::Close { .. } => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input).collect()
    }

    fn open<'a>(name: &'a str, args: &[&str], raw: &'a str) -> Token<'a> {
        Token::Open(Tag {
            name,
            args: args.iter().map(|a| a.to_string()).collect(),
            self_closing: false,
            raw,
        })
    }

    // ==================== Tokenizer Tests ====================

    mod tokenizer {
        use super::*;

        #[test]
        fn tokenize_plain_text() {
            assert_eq!(tokens("hello world"), vec![Token::Text("hello world")]);
        }

        #[test]
        fn tokenize_single_tag() {
            assert_eq!(
                tokens("<bold>hello</bold>"),
                vec![
                    open("bold", &[], "<bold>"),
                    Token::Text("hello"),
                    Token::Close {
                        name: "bold",
                        raw: "</bold>"
                    },
                ]
            );
        }

        #[test]
        fn tokenize_args() {
            assert_eq!(
                tokens("<p:rank:3>"),
                vec![open("p", &["rank", "3"], "<p:rank:3>")]
            );
        }

        #[test]
        fn tokenize_empty_args() {
            assert_eq!(tokens("<p::>"), vec![open("p", &["", ""], "<p::>")]);
        }

        #[test]
        fn tokenize_self_closing() {
            match &tokens("<br/>")[0] {
                Token::Open(tag) => {
                    assert_eq!(tag.name, "br");
                    assert!(tag.self_closing);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn tokenize_mixed() {
            assert_eq!(
                tokens("a<b>c</b>d"),
                vec![
                    Token::Text("a"),
                    open("b", &[], "<b>"),
                    Token::Text("c"),
                    Token::Close {
                        name: "b",
                        raw: "</b>"
                    },
                    Token::Text("d"),
                ]
            );
        }

        #[test]
        fn hex_and_negated_names() {
            match &tokens("<#ff8800>")[0] {
                Token::Open(tag) => assert_eq!(tag.key(), "#ff8800"),
                other => panic!("unexpected {:?}", other),
            }
            match &tokens("<!Bold>")[0] {
                Token::Open(tag) => {
                    assert!(tag.is_negated());
                    assert_eq!(tag.key(), "bold");
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    // ==================== Argument Tests ====================

    mod arguments {
        use super::*;

        #[test]
        fn single_quoted_arg_keeps_colons() {
            assert_eq!(
                tokens("<hover:show_text:'a:b'>"),
                vec![open(
                    "hover",
                    &["show_text", "a:b"],
                    "<hover:show_text:'a:b'>"
                )]
            );
        }

        #[test]
        fn double_quoted_arg_keeps_brackets() {
            match &tokens("<title:\"<red>Hi</red>\">")[0] {
                Token::Open(tag) => assert_eq!(tag.args, vec!["<red>Hi</red>".to_string()]),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn escaped_quote_in_quoted_arg() {
            match &tokens(r#"<x:'it\'s'>"#)[0] {
                Token::Open(tag) => assert_eq!(tag.arg(0), Some("it's")),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn other_backslashes_kept_in_quoted_arg() {
            match &tokens(r#"<x:'a\nb'>"#)[0] {
                Token::Open(tag) => assert_eq!(tag.arg(0), Some("a\\nb")),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn quote_mid_argument_is_literal() {
            match &tokens("<x:it's>")[0] {
                Token::Open(tag) => assert_eq!(tag.arg(0), Some("it's")),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn unquoted_angle_bracket_invalidates_tag() {
            assert_eq!(
                tokens("<p:<b>>"),
                vec![
                    Token::Invalid("<"),
                    Token::Text("p:"),
                    open("b", &[], "<b>"),
                    Token::Text(">"),
                ]
            );
        }

        #[test]
        fn quote_must_end_argument() {
            assert_eq!(tokens("<x:'a'b>")[0], Token::Invalid("<"));
        }
    }

    // ==================== Tag Name Validation Tests ====================

    mod tag_names {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(Tokenizer::is_valid_tag_name("bold"));
            assert!(Tokenizer::is_valid_tag_name("Bold"));
            assert!(Tokenizer::is_valid_tag_name("my_style"));
            assert!(Tokenizer::is_valid_tag_name("dark-red"));
            assert!(Tokenizer::is_valid_tag_name("h1"));
            assert!(Tokenizer::is_valid_tag_name("#abc"));
            assert!(Tokenizer::is_valid_tag_name("!italic"));
        }

        #[test]
        fn invalid_names() {
            assert!(!Tokenizer::is_valid_tag_name(""));
            assert!(!Tokenizer::is_valid_tag_name("!"));
            assert!(!Tokenizer::is_valid_tag_name("1st"));
            assert!(!Tokenizer::is_valid_tag_name("-x"));
            assert!(!Tokenizer::is_valid_tag_name("a!b"));
            assert!(!Tokenizer::is_valid_tag_name("a#b"));
            assert!(!Tokenizer::is_valid_tag_name("my style"));
        }
    }

    // ==================== Edge Cases ====================

    mod edge_cases {
        use super::*;

        #[test]
        fn empty_input() {
            assert!(tokens("").is_empty());
        }

        #[test]
        fn lone_bracket() {
            assert_eq!(tokens("1 < 2"), vec![
                Token::Text("1 "),
                Token::Invalid("<"),
                Token::Text(" 2"),
            ]);
        }

        #[test]
        fn unclosed_tag() {
            assert_eq!(
                tokens("hello <bold world"),
                vec![
                    Token::Text("hello "),
                    Token::Invalid("<"),
                    Token::Text("bold world"),
                ]
            );
        }

        #[test]
        fn escapes() {
            assert_eq!(
                tokens(r"a\<b>\\c\d"),
                vec![
                    Token::Text("a"),
                    Token::Escaped('<'),
                    Token::Text("b>"),
                    Token::Escaped('\\'),
                    Token::Text("c\\d"),
                ]
            );
        }

        #[test]
        fn trailing_backslash() {
            assert_eq!(tokens("a\\"), vec![Token::Text("a\\")]);
        }

        #[test]
        fn close_tag_rejects_self_closing() {
            assert_eq!(tokens("</b/>")[0], Token::Invalid("<"));
        }

        #[test]
        fn multibyte_text() {
            assert_eq!(
                tokens("ᴀʙᴄ<b>é"),
                vec![Token::Text("ᴀʙᴄ"), open("b", &[], "<b>"), Token::Text("é")]
            );
        }

        #[test]
        fn source_reconstructs_input() {
            let input = r"x<a:'q:1'>\<y</a><";
            let rebuilt: String = tokens(input).iter().map(|t| t.source().into_owned()).collect();
            assert_eq!(rebuilt, input);
        }
    }

    // ==================== Helper Tests ====================

    mod helpers {
        use super::*;

        #[test]
        fn escape_untouched_when_clean() {
            assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        }

        #[test]
        fn strip_tags_keeps_text() {
            assert_eq!(strip_tags("<red>a</red> \\<b <c"), "a <b <c");
        }

        #[test]
        fn quote_arg_when_needed() {
            assert_eq!(quote_arg("plain"), "plain");
            assert_eq!(quote_arg("a:b"), "\"a:b\"");
            assert_eq!(quote_arg("say \"hi\" <x>"), "\"say \\\"hi\\\" <x>\"");
            assert_eq!(quote_arg(""), "\"\"");
        }
    }
}
