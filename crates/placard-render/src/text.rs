//! The rich text tree.
//!
//! A [`RichText`] node has its own content, a [`Style`] and child nodes that
//! inherit that style. Encoders never look at the tree shape directly: they
//! flatten it into [`Run`]s (maximal stretches of text sharing one effective
//! style), so two trees with equal runs render identically in every flavor.

use crate::style::Style;

/// A node in a styled text tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichText {
    pub content: String,
    pub style: Style,
    pub children: Vec<RichText>,
}

/// A stretch of text with its fully inherited style.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: Style,
}

impl RichText {
    /// An unstyled text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Self {
            content: content.into(),
            style,
            children: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, child: RichText) -> Self {
        self.children.push(child);
        self
    }

    /// Rebuilds a flat tree from runs.
    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        Self {
            children: runs
                .into_iter()
                .map(|run| RichText::styled(run.text, run.style))
                .collect(),
            ..Self::default()
        }
    }

    /// Concatenated text content without any styling.
    pub fn plain(&self) -> String {
        let mut out = String::new();
        self.collect_plain(&mut out);
        out
    }

    fn collect_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.children {
            child.collect_plain(out);
        }
    }

    /// `true` when the tree renders no characters.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.iter().all(RichText::is_empty)
    }

    /// Flattens the tree into runs, merging neighbours with equal styles.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        self.collect_runs(&Style::default(), &mut runs);
        runs
    }

    fn collect_runs(&self, parent: &Style, runs: &mut Vec<Run>) {
        let style = self.style.inherit(parent);
        if !self.content.is_empty() {
            match runs.last_mut() {
                Some(last) if last.style == style => last.text.push_str(&self.content),
                _ => runs.push(Run {
                    text: self.content.clone(),
                    style: style.clone(),
                }),
            }
        }
        for child in &self.children {
            child.collect_runs(&style, runs);
        }
    }

    /// Visits every node depth-first, parents before children.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut RichText)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }
}

impl From<&str> for RichText {
    fn from(content: &str) -> Self {
        RichText::text(content)
    }
}

impl From<String> for RichText {
    fn from(content: String) -> Self {
        RichText::text(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{NamedColor, TextColor};
    use crate::style::Decoration;

    fn red() -> Style {
        Style::new().color(TextColor::Named(NamedColor::Red))
    }

    #[test]
    fn test_plain_concatenates_depth_first() {
        let text = RichText::text("a")
            .with_child(RichText::text("b").with_child(RichText::text("c")))
            .with_child(RichText::text("d"));
        assert_eq!(text.plain(), "abcd");
    }

    #[test]
    fn test_is_empty() {
        assert!(RichText::empty().is_empty());
        assert!(RichText::styled("", red())
            .with_child(RichText::empty())
            .is_empty());
        assert!(!RichText::empty().with_child(RichText::text(" ")).is_empty());
    }

    #[test]
    fn test_runs_inherit_and_merge() {
        let text = RichText::styled("a", red())
            .with_child(RichText::text("b"))
            .with_child(RichText::styled(
                "c",
                Style::new().decorate(Decoration::Bold, true),
            ));

        let runs = text.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "ab");
        assert_eq!(runs[0].style, red());
        assert_eq!(runs[1].text, "c");
        assert_eq!(runs[1].style.color, red().color);
        assert_eq!(runs[1].style.decoration(Decoration::Bold), Some(true));
    }

    #[test]
    fn test_from_runs_preserves_runs() {
        let text = RichText::styled("x", red()).with_child(RichText::text("y"));
        assert_eq!(RichText::from_runs(text.runs()).runs(), text.runs());
    }

    #[test]
    fn test_walk_mut_visits_all_nodes() {
        let mut text = RichText::text("a").with_child(RichText::text("b"));
        text.walk_mut(&mut |node| node.content = node.content.to_uppercase());
        assert_eq!(text.plain(), "AB");
    }
}
