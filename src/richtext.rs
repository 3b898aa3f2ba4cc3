//! Structured inline text.
//!
//! Text handed to the block builders is a [`RichText`]: an ordered list of [`Span`]s carrying
//! their own emphasis.  Nothing in the crate parses inline markup, so callers decide how their
//! source text maps to spans and the renderer never has to guess.

use genpdf::fonts::{Font, FontFamily};
use genpdf::style::{Color, Style, StyledString};

/// A slice of text together with inline emphasis.
///
/// Emphasis is layered on top of the block's resolved style when rendering: a bold span inside a
/// body paragraph keeps the paragraph's size and color and only switches the weight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    monospace: bool,
    color: Option<Color>,
}

impl Span {
    /// Creates a new span with the provided text and no emphasis.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns whether the span uses the monospace family.
    pub fn is_monospace(&self) -> bool {
        self.monospace
    }

    /// Returns the color override for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Sets the bold flag and returns the updated span.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated span.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the monospace flag and returns the updated span.
    pub fn with_monospace(mut self, monospace: bool) -> Self {
        self.monospace = monospace;
        self
    }

    /// Sets the span color and returns the updated span.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Shorthand for `with_bold(true)`.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Shorthand for `with_italic(true)`.
    pub fn italic(self) -> Self {
        self.with_italic(true)
    }

    /// Shorthand for `with_monospace(true)`.
    pub fn code(self) -> Self {
        self.with_monospace(true)
    }

    /// Shorthand that assigns a color to the span.
    pub fn colored(self, color: Color) -> Self {
        self.with_color(Some(color))
    }

    /// Builds the emphasis style that is layered over a block style.
    fn emphasis(&self, mono: Option<FontFamily<Font>>) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        if self.monospace {
            if let Some(family) = mono {
                style.set_font_family(family);
            }
        }
        style
    }

    /// Converts the span into a [`StyledString`] on top of `base`.
    pub fn to_styled_string(&self, base: Style, mono: Option<FontFamily<Font>>) -> StyledString {
        StyledString::new(self.text.clone(), base.and(self.emphasis(mono)))
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Span::new(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Span::new(text)
    }
}

/// An ordered sequence of spans forming one run of text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichText {
    spans: Vec<Span>,
}

impl RichText {
    /// Creates rich text from the given spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
        }
    }

    /// Returns the spans in order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Appends a span and returns the updated text.
    pub fn with(mut self, span: impl Into<Span>) -> Self {
        self.spans.push(span.into());
        self
    }

    /// Appends a span in place.
    pub fn push(&mut self, span: impl Into<Span>) {
        self.spans.push(span.into());
    }

    /// Returns `true` when there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// Concatenates the text of every span, dropping emphasis.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Returns a copy of this text with `prefix` prepended as an unstyled span.
    pub fn prefixed(&self, prefix: impl Into<String>) -> Self {
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        spans.push(Span::new(prefix));
        spans.extend(self.spans.iter().cloned());
        Self { spans }
    }

    /// Converts every span into a styled string on top of `base`.
    pub fn to_styled_strings(
        &self,
        base: Style,
        mono: Option<FontFamily<Font>>,
    ) -> Vec<StyledString> {
        self.spans
            .iter()
            .map(|span| span.to_styled_string(base, mono))
            .collect()
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::new(vec![Span::new(text)])
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        RichText::new(vec![Span::new(text)])
    }
}

impl From<Span> for RichText {
    fn from(span: Span) -> Self {
        RichText::new(vec![span])
    }
}

impl From<Vec<Span>> for RichText {
    fn from(spans: Vec<Span>) -> Self {
        RichText::new(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_is_layered_over_base_style() {
        let base = Style::new().with_font_size(10).with_color(Color::Rgb(1, 2, 3));
        let span = Span::new("Hello").bold().italic();
        let styled = span.to_styled_string(base, None);
        assert_eq!(styled.s, "Hello");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.font_size(), 10);
        assert_eq!(styled.style.color(), Some(Color::Rgb(1, 2, 3)));
    }

    #[test]
    fn span_color_overrides_base_color() {
        let base = Style::new().with_color(Color::Rgb(1, 2, 3));
        let styled = Span::new("x")
            .colored(Color::Rgb(10, 20, 30))
            .to_styled_string(base, None);
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn plain_text_concatenates_spans() {
        let text = RichText::from("O(n")
            .with(Span::new("²").bold())
            .with(")");
        assert_eq!(text.plain_text(), "O(n²)");
        assert_eq!(text.spans().len(), 3);
        assert!(!text.is_empty());
        assert!(RichText::default().is_empty());
    }

    #[test]
    fn prefixed_keeps_original_spans() {
        let text = RichText::from(Span::new("insight").italic()).prefixed("💡  ");
        assert_eq!(text.spans()[0].text(), "💡  ");
        assert!(!text.spans()[0].is_italic());
        assert!(text.spans()[1].is_italic());
    }
}
