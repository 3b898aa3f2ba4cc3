//! Named styles, the semantic palette and page geometry shared by every block of a document.
//!
//! A [`Theme`] is built once per document and then only read.  Builders receive it by reference
//! and resolve style names and palette keys through it, so a typo in a style name surfaces as
//! [`ThemeError::UnknownStyle`] the moment the block is built instead of as a silently unstyled
//! paragraph in the output.

mod config;
mod preset;

use std::collections::BTreeMap;

use genpdf::fonts::{Font, FontFamily};
use genpdf::style::{Color, Style};

use crate::error::ThemeError;

pub use config::{PageConfig, StyleConfig, ThemeConfig};

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Well-known style names used by the block builders and the page decorator.
pub mod styles {
    pub const TITLE: &str = "title";
    pub const SUBTITLE: &str = "subtitle";
    pub const AUTHOR: &str = "author";
    pub const H1: &str = "h1";
    pub const H2: &str = "h2";
    pub const H3: &str = "h3";
    pub const BODY: &str = "body";
    pub const BULLET: &str = "bullet";
    pub const CODE: &str = "code";
    pub const CODE_COMMENT: &str = "codeComment";
    pub const CODE_HEADER: &str = "codeHeader";
    pub const FORMULA: &str = "formula";
    pub const CAPTION: &str = "caption";
    pub const TOC: &str = "toc";
    pub const TOC_SUB: &str = "tocSub";
    pub const NOTE: &str = "note";
    pub const CALLOUT: &str = "callout";
    pub const DIVIDER_NUMBER: &str = "dividerNumber";
    pub const DIVIDER_TITLE: &str = "dividerTitle";
    pub const TABLE_HEADER: &str = "tableHeader";
    pub const TABLE_CELL: &str = "tableCell";
    pub const BADGE: &str = "badge";
    pub const VIZ_LABEL: &str = "vizLabel";
    pub const VIZ_VALUE: &str = "vizValue";
    pub const VIZ_INDEX: &str = "vizIndex";
    pub const FOOTER: &str = "footer";
}

/// Well-known palette keys.
pub mod palette {
    /// Page background.
    pub const BASE: &str = "base";
    pub const ACCENT: &str = "accent";
    pub const ACCENT_ALT: &str = "accentAlt";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const DANGER: &str = "danger";
    pub const MUTED: &str = "muted";
    pub const BORDER: &str = "border";
    /// Background of visualization cells without a pointer.
    pub const DEFAULT: &str = "default";
    /// Text color of visualization cells that carry a pointer or sit inside the window.
    pub const HIGHLIGHTED: &str = "highlighted";
    /// Background of a cell shared by several top-priority pointers.
    pub const COLLISION: &str = "collision";
    /// Label color over a collision cell; falls back to `collision`.
    pub const COLLISION_LABEL: &str = "collisionLabel";
    /// Background of cells inside the highlighted window.
    pub const WINDOW: &str = "window";
    /// Fallback pointer background; `pointer.<name>` entries take precedence.
    pub const POINTER: &str = "pointer";
    pub const CALLOUT_BACKGROUND: &str = "calloutBackground";
    pub const CODE_BACKGROUND: &str = "codeBackground";
    pub const CODE_HEADER_BACKGROUND: &str = "codeHeaderBackground";
    pub const TABLE_HEADER_BACKGROUND: &str = "tableHeaderBackground";
    pub const ZEBRA_EVEN: &str = "zebraEven";
    pub const ZEBRA_ODD: &str = "zebraOdd";

    /// Palette key holding the designated background of the pointer called `name`.
    pub fn pointer(name: &str) -> String {
        format!("{POINTER}.{name}")
    }

    /// Palette key holding the label color of the pointer called `name`.
    pub fn pointer_label(name: &str) -> String {
        format!("pointerLabel.{name}")
    }
}

/// Font family used by a style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontKind {
    /// The document's proportional family.
    #[default]
    Sans,
    /// The monospace family used for code.
    Mono,
}

/// Horizontal alignment of text inside its block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Justified paragraphs; the backend renders them left aligned.
    Justified,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left | HorizontalAlignment::Justified => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Immutable description of how a piece of text looks.
///
/// Font size and leading are given in points, spacing and indents in millimetres.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleDescriptor {
    font: FontKind,
    bold: bool,
    italic: bool,
    size: f64,
    leading: f64,
    color: Color,
    background: Option<Color>,
    alignment: HorizontalAlignment,
    space_before: f64,
    space_after: f64,
    left_indent: f64,
    right_indent: f64,
}

impl StyleDescriptor {
    /// Creates a style with the given font, size and color, a leading of 1.2 × size and no
    /// spacing.
    pub fn new(font: FontKind, size: f64, color: Color) -> Self {
        Self {
            font,
            bold: false,
            italic: false,
            size,
            leading: size * 1.2,
            color,
            background: None,
            alignment: HorizontalAlignment::Left,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
            right_indent: 0.0,
        }
    }

    pub fn font(&self) -> FontKind {
        self.font
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Font size in points.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Baseline-to-baseline distance in points.
    pub fn leading(&self) -> f64 {
        self.leading
    }

    /// Text color; also the accent color of callouts using this style.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Space above the block in millimetres.
    pub fn space_before(&self) -> f64 {
        self.space_before
    }

    /// Space below the block in millimetres.
    pub fn space_after(&self) -> f64 {
        self.space_after
    }

    pub fn left_indent(&self) -> f64 {
        self.left_indent
    }

    pub fn right_indent(&self) -> f64 {
        self.right_indent
    }

    /// Marks the style as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the style as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_leading(mut self, leading: f64) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_background(mut self, background: impl Into<Option<Color>>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the space above and below the block, in millimetres.
    pub fn with_spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    /// Sets the left and right indents, in millimetres.
    pub fn with_indent(mut self, left: f64, right: f64) -> Self {
        self.left_indent = left;
        self.right_indent = right;
        self
    }

    /// Converts the descriptor into a backend [`Style`].
    ///
    /// `mono` is the monospace family installed in the document; without it monospace styles fall
    /// back to the document's default family.
    pub fn to_style(&self, mono: Option<FontFamily<Font>>) -> Style {
        let font_size = self.size.round().clamp(1.0, f64::from(u8::MAX)) as u8;
        let mut style = Style::new()
            .with_font_size(font_size)
            .with_line_spacing(self.line_spacing())
            .with_color(self.color);
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        if self.font == FontKind::Mono {
            if let Some(family) = mono {
                style.set_font_family(family);
            }
        }
        style
    }

    /// Leading expressed as a multiple of the font size, as the backend expects it.
    fn line_spacing(&self) -> f64 {
        if self.size > f64::EPSILON {
            (self.leading / (self.size * 1.2)).max(0.5)
        } else {
            1.0
        }
    }
}

/// Margins around the printable area, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PageMargins {
    pub fn to_margins(self) -> genpdf::Margins {
        genpdf::Margins::trbl(
            crate::elements::mm(self.top),
            crate::elements::mm(self.right),
            crate::elements::mm(self.bottom),
            crate::elements::mm(self.left),
        )
    }
}

/// Paper size and margins, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: PageMargins,
    /// Height of the footer band below the content area, carved out of the bottom margin.
    pub footer_height: f64,
}

impl PageGeometry {
    /// US letter with 0.75in top and bottom and 0.65in side margins.
    pub fn letter() -> Self {
        Self {
            width: 215.9,
            height: 279.4,
            margins: PageMargins {
                top: 19.05,
                right: 16.51,
                bottom: 19.05,
                left: 16.51,
            },
            footer_height: 0.0,
        }
    }

    /// Width left for content between the side margins.
    pub fn content_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    /// Height of the content area of one page, below the top margin and above the footer band.
    pub fn content_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom - self.footer_height).max(0.0)
    }

    pub fn paper_size(&self) -> genpdf::Size {
        genpdf::Size::new(
            crate::elements::mm(self.width),
            crate::elements::mm(self.height),
        )
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Registry of named styles plus the semantic palette of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    styles: BTreeMap<String, StyleDescriptor>,
    palette: BTreeMap<String, Color>,
    page: PageGeometry,
    max_column_width: f64,
}

impl Theme {
    /// Default upper bound for visualization columns: 52pt.
    pub const DEFAULT_MAX_COLUMN_WIDTH: f64 = 52.0 / POINTS_PER_MM;

    /// Creates an empty theme on letter paper.
    pub fn new() -> Self {
        Self {
            styles: BTreeMap::new(),
            palette: BTreeMap::new(),
            page: PageGeometry::letter(),
            max_column_width: Self::DEFAULT_MAX_COLUMN_WIDTH,
        }
    }

    /// Registers `descriptor` under `name`.
    ///
    /// Fails with [`ThemeError::DuplicateStyle`] when the name is taken; styles are never
    /// overwritten.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        descriptor: StyleDescriptor,
    ) -> Result<(), ThemeError> {
        let name = name.into();
        if self.styles.contains_key(&name) {
            return Err(ThemeError::DuplicateStyle(name));
        }
        self.styles.insert(name, descriptor);
        Ok(())
    }

    /// Looks up the style registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&StyleDescriptor, ThemeError> {
        self.styles
            .get(name)
            .ok_or_else(|| ThemeError::UnknownStyle(name.to_owned()))
    }

    /// Returns `true` if a style is registered under `name`.
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Iterates over the registered styles in name order.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &StyleDescriptor)> {
        self.styles.iter().map(|(name, style)| (name.as_str(), style))
    }

    /// Defines or replaces the palette entry `key`.
    pub fn set_color(&mut self, key: impl Into<String>, color: Color) {
        self.palette.insert(key.into(), color);
    }

    /// Builder-style variant of [`Theme::set_color`].
    pub fn with_color(mut self, key: impl Into<String>, color: Color) -> Self {
        self.set_color(key, color);
        self
    }

    /// Looks up the palette entry `key`.
    pub fn color(&self, key: &str) -> Result<Color, ThemeError> {
        self.palette
            .get(key)
            .copied()
            .ok_or_else(|| ThemeError::UnknownColor(key.to_owned()))
    }

    /// Looks up `key`, returning `None` when it is not configured.
    pub fn try_color(&self, key: &str) -> Option<Color> {
        self.palette.get(key).copied()
    }

    /// Iterates over the palette in key order.
    pub fn palette(&self) -> impl Iterator<Item = (&str, Color)> {
        self.palette.iter().map(|(key, color)| (key.as_str(), *color))
    }

    pub fn page(&self) -> &PageGeometry {
        &self.page
    }

    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.page = page;
        self
    }

    /// Upper bound for a visualization column, in millimetres.
    pub fn max_column_width(&self) -> f64 {
        self.max_column_width
    }

    pub fn with_max_column_width(mut self, width: f64) -> Self {
        self.max_column_width = width;
        self
    }

    /// Width available to blocks on a page, in millimetres.
    pub fn content_width(&self) -> f64 {
        self.page.content_width()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> StyleDescriptor {
        StyleDescriptor::new(FontKind::Sans, 10.0, Color::Rgb(203, 213, 225)).with_leading(15.0)
    }

    #[test]
    fn define_then_resolve() {
        let mut theme = Theme::new();
        theme.define("sBody", body()).expect("first definition");
        assert_eq!(theme.resolve("sBody").expect("defined").size(), 10.0);
    }

    #[test]
    fn duplicate_definition_is_rejected_and_keeps_original() {
        let mut theme = Theme::new();
        theme.define("sBody", body()).expect("first definition");
        let err = theme
            .define("sBody", body().bold())
            .expect_err("second definition must fail");
        assert_eq!(err, ThemeError::DuplicateStyle("sBody".into()));
        assert!(!theme.resolve("sBody").expect("defined").is_bold());
    }

    #[test]
    fn unknown_style_and_color() {
        let theme = Theme::new();
        assert_eq!(
            theme.resolve("sBody").unwrap_err(),
            ThemeError::UnknownStyle("sBody".into())
        );
        assert_eq!(
            theme.color("accent").unwrap_err(),
            ThemeError::UnknownColor("accent".into())
        );
    }

    #[test]
    fn style_conversion_keeps_weight_and_size() {
        let style = body().bold().italic().to_style(None);
        assert!(style.is_bold());
        assert!(style.is_italic());
        assert_eq!(style.font_size(), 10);
        assert_eq!(style.color(), Some(Color::Rgb(203, 213, 225)));
    }

    #[test]
    fn letter_content_width() {
        let page = PageGeometry::letter();
        assert!((page.content_width() - 182.88).abs() < 1e-9);
    }

    #[test]
    fn pointer_palette_keys() {
        assert_eq!(palette::pointer("left"), "pointer.left");
        assert_eq!(palette::pointer_label("left"), "pointerLabel.left");
    }
}
