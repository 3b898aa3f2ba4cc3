//! Data structures describing the logical content of a document.
//!
//! A document is an ordered [`Story`] of [`ContentBlock`]s.  The block set is closed: the
//! backend dispatches on the enum, so adding a block kind is a compile-time visible change in
//! every renderer.  Blocks reference styles and palette entries by name; the builders in
//! [`crate::blocks`] check those names against a theme, and the assembler checks them again for
//! blocks constructed by hand.

use genpdf::style::Color;

use crate::error::BlockError;
use crate::richtext::RichText;
use crate::theme::styles;
use crate::visualization::RenderedGrid;

/// Prefix marking a code line as a comment.
pub const COMMENT_MARKER: &str = "##";

/// Paragraph of rich text rendered with a named style.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    style: String,
    text: RichText,
}

impl TextBlock {
    pub fn new(style: impl Into<String>, text: impl Into<RichText>) -> Self {
        Self {
            style: style.into(),
            text: text.into(),
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn text(&self) -> &RichText {
        &self.text
    }
}

/// Whether a code line is code or a comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeLineKind {
    Code,
    Comment,
}

impl CodeLineKind {
    /// Classifies `line` by the reserved [`COMMENT_MARKER`].
    pub fn classify(line: &str) -> Self {
        if line.starts_with(COMMENT_MARKER) {
            Self::Comment
        } else {
            Self::Code
        }
    }

    /// Style applied to lines of this kind.
    pub fn style_name(self) -> &'static str {
        match self {
            Self::Code => styles::CODE,
            Self::Comment => styles::CODE_COMMENT,
        }
    }
}

/// One row of a code panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLine {
    kind: CodeLineKind,
    text: String,
}

impl CodeLine {
    /// Creates a line, classifying it by its leading marker.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: CodeLineKind::classify(&text),
            text,
        }
    }

    pub fn kind(&self) -> CodeLineKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text as printed: empty lines become a single blank so the row keeps its height.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            " "
        } else {
            &self.text
        }
    }
}

/// Code panel with a language header strip and one row per line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    language: String,
    lines: Vec<CodeLine>,
}

impl CodeBlock {
    pub fn new<I, S>(language: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: language.into(),
            lines: lines.into_iter().map(CodeLine::new).collect(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn lines(&self) -> &[CodeLine] {
        &self.lines
    }
}

/// Highlighted note with a left accent bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Callout {
    style: String,
    icon: String,
    text: RichText,
}

impl Callout {
    pub fn new(style: impl Into<String>, icon: impl Into<String>, text: impl Into<RichText>) -> Self {
        Self {
            style: style.into(),
            icon: icon.into(),
            text: text.into(),
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn text(&self) -> &RichText {
        &self.text
    }

    /// The text with the icon prepended, as it is printed.
    pub fn display_text(&self) -> RichText {
        if self.icon.is_empty() {
            self.text.clone()
        } else {
            self.text.prefixed(format!("{}  ", self.icon))
        }
    }
}

/// Section heading: a large numeral, a title and a rule underneath.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divider {
    number: Option<u32>,
    title: String,
}

impl Divider {
    /// Creates a divider; `None` renders an unnumbered section with a blank label.
    pub fn new(number: impl Into<Option<u32>>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
        }
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The numeral as printed: two digits, or blank for unnumbered sections.
    pub fn label(&self) -> String {
        match self.number {
            Some(number) => format!("{number:02}"),
            None => String::new(),
        }
    }
}

/// One cell of a comparison table body.
#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    text: RichText,
    style: Option<String>,
}

impl TableCell {
    /// Creates a cell rendered with the default table cell style.
    pub fn new(text: impl Into<RichText>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Creates a cell rendered with the named style.
    pub fn styled(style: impl Into<String>, text: impl Into<RichText>) -> Self {
        Self {
            text: text.into(),
            style: Some(style.into()),
        }
    }

    pub fn text(&self) -> &RichText {
        &self.text
    }

    /// Style name applied to the cell.
    pub fn style(&self) -> &str {
        self.style.as_deref().unwrap_or(styles::TABLE_CELL)
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        TableCell::new(text)
    }
}

impl From<String> for TableCell {
    fn from(text: String) -> Self {
        TableCell::new(text)
    }
}

impl From<RichText> for TableCell {
    fn from(text: RichText) -> Self {
        TableCell::new(text)
    }
}

/// One body row of a comparison table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    cells: Vec<TableCell>,
    background: Option<Color>,
}

impl TableRow {
    pub fn new<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<TableCell>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            background: None,
        }
    }

    /// Overrides the zebra background for this row.
    pub fn with_background(mut self, background: impl Into<Option<Color>>) -> Self {
        self.background = background.into();
        self
    }

    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }
}

/// Table with a header row and zebra-striped body rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonTable {
    headers: Vec<String>,
    rows: Vec<TableRow>,
    column_weights: Vec<usize>,
}

impl ComparisonTable {
    /// Creates a table with evenly weighted columns.
    pub fn new<H, S>(headers: H, rows: Vec<TableRow>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let column_weights = vec![1; headers.len()];
        Self {
            headers,
            rows,
            column_weights,
        }
    }

    /// Sets relative column widths.
    pub fn with_column_weights(mut self, weights: Vec<usize>) -> Self {
        self.column_weights = weights;
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn column_weights(&self) -> &[usize] {
        &self.column_weights
    }

    /// Number of rendered rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

/// Small filled label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    text: String,
    background: String,
    foreground: String,
}

impl Badge {
    /// Creates a badge whose colors are palette keys.
    pub fn new(
        text: impl Into<String>,
        background: impl Into<String>,
        foreground: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            background: background.into(),
            foreground: foreground.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn foreground(&self) -> &str {
        &self.foreground
    }
}

/// Horizontal bar in a palette color; full width unless a width is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    color: String,
    thickness: f64,
    width: Option<f64>,
}

impl Rule {
    /// Creates a full-width rule `thickness` millimetres thick; `color` is a palette key.
    pub fn new(color: impl Into<String>, thickness: f64) -> Self {
        Self {
            color: color.into(),
            thickness,
            width: None,
        }
    }

    /// Limits the rule to `width` millimetres from the left edge.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }
}

/// Individual content blocks, in rendering order.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentBlock {
    /// Styled paragraph.
    Text(TextBlock),
    /// Code panel.
    Code(CodeBlock),
    /// Accent-bar note.
    Callout(Callout),
    /// Numbered or unnumbered section heading.
    Divider(Divider),
    /// Comparison table.
    Table(ComparisonTable),
    /// Filled label.
    Badge(Badge),
    /// Rendered pointer diagram.
    Visualization(RenderedGrid),
    /// Horizontal rule or accent bar.
    Rule(Rule),
    /// Vertical gap in millimetres.
    Spacer(f64),
    /// Explicit page break request.
    PageBreak,
}

impl ContentBlock {
    /// Convenience helper that yields an explicit page break block.
    pub fn page_break() -> Self {
        Self::PageBreak
    }

    /// Convenience helper for a vertical gap.
    pub fn spacer(height_mm: f64) -> Self {
        Self::Spacer(height_mm)
    }

    /// Short name of the block kind, used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Code(_) => "code",
            Self::Callout(_) => "callout",
            Self::Divider(_) => "divider",
            Self::Table(_) => "table",
            Self::Badge(_) => "badge",
            Self::Visualization(_) => "visualization",
            Self::Rule(_) => "rule",
            Self::Spacer(_) => "spacer",
            Self::PageBreak => "page-break",
        }
    }

    /// Style names the block needs from the theme.
    pub fn style_names(&self) -> Vec<&str> {
        match self {
            Self::Text(block) => vec![block.style()],
            Self::Code(block) => {
                let mut names = vec![styles::CODE_HEADER, styles::CODE];
                for line in block.lines() {
                    let name = line.kind().style_name();
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                names
            }
            Self::Callout(block) => vec![block.style()],
            Self::Divider(_) => vec![styles::DIVIDER_NUMBER, styles::DIVIDER_TITLE],
            Self::Table(table) => {
                let mut names = vec![styles::TABLE_HEADER];
                for cell in table.rows().iter().flat_map(|row| row.cells()) {
                    if !names.contains(&cell.style()) {
                        names.push(cell.style());
                    }
                }
                names
            }
            Self::Badge(_) => vec![styles::BADGE],
            Self::Visualization(_) => vec![styles::VIZ_LABEL, styles::VIZ_VALUE, styles::VIZ_INDEX],
            Self::Rule(_) | Self::Spacer(_) | Self::PageBreak => Vec::new(),
        }
    }
}

/// The caller-assembled, ordered sequence of blocks forming a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Story {
    blocks: Vec<ContentBlock>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block.
    pub fn push(&mut self, block: ContentBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Appends every block yielded by `blocks`, in order.
    pub fn extend<I>(&mut self, blocks: I) -> &mut Self
    where
        I: IntoIterator<Item = ContentBlock>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Appends the block if it was built, otherwise logs the error and skips it.
    ///
    /// Returns the error so callers can substitute a placeholder.
    pub fn push_or_skip(&mut self, block: Result<ContentBlock, BlockError>) -> Option<BlockError> {
        match block {
            Ok(block) => {
                self.blocks.push(block);
                None
            }
            Err(err) => {
                log::warn!("Skipping block #{}: {err}", self.blocks.len());
                Some(err)
            }
        }
    }

    /// Requests a page break unless the story is empty or already ends with one.
    pub fn page_break(&mut self) -> &mut Self {
        match self.blocks.last() {
            None | Some(ContentBlock::PageBreak) => {}
            Some(_) => self.blocks.push(ContentBlock::PageBreak),
        }
        self
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks
    }
}

impl From<Vec<ContentBlock>> for Story {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }
}

impl FromIterator<ContentBlock> for Story {
    fn from_iter<I: IntoIterator<Item = ContentBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}
