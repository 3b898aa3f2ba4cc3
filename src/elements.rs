//! Custom `genpdf` elements used to lay out guide blocks.
//!
//! `genpdf` 0.2 ships paragraphs, tables and padding but no filled shapes, and its only stroke is
//! a one-point hairline.  The elements in this module fill backgrounds by hatching them with
//! overlapping hairlines, and lay text out themselves so every row can carry its own background.
//! Elements that span several rows (panels and tables) paginate row by row and report `has_more`
//! when the page is full; small elements (strips, headings, badges, rules) are placed as a whole
//! on the next page instead.

use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Size};

const RULE_THICKNESS_MM: f64 = 0.6;
/// Width of a `genpdf` stroke: the PDF default line width of one point.
const HAIRLINE_MM: f64 = 25.4 / 72.0;
/// Largest distance between neighbouring hairlines of a fill, so that they overlap.
const HATCH_STEP_MM: f64 = HAIRLINE_MM * 0.8;

/// Converts millimetres into the backend's length type.
pub fn mm(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Converts a backend length into millimetres.
pub fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

pub(crate) fn line_height(style: Style, font_cache: &FontCache) -> f64 {
    mm_to_f64(style.line_height(font_cache))
}

pub(crate) fn text_width(string: &StyledString, font_cache: &FontCache) -> f64 {
    mm_to_f64(string.width(font_cache))
}

/// Offsets, from the top of a band `height` millimetres tall, of the hairlines covering it.
///
/// The outermost lines touch the band edges and neighbours are at most [`HATCH_STEP_MM`] apart.
fn hatch_offsets(height: f64) -> Vec<f64> {
    if height <= 0.0 {
        return Vec::new();
    }
    if height <= HAIRLINE_MM {
        return vec![height / 2.0];
    }
    let span = height - HAIRLINE_MM;
    let steps = (span / HATCH_STEP_MM).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|step| HAIRLINE_MM / 2.0 + span * step as f64 / steps as f64)
        .collect()
}

/// Fills the rectangle at `(x, y)` with `color`.
pub(crate) fn fill_rect(area: &render::Area<'_>, x: f64, y: f64, width: f64, height: f64, color: Color) {
    if width <= 0.0 {
        return;
    }
    let style = Style::new().with_color(color);
    for offset in hatch_offsets(height) {
        area.draw_line(
            vec![
                Position::new(mm(x), mm(y + offset)),
                Position::new(mm(x + width), mm(y + offset)),
            ],
            style,
        );
    }
}

/// Draws a hairline through `points`.
pub(crate) fn stroke(area: &render::Area<'_>, points: &[(f64, f64)], color: Color) {
    area.draw_line(
        points
            .iter()
            .map(|(x, y)| Position::new(mm(*x), mm(*y)))
            .collect::<Vec<_>>(),
        Style::new().with_color(color),
    );
}

/// Number of leading `heights` that fit when `used` of `available` millimetres are taken.
fn rows_that_fit(heights: impl IntoIterator<Item = f64>, used: f64, available: f64) -> usize {
    let mut used = used;
    heights
        .into_iter()
        .take_while(|height| {
            used += height;
            used <= available
        })
        .count()
}

/// Inner spacing of a panel or table cell, in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn new(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Same padding with the top and bottom removed.
    pub fn horizontal_only(self) -> Self {
        Self {
            top: 0.0,
            bottom: 0.0,
            ..self
        }
    }
}

/// One visual line after wrapping.
#[derive(Clone, Debug)]
struct TextLine {
    segments: Vec<(StyledString, f64)>,
    width: f64,
    height: f64,
}

impl TextLine {
    fn empty(height: f64) -> Self {
        Self {
            segments: Vec::new(),
            width: 0.0,
            height,
        }
    }

    fn push(&mut self, string: StyledString, width: f64, height: f64) {
        self.width += width;
        self.height = self.height.max(height);
        self.segments.push((string, width));
    }

    fn print(
        &self,
        area: &render::Area<'_>,
        font_cache: &FontCache,
        x: f64,
        y: f64,
        available: f64,
        alignment: Alignment,
    ) -> Result<(), Error> {
        let offset = match alignment {
            Alignment::Left => 0.0,
            Alignment::Center => ((available - self.width) / 2.0).max(0.0),
            Alignment::Right => (available - self.width).max(0.0),
        };
        let mut cursor = x + offset;
        for (string, width) in &self.segments {
            area.print_str(
                font_cache,
                Position::new(mm(cursor), mm(y)),
                string.style,
                &string.s,
            )?;
            cursor += width;
        }
        Ok(())
    }
}

/// Splits `text` at character boundaries into chunks no wider than `max_width`.
fn split_wide_word(text: &str, style: Style, max_width: f64, font_cache: &FontCache) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        let width = mm_to_f64(style.str_width(font_cache, &current));
        if width > max_width && current.chars().count() > 1 {
            current.pop();
            chunks.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Greedy word wrap of styled strings into lines no wider than `max_width` millimetres.
///
/// Breaks happen after spaces; words wider than a whole line are split between characters.
/// The result always holds at least one line so empty text keeps its row height.
fn wrap(strings: &[StyledString], base: Style, max_width: f64, font_cache: &FontCache) -> Vec<TextLine> {
    let base_height = line_height(base, font_cache);
    let mut lines = Vec::new();
    let mut line = TextLine::empty(base_height);

    for string in strings {
        let height = line_height(string.style, font_cache);
        for word in string.s.split_inclusive(' ') {
            let piece = StyledString::new(word.to_owned(), string.style);
            let width = text_width(&piece, font_cache);

            if line.width + width <= max_width {
                line.push(piece, width, height);
                continue;
            }
            if !line.segments.is_empty() {
                lines.push(std::mem::replace(&mut line, TextLine::empty(base_height)));
                let trimmed = StyledString::new(word.trim_start().to_owned(), string.style);
                let trimmed_width = text_width(&trimmed, font_cache);
                if trimmed_width <= max_width {
                    line.push(trimmed, trimmed_width, height);
                    continue;
                }
            }
            let mut chunks = split_wide_word(word.trim_start(), string.style, max_width, font_cache)
                .into_iter()
                .peekable();
            while let Some(chunk) = chunks.next() {
                let piece = StyledString::new(chunk, string.style);
                let width = text_width(&piece, font_cache);
                line.push(piece, width, height);
                if chunks.peek().is_some() {
                    lines.push(std::mem::replace(&mut line, TextLine::empty(base_height)));
                }
            }
        }
    }

    lines.push(line);
    lines
}

/// Vertical gap.
pub struct Gap {
    height: f64,
}

impl Gap {
    /// Creates a gap of `height` millimetres.
    pub fn new(height: f64) -> Self {
        Self {
            height: height.max(0.0),
        }
    }
}

impl Element for Gap {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = mm_to_f64(area.size().height);
        let mut result = RenderResult::default();
        result.size = Size::new(0, mm(self.height.min(available)));
        Ok(result)
    }
}

/// One logical line of a [`Panel`].
pub struct PanelRow {
    strings: Vec<StyledString>,
    style: Style,
    alignment: Alignment,
    background: Option<Color>,
}

impl PanelRow {
    /// Creates a row from styled strings; `style` provides the height of empty rows.
    pub fn new(strings: Vec<StyledString>, style: Style) -> Self {
        Self {
            strings,
            style,
            alignment: Alignment::Left,
            background: None,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Overrides the panel background behind this row.
    pub fn with_background(mut self, background: impl Into<Option<Color>>) -> Self {
        self.background = background.into();
        self
    }
}

struct LaidOutRow {
    line: TextLine,
    alignment: Alignment,
    background: Option<Color>,
    padding: Padding,
}

impl LaidOutRow {
    fn height(&self) -> f64 {
        self.line.height + self.padding.top + self.padding.bottom
    }
}

/// A box of text rows with an optional background and left accent bar.
///
/// Code panels and callouts are panels: the header strip of a code panel is a row with its own
/// background and padding, every code line is a row.  Rows are wrapped to the panel width and
/// placed one by one, so long panels continue on the next page.
pub struct Panel {
    rows: Vec<(PanelRow, Padding)>,
    background: Option<Color>,
    accent: Option<(Color, f64)>,
    padding: Padding,
    space_before: f64,
    space_after: f64,
    laid_out: Option<Vec<LaidOutRow>>,
    next: usize,
}

impl Panel {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            background: None,
            accent: None,
            padding: Padding::default(),
            space_before: 0.0,
            space_after: 0.0,
            laid_out: None,
            next: 0,
        }
    }

    /// Adds a row without its own padding.
    pub fn push(&mut self, row: PanelRow) {
        self.rows.push((row, Padding::default()));
    }

    /// Adds a row surrounded by `padding`, e.g. a header strip.
    pub fn push_padded(&mut self, row: PanelRow, padding: Padding) {
        self.rows.push((row, padding));
    }

    pub fn with_background(mut self, background: impl Into<Option<Color>>) -> Self {
        self.background = background.into();
        self
    }

    /// Draws a bar of `width` millimetres along the left edge.
    pub fn with_accent(mut self, color: Color, width: f64) -> Self {
        self.accent = Some((color, width));
        self
    }

    /// Inner padding around all rows, in millimetres.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Space above and below the panel, in millimetres.
    pub fn with_spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn accent_width(&self) -> f64 {
        self.accent.map_or(0.0, |(_, width)| width)
    }

    fn lay_out(&self, width: f64, font_cache: &FontCache) -> Vec<LaidOutRow> {
        let inner = (width - self.accent_width() - self.padding.left - self.padding.right).max(1.0);
        let mut laid_out = Vec::new();
        for (row, padding) in &self.rows {
            let lines = wrap(&row.strings, row.style, inner - padding.left - padding.right, font_cache);
            let count = lines.len();
            for (index, line) in lines.into_iter().enumerate() {
                let mut line_padding = padding.horizontal_only();
                if index == 0 {
                    line_padding.top = padding.top;
                }
                if index + 1 == count {
                    line_padding.bottom = padding.bottom;
                }
                laid_out.push(LaidOutRow {
                    line,
                    alignment: row.alignment,
                    background: row.background,
                    padding: line_padding,
                });
            }
        }
        laid_out
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Element for Panel {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);
        if self.laid_out.is_none() {
            self.laid_out = Some(self.lay_out(width, &context.font_cache));
        }
        let rows = self.laid_out.as_deref().unwrap_or_default();

        let first = self.next == 0;
        let mut y = if first { self.space_before } else { 0.0 };
        let box_top = y;
        let top_padding = if first { self.padding.top } else { 0.0 };

        // The first row must fit together with the top padding, otherwise start on the next page.
        let end = self.next
            + rows_that_fit(
                rows[self.next..].iter().map(LaidOutRow::height),
                y + top_padding,
                available,
            );
        if end == self.next && !rows.is_empty() {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let accent = self.accent_width();
        let fill_x = accent;
        let fill_width = width - accent;
        let text_x = accent + self.padding.left;
        let text_width = (width - text_x - self.padding.right).max(0.0);

        if let Some(background) = self.background {
            fill_rect(&area, fill_x, y, fill_width, top_padding, background);
        }
        y += top_padding;

        for row in &rows[self.next..end] {
            if let Some(background) = row.background.or(self.background) {
                fill_rect(&area, fill_x, y, fill_width, row.height(), background);
            }
            row.line.print(
                &area,
                &context.font_cache,
                text_x + row.padding.left,
                y + row.padding.top,
                text_width - row.padding.left - row.padding.right,
                row.alignment,
            )?;
            y += row.height();
        }
        self.next = end;

        let done = self.next >= rows.len();
        if done {
            let bottom = self.padding.bottom.min((available - y).max(0.0));
            if let Some(background) = self.background {
                fill_rect(&area, fill_x, y, fill_width, bottom, background);
            }
            y += bottom;
        }
        if let Some((color, bar)) = self.accent {
            fill_rect(&area, 0.0, box_top, bar, y - box_top, color);
        }
        if done {
            y = (y + self.space_after).min(available.max(y));
        }

        let mut result = RenderResult::default();
        result.size = Size::new(mm(width), mm(y));
        result.has_more = !done;
        Ok(result)
    }
}

/// One cell of a [`GridTable`].
pub struct GridCell {
    strings: Vec<StyledString>,
    style: Style,
    alignment: Alignment,
}

impl GridCell {
    pub fn new(strings: Vec<StyledString>, style: Style, alignment: Alignment) -> Self {
        Self {
            strings,
            style,
            alignment,
        }
    }
}

struct GridRow {
    cells: Vec<GridCell>,
    background: Option<Color>,
}

struct LaidOutGridRow {
    cells: Vec<(Vec<TextLine>, Alignment)>,
    background: Option<Color>,
    padding: Padding,
    height: f64,
}

impl LaidOutGridRow {
    fn new(
        cells: Vec<(Vec<TextLine>, Alignment)>,
        background: Option<Color>,
        padding: Padding,
    ) -> Self {
        let content = cells
            .iter()
            .map(|(lines, _)| lines.iter().map(|line| line.height).sum::<f64>())
            .fold(0.0, f64::max);
        Self {
            cells,
            background,
            padding,
            height: content + padding.top + padding.bottom,
        }
    }

    /// Moves the leading lines of every cell that fit into `room` millimetres (padding
    /// included) into a new row and keeps the rest.
    ///
    /// Returns `None` when not even one line fits.
    fn split_front(&mut self, room: f64) -> Option<LaidOutGridRow> {
        let content_room = room - self.padding.top - self.padding.bottom;
        let counts: Vec<usize> = self
            .cells
            .iter()
            .map(|(lines, _)| {
                rows_that_fit(lines.iter().map(|line| line.height), 0.0, content_room)
            })
            .collect();
        if counts.iter().all(|count| *count == 0) {
            return None;
        }

        let mut head = Vec::with_capacity(self.cells.len());
        let mut rest = Vec::with_capacity(self.cells.len());
        let cells = std::mem::take(&mut self.cells);
        for ((mut lines, alignment), count) in cells.into_iter().zip(counts) {
            let tail = lines.split_off(count);
            head.push((lines, alignment));
            rest.push((tail, alignment));
        }
        *self = LaidOutGridRow::new(rest, self.background, self.padding);
        Some(LaidOutGridRow::new(head, self.background, self.padding))
    }

    fn draw(
        &self,
        area: &render::Area<'_>,
        font_cache: &FontCache,
        widths: &[f64],
        y: f64,
        border: Color,
    ) -> Result<(), Error> {
        let width: f64 = widths.iter().sum();
        if let Some(background) = self.background {
            fill_rect(area, 0.0, y, width, self.height, background);
        }
        let padding = self.padding;
        let mut x = 0.0;
        for ((lines, alignment), column) in self.cells.iter().zip(widths) {
            let mut line_y = y + padding.top;
            for line in lines {
                line.print(
                    area,
                    font_cache,
                    x + padding.left,
                    line_y,
                    column - padding.left - padding.right,
                    *alignment,
                )?;
                line_y += line.height;
            }
            x += column;
        }
        let rule = y + self.height;
        stroke(area, &[(0.0, rule), (width, rule)], border);
        Ok(())
    }
}

/// What the current page takes from a table.
#[derive(Debug, PartialEq)]
enum TablePage {
    /// Nothing fits; the table continues on the next page.
    Defer,
    /// Body rows up to `end` fit whole.  `split` holds the room left for the leading part of
    /// the row at `end` when that row has to be broken up.
    Rows { end: usize, split: Option<f64> },
}

/// Plans one page of a table whose header is drawn on every page.
///
/// A row that fits nowhere whole is split when the page is known to be fresh (`continued`) or
/// the row cannot fit even on an empty page of `page_height` millimetres.
fn plan_table_page(
    header: f64,
    heights: &[f64],
    next: usize,
    top: f64,
    available: f64,
    page_height: f64,
    continued: bool,
) -> TablePage {
    let used = top + header;
    if used > available {
        return TablePage::Defer;
    }
    let end = next + rows_that_fit(heights[next..].iter().copied(), used, available);
    if end == next && end < heights.len() {
        if continued || header + heights[end] > page_height {
            return TablePage::Rows {
                end,
                split: Some(available - used),
            };
        }
        return TablePage::Defer;
    }
    TablePage::Rows { end, split: None }
}

/// Table with a header row, filled body rows and a thin rule under every row.
///
/// The header is repeated at the top of continuation pages.  Rows move to the next page as a
/// whole; only a row taller than a page is broken up between lines.
pub struct GridTable {
    weights: Vec<usize>,
    header: GridRow,
    rows: Vec<GridRow>,
    border: Color,
    cell_padding: Padding,
    space_before: f64,
    space_after: f64,
    page_height: f64,
    laid_out: Option<(LaidOutGridRow, Vec<LaidOutGridRow>)>,
    next: usize,
    continued: bool,
}

impl GridTable {
    /// Creates a table; `weights` has one entry per column.
    pub fn new(
        weights: Vec<usize>,
        header: Vec<GridCell>,
        header_background: Option<Color>,
        border: Color,
    ) -> Self {
        Self {
            weights,
            header: GridRow {
                cells: header,
                background: header_background,
            },
            rows: Vec::new(),
            border,
            cell_padding: Padding::new(1.4, 1.8),
            space_before: 1.5,
            space_after: 4.0,
            page_height: f64::INFINITY,
            laid_out: None,
            next: 0,
            continued: false,
        }
    }

    /// Height of the content area of an empty page, in millimetres.
    pub fn with_page_height(mut self, page_height: f64) -> Self {
        self.page_height = page_height;
        self
    }

    pub fn push_row(&mut self, cells: Vec<GridCell>, background: Option<Color>) {
        self.rows.push(GridRow { cells, background });
    }

    fn column_widths(&self, width: f64) -> Vec<f64> {
        let total: usize = self.weights.iter().sum();
        if total == 0 {
            let columns = self.weights.len().max(1) as f64;
            return vec![width / columns; self.weights.len()];
        }
        self.weights
            .iter()
            .map(|weight| width * *weight as f64 / total as f64)
            .collect()
    }

    fn lay_out_row(&self, row: &GridRow, widths: &[f64], font_cache: &FontCache) -> LaidOutGridRow {
        let padding = self.cell_padding;
        let cells = row
            .cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let inner = (width - padding.left - padding.right).max(1.0);
                (wrap(&cell.strings, cell.style, inner, font_cache), cell.alignment)
            })
            .collect();
        LaidOutGridRow::new(cells, row.background, padding)
    }
}

impl Element for GridTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);
        let widths = self.column_widths(width);
        if self.laid_out.is_none() {
            let header = self.lay_out_row(&self.header, &widths, &context.font_cache);
            let rows = self
                .rows
                .iter()
                .map(|row| self.lay_out_row(row, &widths, &context.font_cache))
                .collect();
            self.laid_out = Some((header, rows));
        }

        let next = self.next;
        let top = if next == 0 { self.space_before } else { 0.0 };
        let (page_height, continued, border) = (self.page_height, self.continued, self.border);
        let Some((header, rows)) = self.laid_out.as_mut() else {
            return Ok(RenderResult::default());
        };

        let heights: Vec<f64> = rows.iter().map(|row| row.height).collect();
        let (end, split) = match plan_table_page(
            header.height,
            &heights,
            next,
            top,
            available,
            page_height,
            continued,
        ) {
            TablePage::Defer => (next, None),
            TablePage::Rows { end, split } => (end, split),
        };
        let partial = split.and_then(|room| rows[end].split_front(room));
        let stalled = end == next && partial.is_none() && end < rows.len();
        if stalled || top + header.height > available {
            self.continued = true;
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let mut y = top;
        header.draw(&area, &context.font_cache, &widths, y, border)?;
        y += header.height;
        for row in &rows[next..end] {
            row.draw(&area, &context.font_cache, &widths, y, border)?;
            y += row.height;
        }
        if let Some(row) = &partial {
            row.draw(&area, &context.font_cache, &widths, y, border)?;
            y += row.height;
        }

        let done = end >= rows.len();
        self.next = end;
        self.continued = !done;
        if done {
            y = (y + self.space_after).min(available.max(y));
        }
        let mut result = RenderResult::default();
        result.size = Size::new(mm(width), mm(y));
        result.has_more = !done;
        Ok(result)
    }
}

/// One column of a [`PointerStrip`].
pub struct StripCell {
    pub value: String,
    pub label: String,
    pub label_color: Color,
    pub background: Color,
    pub foreground: Color,
}

/// Row of array cells with pointer labels above and indices below.
pub struct PointerStrip {
    cells: Vec<StripCell>,
    column_width: f64,
    label_style: Style,
    value_style: Style,
    index_style: Style,
    border: Color,
    value_padding: f64,
    space_before: f64,
    space_after: f64,
    done: bool,
}

impl PointerStrip {
    pub fn new(
        cells: Vec<StripCell>,
        column_width: f64,
        styles: (Style, Style, Style),
        border: Color,
    ) -> Self {
        let (label_style, value_style, index_style) = styles;
        Self {
            cells,
            column_width,
            label_style,
            value_style,
            index_style,
            border,
            value_padding: 1.6,
            space_before: 2.0,
            space_after: 4.0,
            done: false,
        }
    }

    /// Space above and below the strip, in millimetres.
    pub fn with_spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn print_centered(
        area: &render::Area<'_>,
        font_cache: &FontCache,
        text: &str,
        style: Style,
        x: f64,
        y: f64,
        width: f64,
    ) -> Result<(), Error> {
        let string = StyledString::new(text.to_owned(), style);
        let text_width = text_width(&string, font_cache);
        let offset = (width - text_width) / 2.0;
        area.print_str(
            font_cache,
            Position::new(mm(x + offset), mm(y)),
            style,
            text,
        )?;
        Ok(())
    }
}

impl Element for PointerStrip {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        if self.done {
            return Ok(RenderResult::default());
        }
        let font_cache = &context.font_cache;
        let width = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);

        let label_height = line_height(self.label_style, font_cache);
        let value_height = line_height(self.value_style, font_cache) + 2.0 * self.value_padding;
        let index_height = line_height(self.index_style, font_cache);
        let total = self.space_before + label_height + value_height + index_height + self.space_after;
        if total > available {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let strip_width = self.column_width * self.cells.len() as f64;
        let left = ((width - strip_width) / 2.0).max(0.0);
        let label_y = self.space_before;
        let box_y = label_y + label_height;
        let index_y = box_y + value_height;

        for (index, cell) in self.cells.iter().enumerate() {
            let x = left + self.column_width * index as f64;
            fill_rect(&area, x, box_y, self.column_width, value_height, cell.background);
            if !cell.label.is_empty() {
                Self::print_centered(
                    &area,
                    font_cache,
                    &cell.label,
                    self.label_style.with_color(cell.label_color),
                    x,
                    label_y,
                    self.column_width,
                )?;
            }
            Self::print_centered(
                &area,
                font_cache,
                &cell.value,
                self.value_style.with_color(cell.foreground),
                x,
                box_y + self.value_padding,
                self.column_width,
            )?;
            Self::print_centered(
                &area,
                font_cache,
                &index.to_string(),
                self.index_style,
                x,
                index_y,
                self.column_width,
            )?;
        }

        let right = left + strip_width;
        let bottom = box_y + value_height;
        stroke(
            &area,
            &[(left, box_y), (right, box_y), (right, bottom), (left, bottom), (left, box_y)],
            self.border,
        );
        for index in 1..self.cells.len() {
            let x = left + self.column_width * index as f64;
            stroke(&area, &[(x, box_y), (x, bottom)], self.border);
        }

        self.done = true;
        let mut result = RenderResult::default();
        result.size = Size::new(mm(width), mm(total));
        Ok(result)
    }
}

/// Section heading: a large numeral, the title next to it and an accent rule underneath.
///
/// `on_placed` runs once, when the heading is drawn, so callers can record the page it landed on.
pub struct SectionHeading {
    number: StyledString,
    title: StyledString,
    rule: Color,
    space_before: f64,
    space_after: f64,
    on_placed: Option<Box<dyn FnMut()>>,
    done: bool,
}

impl SectionHeading {
    pub fn new(number: StyledString, title: StyledString, rule: Color) -> Self {
        Self {
            number,
            title,
            rule,
            space_before: 0.0,
            space_after: 0.0,
            on_placed: None,
            done: false,
        }
    }

    pub fn with_spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn on_placed(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_placed = Some(Box::new(callback));
        self
    }
}

impl Element for SectionHeading {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        if self.done {
            return Ok(RenderResult::default());
        }
        let font_cache = &context.font_cache;
        let width = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);

        let number_height = line_height(self.number.style, font_cache);
        let title_height = line_height(self.title.style, font_cache);
        let row_height = number_height.max(title_height);
        let rule_gap = 1.5;
        let total = self.space_before + row_height + rule_gap + RULE_THICKNESS_MM + self.space_after;
        if total > available {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let top = self.space_before;
        let mut title_x = 0.0;
        if !self.number.s.is_empty() {
            area.print_str(
                font_cache,
                Position::new(0, mm(top + row_height - number_height)),
                self.number.style,
                &self.number.s,
            )?;
            title_x = text_width(&self.number, font_cache) + 4.0;
        }
        area.print_str(
            font_cache,
            Position::new(mm(title_x), mm(top + row_height - title_height)),
            self.title.style,
            &self.title.s,
        )?;
        let rule_y = top + row_height + rule_gap;
        fill_rect(&area, 0.0, rule_y, width, RULE_THICKNESS_MM, self.rule);

        if let Some(callback) = self.on_placed.as_mut() {
            callback();
        }
        self.done = true;

        let mut result = RenderResult::default();
        result.size = Size::new(mm(width), mm(total));
        Ok(result)
    }
}

/// Small filled label sized to its text.
pub struct BadgeLabel {
    text: StyledString,
    background: Color,
    padding: Padding,
    space_after: f64,
    done: bool,
}

impl BadgeLabel {
    pub fn new(text: StyledString, background: Color) -> Self {
        Self {
            text,
            background,
            padding: Padding::new(0.8, 2.0),
            space_after: 0.0,
            done: false,
        }
    }

    pub fn with_space_after(mut self, space_after: f64) -> Self {
        self.space_after = space_after;
        self
    }
}

impl Element for BadgeLabel {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        if self.done {
            return Ok(RenderResult::default());
        }
        let font_cache = &context.font_cache;
        let available = mm_to_f64(area.size().height);
        let text_width = text_width(&self.text, font_cache);
        let width = text_width + self.padding.left + self.padding.right;
        let height = line_height(self.text.style, font_cache) + self.padding.top + self.padding.bottom;
        if height + self.space_after > available {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        fill_rect(&area, 0.0, 0.0, width, height, self.background);
        area.print_str(
            font_cache,
            Position::new(mm(self.padding.left), mm(self.padding.top)),
            self.text.style,
            &self.text.s,
        )?;
        self.done = true;

        let mut result = RenderResult::default();
        result.size = Size::new(mm(width), mm(height + self.space_after));
        Ok(result)
    }
}

/// Filled horizontal bar; spans the whole width unless a width is set.
pub struct RuleBar {
    color: Color,
    thickness: f64,
    width: Option<f64>,
    done: bool,
}

impl RuleBar {
    pub fn new(color: Color, thickness: f64) -> Self {
        Self {
            color,
            thickness,
            width: None,
            done: false,
        }
    }

    pub fn with_width(mut self, width: Option<f64>) -> Self {
        self.width = width;
        self
    }
}

impl Element for RuleBar {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        if self.done {
            return Ok(RenderResult::default());
        }
        let full = mm_to_f64(area.size().width);
        let available = mm_to_f64(area.size().height);
        if self.thickness > available {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let width = self.width.map_or(full, |width| width.min(full));
        fill_rect(&area, 0.0, 0.0, width, self.thickness, self.color);
        self.done = true;

        let mut result = RenderResult::default();
        result.size = Size::new(mm(full), mm(self.thickness));
        Ok(result)
    }
}
