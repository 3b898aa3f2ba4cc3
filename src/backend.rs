//! Rendering backends consuming the block sequence.
//!
//! [`RenderBackend`] is the seam between assembly and output: the assembler validates the story
//! and hands blocks over one at a time, in order.  [`GenpdfBackend`] lays them out with `genpdf`;
//! other implementations (tests use a recording one) only need to accept blocks and produce an
//! artifact at the end.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genpdf::elements::{PageBreak, Paragraph};
use genpdf::fonts::{Font, FontFamily};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Style, StyledString};
use genpdf::{render, Element, RenderResult};

use crate::decorator::{ChromeDecorator, PageChrome};
use crate::elements::{
    mm, BadgeLabel, Gap, GridCell, GridTable, Padding, Panel, PanelRow, PointerStrip, RuleBar,
    SectionHeading, StripCell,
};
use crate::error::{BlockError, BuildError};
use crate::fonts::{self, FontSet};
use crate::model::{
    Badge, Callout, CodeBlock, ComparisonTable, ContentBlock, Divider, Rule, TextBlock,
};
use crate::theme::{palette, styles, StyleDescriptor, Theme};
use crate::visualization::RenderedGrid;

/// Width of the accent bar along the left edge of callouts, in millimetres.
const CALLOUT_ACCENT_MM: f64 = 1.2;

/// Receives validated blocks in document order and produces the final artifact.
pub trait RenderBackend {
    /// What [`RenderBackend::finish`] produces.
    type Artifact;

    /// Installs the per-page decoration; called once, before the first block.
    fn set_page_decorator(&mut self, chrome: PageChrome, theme: &Theme);

    /// Appends the block found at `position` of the story.
    fn push_block(
        &mut self,
        position: usize,
        block: &ContentBlock,
        theme: &Theme,
    ) -> Result<(), BlockError>;

    /// Lays out everything pushed so far and returns the artifact.
    fn finish(self) -> Result<Self::Artifact, BuildError>;
}

/// Page on which a numbered section starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMark {
    pub number: u32,
    pub title: String,
    /// 1-based page number.
    pub page: usize,
}

/// A rendered PDF together with layout facts only known after pagination.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub sections: Vec<SectionMark>,
}

/// Element wrapper remembering which story position is being laid out.
struct Tracked<E> {
    position: usize,
    current: Rc<Cell<Option<usize>>>,
    inner: E,
}

impl<E: Element> Element for Tracked<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.current.set(Some(self.position));
        self.inner.render(context, area, style)
    }
}

/// Backend laying blocks out with `genpdf`.
pub struct GenpdfBackend {
    document: genpdf::Document,
    mono: Option<FontFamily<Font>>,
    page_height: f64,
    pages: Rc<Cell<usize>>,
    sections: Rc<RefCell<Vec<SectionMark>>>,
    position: usize,
    current: Rc<Cell<Option<usize>>>,
}

impl GenpdfBackend {
    /// Loads the fonts and prepares an empty document on the theme's paper.
    pub fn new(theme: &Theme, title: &str) -> Result<Self, BuildError> {
        let FontSet { sans, mono } = fonts::load_fonts().map_err(BuildError::FontLoad)?;
        let mut document = genpdf::Document::new(sans);
        let mono = mono.map(|family| document.add_font_family(family));
        document.set_title(title);
        document.set_paper_size(theme.page().paper_size());

        let pages = Rc::new(Cell::new(0));
        document.set_page_decorator(ChromeDecorator::plain(theme, Rc::clone(&pages)));

        Ok(Self {
            document,
            mono,
            page_height: theme.page().content_height(),
            pages,
            sections: Rc::new(RefCell::new(Vec::new())),
            position: 0,
            current: Rc::new(Cell::new(None)),
        })
    }

    /// Appends `element` on behalf of the block being pushed.
    fn push<E: Element + 'static>(&mut self, element: E) {
        self.document.push(Tracked {
            position: self.position,
            current: Rc::clone(&self.current),
            inner: element,
        });
    }

    /// Enables hyphenation of text paragraphs.
    #[cfg(feature = "hyphenation")]
    pub fn set_hyphenator(&mut self, hyphenator: hyphenation::Standard) {
        self.document.set_hyphenator(hyphenator);
    }

    fn style<'t>(&self, theme: &'t Theme, name: &str) -> Result<(&'t StyleDescriptor, Style), BlockError> {
        let descriptor = theme.resolve(name)?;
        Ok((descriptor, descriptor.to_style(self.mono)))
    }

    fn push_text(&mut self, theme: &Theme, block: &TextBlock) -> Result<(), BlockError> {
        let (descriptor, style) = self.style(theme, block.style())?;
        let strings = block.text().to_styled_strings(style, self.mono);
        let indent = genpdf::Margins::trbl(
            0,
            mm(descriptor.right_indent()),
            0,
            mm(descriptor.left_indent()),
        );

        if let Some(background) = descriptor.background() {
            let mut panel = Panel::new()
                .with_background(background)
                .with_padding(Padding::new(1.5, 3.0))
                .with_spacing(descriptor.space_before(), descriptor.space_after());
            panel.push(PanelRow::new(strings, style).with_alignment(descriptor.alignment().into()));
            self.push(panel.padded(indent));
            return Ok(());
        }

        let mut paragraph = Paragraph::default();
        for string in strings {
            paragraph.push(string);
        }
        paragraph.set_alignment(descriptor.alignment().into());

        if descriptor.space_before() > 0.0 {
            self.push(Gap::new(descriptor.space_before()));
        }
        self.push(paragraph.styled(style).padded(indent));
        if descriptor.space_after() > 0.0 {
            self.push(Gap::new(descriptor.space_after()));
        }
        Ok(())
    }

    fn push_code(&mut self, theme: &Theme, block: &CodeBlock) -> Result<(), BlockError> {
        let (_, header_style) = self.style(theme, styles::CODE_HEADER)?;
        let header_background = theme.color(palette::CODE_HEADER_BACKGROUND)?;
        let (code, _) = self.style(theme, styles::CODE)?;
        let background = code
            .background()
            .or_else(|| theme.try_color(palette::CODE_BACKGROUND));

        let mut panel = Panel::new()
            .with_background(background)
            .with_padding(Padding {
                top: 0.0,
                right: code.right_indent().max(3.0),
                bottom: 2.0,
                left: code.left_indent().max(3.0),
            })
            .with_spacing(2.0, 4.0);
        panel.push_padded(
            PanelRow::new(
                vec![StyledString::new(block.language().to_uppercase(), header_style)],
                header_style,
            )
            .with_background(header_background),
            Padding::new(1.2, 0.0),
        );

        for (index, line) in block.lines().iter().enumerate() {
            let (_, style) = self.style(theme, line.kind().style_name())?;
            let row = PanelRow::new(vec![StyledString::new(line.display_text(), style)], style);
            if index == 0 {
                panel.push_padded(
                    row,
                    Padding {
                        top: 1.5,
                        ..Padding::default()
                    },
                );
            } else {
                panel.push(row);
            }
        }

        self.push(panel);
        Ok(())
    }

    fn push_callout(&mut self, theme: &Theme, block: &Callout) -> Result<(), BlockError> {
        let (descriptor, style) = self.style(theme, block.style())?;
        let background = theme.color(palette::CALLOUT_BACKGROUND)?;

        let mut panel = Panel::new()
            .with_background(background)
            .with_accent(descriptor.color(), CALLOUT_ACCENT_MM)
            .with_padding(Padding::new(2.5, 3.5))
            .with_spacing(descriptor.space_before().max(1.5), descriptor.space_after());
        panel.push(
            PanelRow::new(block.display_text().to_styled_strings(style, self.mono), style)
                .with_alignment(descriptor.alignment().into()),
        );
        self.push(panel);
        Ok(())
    }

    fn push_divider(&mut self, theme: &Theme, block: &Divider) -> Result<(), BlockError> {
        let (_, number_style) = self.style(theme, styles::DIVIDER_NUMBER)?;
        let (title, title_style) = self.style(theme, styles::DIVIDER_TITLE)?;
        let accent = theme.color(palette::ACCENT)?;

        let mut heading = SectionHeading::new(
            StyledString::new(block.label(), number_style),
            StyledString::new(block.title().to_owned(), title_style),
            accent,
        )
        .with_spacing(title.space_before(), title.space_after());

        if let Some(number) = block.number() {
            let pages = Rc::clone(&self.pages);
            let sections = Rc::clone(&self.sections);
            let title = block.title().to_owned();
            heading = heading.on_placed(move || {
                sections.borrow_mut().push(SectionMark {
                    number,
                    title: title.clone(),
                    page: pages.get(),
                });
            });
        }

        self.push(heading);
        Ok(())
    }

    fn push_table(&mut self, theme: &Theme, table: &ComparisonTable) -> Result<(), BlockError> {
        let (header, header_style) = self.style(theme, styles::TABLE_HEADER)?;
        let header_background = theme.color(palette::TABLE_HEADER_BACKGROUND)?;
        let border = theme.color(palette::BORDER)?;

        let header_cells = table
            .headers()
            .iter()
            .map(|text| {
                GridCell::new(
                    vec![StyledString::new(text.clone(), header_style)],
                    header_style,
                    header.alignment().into(),
                )
            })
            .collect();
        let mut grid = GridTable::new(
            table.column_weights().to_vec(),
            header_cells,
            Some(header_background),
            border,
        )
        .with_page_height(self.page_height);

        for row in table.rows() {
            let mut cells = Vec::with_capacity(row.cells().len());
            for cell in row.cells() {
                let (descriptor, style) = self.style(theme, cell.style())?;
                cells.push(GridCell::new(
                    cell.text().to_styled_strings(style, self.mono),
                    style,
                    descriptor.alignment().into(),
                ));
            }
            grid.push_row(cells, row.background());
        }

        self.push(grid);
        Ok(())
    }

    fn push_badge(&mut self, theme: &Theme, badge: &Badge) -> Result<(), BlockError> {
        let (descriptor, style) = self.style(theme, styles::BADGE)?;
        let background = theme.color(badge.background())?;
        let foreground = theme.color(badge.foreground())?;

        let text = StyledString::new(badge.text().to_owned(), style.with_color(foreground));
        if descriptor.space_before() > 0.0 {
            self.push(Gap::new(descriptor.space_before()));
        }
        self.push(BadgeLabel::new(text, background).with_space_after(descriptor.space_after()));
        Ok(())
    }

    fn push_rule(&mut self, theme: &Theme, rule: &Rule) -> Result<(), BlockError> {
        let color = theme.color(rule.color())?;
        self.push(RuleBar::new(color, rule.thickness()).with_width(rule.width()));
        Ok(())
    }

    fn push_visualization(&mut self, theme: &Theme, grid: &RenderedGrid) -> Result<(), BlockError> {
        let (_, label) = self.style(theme, styles::VIZ_LABEL)?;
        let (value_descriptor, value) = self.style(theme, styles::VIZ_VALUE)?;
        let (_, index) = self.style(theme, styles::VIZ_INDEX)?;
        let border = theme.color(palette::BORDER)?;

        let cells = grid
            .cells()
            .iter()
            .map(|cell| StripCell {
                value: cell.value().to_string(),
                label: cell.label_text().to_owned(),
                label_color: cell.label_color(),
                background: cell.background(),
                foreground: cell.foreground(),
            })
            .collect();

        let strip = PointerStrip::new(cells, grid.column_width(), (label, value, index), border)
            .with_spacing(2.0, value_descriptor.space_after().max(2.0));
        self.push(strip);
        Ok(())
    }
}

impl RenderBackend for GenpdfBackend {
    type Artifact = RenderedDocument;

    fn set_page_decorator(&mut self, chrome: PageChrome, theme: &Theme) {
        self.document.set_page_decorator(ChromeDecorator::new(
            chrome,
            theme,
            self.mono,
            Rc::clone(&self.pages),
        ));
    }

    fn push_block(
        &mut self,
        position: usize,
        block: &ContentBlock,
        theme: &Theme,
    ) -> Result<(), BlockError> {
        log::debug!("Laying out block #{position} ({})", block.kind());
        self.position = position;
        match block {
            ContentBlock::Text(text) => self.push_text(theme, text),
            ContentBlock::Code(code) => self.push_code(theme, code),
            ContentBlock::Callout(callout) => self.push_callout(theme, callout),
            ContentBlock::Divider(divider) => self.push_divider(theme, divider),
            ContentBlock::Table(table) => self.push_table(theme, table),
            ContentBlock::Badge(badge) => self.push_badge(theme, badge),
            ContentBlock::Visualization(grid) => self.push_visualization(theme, grid),
            ContentBlock::Rule(rule) => self.push_rule(theme, rule),
            ContentBlock::Spacer(height) => {
                self.push(Gap::new(*height));
                Ok(())
            }
            ContentBlock::PageBreak => {
                self.push(PageBreak::new());
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<RenderedDocument, BuildError> {
        let mut bytes = Vec::new();
        let current = Rc::clone(&self.current);
        if let Err(source) = self.document.render(&mut bytes) {
            let page_size = matches!(source.kind(), ErrorKind::PageSizeExceeded);
            return Err(match current.get() {
                Some(position) if page_size => {
                    log::error!("Block #{position} does not fit on an empty page");
                    BuildError::Layout { position, source }
                }
                _ => BuildError::Render(source),
            });
        }

        let page_count = self.pages.get();
        let sections = std::mem::take(&mut *self.sections.borrow_mut());
        log::info!(
            "Rendered {page_count} page(s), {} bytes, {} numbered section(s)",
            bytes.len(),
            sections.len()
        );

        Ok(RenderedDocument {
            bytes,
            page_count,
            sections,
        })
    }
}
