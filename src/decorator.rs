//! Page chrome: background, footer rule and page-numbered footer line.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::error::Error;
use genpdf::fonts::{Font, FontFamily};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, PageDecorator, Position};

use crate::elements::{fill_rect, line_height, mm, mm_to_f64, stroke, text_width};
use crate::theme::{palette, styles, PageMargins, Theme};

/// Distance of the footer rule from the bottom edge (0.55in).
const RULE_FROM_BOTTOM_MM: f64 = 13.97;
/// Distance of the footer baseline from the bottom edge (0.35in).
const FOOTER_FROM_BOTTOM_MM: f64 = 8.89;

/// Per-page decoration settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageChrome {
    title: String,
}

impl PageChrome {
    /// Creates chrome whose footer reads `"{title}  ·  Page {n}"`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Footer line for the 1-based `page`.
    pub fn footer_text(&self, page: usize) -> String {
        if self.title.is_empty() {
            format!("Page {page}")
        } else {
            format!("{}  ·  Page {page}", self.title)
        }
    }
}

/// `genpdf` adapter drawing [`PageChrome`] and counting pages.
///
/// Colors and the footer style are resolved once from the theme.  Anything missing is reported
/// when the decorator is created and skipped on every page; drawing errors are logged and never
/// abort the document.
pub(crate) struct ChromeDecorator {
    chrome: PageChrome,
    margins: PageMargins,
    footer_height: f64,
    background: Option<Color>,
    rule: Option<Color>,
    footer_style: Option<Style>,
    pages: Rc<Cell<usize>>,
}

impl ChromeDecorator {
    pub(crate) fn new(
        chrome: PageChrome,
        theme: &Theme,
        mono: Option<FontFamily<Font>>,
        pages: Rc<Cell<usize>>,
    ) -> Self {
        let lookup = |key: &str| match theme.color(key) {
            Ok(color) => Some(color),
            Err(err) => {
                log::warn!("Page chrome: {err}; skipping that part of every page");
                None
            }
        };
        let background = lookup(palette::BASE);
        let rule = lookup(palette::BORDER);
        let footer_style = match theme.resolve(styles::FOOTER) {
            Ok(descriptor) => Some(descriptor.to_style(mono)),
            Err(err) => {
                log::warn!("Page chrome: {err}; pages are printed without a footer");
                None
            }
        };

        Self {
            chrome,
            margins: theme.page().margins,
            footer_height: theme.page().footer_height,
            background,
            rule,
            footer_style,
            pages,
        }
    }

    /// Applies the theme margins and counts pages without drawing anything.
    pub(crate) fn plain(theme: &Theme, pages: Rc<Cell<usize>>) -> Self {
        Self {
            chrome: PageChrome::default(),
            margins: theme.page().margins,
            footer_height: theme.page().footer_height,
            background: None,
            rule: None,
            footer_style: None,
            pages,
        }
    }

    fn decorate(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        page: usize,
    ) -> Result<(), Error> {
        let size = area.size();
        let width = mm_to_f64(size.width);
        let height = mm_to_f64(size.height);

        if let Some(background) = self.background {
            fill_rect(area, 0.0, 0.0, width, height, background);
        }

        if let Some(rule) = self.rule {
            let left = self.margins.left;
            let right = width - self.margins.right;
            let y = height - RULE_FROM_BOTTOM_MM;
            stroke(area, &[(left, y), (right, y)], rule);
        }

        if let Some(style) = self.footer_style {
            let footer = StyledString::new(self.chrome.footer_text(page), style);
            let text_width = text_width(&footer, &context.font_cache);
            let text_height = line_height(style, &context.font_cache);
            let x = ((width - text_width) / 2.0).max(0.0);
            let y = height - FOOTER_FROM_BOTTOM_MM - text_height * 0.8;
            area.print_str(
                &context.font_cache,
                Position::new(mm(x), mm(y)),
                footer.style,
                &footer.s,
            )?;
        }

        Ok(())
    }
}

impl PageDecorator for ChromeDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'a>,
        _style: Style,
    ) -> Result<render::Area<'a>, Error> {
        let page = self.pages.get() + 1;
        self.pages.set(page);

        if let Err(err) = self.decorate(context, &area, page) {
            log::warn!("Failed to decorate page {page}: {err}");
        }

        area.add_margins(self.margins.to_margins());
        if self.footer_height > 0.0 {
            let available = mm_to_f64(area.size().height);
            area.set_height(mm((available - self.footer_height).max(0.0)));
        }
        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::PageGeometry;

    #[test]
    fn footer_text_includes_title_and_page() {
        let chrome = PageChrome::new("Two Pointers & Sliding Window");
        assert_eq!(
            chrome.footer_text(3),
            "Two Pointers & Sliding Window  ·  Page 3"
        );
        assert_eq!(PageChrome::default().footer_text(1), "Page 1");
    }

    #[test]
    fn missing_theme_entries_do_not_prevent_decoration() {
        let pages = Rc::new(Cell::new(0));
        let decorator = ChromeDecorator::new(PageChrome::new("Guide"), &Theme::new(), None, pages);
        assert!(decorator.background.is_none());
        assert!(decorator.rule.is_none());
        assert!(decorator.footer_style.is_none());
    }

    #[test]
    fn margins_follow_the_theme_page() {
        let mut page = PageGeometry::letter();
        page.margins.left = 25.0;
        page.margins.right = 12.0;
        let theme = Theme::dark().with_page(page);
        let decorator = ChromeDecorator::plain(&theme, Rc::new(Cell::new(0)));
        assert_eq!(decorator.margins, page.margins);
        assert_eq!(decorator.footer_height, page.footer_height);
    }

    #[test]
    fn dark_theme_resolves_every_part() {
        let pages = Rc::new(Cell::new(0));
        let decorator = ChromeDecorator::new(PageChrome::new("Guide"), &Theme::dark(), None, pages);
        assert!(decorator.background.is_some());
        assert!(decorator.rule.is_some());
        assert!(decorator.footer_style.is_some());
    }
}
