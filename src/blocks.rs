//! Pure builders turning caller parameters into validated [`ContentBlock`]s.
//!
//! Every builder takes the theme by shared reference and checks the style names and palette keys
//! it depends on.  Configuration mistakes come back as [`BlockError::Theme`]; malformed input data
//! (ragged tables, out-of-range pointers) as [`BlockError::Shape`].  Either way nothing is added to
//! the document, so the caller decides whether to skip the block or abort.

use crate::error::{BlockError, ShapeError};
use crate::model::{
    Badge, Callout, CodeBlock, ComparisonTable, ContentBlock, Divider, Rule, TableRow, TextBlock,
};
use crate::richtext::RichText;
use crate::theme::{palette, Theme};
use crate::visualization::{render_visualization, Visualization};

fn check_styles(theme: &Theme, block: &ContentBlock) -> Result<(), BlockError> {
    for name in block.style_names() {
        theme.resolve(name)?;
    }
    Ok(())
}

/// A paragraph of rich text in the named style.
pub fn text_block(
    theme: &Theme,
    style: &str,
    text: impl Into<RichText>,
) -> Result<ContentBlock, BlockError> {
    theme.resolve(style)?;
    Ok(ContentBlock::Text(TextBlock::new(style, text)))
}

/// A code panel: a header strip labeled with `language` and one row per line.
///
/// Lines starting with `##` render in the comment style.
pub fn code_block<I, S>(theme: &Theme, lines: I, language: &str) -> Result<ContentBlock, BlockError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let block = ContentBlock::Code(CodeBlock::new(language, lines));
    check_styles(theme, &block)?;
    theme.color(palette::CODE_HEADER_BACKGROUND)?;
    Ok(block)
}

/// A note with a left accent bar in the style's text color over the callout background.
pub fn callout(
    theme: &Theme,
    style: &str,
    icon: &str,
    text: impl Into<RichText>,
) -> Result<ContentBlock, BlockError> {
    theme.resolve(style)?;
    theme.color(palette::CALLOUT_BACKGROUND)?;
    Ok(ContentBlock::Callout(Callout::new(style, icon, text)))
}

/// A section heading; `None` renders an unnumbered section.
pub fn divider(
    theme: &Theme,
    number: impl Into<Option<u32>>,
    title: &str,
) -> Result<ContentBlock, BlockError> {
    let block = ContentBlock::Divider(Divider::new(number, title));
    check_styles(theme, &block)?;
    theme.color(palette::ACCENT)?;
    Ok(block)
}

/// A comparison table with evenly weighted columns.
pub fn comparison_table<H, S>(
    theme: &Theme,
    headers: H,
    rows: Vec<TableRow>,
) -> Result<ContentBlock, BlockError>
where
    H: IntoIterator<Item = S>,
    S: Into<String>,
{
    let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
    let weights = vec![1; headers.len()];
    weighted_comparison_table(theme, headers, rows, weights)
}

/// A comparison table whose columns share the width in proportion to `weights`.
///
/// Body rows without an explicit background alternate between the palette's `zebraEven` and
/// `zebraOdd` entries.
pub fn weighted_comparison_table<H, S>(
    theme: &Theme,
    headers: H,
    rows: Vec<TableRow>,
    weights: Vec<usize>,
) -> Result<ContentBlock, BlockError>
where
    H: IntoIterator<Item = S>,
    S: Into<String>,
{
    let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
    let expected = headers.len();

    if weights.len() != expected {
        return Err(ShapeError::ColumnWeights {
            expected,
            found: weights.len(),
        }
        .into());
    }
    if let Some((row, found)) = rows
        .iter()
        .map(|row| row.cells().len())
        .enumerate()
        .find(|(_, found)| *found != expected)
    {
        return Err(ShapeError::RaggedTable {
            row,
            expected,
            found,
        }
        .into());
    }

    theme.color(palette::TABLE_HEADER_BACKGROUND)?;
    theme.color(palette::BORDER)?;
    let even = theme.color(palette::ZEBRA_EVEN)?;
    let odd = theme.color(palette::ZEBRA_ODD)?;

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| match row.background() {
            Some(_) => row,
            None => row.with_background(if index % 2 == 0 { even } else { odd }),
        })
        .collect();

    let block = ContentBlock::Table(ComparisonTable::new(headers, rows).with_column_weights(weights));
    check_styles(theme, &block)?;
    Ok(block)
}

/// A small filled label; both colors are palette keys.
pub fn badge(
    theme: &Theme,
    text: &str,
    background: &str,
    foreground: &str,
) -> Result<ContentBlock, BlockError> {
    let block = ContentBlock::Badge(Badge::new(text, background, foreground));
    check_styles(theme, &block)?;
    theme.color(background)?;
    theme.color(foreground)?;
    Ok(block)
}

/// Renders `visualization` at the theme's content width and wraps the grid into a block.
pub fn visualization_block(
    theme: &Theme,
    visualization: &Visualization,
) -> Result<ContentBlock, BlockError> {
    let grid = render_visualization(theme, visualization, theme.content_width())?;
    let block = ContentBlock::Visualization(grid);
    check_styles(theme, &block)?;
    theme.color(palette::BORDER)?;
    Ok(block)
}

/// A full-width horizontal rule in the palette color `color`.
pub fn rule(theme: &Theme, color: &str, thickness_mm: f64) -> Result<ContentBlock, BlockError> {
    theme.color(color)?;
    Ok(ContentBlock::Rule(Rule::new(color, thickness_mm.max(0.0))))
}

/// A left-aligned bar `width_mm` wide and `height_mm` tall, e.g. the accent on a cover page.
pub fn accent_bar(
    theme: &Theme,
    color: &str,
    width_mm: f64,
    height_mm: f64,
) -> Result<ContentBlock, BlockError> {
    theme.color(color)?;
    Ok(ContentBlock::Rule(
        Rule::new(color, height_mm.max(0.0)).with_width(width_mm.max(0.0)),
    ))
}

/// A vertical gap of `height_mm` millimetres.
pub fn spacer(height_mm: f64) -> ContentBlock {
    ContentBlock::spacer(height_mm.max(0.0))
}

/// An explicit page break.
pub fn page_break() -> ContentBlock {
    ContentBlock::page_break()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThemeError;
    use crate::model::{CodeLineKind, TableCell};
    use crate::theme::styles;
    use crate::visualization::Pointer;
    use genpdf::style::Color;

    #[test]
    fn unknown_text_style_is_rejected() {
        let theme = Theme::dark();
        assert_eq!(
            text_block(&theme, "sBody", "hello").unwrap_err(),
            BlockError::Theme(ThemeError::UnknownStyle("sBody".into()))
        );
        assert!(text_block(&theme, styles::BODY, "hello").is_ok());
    }

    #[test]
    fn code_block_marks_comment_lines() {
        let theme = Theme::dark();
        let block = code_block(
            &theme,
            ["## two pointers", "left, right = 0, len(a) - 1", ""],
            "python",
        )
        .expect("valid code block");
        let ContentBlock::Code(code) = block else {
            panic!("expected a code block");
        };
        assert_eq!(code.language(), "python");
        assert_eq!(code.lines().len(), 3);
        assert_eq!(code.lines()[0].kind(), CodeLineKind::Comment);
        assert_eq!(code.lines()[1].kind(), CodeLineKind::Code);
        assert_eq!(code.lines()[2].display_text(), " ");
    }

    #[test]
    fn code_block_needs_comment_style_only_when_used() {
        let mut theme = Theme::new()
            .with_color(palette::CODE_HEADER_BACKGROUND, Color::Rgb(0, 0, 0));
        let style = Theme::dark().resolve(styles::CODE).expect("code").clone();
        theme.define(styles::CODE, style.clone()).expect("code");
        theme.define(styles::CODE_HEADER, style).expect("header");

        assert!(code_block(&theme, ["x = 1"], "python").is_ok());
        assert_eq!(
            code_block(&theme, ["## note"], "python").unwrap_err(),
            BlockError::Theme(ThemeError::UnknownStyle(styles::CODE_COMMENT.into()))
        );
    }

    #[test]
    fn ragged_table_is_rejected() {
        let theme = Theme::dark();
        let rows = vec![
            TableRow::new(["a", "b"]),
            TableRow::new(["only one"]),
        ];
        assert_eq!(
            comparison_table(&theme, ["Left", "Right"], rows).unwrap_err(),
            BlockError::Shape(ShapeError::RaggedTable {
                row: 1,
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn table_rows_alternate_unless_overridden() {
        let theme = Theme::dark();
        let highlight = Color::Rgb(0x0A, 0x2E, 0x1A);
        let rows = vec![
            TableRow::new(["Opposite ends", "Sorted input"]),
            TableRow::new(["Fast & slow", "Cycles"]),
            TableRow::new(["Sliding window", "Contiguous ranges"]).with_background(highlight),
            TableRow::new([TableCell::new("Prefix sums"), TableCell::styled(styles::NOTE, "Range queries")]),
        ];
        let block = comparison_table(&theme, ["Pattern", "When"], rows).expect("valid table");
        let ContentBlock::Table(table) = block else {
            panic!("expected a table");
        };
        assert_eq!(table.row_count(), 5);

        let even = theme.color(palette::ZEBRA_EVEN).unwrap();
        let odd = theme.color(palette::ZEBRA_ODD).unwrap();
        let backgrounds: Vec<_> = table.rows().iter().map(TableRow::background).collect();
        assert_eq!(
            backgrounds,
            [Some(even), Some(odd), Some(highlight), Some(odd)]
        );
    }

    #[test]
    fn column_weights_must_match_headers() {
        let theme = Theme::dark();
        let err = weighted_comparison_table(&theme, ["a", "b"], Vec::new(), vec![1, 2, 3])
            .unwrap_err();
        assert_eq!(
            err,
            BlockError::Shape(ShapeError::ColumnWeights {
                expected: 2,
                found: 3,
            })
        );
        assert!(weighted_comparison_table(&theme, ["a", "b"], Vec::new(), vec![1, 3]).is_ok());
    }

    #[test]
    fn table_cell_style_is_validated() {
        let theme = Theme::dark();
        let rows = vec![TableRow::new([TableCell::styled("sBody", "x")])];
        assert_eq!(
            comparison_table(&theme, ["only"], rows).unwrap_err(),
            BlockError::Theme(ThemeError::UnknownStyle("sBody".into()))
        );
    }

    #[test]
    fn badge_colors_are_palette_keys() {
        let theme = Theme::dark();
        assert!(badge(&theme, "O(n)", palette::SUCCESS, palette::BASE).is_ok());
        assert_eq!(
            badge(&theme, "O(n)", "lime", palette::BASE).unwrap_err(),
            BlockError::Theme(ThemeError::UnknownColor("lime".into()))
        );
    }

    #[test]
    fn divider_and_callout_validate_their_styles() {
        let theme = Theme::dark();
        assert!(divider(&theme, 1, "Two Pointers").is_ok());
        assert!(divider(&theme, None, "Table of Contents").is_ok());
        assert!(callout(&theme, styles::CALLOUT, "💡", "Sorted input means...").is_ok());
        assert!(matches!(
            callout(&theme, "sCallout", "💡", "x"),
            Err(BlockError::Theme(ThemeError::UnknownStyle(_)))
        ));
    }

    #[test]
    fn visualization_block_fits_content_width() {
        let theme = Theme::dark();
        let viz = Visualization::new([2, 1, 5, 1, 3, 2])
            .with_pointer(Pointer::new("left", 0))
            .with_pointer(Pointer::new("right", 2));
        let ContentBlock::Visualization(grid) = visualization_block(&theme, &viz).expect("valid")
        else {
            panic!("expected a visualization");
        };
        assert_eq!(grid.len(), 6);
        assert!(grid.total_width() <= theme.content_width());
        assert_eq!(grid.column_width(), theme.max_column_width());
    }

    #[test]
    fn visualization_shape_errors_abort_only_the_block() {
        let theme = Theme::dark();
        let viz = Visualization::new([1, 2, 3]).with_pointer(Pointer::new("right", 7));
        assert!(matches!(
            visualization_block(&theme, &viz),
            Err(BlockError::Shape(ShapeError::PointerOutOfRange { index: 7, len: 3, .. }))
        ));
    }

    #[test]
    fn rules_resolve_their_color() {
        let theme = Theme::dark();
        let ContentBlock::Rule(full) = rule(&theme, palette::BORDER, 0.35).expect("valid rule")
        else {
            panic!("expected a rule");
        };
        assert_eq!(full.color(), palette::BORDER);
        assert_eq!(full.width(), None);

        let ContentBlock::Rule(bar) =
            accent_bar(&theme, palette::ACCENT, 21.0, -2.0).expect("valid bar")
        else {
            panic!("expected a rule");
        };
        assert_eq!(bar.width(), Some(21.0));
        assert_eq!(bar.thickness(), 0.0);

        assert_eq!(
            rule(&theme, "chartreuse", 1.0).unwrap_err(),
            BlockError::Theme(ThemeError::UnknownColor("chartreuse".into()))
        );
        assert!(ContentBlock::Rule(full).style_names().is_empty());
    }

    #[test]
    fn spacer_is_never_negative() {
        assert_eq!(spacer(-3.0), ContentBlock::Spacer(0.0));
        assert_eq!(page_break(), ContentBlock::PageBreak);
    }
}
