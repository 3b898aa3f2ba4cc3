//! A short sample guide exercising every block kind.
//!
//! The CLI renders it with `guidebook build`; tests use it as a realistic story.

use crate::blocks::{
    accent_bar, badge, callout, code_block, comparison_table, divider, page_break, rule, spacer,
    text_block, visualization_block,
};
use crate::model::{Story, TableCell, TableRow};
use crate::richtext::{RichText, Span};
use crate::theme::{palette, styles, Theme};
use crate::visualization::{Pointer, Visualization};

/// Title of the sample guide.
pub const SAMPLE_TITLE: &str = "Two Pointers & Sliding Window";

fn toc(story: &mut Story, theme: &Theme) {
    let entries = [
        (1, "The Core Philosophy", ["Search space reduction", "Why O(n) instead of O(n²)"]),
        (2, "Opposite Ends", ["Two sum on a sorted array", "Container with most water"]),
        (3, "Sliding Window", ["Fixed windows", "Variable windows"]),
    ];
    story.push_or_skip(divider(theme, None, "Table of Contents"));
    for (number, title, subsections) in entries {
        story.push_or_skip(text_block(
            theme,
            styles::TOC,
            Span::new(format!("{number:02}   {title}")).bold(),
        ));
        for subsection in subsections {
            story.push_or_skip(text_block(theme, styles::TOC_SUB, format!("›  {subsection}")));
        }
    }
    story.page_break();
}

fn core_philosophy(story: &mut Story, theme: &Theme) {
    story.push_or_skip(divider(theme, 1, "The Core Philosophy"));
    story.push_or_skip(text_block(theme, styles::H2, "The Fundamental Problem"));
    story.push_or_skip(text_block(
        theme,
        styles::BODY,
        RichText::default()
            .with("Many array problems ask for a ")
            .with(Span::new("pair").bold())
            .with(" of elements satisfying a condition. Checking every pair is O(n²); ")
            .with("two pointers use the ")
            .with(Span::new("structure of the data").italic())
            .with(" to discard a whole row of candidates at every step."),
    ));
    story.push_or_skip(code_block(
        theme,
        [
            "## Brute force: O(n²), check every pair",
            "def brute_force_pair(arr, target):",
            "    for i in range(len(arr)):",
            "        for j in range(i + 1, len(arr)):",
            "            if arr[i] + arr[j] == target:",
            "                return (i, j)",
            "    return None",
            "",
            "## Two pointers: O(n), arr must be sorted",
            "def two_pointer_pair(arr, target):",
            "    left, right = 0, len(arr) - 1",
            "    while left < right:",
            "        current = arr[left] + arr[right]",
            "        if current == target:  return (left, right)",
            "        elif current < target: left += 1",
            "        else:                  right -= 1",
            "    return None",
        ],
        "python",
    ));
    story.push_or_skip(callout(
        theme,
        styles::CALLOUT,
        "💡",
        RichText::default()
            .with(Span::new("Key insight: ").bold())
            .with("if arr[L] + arr[R] is too small, every pair using arr[L] is too small as well."),
    ));
    story.push_or_skip(badge(theme, "O(n) time", palette::SUCCESS, palette::BASE));
    story.push_or_skip(badge(theme, "O(1) space", palette::ACCENT, palette::BASE));

    let rows = vec![
        TableRow::new([
            TableCell::styled(styles::H3, "Order"),
            TableCell::new("Moving a pointer changes the result predictably."),
        ]),
        TableRow::new([
            TableCell::styled(styles::H3, "Monotonicity"),
            TableCell::new("Each move either grows or shrinks the candidate."),
        ]),
        TableRow::new([
            TableCell::styled(styles::H3, "Index validity"),
            TableCell::new("The loop condition decides whether pointers may meet."),
        ]),
    ];
    story.push_or_skip(comparison_table(theme, ["Prerequisite", "Why it matters"], rows));
    story.page_break();
}

fn opposite_ends(story: &mut Story, theme: &Theme) {
    story.push_or_skip(divider(theme, 2, "Opposite Ends"));
    story.push_or_skip(text_block(
        theme,
        styles::BODY,
        "Start one pointer at each end and move them toward each other. The sorted order \
         guarantees that moving left increases the sum and moving right decreases it.",
    ));
    let steps = [(0, 5), (0, 4), (1, 4)];
    for (left, right) in steps {
        story.push_or_skip(visualization_block(
            theme,
            &Visualization::new([1, 2, 4, 5, 7, 11])
                .with_pointer(Pointer::new("left", left))
                .with_pointer(Pointer::new("right", right)),
        ));
    }
    story.push_or_skip(text_block(
        theme,
        styles::CAPTION,
        "Searching for target 9: the pair (2, 7) is found after three moves.",
    ));
    story.push_or_skip(visualization_block(
        theme,
        &Visualization::new([3, 1, 3, 5, 2, 4])
            .with_pointer(Pointer::new("front", 0))
            .with_pointer(Pointer::new("back", 0)),
    ));
    story.push_or_skip(text_block(
        theme,
        styles::NOTE,
        "When two pointers of equal priority meet, the cell switches to the collision color.",
    ));
    story.page_break();
}

fn sliding_window(story: &mut Story, theme: &Theme) {
    story.push_or_skip(divider(theme, 3, "Sliding Window"));
    story.push_or_skip(text_block(
        theme,
        styles::BODY,
        "A window is a contiguous range bounded by two pointers moving in the same direction. \
         The right pointer grows the window, the left pointer shrinks it.",
    ));
    story.push_or_skip(visualization_block(
        theme,
        &Visualization::new("abcabcbb".chars())
            .with_window(1, 3)
            .with_pointers([
                Pointer::new("left", 1),
                Pointer::new("right", 3).with_priority(1),
            ]),
    ));
    story.push_or_skip(code_block(
        theme,
        [
            "## Longest substring without repeating characters",
            "def longest_unique(s):",
            "    seen, left, best = {}, 0, 0",
            "    for right, ch in enumerate(s):",
            "        if seen.get(ch, -1) >= left:",
            "            left = seen[ch] + 1",
            "        seen[ch] = right",
            "        best = max(best, right - left + 1)",
            "    return best",
        ],
        "python",
    ));
    story.push_or_skip(text_block(theme, styles::FORMULA, "window length = right − left + 1"));
    story.push(spacer(4.0));
    story.push_or_skip(callout(
        theme,
        styles::CALLOUT,
        "⚠",
        "Shrink the window before recording the answer, otherwise a stale duplicate is counted.",
    ));
}

/// Builds the sample guide with `theme`.
///
/// Blocks the theme cannot style are logged and skipped.
pub fn sample_guide(theme: &Theme) -> Story {
    let mut story = Story::new();
    story.push(spacer(12.7));
    story.push_or_skip(rule(theme, palette::ACCENT, 2.1));
    story.push(spacer(7.6));
    story.push_or_skip(text_block(theme, styles::TITLE, SAMPLE_TITLE));
    story.push_or_skip(accent_bar(theme, palette::ACCENT_ALT, 21.0, 1.4));
    story.push_or_skip(text_block(
        theme,
        styles::SUBTITLE,
        "Patterns, templates and pointer diagrams",
    ));
    story.push_or_skip(rule(theme, palette::BORDER, 0.35));
    story.push_or_skip(text_block(theme, styles::AUTHOR, "Study guide"));
    story.push(page_break());

    toc(&mut story, theme);
    core_philosophy(&mut story, theme);
    opposite_ends(&mut story, theme);
    sliding_window(&mut story, theme);
    story
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentBlock;

    #[test]
    fn sample_guide_builds_every_block_with_the_dark_theme() {
        let theme = Theme::dark();
        let story = sample_guide(&theme);
        let count = |kind: &str| story.blocks().iter().filter(|b| b.kind() == kind).count();

        assert_eq!(count("divider"), 4);
        assert_eq!(count("visualization"), 5);
        assert_eq!(count("code"), 2);
        assert_eq!(count("table"), 1);
        assert_eq!(count("badge"), 2);
        assert_eq!(count("rule"), 3);
        assert!(matches!(story.blocks()[1], ContentBlock::Rule(_)));
        assert!(matches!(story.blocks()[3], ContentBlock::Text(_)));
    }

    #[test]
    fn sample_guide_skips_blocks_an_empty_theme_cannot_style() {
        let story = sample_guide(&Theme::new());
        assert!(story
            .blocks()
            .iter()
            .all(|block| matches!(block, ContentBlock::PageBreak | ContentBlock::Spacer(_))));
    }
}
