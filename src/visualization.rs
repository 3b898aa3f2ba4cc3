//! Maps an array snapshot plus named pointers onto a row of colored, labeled cells.
//!
//! The renderer does not know anything about the algorithm being illustrated.  It receives the
//! values and where each pointer currently sits, and decides per cell:
//!
//! * which background wins when several pointers meet (highest priority, or the palette's
//!   `collision` color when the top priority is shared),
//! * which label is printed above the cell (all pointer names joined by `/`) and in which color,
//! * how wide each column may be on the page.
//!
//! Pointers on the same cell are ordered by priority (descending), then by name (ascending),
//! then by registration order.  The name order keeps labels such as `back/front` stable no
//! matter in which order the snapshot listed its pointers.

use std::fmt;

use genpdf::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::{BlockError, ShapeError};
use crate::theme::{palette, Theme};

/// Separator placed between pointer names sharing a cell.
pub const LABEL_SEPARATOR: &str = "/";

/// A visualized array element: a number or a short string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

macro_rules! int_cell_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for CellValue {
            fn from(value: $ty) -> Self {
                CellValue::Int(i64::from(value))
            }
        })*
    };
}

int_cell_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<char> for CellValue {
    fn from(value: char) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// A named marker at an index of the visualized array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    name: String,
    index: i64,
    #[serde(default)]
    priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl Pointer {
    /// Creates a pointer with priority 0 and the palette color registered for its name.
    pub fn new(name: impl Into<String>, index: i64) -> Self {
        Self {
            name: name.into(),
            index,
            priority: 0,
            color: None,
        }
    }

    /// Sets the priority; higher priorities win the cell background.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Uses the palette entry `key` as this pointer's background.
    pub fn with_color(mut self, key: impl Into<String>) -> Self {
        self.color = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Explicit palette key, if one was set.
    pub fn color_key(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Resolves the designated background: the explicit key, then `pointer.<name>`, then
    /// `pointer`.
    pub fn background(&self, theme: &Theme) -> Result<Color, BlockError> {
        if let Some(key) = &self.color {
            return Ok(theme.color(key)?);
        }
        if let Some(color) = theme.try_color(&palette::pointer(&self.name)) {
            return Ok(color);
        }
        Ok(theme.color(palette::POINTER)?)
    }

    /// Resolves the label color: `pointerLabel.<name>`, then the designated background.
    pub fn label_color(&self, theme: &Theme) -> Result<Color, BlockError> {
        match theme.try_color(&palette::pointer_label(&self.name)) {
            Some(color) => Ok(color),
            None => self.background(theme),
        }
    }
}

/// Inclusive range of indices highlighted as the current window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// An array snapshot together with the pointers placed on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    cells: Vec<CellValue>,
    #[serde(default)]
    pointers: Vec<Pointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window: Option<Window>,
}

impl Visualization {
    pub fn new<I, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            pointers: Vec::new(),
            window: None,
        }
    }

    /// Parses the `{cells, pointers, window}` JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Registers a pointer; registration order is the last tie-break for labels.
    pub fn with_pointer(mut self, pointer: Pointer) -> Self {
        self.pointers.push(pointer);
        self
    }

    pub fn with_pointers<I>(mut self, pointers: I) -> Self
    where
        I: IntoIterator<Item = Pointer>,
    {
        self.pointers.extend(pointers);
        self
    }

    /// Highlights the inclusive range `start..=end`.
    pub fn with_window(mut self, start: usize, end: usize) -> Self {
        self.window = Some(Window { start, end });
        self
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn pointers(&self) -> &[Pointer] {
        &self.pointers
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Checks the shape invariants without touching the theme.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let len = self.cells.len();
        if len == 0 {
            return Err(ShapeError::EmptyArray);
        }
        if let Some(pointer) = self
            .pointers
            .iter()
            .find(|pointer| usize::try_from(pointer.index).map_or(true, |index| index >= len))
        {
            return Err(ShapeError::PointerOutOfRange {
                name: pointer.name.clone(),
                index: pointer.index,
                len,
            });
        }
        if let Some(window) = self.window {
            if window.start > window.end || window.end >= len {
                return Err(ShapeError::WindowOutOfRange {
                    start: window.start,
                    end: window.end,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// One rendered array position.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    value: CellValue,
    background: Color,
    foreground: Color,
    label: String,
    label_color: Color,
}

impl Cell {
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    /// Pointer names on this cell joined by `/`, or empty.
    pub fn label_text(&self) -> &str {
        &self.label
    }

    /// Color of the label: the leading pointer's label color, or the collision label color.
    pub fn label_color(&self) -> Color {
        self.label_color
    }
}

/// Renderer output: one cell per input index plus the fitted column width.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedGrid {
    cells: Vec<Cell>,
    column_width: f64,
}

impl RenderedGrid {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Width of every column in millimetres.
    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Width of the whole strip in millimetres.
    pub fn total_width(&self) -> f64 {
        self.column_width * self.cells.len() as f64
    }
}

/// Width of one column: the even share of `available_width`, capped by the theme.
pub fn column_width(theme: &Theme, available_width: f64, columns: usize) -> f64 {
    let share = available_width.max(0.0) / columns.max(1) as f64;
    share.min(theme.max_column_width())
}

/// Renders `visualization` into a grid of cells fitted into `available_width` millimetres.
///
/// Shape errors are detected before any cell is produced, so the function either returns the
/// complete grid or nothing.
pub fn render_visualization(
    theme: &Theme,
    visualization: &Visualization,
    available_width: f64,
) -> Result<RenderedGrid, BlockError> {
    visualization.validate()?;

    let default_background = theme.color(palette::DEFAULT)?;
    let muted = theme.color(palette::MUTED)?;
    let highlighted = theme.color(palette::HIGHLIGHTED)?;

    let len = visualization.cells.len();
    let mut by_index: Vec<Vec<(usize, &Pointer)>> = vec![Vec::new(); len];
    for (order, pointer) in visualization.pointers.iter().enumerate() {
        // validate() guarantees 0 <= index < len
        by_index[pointer.index as usize].push((order, pointer));
    }

    let mut cells = Vec::with_capacity(len);
    for (index, (value, mut matched)) in visualization
        .cells
        .iter()
        .zip(by_index)
        .enumerate()
    {
        let cell = if matched.is_empty() {
            let in_window = visualization
                .window
                .map_or(false, |window| window.contains(index));
            let (background, foreground) = if in_window {
                (theme.color(palette::WINDOW)?, highlighted)
            } else {
                (default_background, muted)
            };
            Cell {
                value: value.clone(),
                background,
                foreground,
                label: String::new(),
                label_color: muted,
            }
        } else {
            matched.sort_by(|(a_order, a), (b_order, b)| {
                b.priority
                    .cmp(&a.priority)
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a_order.cmp(b_order))
            });

            let top = matched[0].1.priority;
            let shared_top = matched
                .iter()
                .take_while(|(_, pointer)| pointer.priority == top)
                .count()
                > 1;
            let (background, label_color) = if shared_top {
                let collision = theme.color(palette::COLLISION)?;
                let label_color = theme
                    .try_color(palette::COLLISION_LABEL)
                    .unwrap_or(collision);
                (collision, label_color)
            } else {
                let leader = matched[0].1;
                (leader.background(theme)?, leader.label_color(theme)?)
            };

            let label = matched
                .iter()
                .map(|(_, pointer)| pointer.name.as_str())
                .collect::<Vec<_>>()
                .join(LABEL_SEPARATOR);

            Cell {
                value: value.clone(),
                background,
                foreground: highlighted,
                label,
                label_color,
            }
        };
        cells.push(cell);
    }

    Ok(RenderedGrid {
        cells,
        column_width: column_width(theme, available_width, len),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThemeError;

    const DEFAULT: Color = Color::Rgb(30, 41, 59);
    const MUTED: Color = Color::Rgb(100, 116, 139);
    const HIGHLIGHTED: Color = Color::Rgb(241, 245, 249);
    const COLLISION: Color = Color::Rgb(58, 20, 46);
    const WINDOW: Color = Color::Rgb(10, 30, 46);
    const POINTER: Color = Color::Rgb(1, 1, 1);
    const LEFT: Color = Color::Rgb(10, 46, 58);
    const RIGHT: Color = Color::Rgb(26, 16, 64);

    fn theme() -> Theme {
        Theme::new()
            .with_color(palette::DEFAULT, DEFAULT)
            .with_color(palette::MUTED, MUTED)
            .with_color(palette::HIGHLIGHTED, HIGHLIGHTED)
            .with_color(palette::COLLISION, COLLISION)
            .with_color(palette::WINDOW, WINDOW)
            .with_color(palette::POINTER, POINTER)
            .with_color(palette::pointer("left"), LEFT)
            .with_color(palette::pointer("right"), RIGHT)
            .with_max_column_width(18.0)
    }

    fn render(visualization: &Visualization) -> Result<RenderedGrid, BlockError> {
        render_visualization(&theme(), visualization, 180.0)
    }

    #[test]
    fn left_and_right_pointers() {
        let viz = Visualization::new([2, 1, 5, 1, 3, 2])
            .with_pointer(Pointer::new("left", 0))
            .with_pointer(Pointer::new("right", 2));
        let grid = render(&viz).expect("valid visualization");

        assert_eq!(grid.len(), 6);
        let values: Vec<String> = grid.cells().iter().map(|c| c.value().to_string()).collect();
        assert_eq!(values, ["2", "1", "5", "1", "3", "2"]);

        assert_eq!(grid.cells()[0].label_text(), "left");
        assert_eq!(grid.cells()[0].background(), LEFT);
        assert_eq!(grid.cells()[0].foreground(), HIGHLIGHTED);
        assert_eq!(grid.cells()[2].label_text(), "right");
        assert_eq!(grid.cells()[2].background(), RIGHT);

        for index in [1, 3, 4, 5] {
            let cell = &grid.cells()[index];
            assert_eq!(cell.label_text(), "");
            assert_eq!(cell.background(), DEFAULT);
            assert_eq!(cell.foreground(), MUTED);
        }
    }

    #[test]
    fn equal_priority_collision_uses_collision_color_and_name_order() {
        let viz = Visualization::new([3, 1, 3, 5, 2, 4])
            .with_pointer(Pointer::new("front", 0))
            .with_pointer(Pointer::new("back", 0));
        let grid = render(&viz).expect("valid visualization");

        let cell = &grid.cells()[0];
        assert_eq!(cell.label_text(), "back/front");
        assert_eq!(cell.background(), COLLISION);
        assert_ne!(cell.background(), POINTER);
        assert_ne!(cell.background(), LEFT);
        assert_ne!(cell.background(), RIGHT);
        assert_eq!(cell.foreground(), HIGHLIGHTED);
    }

    #[test]
    fn label_order_does_not_depend_on_registration_order() {
        let forward = Visualization::new([1, 2])
            .with_pointer(Pointer::new("front", 1))
            .with_pointer(Pointer::new("back", 1));
        let reversed = Visualization::new([1, 2])
            .with_pointer(Pointer::new("back", 1))
            .with_pointer(Pointer::new("front", 1));
        assert_eq!(
            render(&forward).unwrap().cells()[1].label_text(),
            render(&reversed).unwrap().cells()[1].label_text()
        );
    }

    #[test]
    fn higher_priority_wins_background_and_leads_label() {
        let viz = Visualization::new([7, 7, 7])
            .with_pointer(Pointer::new("left", 1))
            .with_pointer(Pointer::new("right", 1).with_priority(2));
        let grid = render(&viz).expect("valid visualization");
        assert_eq!(grid.cells()[1].label_text(), "right/left");
        assert_eq!(grid.cells()[1].background(), RIGHT);
    }

    #[test]
    fn collision_only_counts_top_priority() {
        let viz = Visualization::new([1, 2, 3])
            .with_pointer(Pointer::new("slow", 2))
            .with_pointer(Pointer::new("fast", 2))
            .with_pointer(Pointer::new("mid", 2).with_priority(5));
        let grid = render(&viz).expect("valid visualization");
        assert_eq!(grid.cells()[2].label_text(), "mid/fast/slow");
        assert_eq!(grid.cells()[2].background(), POINTER);
    }

    #[test]
    fn labels_take_the_leading_pointer_color() {
        let viz = Visualization::new("abcba".chars()).with_pointers([
            Pointer::new("left", 0),
            Pointer::new("right", 4),
            Pointer::new("front", 2),
            Pointer::new("back", 2),
        ]);
        let grid = render(&viz).expect("valid visualization");
        assert_eq!(grid.cells()[0].value(), &CellValue::Text("a".into()));
        assert_eq!(grid.cells()[0].label_color(), LEFT);
        assert_eq!(grid.cells()[4].label_color(), RIGHT);
        assert_eq!(grid.cells()[2].label_color(), COLLISION);
        assert_eq!(grid.cells()[1].label_color(), MUTED);

        let sky = Color::Rgb(56, 189, 248);
        let pink = Color::Rgb(244, 114, 182);
        let theme = theme()
            .with_color(palette::pointer_label("left"), sky)
            .with_color(palette::COLLISION_LABEL, pink);
        let grid = render_visualization(&theme, &viz, 180.0).expect("valid visualization");
        assert_eq!(grid.cells()[0].label_color(), sky);
        assert_eq!(grid.cells()[0].background(), LEFT);
        assert_eq!(grid.cells()[2].label_color(), pink);
        assert_eq!(grid.cells()[4].label_color(), RIGHT);
    }

    #[test]
    fn explicit_color_key_beats_name_lookup() {
        let viz = Visualization::new([1, 2]).with_pointer(Pointer::new("left", 0).with_color("right"));
        let theme = theme().with_color("right", RIGHT);
        let grid = render_visualization(&theme, &viz, 100.0).expect("valid");
        assert_eq!(grid.cells()[0].background(), RIGHT);

        let missing = Visualization::new([1]).with_pointer(Pointer::new("i", 0).with_color("nope"));
        assert_eq!(
            render(&missing).unwrap_err(),
            BlockError::Theme(ThemeError::UnknownColor("nope".into()))
        );
    }

    #[test]
    fn out_of_range_pointer_is_rejected() {
        let viz = Visualization::new([1, 2, 3])
            .with_pointer(Pointer::new("left", 0))
            .with_pointer(Pointer::new("right", 3));
        assert_eq!(
            render(&viz).unwrap_err(),
            BlockError::Shape(ShapeError::PointerOutOfRange {
                name: "right".into(),
                index: 3,
                len: 3,
            })
        );

        let negative = Visualization::new([1]).with_pointer(Pointer::new("i", -1));
        assert!(matches!(
            render(&negative),
            Err(BlockError::Shape(ShapeError::PointerOutOfRange { index: -1, .. }))
        ));
    }

    #[test]
    fn empty_array_is_rejected() {
        let viz = Visualization::new(Vec::<i32>::new());
        assert_eq!(
            render(&viz).unwrap_err(),
            BlockError::Shape(ShapeError::EmptyArray)
        );
    }

    #[test]
    fn window_cells_are_highlighted() {
        let viz = Visualization::new(["a", "b", "c", "a", "b"])
            .with_window(1, 3)
            .with_pointer(Pointer::new("left", 1))
            .with_pointer(Pointer::new("right", 3));
        let grid = render(&viz).expect("valid visualization");
        assert_eq!(grid.cells()[0].background(), DEFAULT);
        assert_eq!(grid.cells()[1].background(), LEFT);
        assert_eq!(grid.cells()[2].background(), WINDOW);
        assert_eq!(grid.cells()[2].foreground(), HIGHLIGHTED);
        assert_eq!(grid.cells()[2].label_text(), "");
        assert_eq!(grid.cells()[4].foreground(), MUTED);

        let bad = Visualization::new([1, 2]).with_window(1, 2);
        assert!(matches!(
            render(&bad),
            Err(BlockError::Shape(ShapeError::WindowOutOfRange { .. }))
        ));
    }

    #[test]
    fn column_width_shrinks_but_never_stretches() {
        let short = Visualization::new([1, 2, 3]);
        assert_eq!(render(&short).unwrap().column_width(), 18.0);

        let wide = Visualization::new(0..30);
        let grid = render(&wide).unwrap();
        assert!((grid.column_width() - 6.0).abs() < 1e-9);
        assert!((grid.total_width() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn parses_wire_format() {
        let viz = Visualization::from_json_str(
            r#"{
                "cells": [3, "x", 5],
                "pointers": [
                    { "name": "slow", "index": 0 },
                    { "name": "fast", "index": 2, "priority": 1 }
                ],
                "window": { "start": 0, "end": 2 }
            }"#,
        )
        .expect("valid json");
        assert_eq!(viz.cells()[1], CellValue::Text("x".into()));
        assert_eq!(viz.pointers()[1].priority(), 1);
        assert_eq!(viz.window(), Some(Window { start: 0, end: 2 }));
    }
}
