//! Built-in slate theme used by the study guides.

use genpdf::style::Color;

use super::{palette, styles, FontKind, HorizontalAlignment, StyleDescriptor, Theme, POINTS_PER_MM};

const BG: Color = Color::Rgb(0x0F, 0x17, 0x2A);
const ACCENT: Color = Color::Rgb(0x38, 0xBD, 0xF8);
const ACCENT_ALT: Color = Color::Rgb(0x81, 0x8C, 0xF8);
const GREEN: Color = Color::Rgb(0x34, 0xD3, 0x99);
const YELLOW: Color = Color::Rgb(0xFB, 0xBF, 0x24);
const RED: Color = Color::Rgb(0xF8, 0x71, 0x71);
const PURPLE: Color = Color::Rgb(0xC0, 0x84, 0xFC);
const ORANGE: Color = Color::Rgb(0xFB, 0x92, 0x3C);
const TEAL: Color = Color::Rgb(0x2D, 0xD4, 0xBF);
const CODE_FG: Color = Color::Rgb(0xE2, 0xE8, 0xF0);
const HEADING: Color = Color::Rgb(0xF1, 0xF5, 0xF9);
const BODY: Color = Color::Rgb(0xCB, 0xD5, 0xE1);
const MUTED: Color = Color::Rgb(0x64, 0x74, 0x8B);
const BORDER: Color = Color::Rgb(0x33, 0x41, 0x55);
const CARD: Color = Color::Rgb(0x1E, 0x29, 0x3B);
const CARD_DARK: Color = Color::Rgb(0x14, 0x1E, 0x2E);

fn pt(points: f64) -> f64 {
    points / POINTS_PER_MM
}

fn sans(size: f64, color: Color) -> StyleDescriptor {
    StyleDescriptor::new(FontKind::Sans, size, color)
}

fn mono(size: f64, color: Color) -> StyleDescriptor {
    StyleDescriptor::new(FontKind::Mono, size, color)
}

impl Theme {
    /// Dark slate theme with sky and indigo accents.
    pub fn dark() -> Theme {
        let mut theme = Theme::new()
            .with_color(palette::BASE, BG)
            .with_color(palette::ACCENT, ACCENT)
            .with_color(palette::ACCENT_ALT, ACCENT_ALT)
            .with_color(palette::SUCCESS, GREEN)
            .with_color(palette::WARNING, YELLOW)
            .with_color(palette::DANGER, RED)
            .with_color(palette::MUTED, MUTED)
            .with_color(palette::BORDER, BORDER)
            .with_color(palette::DEFAULT, CARD)
            .with_color(palette::HIGHLIGHTED, HEADING)
            .with_color(palette::COLLISION, Color::Rgb(0x3A, 0x14, 0x2E))
            .with_color(palette::WINDOW, Color::Rgb(0x0A, 0x1E, 0x2E))
            .with_color(palette::POINTER, Color::Rgb(0x0A, 0x2E, 0x3A))
            .with_color(palette::pointer("left"), Color::Rgb(0x0A, 0x2E, 0x3A))
            .with_color(palette::pointer("right"), Color::Rgb(0x1A, 0x10, 0x40))
            .with_color(palette::pointer("mid"), Color::Rgb(0x1A, 0x2E, 0x0A))
            .with_color(palette::pointer("extra"), Color::Rgb(0x2E, 0x1A, 0x0A))
            .with_color(palette::pointer("slow"), Color::Rgb(0x0A, 0x2E, 0x1A))
            .with_color(palette::pointer("fast"), Color::Rgb(0x2E, 0x0A, 0x1A))
            .with_color(palette::COLLISION_LABEL, Color::Rgb(0xF4, 0x72, 0xB6))
            .with_color(palette::pointer_label("left"), ACCENT)
            .with_color(palette::pointer_label("right"), ACCENT_ALT)
            .with_color(palette::pointer_label("mid"), GREEN)
            .with_color(palette::pointer_label("extra"), ORANGE)
            .with_color(palette::pointer_label("slow"), TEAL)
            .with_color(palette::pointer_label("fast"), RED)
            .with_color(palette::CALLOUT_BACKGROUND, Color::Rgb(0x0C, 0x1F, 0x35))
            .with_color(palette::CODE_BACKGROUND, CARD)
            .with_color(palette::CODE_HEADER_BACKGROUND, Color::Rgb(0x0D, 0x19, 0x29))
            .with_color(palette::TABLE_HEADER_BACKGROUND, BG)
            .with_color(palette::ZEBRA_EVEN, CARD)
            .with_color(palette::ZEBRA_ODD, CARD_DARK)
            .with_color("purple", PURPLE)
            .with_color("orange", ORANGE)
            .with_color("teal", TEAL)
            .with_color("heading", HEADING)
            .with_color("body", BODY);

        let definitions = [
            (
                styles::TITLE,
                sans(32.0, HEADING)
                    .bold()
                    .with_leading(40.0)
                    .with_alignment(HorizontalAlignment::Center)
                    .with_spacing(0.0, pt(6.0)),
            ),
            (
                styles::SUBTITLE,
                sans(13.0, ACCENT)
                    .with_leading(18.0)
                    .with_alignment(HorizontalAlignment::Center)
                    .with_spacing(0.0, pt(4.0)),
            ),
            (
                styles::AUTHOR,
                sans(10.0, MUTED)
                    .italic()
                    .with_alignment(HorizontalAlignment::Center)
                    .with_spacing(0.0, pt(20.0)),
            ),
            (
                styles::H1,
                sans(20.0, ACCENT)
                    .bold()
                    .with_leading(26.0)
                    .with_spacing(pt(18.0), pt(8.0)),
            ),
            (
                styles::H2,
                sans(14.0, ACCENT_ALT)
                    .bold()
                    .with_leading(19.0)
                    .with_spacing(pt(12.0), pt(5.0)),
            ),
            (
                styles::H3,
                sans(11.0, GREEN)
                    .bold()
                    .with_leading(15.0)
                    .with_spacing(pt(8.0), pt(4.0)),
            ),
            (
                styles::BODY,
                sans(10.0, BODY)
                    .with_leading(15.0)
                    .with_alignment(HorizontalAlignment::Justified)
                    .with_spacing(0.0, pt(6.0)),
            ),
            (
                styles::BULLET,
                sans(10.0, BODY)
                    .with_leading(14.0)
                    .with_spacing(0.0, pt(3.0))
                    .with_indent(pt(16.0), 0.0),
            ),
            (
                styles::CODE,
                mono(8.5, CODE_FG)
                    .with_leading(13.0)
                    .with_background(CARD)
                    .with_indent(pt(12.0), pt(12.0)),
            ),
            (
                styles::CODE_COMMENT,
                mono(8.5, MUTED)
                    .italic()
                    .with_leading(13.0)
                    .with_background(CARD)
                    .with_indent(pt(12.0), pt(12.0)),
            ),
            (styles::CODE_HEADER, mono(8.0, MUTED).bold()),
            (
                styles::FORMULA,
                mono(10.0, GREEN)
                    .bold()
                    .with_leading(14.0)
                    .with_alignment(HorizontalAlignment::Center)
                    .with_spacing(pt(4.0), pt(4.0)),
            ),
            (
                styles::CAPTION,
                sans(8.5, MUTED)
                    .italic()
                    .with_alignment(HorizontalAlignment::Center)
                    .with_spacing(0.0, pt(6.0)),
            ),
            (styles::TOC, sans(10.0, BODY).with_leading(16.0)),
            (
                styles::TOC_SUB,
                sans(9.0, MUTED).with_leading(14.0).with_indent(pt(18.0), 0.0),
            ),
            (
                styles::NOTE,
                sans(9.0, YELLOW)
                    .italic()
                    .with_leading(13.0)
                    .with_spacing(0.0, pt(4.0)),
            ),
            (
                styles::CALLOUT,
                sans(9.5, ACCENT)
                    .with_leading(14.0)
                    .with_spacing(0.0, pt(6.0)),
            ),
            (styles::DIVIDER_NUMBER, sans(22.0, ACCENT).bold()),
            (
                styles::DIVIDER_TITLE,
                sans(18.0, HEADING)
                    .bold()
                    .with_leading(24.0)
                    .with_spacing(pt(10.0), pt(8.0)),
            ),
            (styles::TABLE_HEADER, sans(9.0, MUTED).bold()),
            (styles::TABLE_CELL, sans(9.0, BODY).with_leading(12.0)),
            (styles::BADGE, sans(8.0, BG).bold().with_spacing(0.0, pt(4.0))),
            (
                styles::VIZ_LABEL,
                sans(8.0, ACCENT)
                    .bold()
                    .with_alignment(HorizontalAlignment::Center),
            ),
            (
                styles::VIZ_VALUE,
                mono(11.0, BODY)
                    .bold()
                    .with_alignment(HorizontalAlignment::Center)
                    .with_spacing(0.0, pt(6.0)),
            ),
            (
                styles::VIZ_INDEX,
                mono(8.0, MUTED).with_alignment(HorizontalAlignment::Center),
            ),
            (
                styles::FOOTER,
                sans(8.0, MUTED).with_alignment(HorizontalAlignment::Center),
            ),
        ];

        for (name, descriptor) in definitions {
            if let Err(err) = theme.define(name, descriptor) {
                log::warn!("Skipping preset style: {err}");
            }
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_theme_defines_builder_styles() {
        let theme = Theme::dark();
        for name in [
            styles::BODY,
            styles::CODE,
            styles::CODE_COMMENT,
            styles::CODE_HEADER,
            styles::CALLOUT,
            styles::DIVIDER_NUMBER,
            styles::DIVIDER_TITLE,
            styles::TABLE_HEADER,
            styles::TABLE_CELL,
            styles::BADGE,
            styles::VIZ_LABEL,
            styles::VIZ_VALUE,
            styles::VIZ_INDEX,
            styles::FOOTER,
        ] {
            assert!(theme.has_style(name), "missing style {name}");
        }
        assert!(!theme.has_style("sBody"));
    }

    #[test]
    fn collision_color_differs_from_every_pointer_color() {
        let theme = Theme::dark();
        let collision = theme.color(palette::COLLISION).expect("collision color");
        for (key, color) in theme.palette() {
            if key == palette::POINTER || key.starts_with("pointer.") {
                assert_ne!(color, collision, "{key} matches the collision color");
            }
        }
    }
}
