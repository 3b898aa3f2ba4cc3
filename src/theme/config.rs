//! JSON configuration for themes.
//!
//! ```json
//! {
//!   "styles":  { "body": { "size": 10, "leading": 15, "color": "#CBD5E1" } },
//!   "palette": { "accent": "#38BDF8", "default": "#1E293B" },
//!   "page":    { "width": 215.9, "height": 279.4 },
//!   "maxColumnWidth": 18.3
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use genpdf::style::Color;
use serde::{Deserialize, Serialize};

use super::{FontKind, HorizontalAlignment, PageGeometry, PageMargins, StyleDescriptor, Theme};
use crate::error::{BuildError, ThemeError};

/// Serializable form of a [`StyleDescriptor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    #[serde(default)]
    pub font: FontKind,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading: Option<f64>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub alignment: HorizontalAlignment,
    #[serde(default)]
    pub space_before: f64,
    #[serde(default)]
    pub space_after: f64,
    #[serde(default)]
    pub left_indent: f64,
    #[serde(default)]
    pub right_indent: f64,
}

impl StyleConfig {
    fn into_descriptor(self) -> Result<StyleDescriptor, ThemeError> {
        let mut descriptor = StyleDescriptor::new(self.font, self.size, parse_hex_color(&self.color)?)
            .with_alignment(self.alignment)
            .with_spacing(self.space_before, self.space_after)
            .with_indent(self.left_indent, self.right_indent);
        if let Some(leading) = self.leading {
            descriptor = descriptor.with_leading(leading);
        }
        if let Some(background) = self.background.as_deref() {
            descriptor = descriptor.with_background(parse_hex_color(background)?);
        }
        if self.bold {
            descriptor = descriptor.bold();
        }
        if self.italic {
            descriptor = descriptor.italic();
        }
        Ok(descriptor)
    }

    fn from_descriptor(descriptor: &StyleDescriptor) -> Self {
        Self {
            font: descriptor.font(),
            bold: descriptor.is_bold(),
            italic: descriptor.is_italic(),
            size: descriptor.size(),
            leading: Some(descriptor.leading()),
            color: format_hex_color(descriptor.color()),
            background: descriptor.background().map(format_hex_color),
            alignment: descriptor.alignment(),
            space_before: descriptor.space_before(),
            space_after: descriptor.space_after(),
            left_indent: descriptor.left_indent(),
            right_indent: descriptor.right_indent(),
        }
    }
}

/// Serializable page geometry; omitted fields keep the letter defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<PageMargins>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_height: Option<f64>,
}

impl PageConfig {
    fn into_geometry(self) -> PageGeometry {
        let defaults = PageGeometry::letter();
        PageGeometry {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            margins: self.margins.unwrap_or(defaults.margins),
            footer_height: self.footer_height.unwrap_or(defaults.footer_height),
        }
    }
}

/// Structured theme configuration: named styles, palette and optional page settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(default)]
    pub styles: BTreeMap<String, StyleConfig>,
    #[serde(default)]
    pub palette: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_column_width: Option<f64>,
}

impl ThemeConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json_str(&text)?)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Builds the theme described by this configuration.
    pub fn into_theme(self) -> Result<Theme, ThemeError> {
        let mut theme = Theme::new();
        for (name, style) in self.styles {
            theme.define(name, style.into_descriptor()?)?;
        }
        for (key, value) in self.palette {
            theme.set_color(key, parse_hex_color(&value)?);
        }
        if let Some(page) = self.page {
            theme = theme.with_page(page.into_geometry());
        }
        if let Some(width) = self.max_column_width {
            theme = theme.with_max_column_width(width);
        }
        Ok(theme)
    }
}

impl Theme {
    /// Builds a theme from a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Theme, BuildError> {
        Ok(ThemeConfig::load(path)?.into_theme()?)
    }

    /// Exports the theme so it can be saved, edited and loaded again.
    pub fn to_config(&self) -> ThemeConfig {
        let page = self.page();
        ThemeConfig {
            styles: self
                .styles()
                .map(|(name, style)| (name.to_owned(), StyleConfig::from_descriptor(style)))
                .collect(),
            palette: self
                .palette()
                .map(|(key, color)| (key.to_owned(), format_hex_color(color)))
                .collect(),
            page: Some(PageConfig {
                width: Some(page.width),
                height: Some(page.height),
                margins: Some(page.margins),
                footer_height: Some(page.footer_height),
            }),
            max_column_width: Some(self.max_column_width()),
        }
    }
}

/// Parses `#RRGGBB` into a color.
pub(crate) fn parse_hex_color(value: &str) -> Result<Color, ThemeError> {
    let invalid = |reason| ThemeError::InvalidColor {
        value: value.to_owned(),
        reason,
    };

    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| invalid("expected `#` followed by a hexadecimal RGB value"))?;
    if hex.len() != 6 {
        return Err(invalid("expected 6 hexadecimal digits"));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("use hexadecimal digits only"));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid("use hexadecimal digits only"))
    };
    Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub(crate) fn format_hex_color(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        Color::Greyscale(v) => format!("#{v:02X}{v:02X}{v:02X}"),
        Color::Cmyk(c, m, y, k) => {
            let channel = |x: u8| {
                let value = 255.0 * (1.0 - f64::from(x) / 255.0) * (1.0 - f64::from(k) / 255.0);
                value.round().clamp(0.0, 255.0) as u8
            };
            format!("#{:02X}{:02X}{:02X}", channel(c), channel(m), channel(y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#38BDF8"), Ok(Color::Rgb(0x38, 0xBD, 0xF8)));
        assert!(matches!(
            parse_hex_color("38BDF8"),
            Err(ThemeError::InvalidColor { .. })
        ));
        assert!(matches!(
            parse_hex_color("#12FG34"),
            Err(ThemeError::InvalidColor { .. })
        ));
        assert!(matches!(
            parse_hex_color("#123"),
            Err(ThemeError::InvalidColor { .. })
        ));
    }

    #[test]
    fn builds_theme_from_json() {
        let config = ThemeConfig::from_json_str(
            r##"{
                "styles": {
                    "body": { "size": 10, "leading": 15, "color": "#CBD5E1", "alignment": "justified" },
                    "code": { "font": "mono", "size": 8.5, "color": "#E2E8F0", "background": "#1E293B" }
                },
                "palette": { "accent": "#38BDF8" },
                "maxColumnWidth": 20.0
            }"##,
        )
        .expect("valid json");
        let theme = config.into_theme().expect("valid theme");

        let body = theme.resolve("body").expect("body style");
        assert_eq!(body.leading(), 15.0);
        assert_eq!(body.alignment(), HorizontalAlignment::Justified);
        let code = theme.resolve("code").expect("code style");
        assert_eq!(code.font(), FontKind::Mono);
        assert_eq!(code.background(), Some(Color::Rgb(0x1E, 0x29, 0x3B)));
        assert_eq!(theme.color("accent"), Ok(Color::Rgb(0x38, 0xBD, 0xF8)));
        assert_eq!(theme.max_column_width(), 20.0);
        assert_eq!(theme.page(), &PageGeometry::letter());
    }

    #[test]
    fn invalid_palette_color_is_reported() {
        let config = ThemeConfig::from_json_str(r#"{ "palette": { "accent": "blue" } }"#)
            .expect("valid json");
        assert!(matches!(
            config.into_theme(),
            Err(ThemeError::InvalidColor { .. })
        ));
    }

    #[test]
    fn exported_config_keeps_styles_and_palette() {
        let theme = Theme::dark();
        let json = theme.to_config().to_json_string().expect("serializable");
        let rebuilt = ThemeConfig::from_json_str(&json)
            .expect("parsable")
            .into_theme()
            .expect("valid");

        let names = |theme: &Theme| theme.styles().map(|(name, _)| name.to_owned()).collect::<Vec<_>>();
        assert_eq!(names(&rebuilt), names(&theme));
        assert_eq!(
            rebuilt.palette().collect::<Vec<_>>(),
            theme.palette().collect::<Vec<_>>()
        );
        assert_eq!(
            rebuilt.resolve("code").expect("code").font(),
            FontKind::Mono
        );
    }
}
