use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{ColorTag, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Swatch colors for palette tags
    pub tag_colors: HashMap<ColorTag, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let tag_colors = HashMap::from([
            (ColorTag::Yellow, Color::Rgb(0xFE, 0xF0, 0x8A)),
            (ColorTag::Pink, Color::Rgb(0xFB, 0xCF, 0xE8)),
            (ColorTag::Blue, Color::Rgb(0xBF, 0xDB, 0xFE)),
            (ColorTag::Green, Color::Rgb(0xBB, 0xF7, 0xD0)),
            (ColorTag::Purple, Color::Rgb(0xE9, 0xD5, 0xFF)),
            (ColorTag::Orange, Color::Rgb(0xFE, 0xD7, 0xAA)),
            (ColorTag::Red, Color::Rgb(0xFE, 0xCA, 0xCA)),
            (ColorTag::Teal, Color::Rgb(0x99, 0xF6, 0xE4)),
            (ColorTag::PaleBlue, Color::Rgb(0x93, 0xC5, 0xFD)),
            (ColorTag::PaleGreen, Color::Rgb(0x86, 0xEF, 0xAC)),
        ]);

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            tag_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Theme from `[ui.colors]`. Keys are theme slots (`highlight`, ...) or
    /// palette names (`yellow`, `bg-teal-200`, ...).
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring color override");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                other => {
                    if let Some(tag) = ColorTag::parse(other) {
                        theme.tag_colors.insert(tag, color);
                    }
                }
            }
        }

        theme
    }

    /// Swatch color for a palette tag, falling back to text color
    pub fn tag_color(&self, tag: ColorTag) -> Color {
        self.tag_colors.get(&tag).copied().unwrap_or(self.text)
    }
}
