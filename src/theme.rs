//! Colour theme: btop-style `theme[key]="value"` files and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Colours for pieces and UI chrome. Defaults mirror the classic
/// eight-colour terminal look.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours by spawn colour index (0..=5).
    pub pieces: [Color; 6],
    /// Settled cells, primary tone.
    pub settled: Color,
    /// Settled cells, alternate tone (visual variety only).
    pub settled_alt: Color,
    /// Playfield background / empty-cell dots.
    pub bg: Color,
    /// Box borders.
    pub border: Color,
    /// Body text (score digits, help lines).
    pub main_fg: Color,
    /// Box titles and highlights.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pieces: [
                Color::Red,
                Color::Green,
                Color::Yellow,
                Color::Blue,
                Color::Magenta,
                Color::Cyan,
            ],
            settled: Color::Gray,
            settled_alt: Color::LightBlue,
            bg: Color::DarkGray,
            border: Color::Blue,
            main_fg: Color::White,
            title: Color::Yellow,
        }
    }
}

/// Palette variant selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

impl Theme {
    /// Load a theme file, falling back to the defaults when the path is
    /// absent or unreadable. The palette variant is applied on top.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override piece colours for high-contrast or colorblind viewing.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.pieces = [
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0xFF),
                ];
            }
            Palette::Colorblind => {
                // Paul Tol's bright scheme: distinguishable without red/green.
                self.pieces = [
                    Color::Rgb(0xCC, 0x33, 0x11),
                    Color::Rgb(0x00, 0x99, 0x88),
                    Color::Rgb(0xBB, 0xBB, 0x00),
                    Color::Rgb(0x00, 0x77, 0xBB),
                    Color::Rgb(0xEE, 0x33, 0x77),
                    Color::Rgb(0xEE, 0x77, 0x33),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str, fallback: Color| {
            map.get(key)
                .and_then(|v| parse_hex(v).ok())
                .unwrap_or(fallback)
        };
        Self {
            pieces: [
                get("piece_red", defaults.pieces[0]),
                get("piece_green", defaults.pieces[1]),
                get("piece_yellow", defaults.pieces[2]),
                get("piece_blue", defaults.pieces[3]),
                get("piece_magenta", defaults.pieces[4]),
                get("piece_cyan", defaults.pieces[5]),
            ],
            settled: get("settled", defaults.settled),
            settled_alt: get("settled_alt", defaults.settled_alt),
            bg: get("bg", defaults.bg),
            border: get("border", defaults.border),
            main_fg: get("main_fg", defaults.main_fg),
            title: get("title", defaults.title),
        }
    }

    /// Piece colour for a spawn colour index.
    #[inline]
    pub fn piece_color(&self, index: u8) -> Color {
        self.pieces[(index as usize) % self.pieces.len()]
    }
}

/// Parse btop-style `theme[key]="value"` lines into a key → value map.
/// Blank lines and `#` comments are skipped, as are malformed lines.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some((key, rest)) = rest.split_once(']') else {
            continue;
        };
        let Some((_, value)) = rest.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            map.insert(key.trim().to_string(), value.to_string());
        }
    }
    map
}

/// Parse "#RRGGBB" or "#RGB" into a ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let (r, g, b) = match s.len() {
        6 => (
            u8::from_str_radix(&s[0..2], 16).map_err(|_| invalid())?,
            u8::from_str_radix(&s[2..4], 16).map_err(|_| invalid())?,
            u8::from_str_radix(&s[4..6], 16).map_err(|_| invalid())?,
        ),
        3 => (
            u8::from_str_radix(&s[0..1], 16).map_err(|_| invalid())? * 17,
            u8::from_str_radix(&s[1..2], 16).map_err(|_| invalid())? * 17,
            u8::from_str_radix(&s[2..3], 16).map_err(|_| invalid())? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_full_and_short_forms() {
        assert!(matches!(
            parse_hex("#61AFEF").unwrap(),
            Color::Rgb(0x61, 0xAF, 0xEF)
        ));
        assert!(matches!(parse_hex("#FFF").unwrap(), Color::Rgb(255, 255, 255)));
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("nope").is_err());
    }

    #[test]
    fn theme_file_lines_are_parsed_and_bad_lines_skipped() {
        let map = parse_theme_file(
            r##"
            # comment
            theme[border]="#3F444F"
            theme[main_fg]='#ABB2BF'
            garbage line
            theme[broken]=
            "##,
        );
        assert_eq!(map.get("border"), Some(&"#3F444F".to_string()));
        assert_eq!(map.get("main_fg"), Some(&"#ABB2BF".to_string()));
        assert!(!map.contains_key("broken"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn palette_overrides_piece_colours_only() {
        let base = Theme::default();
        let mut themed = Theme::default();
        themed.apply_palette(Palette::Colorblind);
        assert_ne!(themed.pieces[0], base.pieces[0]);
        assert_eq!(themed.border, base.border);
        assert_eq!(themed.main_fg, base.main_fg);
    }

    #[test]
    fn piece_color_wraps_the_index() {
        let theme = Theme::default();
        assert_eq!(theme.piece_color(0), theme.piece_color(6));
    }
}
