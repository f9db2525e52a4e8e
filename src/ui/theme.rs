//! Color themes.
//!
//! A small set of built-in presets plus hex parsing for config overrides.
//! Accept/reject colors drive the drag feedback stamp and the results screen.

use ratatui::style::Color;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Card face background
    pub card_bg: Color,
    /// Card border at rest
    pub card_border: Color,
    /// Accent color (titles, gauge, highlights)
    pub accent: Color,
    /// Secondary text (sections, ids, hints)
    pub dimmed: Color,
    /// Accept-side feedback and kept-item markers
    pub accept: Color,
    /// Reject-side feedback and error messages
    pub reject: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    /// Default preset, cool dark slate with a cyan accent.
    pub fn slate() -> Self {
        Self {
            background: Color::Rgb(15, 23, 42),    // #0f172a
            foreground: Color::Rgb(226, 232, 240), // #e2e8f0
            card_bg: Color::Rgb(30, 41, 59),       // #1e293b
            card_border: Color::Rgb(71, 85, 105),  // #475569
            accent: Color::Rgb(34, 211, 238),      // #22d3ee
            dimmed: Color::Rgb(148, 163, 184),     // #94a3b8
            accept: Color::Rgb(74, 222, 128),      // #4ade80
            reject: Color::Rgb(248, 113, 113),     // #f87171
        }
    }

    /// Nord preset
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),    // #2e3440
            foreground: Color::Rgb(236, 239, 244), // #eceff4
            card_bg: Color::Rgb(59, 66, 82),       // #3b4252
            card_border: Color::Rgb(76, 86, 106),  // #4c566a
            accent: Color::Rgb(136, 192, 208),     // #88c0d0
            dimmed: Color::Rgb(216, 222, 233),     // #d8dee9
            accept: Color::Rgb(163, 190, 140),     // #a3be8c
            reject: Color::Rgb(191, 97, 106),      // #bf616a
        }
    }

    /// Gruvbox dark preset
    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),    // #282828
            foreground: Color::Rgb(235, 219, 178), // #ebdbb2
            card_bg: Color::Rgb(60, 56, 54),       // #3c3836
            card_border: Color::Rgb(102, 92, 84),  // #665c54
            accent: Color::Rgb(215, 153, 33),      // #d79921
            dimmed: Color::Rgb(168, 153, 132),     // #a89984
            accept: Color::Rgb(152, 151, 26),      // #98971a
            reject: Color::Rgb(204, 36, 29),       // #cc241d
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "slate" | "default" => Some(Self::slate()),
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" | "gruvbox_dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }
}

/// Parse hex color string to Color
/// Supports: #rrggbb, #rgb, rrggbb, rgb
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');

    match s.len() {
        // #rgb -> #rrggbb
        3 => {
            let r = u8::from_str_radix(&s[0..1], 16).map_err(|_| ColorError::InvalidHex)?;
            let g = u8::from_str_radix(&s[1..2], 16).map_err(|_| ColorError::InvalidHex)?;
            let b = u8::from_str_radix(&s[2..3], 16).map_err(|_| ColorError::InvalidHex)?;
            Ok(Color::Rgb(r * 17, g * 17, b * 17))
        }
        // #rrggbb
        6 => {
            let r = u8::from_str_radix(&s[0..2], 16).map_err(|_| ColorError::InvalidHex)?;
            let g = u8::from_str_radix(&s[2..4], 16).map_err(|_| ColorError::InvalidHex)?;
            let b = u8::from_str_radix(&s[4..6], 16).map_err(|_| ColorError::InvalidHex)?;
            Ok(Color::Rgb(r, g, b))
        }
        _ => Err(ColorError::InvalidLength),
    }
}

/// Color parsing error
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    InvalidLength,
    InvalidHex,
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorError::InvalidLength => {
                write!(f, "invalid color length (expected 3 or 6 hex chars)")
            }
            ColorError::InvalidHex => write!(f, "invalid hex character"),
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_hex_color("#ff0000"), Ok(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("22d3ee"), Ok(Color::Rgb(34, 211, 238)));
    }

    #[test]
    fn test_parse_hex_3() {
        assert_eq!(parse_hex_color("#f00"), Ok(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("0f0"), Ok(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(parse_hex_color("invalid").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("#ff00").is_err());
    }

    #[test]
    fn test_presets() {
        assert!(Theme::from_preset("slate").is_some());
        assert!(Theme::from_preset("default").is_some());
        assert!(Theme::from_preset("nord").is_some());
        assert!(Theme::from_preset("gruvbox").is_some());
        assert!(Theme::from_preset("nonexistent").is_none());
    }
}
