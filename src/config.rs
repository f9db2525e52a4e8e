use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::export::ExportFormat;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default catalog location; the `--catalog` flag overrides it.
    pub catalog_path: PathBuf,
    pub motion: MotionConfig,
    pub appearance: AppearanceConfig,
    pub export: ExportConfig,
}

/// Gesture and animation tuning. These are the engine's timing constants,
/// deliberately configuration rather than magic numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Horizontal drag distance (in units) past which a release commits
    pub swipe_threshold: f32,
    /// Card tilt at a full viewport-half of horizontal travel
    pub max_rotation_deg: f32,
    /// Snap-back animation duration
    pub snap_back_ms: u64,
    /// Fly-out animation duration
    pub fly_out_ms: u64,
    /// Undo replay animation duration
    pub undo_replay_ms: u64,
    /// How many stacked cards are visible (current + next N-1)
    pub visible_window_depth: usize,
    /// Distance units per terminal cell of horizontal mouse travel
    pub units_per_cell: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset name (see `ui::theme`)
    pub theme: String,
    /// Stamp text shown while dragging toward accept
    pub accept_label: String,
    /// Stamp text shown while dragging toward reject
    pub reject_label: String,
    /// Show the item's section as a card eyebrow line
    pub show_section: bool,
    /// Optional hex override for the accent color
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where the document lands; defaults to the user's download directory
    pub output_dir: Option<PathBuf>,
    pub format: ExportFormat,
    /// File name without extension
    pub file_stem: String,
    /// Document heading (markdown format only)
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            catalog_path: config_dir.join("swipedeck").join("catalog.json"),
            motion: MotionConfig::default(),
            appearance: AppearanceConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 100.0,
            max_rotation_deg: 15.0,
            snap_back_ms: 400,
            fly_out_ms: 300,
            undo_replay_ms: 400,
            visible_window_depth: 3,
            units_per_cell: 12.0,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "slate".to_string(),
            accept_label: "KEEP".to_string(),
            reject_label: "SKIP".to_string(),
            show_section: true,
            accent_color: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: ExportFormat::Markdown,
            file_stem: "kept-items".to_string(),
            title: "Kept items".to_string(),
        }
    }
}

impl MotionConfig {
    pub fn snap_back(&self) -> Duration {
        Duration::from_millis(self.snap_back_ms)
    }

    pub fn fly_out(&self) -> Duration {
        Duration::from_millis(self.fly_out_ms)
    }

    pub fn undo_replay(&self) -> Duration {
        Duration::from_millis(self.undo_replay_ms)
    }
}

impl ExportConfig {
    /// Resolved output directory: configured dir, else downloads, else home.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve the theme from the appearance section, falling back to the
    /// default preset on an unknown name.
    pub fn resolve_theme(&self) -> Theme {
        let mut theme = Theme::from_preset(&self.appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme preset {:?}", self.appearance.theme);
            Theme::default()
        });
        if let Some(ref hex) = self.appearance.accent_color {
            match crate::ui::theme::parse_hex_color(hex) {
                Ok(color) => theme.accent = color,
                Err(e) => tracing::warn!("Bad accent_color {:?}: {}", hex, e),
            }
        }
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_constants() {
        let motion = MotionConfig::default();
        assert_eq!(motion.swipe_threshold, 100.0);
        assert_eq!(motion.max_rotation_deg, 15.0);
        assert_eq!(motion.fly_out(), Duration::from_millis(300));
        assert_eq!(motion.visible_window_depth, 3);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [motion]
            swipe_threshold = 80.0
            fly_out_ms = 150

            [appearance]
            theme = "nord"
            "#,
        )
        .unwrap();

        assert_eq!(config.motion.swipe_threshold, 80.0);
        assert_eq!(config.motion.fly_out_ms, 150);
        // Untouched fields keep their defaults.
        assert_eq!(config.motion.snap_back_ms, 400);
        assert_eq!(config.appearance.theme, "nord");
        assert_eq!(config.appearance.accept_label, "KEEP");
    }

    #[test]
    fn test_export_format_parses() {
        let config: Config = toml::from_str(
            r#"
            [export]
            format = "json"
            file_stem = "selection"
            "#,
        )
        .unwrap();
        assert_eq!(config.export.format, ExportFormat::Json);
        assert_eq!(config.export.file_stem, "selection");
    }

    #[test]
    fn test_accent_override_applies() {
        let config: Config = toml::from_str(
            r##"
            [appearance]
            accent_color = "#ff8800"
            "##,
        )
        .unwrap();
        let theme = config.resolve_theme();
        assert_eq!(theme.accent, ratatui::style::Color::Rgb(255, 136, 0));
    }
}
