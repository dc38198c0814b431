//! Window and application configuration.
//!
//! An [`ApplicationConfig`] can be built in code with the `with_*` setters or
//! loaded from TOML:
//!
//! ```
//! use trellis::ApplicationConfig;
//!
//! let config = ApplicationConfig::from_toml_str(
//!     r#"
//!     title = "Inventory"
//!     width = 1280
//!     style = "dialog"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.size(), (1280, 540));
//! ```
//!
//! Fields left out of the file keep their defaults. [`validate`](ApplicationConfig::validate)
//! runs on every load and again when an [`Application`](crate::Application) is built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use trellis_core::logging::targets;
use trellis_render::Color;

use crate::error::ConfigError;

/// Default window width when none (or zero) is configured.
pub const DEFAULT_WIDTH: i32 = 960;
/// Default window height when none (or zero) is configured.
pub const DEFAULT_HEIGHT: i32 = 540;

/// Window decoration style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowStyle {
    #[default]
    Default,
    Dialog,
    Tool,
    Borderless,
    Transparent,
    Overlay,
}

impl WindowStyle {
    pub const ALL: [WindowStyle; 6] = [
        Self::Default,
        Self::Dialog,
        Self::Tool,
        Self::Borderless,
        Self::Transparent,
        Self::Overlay,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dialog => "dialog",
            Self::Tool => "tool",
            Self::Borderless => "borderless",
            Self::Transparent => "transparent",
            Self::Overlay => "overlay",
        }
    }
}

/// How the rendering context reclaims GPU objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GcMode {
    /// Objects are released when the owning context is collected.
    #[default]
    ContextGc,
    /// Objects are released as soon as they are dropped.
    Auto,
}

impl GcMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "context_gc" => Some(Self::ContextGc),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ContextGc => "context_gc",
            Self::Auto => "auto",
        }
    }
}

/// Settings for the window hosting an [`Application`](crate::Application).
///
/// `style`, `gc_mode`, and `background` are kept as text so a file with an
/// unknown name still parses and is then rejected by [`validate`](Self::validate)
/// with a precise error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub resizable: bool,
    pub fullscreen: bool,
    pub style: String,
    pub visible: bool,
    pub vsync: bool,
    pub antialiasing: bool,
    pub samples: u32,
    pub gc_mode: String,
    /// Clear color as `#rrggbb` or `#rrggbbaa`.
    pub background: String,
    pub track_fps: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            title: "Trellis".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            resizable: false,
            fullscreen: false,
            style: WindowStyle::Default.name().to_string(),
            visible: true,
            vsync: true,
            antialiasing: true,
            samples: 4,
            gc_mode: GcMode::ContextGc.name().to_string(),
            background: "#000000".to_string(),
            track_fps: true,
        }
    }
}

impl ApplicationConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading configuration");
        Self::from_toml_str(&contents)
    }

    /// Write the configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(err) = &result {
            tracing::warn!(target: targets::CONFIG, error = %err, "rejected configuration");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.width < 0 {
            return Err(ConfigError::NegativeSize {
                dimension: "width",
                value: self.width,
            });
        }
        if self.height < 0 {
            return Err(ConfigError::NegativeSize {
                dimension: "height",
                value: self.height,
            });
        }
        self.window_style()?;
        self.gc()?;
        self.background_color()?;
        Ok(())
    }

    /// Window size with zero dimensions replaced by the defaults.
    pub fn size(&self) -> (i32, i32) {
        let width = if self.width == 0 { DEFAULT_WIDTH } else { self.width };
        let height = if self.height == 0 { DEFAULT_HEIGHT } else { self.height };
        (width, height)
    }

    pub fn window_style(&self) -> Result<WindowStyle, ConfigError> {
        WindowStyle::from_name(&self.style).ok_or_else(|| ConfigError::InvalidStyle(self.style.clone()))
    }

    pub fn gc(&self) -> Result<GcMode, ConfigError> {
        GcMode::from_name(&self.gc_mode).ok_or_else(|| ConfigError::InvalidGcMode(self.gc_mode.clone()))
    }

    pub fn background_color(&self) -> Result<Color, ConfigError> {
        Color::from_hex(&self.background).ok_or_else(|| ConfigError::InvalidColor(self.background.clone()))
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = style.name().to_string();
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_antialiasing(mut self, antialiasing: bool, samples: u32) -> Self {
        self.antialiasing = antialiasing;
        self.samples = samples;
        self
    }

    pub fn with_gc_mode(mut self, mode: GcMode) -> Self {
        self.gc_mode = mode.name().to_string();
        self
    }

    pub fn with_background(mut self, hex: impl Into<String>) -> Self {
        self.background = hex.into();
        self
    }

    pub fn with_track_fps(mut self, track_fps: bool) -> Self {
        self.track_fps = track_fps;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.size(), (960, 540));
        assert_eq!(config.samples, 4);
        assert_eq!(config.window_style().unwrap(), WindowStyle::Default);
        assert_eq!(config.gc().unwrap(), GcMode::ContextGc);
        assert!(config.track_fps);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_size_means_default() {
        let config = ApplicationConfig::default().with_size(0, 0);
        assert_eq!(config.size(), (960, 540));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ApplicationConfig::from_toml_str(
            r#"
            title = "Settings"
            height = 720
            gc_mode = "auto"
            "#,
        )
        .unwrap();
        assert_eq!(config.title, "Settings");
        assert_eq!(config.size(), (960, 720));
        assert_eq!(config.gc().unwrap(), GcMode::Auto);
        assert!(config.vsync);
    }

    #[test]
    fn test_negative_size_rejected() {
        let err = ApplicationConfig::from_toml_str("width = -5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeSize {
                dimension: "width",
                value: -5
            }
        ));
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = ApplicationConfig::from_toml_str("style = \"floating\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStyle(name) if name == "floating"));
    }

    #[test]
    fn test_unknown_gc_mode_rejected() {
        let err = ApplicationConfig::from_toml_str("gc_mode = \"eager\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGcMode(_)));
    }

    #[test]
    fn test_bad_background_rejected() {
        let config = ApplicationConfig::default().with_background("teal");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let err = ApplicationConfig::from_toml_str("width = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_style_names_round_trip() {
        for style in WindowStyle::ALL {
            assert_eq!(WindowStyle::from_name(style.name()), Some(style));
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title = \"From disk\"\nstyle = \"tool\"\nbackground = \"#336699\"").unwrap();

        let config = ApplicationConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "From disk");
        assert_eq!(config.window_style().unwrap(), WindowStyle::Tool);
        assert_eq!(config.background_color().unwrap(), Color::from_rgb8(0x33, 0x66, 0x99));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        let config = ApplicationConfig::new("Saved")
            .with_style(WindowStyle::Overlay)
            .with_track_fps(false);
        config.save(&path).unwrap();

        assert_eq!(ApplicationConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ApplicationConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
