//! Versioned TOML configuration for the command-line adapter.

use std::{fs, path::Path};

use facility_narrative_core::Progress;
use facility_narrative_driver::{DriverOptions, WheelScroll};
use facility_narrative_system_leak::RegenerationPolicy;
use facility_narrative_system_materials::ColorSmoothing;
use serde::Deserialize;
use thiserror::Error;

/// Configuration file format understood by this build.
pub(crate) const CONFIG_VERSION: u32 = 1;

/// Settings for one narrative session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NarrativeConfig {
    /// Format version; only [`CONFIG_VERSION`] is accepted.
    pub version: u32,
    /// Window the backend opens.
    #[serde(default)]
    pub window: WindowConfig,
    /// How input moves the story.
    #[serde(default)]
    pub scroll: ScrollConfig,
    /// Visual policies handed to the frame driver and backend.
    #[serde(default)]
    pub rendering: RenderingConfig,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            window: WindowConfig::default(),
            scroll: ScrollConfig::default(),
            rendering: RenderingConfig::default(),
        }
    }
}

/// `[window]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Facility Narrative".to_owned(),
            width: 1280,
            height: 800,
            vsync: true,
        }
    }
}

/// `[scroll]` table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ScrollConfig {
    /// Progress per wheel line.
    pub wheel_sensitivity: f32,
    /// Progress per key press.
    pub keyboard_step: f32,
    /// Progress the session opens at.
    pub start: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: WheelScroll::DEFAULT_SENSITIVITY,
            keyboard_step: WheelScroll::DEFAULT_KEYBOARD_STEP,
            start: 0.0,
        }
    }
}

impl ScrollConfig {
    /// Wheel source configured from this table.
    #[must_use]
    pub(crate) fn wheel(&self) -> WheelScroll {
        WheelScroll::new(Progress::new(self.start))
            .with_sensitivity(self.wheel_sensitivity)
            .with_keyboard_step(self.keyboard_step)
    }
}

/// Colour smoothing policy as written in the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SmoothingKind {
    #[default]
    Snap,
    Exponential,
}

/// Leak rebuild policy as written in the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RegenerationKind {
    #[default]
    Always,
    Threshold,
}

/// `[rendering]` table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderingConfig {
    pub color_smoothing: SmoothingKind,
    /// Per-frame fraction for exponential smoothing.
    pub smoothing_factor: f32,
    pub leak_regeneration: RegenerationKind,
    /// Form change that triggers a rebuild under the threshold policy.
    pub regeneration_tolerance: f32,
    pub flow_animation: bool,
    pub show_fps: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            color_smoothing: SmoothingKind::Snap,
            smoothing_factor: ColorSmoothing::DEFAULT_FACTOR,
            leak_regeneration: RegenerationKind::Always,
            regeneration_tolerance: RegenerationPolicy::DEFAULT_TOLERANCE,
            flow_animation: false,
            show_fps: false,
        }
    }
}

impl RenderingConfig {
    /// Frame driver options described by this table.
    #[must_use]
    pub(crate) fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            smoothing: match self.color_smoothing {
                SmoothingKind::Snap => ColorSmoothing::Snap,
                SmoothingKind::Exponential => ColorSmoothing::Exponential(self.smoothing_factor),
            },
            regeneration: match self.leak_regeneration {
                RegenerationKind::Always => RegenerationPolicy::Always,
                RegenerationKind::Threshold => {
                    RegenerationPolicy::Threshold(self.regeneration_tolerance)
                }
            },
            flow_animation: self.flow_animation,
        }
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("could not read configuration file {path}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("could not parse configuration")]
    Parse(#[from] toml::de::Error),
    /// The file was written for another format version.
    #[error(
        "configuration version {found} is not supported (expected {expected})",
        expected = CONFIG_VERSION
    )]
    UnsupportedVersion {
        /// Version declared by the file.
        found: u32,
    },
    /// A value is outside its accepted range.
    #[error("configuration value `{field}` {reason}")]
    InvalidValue {
        /// Dotted path of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl NarrativeConfig {
    /// Reads and validates the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height",
                reason: "must be positive",
            });
        }
        if !self.scroll.wheel_sensitivity.is_finite() || self.scroll.wheel_sensitivity <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scroll.wheel_sensitivity",
                reason: "must be a positive number",
            });
        }
        if !self.scroll.keyboard_step.is_finite() || self.scroll.keyboard_step <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scroll.keyboard_step",
                reason: "must be a positive number",
            });
        }
        if !(0.0..=1.0).contains(&self.scroll.start) {
            return Err(ConfigError::InvalidValue {
                field: "scroll.start",
                reason: "must lie in 0.0..=1.0",
            });
        }
        let factor = self.rendering.smoothing_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "rendering.smoothing_factor",
                reason: "must lie in (0.0, 1.0]",
            });
        }
        let tolerance = self.rendering.regeneration_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "rendering.regeneration_tolerance",
                reason: "must be a non-negative number",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_uses_deterministic_defaults() {
        let config = NarrativeConfig::parse("version = 1").expect("minimal config");
        assert_eq!(config, NarrativeConfig::default());
        assert_eq!(config.rendering.driver_options(), DriverOptions::default());
    }

    #[test]
    fn full_file_maps_onto_driver_options() {
        let config = NarrativeConfig::parse(
            r#"
            version = 1

            [window]
            title = "Plant tour"
            width = 1920
            height = 1080
            vsync = false

            [scroll]
            wheel_sensitivity = 0.02
            keyboard_step = 0.1
            start = 0.25

            [rendering]
            color_smoothing = "exponential"
            smoothing_factor = 0.5
            leak_regeneration = "threshold"
            flow_animation = true
            show_fps = true
            "#,
        )
        .expect("full config");

        assert_eq!(config.window.title, "Plant tour");
        assert!(!config.window.vsync);
        assert_eq!(config.scroll.wheel().position(), Progress::new(0.25));
        assert_eq!(
            config.rendering.driver_options(),
            DriverOptions {
                smoothing: ColorSmoothing::Exponential(0.5),
                regeneration: RegenerationPolicy::Threshold(
                    RegenerationPolicy::DEFAULT_TOLERANCE
                ),
                flow_animation: true,
            }
        );
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let error = NarrativeConfig::parse("version = 2").expect_err("version 2");
        assert!(matches!(error, ConfigError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn missing_version_is_a_parse_error() {
        let error = NarrativeConfig::parse("[window]\nwidth = 10").expect_err("no version");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = NarrativeConfig::parse("version = 1\n[scroll]\nspeed = 3.0")
            .expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let error = NarrativeConfig::parse("version = 1\n[scroll]\nstart = 1.5")
            .expect_err("start out of range");
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                field: "scroll.start",
                ..
            }
        ));

        let error = NarrativeConfig::parse("version = 1\n[window]\nwidth = 0")
            .expect_err("zero width");
        assert!(matches!(error, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn bundled_sample_matches_the_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("narrative.toml");
        let config = NarrativeConfig::load(&path).expect("sample config loads");
        assert_eq!(config, NarrativeConfig::default());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = NarrativeConfig::load(Path::new("/nonexistent/narrative.toml"))
            .expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/narrative.toml"));
    }
}
