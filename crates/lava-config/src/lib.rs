//! Configuration file handling for lava.
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/lava` on Linux). A missing file means defaults; the
//! `LAVA_CONFIG` environment variable points at a different file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use lava_core::{Easing, Palette, Timing};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "LAVA_CONFIG";

const CONFIG_FILE: &str = "config.toml";

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 240;

/// Errors raised while reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the user's home directory")]
    NoHomeDir,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Animation tunables as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seconds a move from old to new positions takes.
    pub transition_secs: f64,
    /// Seconds between new target positions.
    pub tick_secs: f64,
    /// Blur standard deviation in pixels (one cell is 1×2 pixels).
    pub blur_radius: f32,
    pub easing: Easing,
    /// Frames drawn per second.
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            transition_secs: timing.transition_ms as f64 / 1000.0,
            tick_secs: timing.tick_ms as f64 / 1000.0,
            blur_radius: timing.blur_radius,
            easing: timing.easing,
            fps: 30,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Show the key help line at the bottom.
    pub show_help: bool,
    /// Pause the animation while the terminal is unfocused.
    pub pause_on_focus_loss: bool,
    pub animation: AnimationConfig,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_help: true,
            pause_on_focus_loss: true,
            animation: AnimationConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Values are checked by [`Config::validate`].
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let a = &self.animation;
        if !(a.transition_secs.is_finite() && a.transition_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.transition_secs must be positive, got {}",
                a.transition_secs
            )));
        }
        if !(a.tick_secs.is_finite() && a.tick_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.tick_secs must be positive, got {}",
                a.tick_secs
            )));
        }
        if !(a.blur_radius.is_finite() && a.blur_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.blur_radius must not be negative, got {}",
                a.blur_radius
            )));
        }
        if !(1..=MAX_FPS).contains(&a.fps) {
            return Err(ConfigError::Invalid(format!(
                "animation.fps must be between 1 and {MAX_FPS}, got {}",
                a.fps
            )));
        }
        Ok(())
    }

    /// Animation timing in the units the renderer works with.
    pub fn timing(&self) -> Timing {
        let a = &self.animation;
        Timing {
            transition_ms: secs_to_ms(a.transition_secs),
            tick_ms: secs_to_ms(a.tick_secs).max(1),
            blur_radius: a.blur_radius,
            easing: a.easing,
        }
    }

    /// Time budget of one frame.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.animation.fps.clamp(1, MAX_FPS)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_toml_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_err)
    }

    /// Write to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "lava").ok_or(ConfigError::NoHomeDir)
}

/// Path of the config file: `$LAVA_CONFIG` or the platform default.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}

/// Directory for runtime files such as the log.
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lava_core::Rgb;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        let timing = config.timing();
        assert_eq!(timing.transition_ms, 4000);
        assert_eq!(timing.tick_ms, 3000);
        assert_eq!(timing.blur_radius, 12.0);
        assert_eq!(timing.easing, Easing::EaseInOut);
        assert_eq!(config.frame_interval(), Duration::from_secs(1) / 30);
        assert_eq!(config.palette.colors.len(), 4);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r##"
show_help = false

[animation]
tick_secs = 1.5
easing = "linear"

[palette]
colors = ["#00FF00"]
"##,
        )
        .unwrap();

        assert!(!config.show_help);
        assert!(config.pause_on_focus_loss);
        assert_eq!(config.animation.tick_secs, 1.5);
        assert_eq!(config.animation.transition_secs, 4.0);
        assert_eq!(config.animation.easing, Easing::Linear);
        assert_eq!(config.palette.colors, vec![Rgb::new(0, 255, 0)]);
        assert_eq!(config.palette.background, Rgb::BLACK);
        assert_eq!(config.timing().tick_ms, 1500);
    }

    #[test]
    fn test_bad_values_rejected() {
        let cases = [
            "[animation]\ntransition_secs = 0.0",
            "[animation]\ntick_secs = -1.0",
            "[animation]\ntick_secs = nan",
            "[animation]\nblur_radius = -2.0",
            "[animation]\nfps = 0",
            "[animation]\nfps = 1000",
        ];
        for case in cases {
            let config = Config::from_toml_str(case).unwrap();
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{case}"
            );
        }
    }

    #[test]
    fn test_bad_syntax_and_colors() {
        assert!(Config::from_toml_str("[animation\n").is_err());
        assert!(Config::from_toml_str("[palette]\ncolors = [\"red\"]").is_err());
        assert!(Config::from_toml_str("[animation]\neasing = \"bouncy\"").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.animation.blur_radius = 3.5;
        config.palette.background = Rgb::new(0x12, 0x34, 0x56);
        config.save_to(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("background = \"#123456\""));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_and_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        fs::write(&path, "show_help = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));

        fs::write(&path, "[animation]\nfps = 0").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
