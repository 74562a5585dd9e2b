// Configuration loading and parsing (spinwheel.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// File name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE_NAME: &str = "spinwheel.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Which of the two draw algorithms runs when a draw is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// One animation and one winner per round, with a pause between rounds.
    #[default]
    Sequential,
    /// One animation over the full pool, then every winner at once.
    Batch,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub draw: DrawConfig,
    pub ingest: IngestConfig,
    pub audio: AudioConfig,
    pub effects: EffectsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub mode: DrawMode,
    /// Length of one spin animation.
    pub animation_ms: u64,
    /// Interval between display samples during a spin.
    pub tick_ms: u64,
    /// Pause between rounds of a sequential draw with more than one winner.
    pub round_pause_ms: u64,
    /// Winner count the stepper starts at.
    pub default_winner_count: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            mode: DrawMode::Sequential,
            animation_ms: 3000,
            tick_ms: 50,
            round_pause_ms: 1000,
            default_winner_count: 1,
        }
    }
}

impl DrawConfig {
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }
}

/// Column selection rules for tabular imports.
///
/// Each keyword list is tried in order against the lowercased header names;
/// see [`crate::ingest`] for the full fallback chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub id_keywords: Vec<String>,
    pub name_keywords: Vec<String>,
    pub org_keywords: Vec<String>,
    pub separator: String,
    pub id_placeholder: String,
    pub name_placeholder: String,
    pub org_placeholder: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            id_keywords: vec!["inv".into(), "id".into()],
            name_keywords: vec!["pelanggan".into(), "nama".into(), "name".into()],
            org_keywords: vec!["instansi".into(), "kampus".into(), "univ".into()],
            separator: "-".into(),
            id_placeholder: "NoID".into(),
            name_placeholder: "NoName".into(),
            org_placeholder: "-".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Start the session muted.
    pub muted: bool,
    /// Chance that a display tick plays its cue (1.0 = every tick).
    pub tick_probability: f64,
    /// Sound files used by the `audio` feature of the terminal front end.
    pub tick_sound: Option<PathBuf>,
    pub win_sound: Option<PathBuf>,
    pub pop_sound: Option<PathBuf>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            muted: false,
            tick_probability: 1.0,
            tick_sound: None,
            win_sound: None,
            pop_sound: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub confetti_particles: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        EffectsConfig {
            confetti_particles: 150,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/spinwheel.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    load_config_file(&path)
}

/// Load and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }

        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load the configuration for the current session.
///
/// Lookup order:
/// 1. `config/spinwheel.toml` under the working directory (seeded from
///    `defaults/` when present),
/// 2. `spinwheel.toml` in the platform config directory,
/// 3. built-in defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;

    let local = cwd.join("config").join(CONFIG_FILE_NAME);
    if local.exists() {
        info!("Loading config from {}", local.display());
        return load_config_file(&local);
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "spinwheel") {
        let user = dirs.config_dir().join(CONFIG_FILE_NAME);
        if user.exists() {
            info!("Loading config from {}", user.display());
            return load_config_file(&user);
        }
    }

    info!("No config file found, using built-in defaults");
    Ok(Config::default())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let draw = &config.draw;
    let durations: &[(&str, u64)] = &[
        ("draw.animation_ms", draw.animation_ms),
        ("draw.tick_ms", draw.tick_ms),
    ];
    for (name, val) in durations {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if draw.tick_ms > draw.animation_ms {
        return Err(ConfigError::ValidationError {
            field: "draw.tick_ms".into(),
            message: format!(
                "must not exceed draw.animation_ms ({}), got {}",
                draw.animation_ms, draw.tick_ms
            ),
        });
    }

    if draw.default_winner_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.default_winner_count".into(),
            message: "must be >= 1".into(),
        });
    }

    if config.ingest.separator.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "ingest.separator".into(),
            message: "must not be empty".into(),
        });
    }

    let p = config.audio.tick_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::ValidationError {
            field: "audio.tick_probability".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {p}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spinwheel_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_config(base: &Path, text: &str) {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE_NAME), text).unwrap();
    }

    #[test]
    fn defaults_match_original_timings() {
        let config = Config::default();
        assert_eq!(config.draw.mode, DrawMode::Sequential);
        assert_eq!(config.draw.animation(), Duration::from_millis(3000));
        assert_eq!(config.draw.tick(), Duration::from_millis(50));
        assert_eq!(config.draw.round_pause(), Duration::from_millis(1000));
        assert_eq!(config.draw.default_winner_count, 1);
        assert_eq!(config.ingest.separator, "-");
        assert_eq!(config.effects.confetti_particles, 150);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = scratch_dir("partial");
        write_config(
            &dir,
            r#"
[draw]
mode = "batch"
animation_ms = 1200

[audio]
muted = true
"#,
        );
        let config = load_config_from(&dir).expect("should load");
        assert_eq!(config.draw.mode, DrawMode::Batch);
        assert_eq!(config.draw.animation_ms, 1200);
        assert_eq!(config.draw.tick_ms, 50);
        assert!(config.audio.muted);
        assert_eq!(config.ingest.id_keywords, vec!["inv", "id"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = scratch_dir("missing");
        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = scratch_dir("malformed");
        write_config(&dir, "[draw\nmode = ");
        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_mode_is_parse_error() {
        let dir = scratch_dir("bad_mode");
        write_config(&dir, "[draw]\nmode = \"roulette\"\n");
        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn zero_animation_rejected() {
        let mut config = Config::default();
        config.draw.animation_ms = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("draw.animation_ms"));
    }

    #[test]
    fn tick_longer_than_animation_rejected() {
        let mut config = Config::default();
        config.draw.tick_ms = 5000;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("draw.tick_ms"));
    }

    #[test]
    fn zero_default_count_rejected() {
        let mut config = Config::default();
        config.draw.default_winner_count = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn empty_separator_rejected() {
        let mut config = Config::default();
        config.ingest.separator.clear();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("ingest.separator"));
    }

    #[test]
    fn tick_probability_out_of_range_rejected() {
        let mut config = Config::default();
        config.audio.tick_probability = 1.5;
        assert!(validate(&config).is_err());
        config.audio.tick_probability = -0.1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn ensure_config_files_copies_missing_only() {
        let dir = scratch_dir("ensure");
        let defaults = dir.join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join(CONFIG_FILE_NAME), "[draw]\ntick_ms = 40\n").unwrap();

        let copied = ensure_config_files(&dir).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(dir.join("config").join(CONFIG_FILE_NAME).exists());

        // Second call leaves the existing file alone.
        let copied = ensure_config_files(&dir).unwrap();
        assert!(copied.is_empty());

        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.draw.tick_ms, 40);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn ensure_config_files_without_defaults_is_noop() {
        let dir = scratch_dir("no_defaults");
        assert!(ensure_config_files(&dir).unwrap().is_empty());
        assert!(!dir.join("config").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shipped_defaults_file_is_valid() {
        let text = include_str!("../../../defaults/spinwheel.toml");
        let config: Config = toml::from_str(text).expect("defaults should parse");
        assert!(validate(&config).is_ok());
        assert_eq!(config.draw.animation_ms, 3000);
    }
}
