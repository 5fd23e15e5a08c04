//! Configuration loading and resolution
//!
//! Parse, format and reconcile behaviour is controlled by immutable config
//! values handed to the codec, the reconciler and the assembler. They are
//! grouped in [`Settings`], which is read from a TOML file.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `FAVE_CONFIG` environment variable
//! 3. `<config dir>/fave/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing file is not an error: the compiled defaults are used and a
//! warning is logged. A file that exists but does not parse is an error.

use crate::time::{DEFAULT_DECIMALS, OUTPUT_FRACTION_DIGITS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "FAVE_CONFIG";

/// How labels that cannot be quoted on one line are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Fail serialization with `FormatError::UnencodableLabel`
    #[default]
    Reject,
    /// Replace line breaks with single spaces
    Replace,
}

/// TextGrid reader/writer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Decimal places every time value is rounded to
    pub decimals: u32,
    pub label_policy: LabelPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            label_policy: LabelPolicy::default(),
        }
    }
}

/// Gap filling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Label of synthetic intervals closing gaps
    pub filler_label: String,
    /// Insert margin fillers even where they would have zero duration
    pub zero_length_fillers: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            filler_label: "sp".to_string(),
            zero_length_fillers: true,
        }
    }
}

/// Fragment merging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Placed between owner label and original tier name
    pub tier_separator: String,
    /// Fragments shorter than this (seconds) are skipped
    pub min_fragment_duration: f64,
    /// Name of the tier built from style annotations
    pub style_tier_name: String,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            tier_separator: " - ".to_string(),
            min_fragment_duration: 0.05,
            style_tier_name: "style".to_string(),
        }
    }
}

/// All settings, as stored in the TOML config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub codec: CodecConfig,
    pub reconcile: ReconcileConfig,
    pub assembly: AssemblyConfig,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Resolve the config file by priority and load it, falling back to defaults
    pub fn resolve(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg) {
            Some(path) if path.exists() => {
                info!("Loading settings from {}", path.display());
                Self::load(&path)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using compiled defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        // Written values carry a fixed number of fraction digits
        if self.codec.decimals as usize > OUTPUT_FRACTION_DIGITS {
            return Err(Error::Config(format!(
                "codec.decimals must be at most {}, got {}",
                OUTPUT_FRACTION_DIGITS, self.codec.decimals
            )));
        }
        if self.reconcile.filler_label.contains(['\n', '\r']) {
            return Err(Error::Config(
                "reconcile.filler_label must be a single line".to_string(),
            ));
        }
        if !(self.assembly.min_fragment_duration >= 0.0) {
            return Err(Error::Config(format!(
                "assembly.min_fragment_duration must be non-negative, got {}",
                self.assembly.min_fragment_duration
            )));
        }
        Ok(())
    }
}

/// Pick the config file path by priority
///
/// Returns `None` when no candidate location can be determined.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config directory
    default_config_path()
}

/// Platform config file location (`~/.config/fave/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fave").join("config.toml"))
}
