//! Assembly manifest
//!
//! Describes one recording: its total duration, the aligned fragments that
//! make it up and optional style annotations. Fragment paths are relative to
//! the directory holding the manifest.
//!
//! ```toml
//! output = "interview.TextGrid"
//! duration = 12.5
//!
//! [[fragment]]
//! owner = "Speaker1"
//! start = 0.0
//! end = 2.5
//! path = "chunks/001.TextGrid"
//!
//! [[style]]
//! start = 0.0
//! end = 5.0
//! text = "rp"
//! ```

use crate::error::{AssembleError, AssembleResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Output TextGrid; the command line may override it
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Total recording duration in seconds
    pub duration: f64,
    #[serde(default, rename = "fragment")]
    pub fragments: Vec<FragmentEntry>,
    #[serde(default, rename = "style")]
    pub styles: Vec<StyleEntry>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One aligned chunk of the recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentEntry {
    pub owner: String,
    /// Offset of the fragment in the recording
    pub start: f64,
    /// End of the chunk; defaults to the recording duration
    #[serde(default)]
    pub end: Option<f64>,
    pub path: PathBuf,
}

/// Speaking style annotation over a stretch of the recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Manifest {
    /// Parse manifest TOML; relative paths resolve against `base_dir`
    pub fn from_toml_str(content: &str, base_dir: impl Into<PathBuf>) -> AssembleResult<Self> {
        let mut manifest: Manifest = toml::from_str(content)?;
        manifest.base_dir = base_dir.into();
        manifest.validate()?;
        Ok(manifest)
    }

    pub async fn load(path: &Path) -> AssembleResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml_str(&content, base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a manifest-relative path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Output path: `cli_output` if given, else the manifest's own `output`
    pub fn output_path(&self, cli_output: Option<&Path>) -> AssembleResult<PathBuf> {
        match (cli_output, &self.output) {
            (Some(path), _) => Ok(path.to_path_buf()),
            (None, Some(path)) => Ok(self.resolve(path)),
            (None, None) => Err(AssembleError::Manifest(
                "no output path given in manifest or on the command line".to_string(),
            )),
        }
    }

    fn validate(&self) -> AssembleResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(AssembleError::Manifest(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        for (n, fragment) in self.fragments.iter().enumerate() {
            if !(fragment.start >= 0.0 && fragment.start <= self.duration) {
                return Err(AssembleError::Manifest(format!(
                    "fragment {} starts at {} outside [0, {}]",
                    n + 1,
                    fragment.start,
                    self.duration
                )));
            }
            if fragment.end.is_some_and(|end| !(end >= fragment.start)) {
                return Err(AssembleError::Manifest(format!(
                    "fragment {} ends before it starts",
                    n + 1
                )));
            }
        }
        for (n, style) in self.styles.iter().enumerate() {
            if !(style.start >= 0.0 && style.end > style.start) {
                return Err(AssembleError::Manifest(format!(
                    "style entry {} has an empty or negative span [{}, {}]",
                    n + 1,
                    style.start,
                    style.end
                )));
            }
        }
        Ok(())
    }
}

impl FragmentEntry {
    /// Owner as used in tier names; `/` would break Praat tier lookup
    pub fn owner_label(&self) -> String {
        self.owner.replace('/', " ")
    }

    /// Chunk span with its end clamped to the recording duration
    pub fn span(&self, duration: f64) -> (f64, f64) {
        let end = self.end.unwrap_or(duration).min(duration);
        (self.start, end)
    }
}
