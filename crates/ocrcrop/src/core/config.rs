//! Configuration loading and management.
//!
//! Configuration can be created programmatically, loaded from TOML or JSON, or
//! discovered as `ocrcrop.toml` in the current directory or one of its parents.
//! Command-line flags are applied on top of whatever was loaded.

use crate::{OcrCropError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file searched for by [`OcrCropConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "ocrcrop.toml";

/// Main configuration.
///
/// # Example
///
/// ```rust
/// use ocrcrop::core::config::OcrCropConfig;
///
/// let config = OcrCropConfig::default();
/// assert_eq!(config.output.bounding_box_margin, 10.0);
/// assert!(!config.strict_crop);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrCropConfig {
    /// Where text and cropped images go
    #[serde(default)]
    pub output: OutputConfig,

    /// Recognition engine settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Treat a failed crop step as a failed invocation (non-zero exit)
    #[serde(default)]
    pub strict_crop: bool,
}

/// Output sinks. Every toggle is independent; stdout is the fallback when
/// neither a text file nor a crop file was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Text file to write the recognized text to
    #[serde(default)]
    pub text_output_path: Option<PathBuf>,

    /// Append to `text_output_path` instead of overwriting it
    #[serde(default)]
    pub append_to_text_output: bool,

    /// Print the recognized text to stdout
    #[serde(default)]
    pub print_to_stdout: bool,

    /// Image file to write the cropped region to
    #[serde(default)]
    pub crop_output_path: Option<PathBuf>,

    /// Distance the text bounding box is expanded by before cropping
    #[serde(default = "default_margin")]
    pub bounding_box_margin: f64,

    /// Emit the recognizer's collapsed single-line text
    #[serde(default)]
    pub single_line_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            text_output_path: None,
            append_to_text_output: false,
            print_to_stdout: false,
            crop_output_path: None,
            bounding_box_margin: default_margin(),
            single_line_text: false,
        }
    }
}

impl OutputConfig {
    /// Whether the text goes to stdout, including the default fallback.
    pub fn prints_to_stdout(&self) -> bool {
        self.print_to_stdout || (self.text_output_path.is_none() && self.crop_output_path.is_none())
    }
}

/// Recognition engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Requested language tag (None = `default_language`)
    #[serde(default)]
    pub language: Option<String>,

    /// Language used when none is requested
    #[serde(default = "default_eng")]
    pub default_language: String,

    /// Tesseract executable
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: PathBuf,

    /// Upper bound for a single engine call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest width or height the engine accepts
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: None,
            default_language: default_eng(),
            tesseract_path: default_tesseract_path(),
            timeout_secs: default_timeout_secs(),
            max_image_dimension: default_max_image_dimension(),
        }
    }
}

fn default_margin() -> f64 {
    10.0
}

fn default_eng() -> String {
    "eng".to_string()
}

fn default_tesseract_path() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_image_dimension() -> u32 {
    32767
}

impl OcrCropConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `OcrCropError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            OcrCropError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| OcrCropError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            OcrCropError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| OcrCropError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Discover `ocrcrop.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(OcrCropError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!("Using configuration from {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Reject values no invocation could run with.
    pub fn validate(&self) -> Result<()> {
        if !self.output.bounding_box_margin.is_finite() {
            return Err(OcrCropError::validation(format!(
                "bounding_box_margin must be a finite number, got {}",
                self.output.bounding_box_margin
            )));
        }
        if self.ocr.timeout_secs == 0 {
            return Err(OcrCropError::validation("timeout_secs must be greater than zero"));
        }
        if self.ocr.max_image_dimension == 0 {
            return Err(OcrCropError::validation("max_image_dimension must be greater than zero"));
        }
        if self.ocr.default_language.trim().is_empty() {
            return Err(OcrCropError::validation("default_language cannot be empty"));
        }
        Ok(())
    }
}
