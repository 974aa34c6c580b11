//! Error types for ocrcrop.
//!
//! All fallible operations return [`OcrCropError`]. The variants split into two
//! groups:
//!
//! **Fatal to the invocation** (nothing useful can be produced):
//! - `InputNotFound` - the input image does not exist
//! - `Decode` - the input bytes are not a supported raster image
//! - `RecognitionUnavailable` - no engine for the language, or the image is too large
//!
//! **Local to the crop step** (text output is kept):
//! - `EmptyCropRegion` - the region of interest clipped to nothing
//! - `UnmappedContainerFormat` - no encoder matches the input container
//! - `Encode` - the encoder rejected the cropped buffer
//! - `Io` - the cropped image could not be written
//!
//! `Io` wraps `std::io::Error` unchanged; I/O errors are never re-labelled.
//!
//! # Example
//!
//! ```rust
//! use ocrcrop::{OcrCropError, Result};
//!
//! fn load(path: &str) -> Result<Vec<u8>> {
//!     let bytes = std::fs::read(path)?;
//!     if bytes.is_empty() {
//!         return Err(OcrCropError::decode(format!("Image file is empty: {}", path)));
//!     }
//!     Ok(bytes)
//! }
//! ```
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `OcrCropError`.
pub type Result<T> = std::result::Result<T, OcrCropError>;

/// Why recognition could not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// An explicit language tag was requested but no engine supports it.
    LanguageNotAvailable(String),
    /// No language was requested and the default language has no engine.
    DefaultLanguageNotAvailable(String),
    /// `max(width, height)` exceeds what the engine accepts.
    ImageTooLarge { width: u32, height: u32, max_dimension: u32 },
    /// The recognition engine itself could not be started.
    EngineMissing(String),
    /// The engine did not answer within the configured timeout.
    TimedOut { seconds: u64 },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LanguageNotAvailable(lang) => write!(f, "Selected language '{}' is not available", lang),
            Self::DefaultLanguageNotAvailable(lang) => {
                write!(f, "Default language '{}' is not available", lang)
            }
            Self::ImageTooLarge {
                width,
                height,
                max_dimension,
            } => write!(
                f,
                "Bitmap dimensions ({}x{}) are too big for OCR. Max image dimension is {}",
                width, height, max_dimension
            ),
            Self::EngineMissing(msg) => write!(f, "Recognition engine unavailable: {}", msg),
            Self::TimedOut { seconds } => write!(f, "Recognition timed out after {} seconds", seconds),
        }
    }
}

/// Coarse classification of an [`OcrCropError`], for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    InputNotFound,
    Decode,
    RecognitionUnavailable,
    EmptyCropRegion,
    Encode,
    UnmappedContainerFormat,
    Ocr,
    Validation,
}

/// Main error type for all ocrcrop operations.
#[derive(Debug, Error)]
pub enum OcrCropError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provided input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Recognition unavailable: {reason}")]
    RecognitionUnavailable { reason: UnavailableReason },

    #[error("Failed to crop the image. Bounding box is invalid")]
    EmptyCropRegion,

    #[error("Encode error: {message}")]
    Encode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("No matching encoder for container format: {0}")]
    UnmappedContainerFormat(String),

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<UnavailableReason> for OcrCropError {
    fn from(reason: UnavailableReason) -> Self {
        OcrCropError::RecognitionUnavailable { reason }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl OcrCropError {
    error_constructor!(decode, Decode);
    error_constructor!(encode, Encode);
    error_constructor!(ocr, Ocr);
    error_constructor!(validation, Validation);

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::InputNotFound(_) => ErrorKind::InputNotFound,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::RecognitionUnavailable { .. } => ErrorKind::RecognitionUnavailable,
            Self::EmptyCropRegion => ErrorKind::EmptyCropRegion,
            Self::Encode { .. } => ErrorKind::Encode,
            Self::UnmappedContainerFormat(_) => ErrorKind::UnmappedContainerFormat,
            Self::Ocr { .. } => ErrorKind::Ocr,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Whether this error aborts the whole invocation.
    ///
    /// Crop-step errors (`EmptyCropRegion`, `Encode`, `UnmappedContainerFormat`)
    /// are local to that step. `Io` is fatal when it escapes to the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::EmptyCropRegion | Self::Encode { .. } | Self::UnmappedContainerFormat(_)
        )
    }
}
