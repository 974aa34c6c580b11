//! Main entry points.
//!
//! - [`process_file`] - Recognize an image file and emit text and crop outputs
//! - [`process_bytes`] - Same, for image bytes already in memory

use crate::codec::{self, DecodedImage};
use crate::core::config::OcrCropConfig;
use crate::core::io;
use crate::core::pipeline::{self, PipelineReport};
use crate::ocr::{Recognizer, prepare_language};
use crate::types::RecognitionResult;
use crate::{OcrCropError, Result};
use std::io::Write;
use std::path::Path;

/// Decode on the blocking pool; large TIFFs and JPEGs take a while.
async fn decode_blocking(bytes: Vec<u8>) -> Result<DecodedImage> {
    tokio::task::spawn_blocking(move || codec::decode(&bytes))
        .await
        .map_err(|e| OcrCropError::decode(format!("Decode task failed: {}", e)))?
}

/// Resolve the language and run the engine on an already decoded image.
pub async fn recognize_image(
    image: &DecodedImage,
    recognizer: &dyn Recognizer,
    config: &OcrCropConfig,
) -> Result<RecognitionResult> {
    let language = prepare_language(
        recognizer,
        image,
        config.ocr.language.as_deref(),
        &config.ocr.default_language,
    )
    .await?;

    let result = recognizer.recognize(image, &language).await?;
    tracing::debug!(
        engine = recognizer.name(),
        lines = result.lines.len(),
        words = result.word_count(),
        "Recognition finished"
    );
    Ok(result)
}

/// Recognize text in the image at `path` and write the configured outputs.
///
/// Text printed to stdout goes to `stdout`, so callers and tests can capture it.
///
/// # Errors
///
/// - `OcrCropError::InputNotFound` if `path` is not an existing file
/// - `OcrCropError::Decode` if the file is not a supported image
/// - `OcrCropError::RecognitionUnavailable` for language or size problems
/// - `OcrCropError::Io` if a text sink cannot be written
///
/// Crop failures are not errors; see [`PipelineReport::crop`].
///
/// # Example
///
/// ```rust,no_run
/// use ocrcrop::core::config::OcrCropConfig;
/// use ocrcrop::core::extractor::process_file;
/// use ocrcrop::ocr::TesseractCli;
///
/// # async fn example() -> ocrcrop::Result<()> {
/// let config = OcrCropConfig::default();
/// let engine = TesseractCli::new(&config.ocr);
/// let report = process_file("scan.png", &engine, &config, &mut std::io::stdout()).await?;
/// assert!(report.is_success(config.strict_crop));
/// # Ok(())
/// # }
/// ```
pub async fn process_file<W: Write>(
    path: impl AsRef<Path>,
    recognizer: &dyn Recognizer,
    config: &OcrCropConfig,
    stdout: &mut W,
) -> Result<PipelineReport> {
    let path = io::resolve_path(path)?;
    io::validate_file_exists(&path)?;
    tracing::debug!("Processing {}", path.display());

    let bytes = io::read_file_async(&path).await?;
    process_bytes(bytes, recognizer, config, stdout).await
}

/// Like [`process_file`], for an image held in memory.
pub async fn process_bytes<W: Write>(
    bytes: Vec<u8>,
    recognizer: &dyn Recognizer,
    config: &OcrCropConfig,
    stdout: &mut W,
) -> Result<PipelineReport> {
    let image = decode_blocking(bytes).await?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        format = ?image.format,
        "Decoded input image"
    );

    let result = recognize_image(&image, recognizer, config).await?;
    pipeline::output_result(&config.output, &image, &result, stdout).await
}
