//! Result pipeline: turns a recognition result and its source image into output artifacts.
//!
//! One invocation walks a fixed sequence of stages:
//!
//! ```text
//! Start -> TextExtracted -> {TextWritten | TextSkipped}
//!       -> [RegionComputed -> {Cropped | CropSkippedInvalidRegion | CropFailed}] -> Done
//! ```
//!
//! The crop stages only run when a crop path is configured. A failed crop step
//! is recorded in the [`PipelineReport`] and never undoes text output that
//! already happened; text sink failures are returned as errors.

use crate::codec::{self, ContainerFormat, DecodedImage};
use crate::core::config::OutputConfig;
use crate::core::io;
use crate::geometry::{PixelBounds, Rect};
use crate::types::RecognitionResult;
use crate::{OcrCropError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A stage reached during one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    TextExtracted,
    TextWritten,
    TextSkipped,
    RegionComputed,
    Cropped,
    CropSkippedInvalidRegion,
    CropFailed,
    Done,
}

/// What happened to the crop request.
#[derive(Debug)]
pub enum CropOutcome {
    NotRequested,
    Cropped {
        path: PathBuf,
        bounds: PixelBounds,
        format: ContainerFormat,
    },
    Failed(OcrCropError),
}

/// Everything one run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub text: String,
    /// Text file that received the text, if any
    pub text_file: Option<PathBuf>,
    pub printed_to_stdout: bool,
    /// Region of interest after margin and clipping, when a crop was requested
    pub region: Option<Rect>,
    pub crop: CropOutcome,
    pub stages: Vec<PipelineStage>,
}

impl PipelineReport {
    /// The crop step was requested and did not produce an image.
    pub fn crop_failed(&self) -> bool {
        matches!(self.crop, CropOutcome::Failed(_))
    }

    pub fn crop_error(&self) -> Option<&OcrCropError> {
        match &self.crop {
            CropOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Overall success.
    ///
    /// A failed crop step is a partial success only when a text sink received
    /// the text. With `strict_crop`, any failed crop step fails the run.
    pub fn is_success(&self, strict_crop: bool) -> bool {
        if !self.crop_failed() {
            return true;
        }
        !strict_crop && (self.text_file.is_some() || self.printed_to_stdout)
    }
}

/// Text to emit for `result`.
///
/// Single-line mode returns the recognizer's collapsed text verbatim. Otherwise
/// every line's text is followed by a `\n`, in recognizer order, untrimmed.
pub fn extract_text(result: &RecognitionResult, single_line: bool) -> String {
    if single_line {
        return result.full_text.clone();
    }

    let mut text = String::new();
    for line in &result.lines {
        text.push_str(&line.text);
        text.push('\n');
    }
    text
}

/// Region of interest: every word's rectangle unioned, inflated by `margin`,
/// then clipped to the image. [`Rect::EMPTY`] when nothing remains.
pub fn region_of_interest(result: &RecognitionResult, image: &DecodedImage, margin: f64) -> Rect {
    result.bounding_rect().inflate(margin).intersect(image.full_rect())
}

/// Write `text` to every configured text sink.
///
/// Returns whether the text reached a file and whether it reached `stdout`.
pub async fn write_text<W: Write>(config: &OutputConfig, text: &str, stdout: &mut W) -> Result<(Option<PathBuf>, bool)> {
    let mut text_file = None;
    if let Some(path) = &config.text_output_path {
        let path = io::resolve_path(path)?;
        io::write_text_async(&path, text, config.append_to_text_output).await?;
        tracing::debug!(append = config.append_to_text_output, "Wrote text to {}", path.display());
        text_file = Some(path);
    }

    let printed = config.prints_to_stdout();
    if printed {
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
    }

    Ok((text_file, printed))
}

async fn crop_to_file(image: &DecodedImage, region: Rect, path: &Path) -> Result<(PixelBounds, ContainerFormat)> {
    let bounds = region
        .to_pixel_bounds(image.width(), image.height())
        .ok_or(OcrCropError::EmptyCropRegion)?;
    let format = ContainerFormat::for_source(image.format)?;

    let cropped = codec::crop(&image.image, bounds);
    let bytes = codec::encode(&cropped, format)?;
    io::write_bytes_async(path, &bytes).await?;

    Ok((bounds, format))
}

/// Run text extraction, the text sinks and the optional crop step.
///
/// # Errors
///
/// Only text sink failures are returned. Crop-step failures land in
/// [`PipelineReport::crop`].
pub async fn output_result<W: Write>(
    config: &OutputConfig,
    image: &DecodedImage,
    result: &RecognitionResult,
    stdout: &mut W,
) -> Result<PipelineReport> {
    let mut stages = vec![PipelineStage::Start];

    let text = extract_text(result, config.single_line_text);
    stages.push(PipelineStage::TextExtracted);

    let (text_file, printed_to_stdout) = write_text(config, &text, stdout).await?;
    stages.push(if text_file.is_some() || printed_to_stdout {
        PipelineStage::TextWritten
    } else {
        PipelineStage::TextSkipped
    });

    let mut region = None;
    let crop = match &config.crop_output_path {
        None => CropOutcome::NotRequested,
        Some(path) => {
            let roi = region_of_interest(result, image, config.bounding_box_margin);
            region = Some(roi);
            stages.push(PipelineStage::RegionComputed);
            tracing::debug!(?roi, words = result.word_count(), "Computed region of interest");

            let outcome = match io::resolve_path(path) {
                Ok(path) => crop_to_file(image, roi, &path)
                    .await
                    .map(|(bounds, format)| (path, bounds, format)),
                Err(e) => Err(e),
            };

            match outcome {
                Ok((path, bounds, format)) => {
                    stages.push(PipelineStage::Cropped);
                    tracing::debug!(?bounds, ?format, "Wrote cropped image to {}", path.display());
                    CropOutcome::Cropped { path, bounds, format }
                }
                Err(err) => {
                    stages.push(if matches!(err, OcrCropError::EmptyCropRegion) {
                        PipelineStage::CropSkippedInvalidRegion
                    } else {
                        PipelineStage::CropFailed
                    });
                    tracing::warn!("Crop step skipped: {}", err);
                    CropOutcome::Failed(err)
                }
            }
        }
    };

    stages.push(PipelineStage::Done);

    Ok(PipelineReport {
        text,
        text_file,
        printed_to_stdout,
        region,
        crop,
        stages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Line, Word};
    use image::{DynamicImage, ImageFormat};
    use tempfile::tempdir;

    fn two_words() -> RecognitionResult {
        RecognitionResult::from_lines(vec![
            Line::from_words(vec![Word::new("A", Rect::new(0.0, 0.0, 10.0, 10.0))]),
            Line::from_words(vec![Word::new("B", Rect::new(20.0, 20.0, 5.0, 5.0))]),
        ])
    }

    fn image(width: u32, height: u32, format: ImageFormat) -> DecodedImage {
        DecodedImage {
            image: DynamicImage::new_rgb8(width, height),
            format,
        }
    }

    #[test]
    fn test_extract_text_multi_line() {
        assert_eq!(extract_text(&two_words(), false), "A\nB\n");
    }

    #[test]
    fn test_extract_text_single_line() {
        let mut result = two_words();
        result.full_text = "  A B  ".to_string();
        assert_eq!(extract_text(&result, true), "  A B  ");
    }

    #[test]
    fn test_extract_text_no_lines() {
        assert_eq!(extract_text(&RecognitionResult::default(), false), "");
    }

    #[test]
    fn test_region_of_interest_clips_to_image() {
        let roi = region_of_interest(&two_words(), &image(100, 100, ImageFormat::Png), 10.0);
        assert_eq!(roi, Rect::new(0.0, 0.0, 35.0, 35.0));
    }

    #[test]
    fn test_region_of_interest_interior() {
        let result = RecognitionResult::from_lines(vec![Line::from_words(vec![Word::new(
            "mid",
            Rect::new(40.0, 40.0, 20.0, 10.0),
        )])]);
        let roi = region_of_interest(&result, &image(100, 100, ImageFormat::Png), 5.0);
        assert_eq!(roi, Rect::new(35.0, 35.0, 30.0, 20.0));
    }

    #[test]
    fn test_region_of_interest_without_words() {
        let roi = region_of_interest(&RecognitionResult::default(), &image(100, 100, ImageFormat::Png), 10.0);
        assert!(roi.is_empty());
    }

    #[tokio::test]
    async fn test_default_prints_to_stdout() {
        let config = OutputConfig::default();
        let mut stdout = Vec::new();

        let report = output_result(&config, &image(100, 100, ImageFormat::Png), &two_words(), &mut stdout)
            .await
            .unwrap();

        assert!(report.printed_to_stdout);
        assert_eq!(String::from_utf8(stdout).unwrap(), "A\nB\n\n");
        assert!(matches!(report.crop, CropOutcome::NotRequested));
        assert_eq!(
            report.stages,
            vec![
                PipelineStage::Start,
                PipelineStage::TextExtracted,
                PipelineStage::TextWritten,
                PipelineStage::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_crop_only_skips_text() {
        let dir = tempdir().unwrap();
        let crop_path = dir.path().join("crop.png");
        let config = OutputConfig {
            crop_output_path: Some(crop_path.clone()),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let report = output_result(&config, &image(100, 100, ImageFormat::Png), &two_words(), &mut stdout)
            .await
            .unwrap();

        assert!(stdout.is_empty());
        assert_eq!(
            report.stages,
            vec![
                PipelineStage::Start,
                PipelineStage::TextExtracted,
                PipelineStage::TextSkipped,
                PipelineStage::RegionComputed,
                PipelineStage::Cropped,
                PipelineStage::Done
            ]
        );
        match report.crop {
            CropOutcome::Cropped { bounds, format, .. } => {
                assert_eq!(format, ContainerFormat::Png);
                assert_eq!(
                    bounds,
                    PixelBounds {
                        x: 0,
                        y: 0,
                        width: 35,
                        height: 35
                    }
                );
            }
            other => panic!("expected a crop, got {:?}", other),
        }

        let written = codec::decode(&std::fs::read(&crop_path).unwrap()).unwrap();
        assert_eq!((written.width(), written.height()), (35, 35));
    }

    #[tokio::test]
    async fn test_empty_region_keeps_text() {
        let dir = tempdir().unwrap();
        let text_path = dir.path().join("out.txt");
        let config = OutputConfig {
            text_output_path: Some(text_path.clone()),
            crop_output_path: Some(dir.path().join("crop.png")),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let report = output_result(
            &config,
            &image(100, 100, ImageFormat::Png),
            &RecognitionResult::default(),
            &mut stdout,
        )
        .await
        .unwrap();

        assert!(report.crop_failed());
        assert!(matches!(report.crop_error(), Some(OcrCropError::EmptyCropRegion)));
        assert!(report.stages.contains(&PipelineStage::CropSkippedInvalidRegion));
        assert_eq!(report.stages.last(), Some(&PipelineStage::Done));
        assert!(report.is_success(false));
        assert!(!report.is_success(true));
        assert_eq!(std::fs::read_to_string(&text_path).unwrap(), "");
        assert!(!dir.path().join("crop.png").exists());
    }

    #[tokio::test]
    async fn test_empty_region_without_text_sink_fails() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            crop_output_path: Some(dir.path().join("crop.png")),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let report = output_result(
            &config,
            &image(100, 100, ImageFormat::Png),
            &RecognitionResult::default(),
            &mut stdout,
        )
        .await
        .unwrap();

        assert!(matches!(report.crop_error(), Some(OcrCropError::EmptyCropRegion)));
        assert!(report.text_file.is_none());
        assert!(!report.printed_to_stdout);
        assert!(stdout.is_empty());
        assert!(!report.is_success(false));
        assert!(!report.is_success(true));
    }

    #[tokio::test]
    async fn test_successful_crop_without_text_sink_succeeds() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            crop_output_path: Some(dir.path().join("crop.png")),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let report = output_result(&config, &image(100, 100, ImageFormat::Png), &two_words(), &mut stdout)
            .await
            .unwrap();

        assert!(!report.crop_failed());
        assert!(report.is_success(false));
        assert!(report.is_success(true));
    }

    #[tokio::test]
    async fn test_unmapped_container_only_fails_crop() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            print_to_stdout: true,
            crop_output_path: Some(dir.path().join("crop.webp")),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let report = output_result(&config, &image(100, 100, ImageFormat::WebP), &two_words(), &mut stdout)
            .await
            .unwrap();

        assert!(matches!(
            report.crop_error(),
            Some(OcrCropError::UnmappedContainerFormat(_))
        ));
        assert!(report.stages.contains(&PipelineStage::CropFailed));
        assert_eq!(String::from_utf8(stdout).unwrap(), "A\nB\n\n");
    }

    #[tokio::test]
    async fn test_crop_write_failure_is_local() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            print_to_stdout: true,
            crop_output_path: Some(dir.path().join("missing").join("crop.png")),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let report = output_result(&config, &image(100, 100, ImageFormat::Png), &two_words(), &mut stdout)
            .await
            .unwrap();

        assert!(matches!(report.crop_error(), Some(OcrCropError::Io(_))));
        assert!(report.printed_to_stdout);
    }

    #[tokio::test]
    async fn test_text_write_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            text_output_path: Some(dir.path().join("missing").join("out.txt")),
            ..Default::default()
        };
        let mut stdout = Vec::new();

        let err = output_result(&config, &image(10, 10, ImageFormat::Png), &two_words(), &mut stdout)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrCropError::Io(_)));
    }

    #[tokio::test]
    async fn test_append_twice() {
        let dir = tempdir().unwrap();
        let text_path = dir.path().join("out.txt");
        let config = OutputConfig {
            text_output_path: Some(text_path.clone()),
            append_to_text_output: true,
            single_line_text: true,
            ..Default::default()
        };

        for text in ["A", "B"] {
            let result = RecognitionResult {
                full_text: text.to_string(),
                ..Default::default()
            };
            let mut stdout = Vec::new();
            output_result(&config, &image(10, 10, ImageFormat::Png), &result, &mut stdout)
                .await
                .unwrap();
            assert!(stdout.is_empty());
        }

        assert_eq!(std::fs::read_to_string(&text_path).unwrap(), "AB");
    }
}
