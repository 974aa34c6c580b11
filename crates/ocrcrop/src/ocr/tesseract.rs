//! Tesseract engine driven through its command-line executable.
//!
//! The decoded image is re-encoded as PNG and fed on stdin
//! (`tesseract stdin stdout -l <lang> tsv`); word geometry is read back from
//! the TSV report. Languages come from `tesseract --list-langs`.

use crate::codec::{self, ContainerFormat, DecodedImage};
use crate::core::config::OcrConfig;
use crate::error::{OcrCropError, Result, UnavailableReason};
use crate::ocr::recognizer::Recognizer;
use crate::ocr::tsv::parse_tsv;
use crate::types::RecognitionResult;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

/// Language data that is not a recognition language.
const NON_RECOGNITION_LANGUAGES: &[&str] = &["osd"];

pub struct TesseractCli {
    executable: PathBuf,
    timeout_secs: u64,
    max_image_dimension: u32,
}

impl TesseractCli {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            executable: config.tesseract_path.clone(),
            timeout_secs: config.timeout_secs,
            max_image_dimension: config.max_image_dimension,
        }
    }

    async fn run(&self, args: &[&str], stdin: Option<Vec<u8>>) -> Result<Output> {
        let mut child = Command::new(&self.executable)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                OcrCropError::from(UnavailableReason::EngineMissing(format!(
                    "Failed to execute {}: {}",
                    self.executable.display(),
                    e
                )))
            })?;

        let writer = match (stdin, child.stdin.take()) {
            (Some(bytes), Some(mut pipe)) => Some(tokio::spawn(async move {
                pipe.write_all(&bytes).await?;
                pipe.shutdown().await
            })),
            _ => None,
        };

        let output = match timeout(Duration::from_secs(self.timeout_secs), child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(std::io::Error::other(format!("Failed to wait for tesseract: {}", e)).into()),
            Err(_) => {
                // Child was consumed by wait_with_output(); kill_on_drop reaps it
                return Err(UnavailableReason::TimedOut {
                    seconds: self.timeout_secs,
                }
                .into());
            }
        };

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if output.status.success() => return Err(e.into()),
                Ok(Err(e)) => tracing::debug!("tesseract closed stdin early: {}", e),
                Err(e) => return Err(OcrCropError::ocr(format!("stdin writer task failed: {}", e))),
            }
        }

        Ok(output)
    }
}

/// Parse `--list-langs` output. Tesseract 3 prints the list on stderr, later
/// versions on stdout.
fn parse_language_list(stdout: &str, stderr: &str) -> Vec<String> {
    let listing = if stdout.trim().is_empty() { stderr } else { stdout };

    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .filter(|line| !NON_RECOGNITION_LANGUAGES.contains(line))
        .map(String::from)
        .collect()
}

#[async_trait]
impl Recognizer for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn max_image_dimension(&self) -> u32 {
        self.max_image_dimension
    }

    async fn available_languages(&self) -> Result<Vec<String>> {
        let output = self.run(&["--list-langs"], None).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UnavailableReason::EngineMissing(format!("tesseract --list-langs failed: {}", stderr.trim())).into());
        }

        let languages = parse_language_list(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        );
        tracing::debug!("tesseract reports {} languages", languages.len());
        Ok(languages)
    }

    async fn recognize(&self, image: &DecodedImage, language: &str) -> Result<RecognitionResult> {
        let png = codec::encode(&image.image, ContainerFormat::Png)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            language,
            "Running tesseract"
        );

        let output = self
            .run(&["stdin", "stdout", "-l", language, "tsv"], Some(png))
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrCropError::ocr(format!("Tesseract OCR failed: {}", stderr.trim())));
        }

        let tsv = String::from_utf8(output.stdout)
            .map_err(|e| OcrCropError::ocr_with_source("Tesseract produced non-UTF-8 output", e))?;

        Ok(parse_tsv(&tsv).with_language(language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_list_stdout() {
        let stdout = "List of available languages in \"/usr/share/tesseract-ocr/5/tessdata/\" (3):\neng\nosd\ndeu\n";
        assert_eq!(parse_language_list(stdout, ""), vec!["eng", "deu"]);
    }

    #[test]
    fn test_parse_language_list_stderr_fallback() {
        let stderr = "List of available languages (2):\nfra\nspa\n";
        assert_eq!(parse_language_list("", stderr), vec!["fra", "spa"]);
    }

    #[test]
    fn test_new_uses_config() {
        let config = OcrConfig {
            max_image_dimension: 5000,
            ..Default::default()
        };
        let engine = TesseractCli::new(&config);
        assert_eq!(engine.max_image_dimension(), 5000);
        assert_eq!(engine.name(), "tesseract");
    }

    #[tokio::test]
    async fn test_missing_executable_is_unavailable() {
        let config = OcrConfig {
            tesseract_path: PathBuf::from("/nonexistent/bin/tesseract-ocrcrop-test"),
            ..Default::default()
        };
        let engine = TesseractCli::new(&config);

        let err = engine.available_languages().await.unwrap_err();
        assert!(matches!(
            err,
            OcrCropError::RecognitionUnavailable {
                reason: UnavailableReason::EngineMissing(_)
            }
        ));
    }
}
