//! Core orchestration.
//!
//! - **Entry points** (`extractor`): `process_file()` and `process_bytes()`
//! - **Pipeline** (`pipeline`): text extraction, text sinks and the crop step
//! - **Configuration** (`config`): loading and discovering `ocrcrop.toml`
//! - **I/O** (`io`): file reading, writing and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use ocrcrop::core::config::OcrCropConfig;
//! use ocrcrop::core::extractor::process_file;
//! use ocrcrop::ocr::TesseractCli;
//!
//! # async fn example() -> ocrcrop::Result<()> {
//! let config = OcrCropConfig::default();
//! let engine = TesseractCli::new(&config.ocr);
//! let report = process_file("scan.png", &engine, &config, &mut std::io::stdout()).await?;
//! println!("Recognized: {}", report.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod extractor;
pub mod io;
pub mod pipeline;

pub use config::{OcrConfig, OcrCropConfig, OutputConfig};
pub use extractor::{process_bytes, process_file, recognize_image};
pub use pipeline::{CropOutcome, PipelineReport, PipelineStage, extract_text, region_of_interest};
