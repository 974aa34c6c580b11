//! ocrcrop - recognize text in an image and crop the image to it
//!
//! A single image goes through an OCR engine; the recognized text is written to
//! a file and/or stdout, and the region covering every recognized word, plus a
//! margin, can be cropped out and saved in the source's container format.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ocrcrop::{OcrCropConfig, TesseractCli, process_file};
//! use std::path::PathBuf;
//!
//! # async fn example() -> ocrcrop::Result<()> {
//! let mut config = OcrCropConfig::default();
//! config.output.crop_output_path = Some(PathBuf::from("cropped.png"));
//!
//! let engine = TesseractCli::new(&config.ocr);
//! let report = process_file("scan.png", &engine, &config, &mut std::io::stdout()).await?;
//! println!("Region: {:?}", report.region);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): entry points, result pipeline, config loading, file I/O
//! - **OCR** (`ocr`): the `Recognizer` trait and the Tesseract adapter
//! - **Geometry** (`geometry`): rectangle algebra for the region of interest
//! - **Codec** (`codec`): decoding, cropping and re-encoding images

#![deny(unsafe_code)]

pub mod codec;
pub mod core;
pub mod error;
pub mod geometry;
pub mod ocr;
pub mod types;

pub use error::{ErrorKind, OcrCropError, Result, UnavailableReason};
pub use types::*;

pub use codec::{ContainerFormat, DecodedImage};
pub use core::config::{CONFIG_FILE_NAME, OcrConfig, OcrCropConfig, OutputConfig};
pub use core::extractor::{process_bytes, process_file, recognize_image};
pub use core::pipeline::{CropOutcome, PipelineReport, PipelineStage};
pub use geometry::{PixelBounds, Rect};
pub use ocr::{Recognizer, TesseractCli};
