//! Text recognition.
//!
//! The [`Recognizer`] trait is the seam between the pipeline and an OCR
//! engine. [`TesseractCli`] drives the `tesseract` executable and reads word
//! geometry from its TSV report ([`tsv`]).

pub mod recognizer;
pub mod tesseract;
pub mod tsv;

pub use recognizer::{Recognizer, prepare_language};
pub use tesseract::TesseractCli;
pub use tsv::parse_tsv;
