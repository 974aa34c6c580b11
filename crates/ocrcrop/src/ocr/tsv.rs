//! Tesseract TSV output parsing.
//!
//! Tesseract's TSV format has one row per layout element:
//! `level page_num block_num par_num line_num word_num left top width height conf text`.
//! Only word rows (level 5) carry text; they are grouped into lines by their
//! `(page, block, paragraph, line)` key, keeping the order Tesseract emitted.

use crate::geometry::Rect;
use crate::types::{Line, RecognitionResult, Word};

pub const TSV_WORD_LEVEL: u32 = 5;
pub const TSV_MIN_FIELDS: usize = 12;

type LineKey = (u32, u32, u32, u32);

/// Parse Tesseract TSV into lines of words with bounding rectangles.
///
/// Malformed rows, non-word rows and words with blank text are skipped.
pub fn parse_tsv(tsv_data: &str) -> RecognitionResult {
    let mut lines: Vec<(LineKey, Vec<Word>)> = Vec::new();

    for row in tsv_data.lines() {
        let row = row.trim_end_matches(['\r', '\n']);
        if row.is_empty() || row.starts_with("level") {
            continue;
        }

        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let Ok(level) = fields[0].trim().parse::<u32>() else {
            continue;
        };
        if level != TSV_WORD_LEVEL {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let number = |i: usize| fields[i].trim().parse::<u32>().unwrap_or(0);
        let coordinate = |i: usize| fields[i].trim().parse::<f64>().unwrap_or(0.0);

        let key = (number(1), number(2), number(3), number(4));
        let word = Word::new(
            text,
            Rect::new(coordinate(6), coordinate(7), coordinate(8), coordinate(9)),
        );

        match lines.last_mut() {
            Some((last_key, words)) if *last_key == key => words.push(word),
            _ => lines.push((key, vec![word])),
        }
    }

    RecognitionResult::from_lines(lines.into_iter().map(|(_, words)| Line::from_words(words)).collect())
}
