//! Recognition result types.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A single recognized word with its bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bounding_rect: Rect,
}

impl Word {
    pub fn new(text: impl Into<String>, bounding_rect: Rect) -> Self {
        Self {
            text: text.into(),
            bounding_rect,
        }
    }
}

/// A line of words in recognizer reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub words: Vec<Word>,
}

impl Line {
    /// Builds a line whose text is its words joined by single spaces.
    pub fn from_words(words: Vec<Word>) -> Self {
        let text = words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
        Self { text, words }
    }
}

/// Output of one recognition call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Collapsed single-line form of the whole result.
    pub full_text: String,
    pub lines: Vec<Line>,
    /// Language tag the engine ran with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl RecognitionResult {
    /// Builds a result whose `full_text` is the line texts joined by single spaces.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let full_text = lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join(" ");
        Self {
            full_text,
            lines,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Every word of every line, in encounter order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }

    /// Tightest rectangle enclosing every word, or [`Rect::EMPTY`] without words.
    pub fn bounding_rect(&self) -> Rect {
        Rect::union_all(self.words().map(|w| w.bounding_rect))
    }
}
