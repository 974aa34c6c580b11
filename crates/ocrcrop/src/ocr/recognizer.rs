//! Recognition engine trait.

use crate::Result;
use crate::codec::DecodedImage;
use crate::error::UnavailableReason;
use crate::types::RecognitionResult;
use async_trait::async_trait;

/// A text recognition engine.
///
/// Implementations only have to run the engine. Language resolution and the
/// image size limit are enforced by [`prepare_language`] before `recognize` is
/// called, so every engine reports those conditions the same way.
///
/// # Thread Safety
///
/// Engines must be `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use ocrcrop::Result;
/// use ocrcrop::codec::DecodedImage;
/// use ocrcrop::ocr::Recognizer;
/// use ocrcrop::types::RecognitionResult;
///
/// struct Blank;
///
/// #[async_trait]
/// impl Recognizer for Blank {
///     fn name(&self) -> &str { "blank" }
///     fn max_image_dimension(&self) -> u32 { 4096 }
///     async fn available_languages(&self) -> Result<Vec<String>> { Ok(vec!["eng".to_string()]) }
///     async fn recognize(&self, _image: &DecodedImage, language: &str) -> Result<RecognitionResult> {
///         Ok(RecognitionResult::default().with_language(language))
///     }
/// }
/// ```
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Largest width or height the engine accepts.
    fn max_image_dimension(&self) -> u32;

    /// Language tags the engine can recognize.
    async fn available_languages(&self) -> Result<Vec<String>>;

    /// Recognize text in `image` using an available `language`.
    async fn recognize(&self, image: &DecodedImage, language: &str) -> Result<RecognitionResult>;
}

/// Resolve the language to run with and check the image against the engine limit.
///
/// # Errors
///
/// `OcrCropError::RecognitionUnavailable` when the requested (or default)
/// language has no engine, or when `max(width, height)` exceeds
/// [`Recognizer::max_image_dimension`].
pub async fn prepare_language(
    recognizer: &dyn Recognizer,
    image: &DecodedImage,
    language: Option<&str>,
    default_language: &str,
) -> Result<String> {
    let available = recognizer.available_languages().await?;

    let resolved = match language {
        Some(lang) => {
            if !available.iter().any(|l| l == lang) {
                return Err(UnavailableReason::LanguageNotAvailable(lang.to_string()).into());
            }
            lang
        }
        None => {
            if !available.iter().any(|l| l == default_language) {
                return Err(UnavailableReason::DefaultLanguageNotAvailable(default_language.to_string()).into());
            }
            default_language
        }
    };

    let max_dimension = recognizer.max_image_dimension();
    if image.width() > max_dimension || image.height() > max_dimension {
        return Err(UnavailableReason::ImageTooLarge {
            width: image.width(),
            height: image.height(),
            max_dimension,
        }
        .into());
    }

    tracing::debug!(
        engine = recognizer.name(),
        language = resolved,
        "Recognition prerequisites satisfied"
    );
    Ok(resolved.to_string())
}
