//! Image container decoding, cropping and encoding.
//!
//! Decoding accepts any container the `image` crate is built with here. Encoding
//! is limited to the closed set in [`ContainerFormat`]: a cropped image is always
//! written back in the container it was read from, and containers outside that
//! set fail with [`OcrCropError::UnmappedContainerFormat`].

use crate::error::{OcrCropError, Result};
use crate::geometry::{PixelBounds, Rect};
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Containers a cropped image can be encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Png,
    Jpeg,
    Bmp,
    Gif,
    Tiff,
}

impl ContainerFormat {
    /// Maps a decoder's container to its encoder.
    pub fn for_source(format: ImageFormat) -> Result<Self> {
        match format {
            ImageFormat::Png => Ok(Self::Png),
            ImageFormat::Jpeg => Ok(Self::Jpeg),
            ImageFormat::Bmp => Ok(Self::Bmp),
            ImageFormat::Gif => Ok(Self::Gif),
            ImageFormat::Tiff => Ok(Self::Tiff),
            other => Err(OcrCropError::UnmappedContainerFormat(format!("{:?}", other))),
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

/// A decoded pixel buffer and the container it came from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The whole image as a rectangle at the origin.
    pub fn full_rect(&self) -> Rect {
        Rect::from_size(self.width() as f64, self.height() as f64)
    }
}

/// Decode raw container bytes into a pixel buffer.
///
/// # Errors
///
/// Returns `OcrCropError::Decode` if the container is unrecognized or malformed.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrCropError::decode_with_source("Failed to read image format", e))?;

    let format = reader
        .format()
        .ok_or_else(|| OcrCropError::decode("Could not determine image format"))?;

    let image = reader
        .decode()
        .map_err(|e| OcrCropError::decode_with_source(format!("Failed to decode {:?} image", format), e))?;

    Ok(DecodedImage { image, format })
}

/// Copy the `bounds` region out of `image`.
pub fn crop(image: &DynamicImage, bounds: PixelBounds) -> DynamicImage {
    image.crop_imm(bounds.x, bounds.y, bounds.width, bounds.height)
}

/// Encode `image` into `format`.
///
/// The pixel layout is converted first where the target container cannot hold
/// it (JPEG has no alpha channel, GIF frames are RGBA).
pub fn encode(image: &DynamicImage, format: ContainerFormat) -> Result<Vec<u8>> {
    let converted;
    let source = match format {
        ContainerFormat::Jpeg if image.color().has_alpha() || image.color().bytes_per_pixel() > 3 => {
            converted = DynamicImage::ImageRgb8(image.to_rgb8());
            &converted
        }
        ContainerFormat::Gif => {
            converted = DynamicImage::ImageRgba8(image.to_rgba8());
            &converted
        }
        _ => image,
    };

    let mut buffer = Vec::new();
    source
        .write_to(&mut Cursor::new(&mut buffer), format.image_format())
        .map_err(|e| OcrCropError::encode_with_source(format!("Failed to encode {:?} image", format), e))?;
    Ok(buffer)
}
