//! Axis-aligned rectangle algebra.
//!
//! [`Rect`] is an immutable value type in floating-point image-pixel
//! coordinates. [`Rect::EMPTY`] represents "no region": it is the identity
//! element of [`Rect::union`] and the absorbing element of [`Rect::intersect`].
//!
//! # Example
//!
//! ```rust
//! use ocrcrop::geometry::Rect;
//!
//! let words = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 20.0, 5.0, 5.0)];
//! let roi = Rect::union_all(words)
//!     .inflate(10.0)
//!     .intersect(Rect::from_size(100.0, 100.0));
//!
//! assert_eq!(roi, Rect::new(0.0, 0.0, 35.0, 35.0));
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer pixel region, always inside the image it was derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// The "no region" sentinel.
    pub const EMPTY: Rect = Rect {
        x: f64::INFINITY,
        y: f64::INFINITY,
        width: f64::NEG_INFINITY,
        height: f64::NEG_INFINITY,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin, e.g. the full extent of an image.
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    fn is_sentinel(&self) -> bool {
        self.width == f64::NEG_INFINITY && self.height == f64::NEG_INFINITY
    }

    /// True for [`Rect::EMPTY`] and for any rectangle without positive, finite extents.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(self, other: Rect) -> Rect {
        if self.is_sentinel() {
            return other;
        }
        if other.is_sentinel() {
            return self;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Folds [`Rect::union`] over `rects` in order, starting from [`Rect::EMPTY`].
    pub fn union_all<I>(rects: I) -> Rect
    where
        I: IntoIterator<Item = Rect>,
    {
        rects.into_iter().fold(Rect::EMPTY, Rect::union)
    }

    /// Expands every side by `margin`. A negative margin shrinks; a shrink past
    /// zero extent yields [`Rect::EMPTY`].
    pub fn inflate(self, margin: f64) -> Rect {
        if self.is_sentinel() {
            return Rect::EMPTY;
        }

        let width = self.width + 2.0 * margin;
        let height = self.height + 2.0 * margin;
        if width < 0.0 || height < 0.0 {
            return Rect::EMPTY;
        }

        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width,
            height,
        }
    }

    /// Overlapping region of `self` and `other`, or [`Rect::EMPTY`].
    pub fn intersect(self, other: Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::EMPTY;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let width = self.right().min(other.right()) - x;
        let height = self.bottom().min(other.bottom()) - y;
        if width <= 0.0 || height <= 0.0 {
            return Rect::EMPTY;
        }

        Rect { x, y, width, height }
    }

    /// Snaps to whole pixels inside a `image_width` x `image_height` image.
    ///
    /// The origin is floored and the far edge rounded up, then both are clamped
    /// to the image, so the bounds cover the rectangle without leaving the image.
    /// Returns `None` when nothing remains.
    pub fn to_pixel_bounds(&self, image_width: u32, image_height: u32) -> Option<PixelBounds> {
        if self.is_empty() {
            return None;
        }

        let left = self.x.floor().clamp(0.0, image_width as f64);
        let top = self.y.floor().clamp(0.0, image_height as f64);
        let right = self.right().ceil().clamp(0.0, image_width as f64);
        let bottom = self.bottom().ceil().clamp(0.0, image_height as f64);
        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelBounds {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::EMPTY
    }
}
