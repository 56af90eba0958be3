//! Geometry and output types for toolbar icons.
//!
//! Toolbar icons come in two pixel sizes. Every sprite coordinate in this
//! crate is expressed with [`RectPx`] and [`PointPx`] for one of those sizes.

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the right edge coordinate (x + width).
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// A destination offset in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointPx {
    pub x: u32,
    pub y: u32,
}

impl PointPx {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The two square sizes a toolbar icon is rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum IconSize {
    /// 16x16, standard density.
    Px16,
    /// 32x32, high density.
    Px32,
}

impl IconSize {
    /// Both sizes, smallest first.
    pub const ALL: [IconSize; 2] = [IconSize::Px16, IconSize::Px32];

    /// Edge length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Px16 => 16,
            Self::Px32 => 32,
        }
    }

    /// Name of the bundled sprite sheet for this size, e.g. `sprites16.png`.
    pub fn sprite_resource(self) -> String {
        format!("sprites{}.png", self.pixels())
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Px16 => 0,
            Self::Px32 => 1,
        }
    }
}

impl TryFrom<u32> for IconSize {
    type Error = Error;

    fn try_from(pixels: u32) -> Result<Self, Self::Error> {
        match pixels {
            16 => Ok(Self::Px16),
            32 => Ok(Self::Px32),
            other => Err(Error::UnsupportedSize(other)),
        }
    }
}

impl From<IconSize> for u32 {
    fn from(size: IconSize) -> Self {
        size.pixels()
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.pixels())
    }
}

/// One rendered icon per [`IconSize`], ready to hand to the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSet {
    images: [RgbaImage; 2],
}

impl IconSet {
    pub(crate) fn new(px16: RgbaImage, px32: RgbaImage) -> Self {
        Self {
            images: [px16, px32],
        }
    }

    /// Returns the image rendered at `size`.
    pub fn get(&self, size: IconSize) -> &RgbaImage {
        &self.images[size.index()]
    }

    /// Iterates over `(size, image)` pairs, smallest first.
    pub fn iter(&self) -> impl Iterator<Item = (IconSize, &RgbaImage)> {
        IconSize::ALL.into_iter().zip(self.images.iter())
    }
}

impl IntoIterator for IconSet {
    type Item = (IconSize, RgbaImage);
    type IntoIter = std::iter::Zip<std::array::IntoIter<IconSize, 2>, std::array::IntoIter<RgbaImage, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        IconSize::ALL.into_iter().zip(self.images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
    }

    #[test]
    fn icon_size_from_pixels() {
        assert_eq!(IconSize::try_from(16).unwrap(), IconSize::Px16);
        assert_eq!(IconSize::try_from(32).unwrap(), IconSize::Px32);
        assert!(matches!(
            IconSize::try_from(48),
            Err(Error::UnsupportedSize(48))
        ));
    }

    #[test]
    fn sprite_resource_names() {
        assert_eq!(IconSize::Px16.sprite_resource(), "sprites16.png");
        assert_eq!(IconSize::Px32.sprite_resource(), "sprites32.png");
    }

    #[test]
    fn icon_size_serializes_as_pixels() {
        assert_eq!(serde_json::to_string(&IconSize::Px32).unwrap(), "32");
        let size: IconSize = serde_json::from_str("16").unwrap();
        assert_eq!(size, IconSize::Px16);
        assert!(serde_json::from_str::<IconSize>("24").is_err());
    }

    #[test]
    fn icon_set_lookup() {
        let set = IconSet::new(RgbaImage::new(16, 16), RgbaImage::new(32, 32));
        assert_eq!(set.get(IconSize::Px32).width(), 32);

        let sizes: Vec<_> = set.iter().map(|(size, img)| (size, img.width())).collect();
        assert_eq!(sizes, vec![(IconSize::Px16, 16), (IconSize::Px32, 32)]);
    }
}
