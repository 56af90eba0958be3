//! Sprite sheets and the fixed glyph layout inside them.
//!
//! The extension bundles `sprites16.png` and `sprites32.png`. Each sheet
//! holds a row of three big glyphs (`4`, `6`, `?`) followed by a column of
//! two small glyphs (`4`, `6`). The rectangles are fixed per size.

use std::fmt::Display;

use image::RgbaImage;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::glyph::{Glyph, SmallGlyph};
use crate::icon::{IconSize, PointPx, RectPx};

// ============================================================================
// Layout
// ============================================================================

/// Source rectangle of a big glyph in the sheet for `size`.
pub const fn big_sprite(glyph: Glyph, size: IconSize) -> RectPx {
    match (glyph, size) {
        (Glyph::Four, IconSize::Px16) => RectPx::new(1, 1, 9, 14),
        (Glyph::Four, IconSize::Px32) => RectPx::new(1, 1, 21, 28),
        (Glyph::Six, IconSize::Px16) => RectPx::new(11, 1, 9, 14),
        (Glyph::Six, IconSize::Px32) => RectPx::new(23, 1, 21, 28),
        (Glyph::Unknown, IconSize::Px16) => RectPx::new(21, 1, 9, 14),
        (Glyph::Unknown, IconSize::Px32) => RectPx::new(45, 1, 21, 28),
    }
}

/// Source rectangle of a small glyph in the sheet for `size`.
pub const fn small_sprite(glyph: SmallGlyph, size: IconSize) -> RectPx {
    match (glyph, size) {
        (SmallGlyph::Four, IconSize::Px16) => RectPx::new(31, 1, 6, 6),
        (SmallGlyph::Four, IconSize::Px32) => RectPx::new(67, 1, 10, 10),
        (SmallGlyph::Six, IconSize::Px16) => RectPx::new(31, 8, 6, 6),
        (SmallGlyph::Six, IconSize::Px32) => RectPx::new(67, 12, 10, 10),
    }
}

/// Where each pattern slot lands on the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Big,
    SmallUpper,
    SmallLower,
}

impl Slot {
    /// Slot for a pattern position (0, 1 or 2).
    pub(crate) const BY_POSITION: [Slot; 3] = [Slot::Big, Slot::SmallUpper, Slot::SmallLower];

    /// Top-left destination of this slot on an icon of `size`.
    pub const fn target(self, size: IconSize) -> PointPx {
        match (self, size) {
            (Slot::Big, IconSize::Px16) => PointPx::new(0, 1),
            (Slot::Big, IconSize::Px32) => PointPx::new(0, 2),
            (Slot::SmallUpper, IconSize::Px16) => PointPx::new(10, 1),
            (Slot::SmallUpper, IconSize::Px32) => PointPx::new(22, 2),
            (Slot::SmallLower, IconSize::Px16) => PointPx::new(10, 8),
            (Slot::SmallLower, IconSize::Px32) => PointPx::new(22, 14),
        }
    }
}

/// Smallest sheet dimensions that contain every glyph rectangle for `size`.
pub fn required_extent(size: IconSize) -> (u32, u32) {
    let bigs = [Glyph::Four, Glyph::Six, Glyph::Unknown].map(|g| big_sprite(g, size));
    let smalls = [SmallGlyph::Four, SmallGlyph::Six].map(|g| small_sprite(g, size));
    bigs.iter()
        .chain(smalls.iter())
        .fold((0, 0), |(w, h), rect| (w.max(rect.right()), h.max(rect.bottom())))
}

// ============================================================================
// SpriteSource
// ============================================================================

/// Host access to the bundled sprite sheets.
///
/// In an extension this wraps `chrome.runtime.getURL` and `fetch`; tests and
/// the CLI read from memory or disk.
#[allow(async_fn_in_trait)]
pub trait SpriteSource {
    type Error: Display;

    /// Resolves a bundled resource name to a fetchable URL.
    fn resolve_url(&self, resource: &str) -> String {
        resource.to_owned()
    }

    /// Fetches the raw bytes behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, Self::Error>;
}

// ============================================================================
// SpriteAtlas
// ============================================================================

/// The pair of decoded sprite sheets. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAtlas {
    sheets: [RgbaImage; 2],
}

impl SpriteAtlas {
    /// Builds an atlas from decoded sheets, checking each one covers the layout.
    pub fn new(sheet16: RgbaImage, sheet32: RgbaImage) -> Result<Self> {
        validate(IconSize::Px16, &sheet16)?;
        validate(IconSize::Px32, &sheet32)?;
        Ok(Self {
            sheets: [sheet16, sheet32],
        })
    }

    /// Decodes both sheets from PNG bytes already in memory.
    pub fn from_png(png16: &[u8], png32: &[u8]) -> Result<Self> {
        let sheet16 = decode(&IconSize::Px16.sprite_resource(), png16)?;
        let sheet32 = decode(&IconSize::Px32.sprite_resource(), png32)?;
        Self::new(sheet16, sheet32)
    }

    /// Fetches and decodes `sprites16.png` then `sprites32.png` from `source`.
    ///
    /// The first failure aborts the load; the error names the URL involved.
    pub async fn load<S: SpriteSource>(source: &S) -> Result<Self> {
        let sheet16 = fetch_sheet(source, IconSize::Px16).await?;
        let sheet32 = fetch_sheet(source, IconSize::Px32).await?;
        Ok(Self {
            sheets: [sheet16, sheet32],
        })
    }

    /// The sheet used for icons of `size`.
    pub fn sheet(&self, size: IconSize) -> &RgbaImage {
        &self.sheets[size.index()]
    }
}

async fn fetch_sheet<S: SpriteSource>(source: &S, size: IconSize) -> Result<RgbaImage> {
    let url = source.resolve_url(&size.sprite_resource());
    info!(%url, "fetching sprite sheet");
    let bytes = source.fetch(&url).await.map_err(|e| Error::Fetch {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    let sheet = decode(&url, &bytes)?;
    debug!(%url, width = sheet.width(), height = sheet.height(), "decoded sprite sheet");
    validate(size, &sheet)?;
    Ok(sheet)
}

fn decode(url: &str, bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| Error::Decode {
            url: url.to_owned(),
            source,
        })
}

fn validate(size: IconSize, sheet: &RgbaImage) -> Result<()> {
    let (required_width, required_height) = required_extent(size);
    if sheet.width() < required_width || sheet.height() < required_height {
        return Err(Error::AtlasTooSmall {
            size: size.pixels(),
            width: sheet.width(),
            height: sheet.height(),
            required_width,
            required_height,
        });
    }
    Ok(())
}

// ============================================================================
// Test fixtures
// ============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;
    use std::io::Cursor;

    use image::{ImageFormat, Rgba};

    use super::*;

    /// Fill color for each glyph rectangle, so a rendered pixel tells which
    /// sprite it came from.
    pub fn big_color(glyph: Glyph) -> Rgba<u8> {
        match glyph {
            Glyph::Four => Rgba([200, 10, 10, 255]),
            Glyph::Six => Rgba([10, 200, 10, 255]),
            Glyph::Unknown => Rgba([10, 10, 200, 128]),
        }
    }

    pub fn small_color(glyph: SmallGlyph) -> Rgba<u8> {
        match glyph {
            SmallGlyph::Four => Rgba([90, 40, 0, 255]),
            SmallGlyph::Six => Rgba([0, 40, 90, 255]),
        }
    }

    /// Sheet background outside every glyph rectangle.
    pub const BACKGROUND: Rgba<u8> = Rgba([255, 0, 255, 255]);

    pub fn sheet(size: IconSize) -> RgbaImage {
        let (width, height) = required_extent(size);
        let mut img = RgbaImage::from_pixel(width + 3, height + 2, BACKGROUND);
        let mut paint = |rect: RectPx, color: Rgba<u8>| {
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    img.put_pixel(x, y, color);
                }
            }
        };
        for glyph in [Glyph::Four, Glyph::Six, Glyph::Unknown] {
            paint(big_sprite(glyph, size), big_color(glyph));
        }
        for glyph in [SmallGlyph::Four, SmallGlyph::Six] {
            paint(small_sprite(glyph, size), small_color(glyph));
        }
        img
    }

    pub fn png(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode fixture png");
        bytes
    }

    pub fn atlas() -> SpriteAtlas {
        SpriteAtlas::new(sheet(IconSize::Px16), sheet(IconSize::Px32)).expect("fixture atlas")
    }

    /// In-memory [`SpriteSource`] keyed by URL.
    #[derive(Default)]
    pub struct MemorySource {
        pub files: HashMap<String, Vec<u8>>,
    }

    impl MemorySource {
        pub fn with_sheets() -> Self {
            let mut files = HashMap::new();
            for size in IconSize::ALL {
                files.insert(
                    format!("ext://{}", size.sprite_resource()),
                    png(&sheet(size)),
                );
            }
            Self { files }
        }
    }

    impl SpriteSource for MemorySource {
        type Error = String;

        fn resolve_url(&self, resource: &str) -> String {
            format!("ext://{resource}")
        }

        async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| "404 not found".to_owned())
        }
    }
}
