//! Toolbar icon compositor.

use std::fmt;
use std::str::FromStr;

use image::{imageops, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::atlas::{big_sprite, small_sprite, Slot, SpriteAtlas, SpriteSource};
use crate::error::{Error, Result};
use crate::glyph::{Glyph, Pattern};
use crate::icon::{IconSet, IconSize, RectPx};
use crate::lifecycle::{LoadState, Lifecycle};

/// Added to R, G and B of every pixel for [`ColorScheme::LightForeground`].
pub const LIGHT_FOREGROUND_FLOOR: u8 = 128;

const COMPONENT: &str = "sprite atlas";

// ============================================================================
// ColorScheme
// ============================================================================

/// How the glyphs are tinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ColorScheme {
    /// Dark glyphs for light toolbars. Sprites are drawn unchanged.
    #[default]
    #[serde(rename = "darkfg")]
    DarkForeground,
    /// Light glyphs for dark toolbars.
    #[serde(rename = "lightfg")]
    LightForeground,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DarkForeground => "darkfg",
            Self::LightForeground => "lightfg",
        }
    }
}

impl FromStr for ColorScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "darkfg" => Ok(Self::DarkForeground),
            "lightfg" => Ok(Self::LightForeground),
            other => Err(Error::UnknownColorScheme(other.to_owned())),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// IconCompositor
// ============================================================================

/// Draws glyph patterns onto toolbar-sized bitmaps.
///
/// The compositor owns the sprite atlas once it has loaded, plus one
/// drawing surface per [`IconSize`]. A surface is created on first use and
/// cleared before every draw. Each call borrows the compositor mutably, draws
/// into the surface and returns a copy, so the result never aliases the
/// surface and calls cannot interleave.
///
/// # Example
///
/// ```
/// use addr_badge::{ColorScheme, IconCompositor, LoadState};
///
/// let mut compositor = IconCompositor::new();
/// assert_eq!(compositor.state(), LoadState::Uninitialized);
/// assert!(compositor.build_icon("4", 16, ColorScheme::DarkForeground).is_err());
/// ```
#[derive(Debug)]
pub struct IconCompositor {
    atlas: Lifecycle<SpriteAtlas>,
    surfaces: [Option<RgbaImage>; 2],
}

impl Default for IconCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl IconCompositor {
    /// Creates a compositor whose atlas has not been loaded yet.
    pub fn new() -> Self {
        Self {
            atlas: Lifecycle::new(COMPONENT),
            surfaces: [None, None],
        }
    }

    /// Creates a compositor around an atlas that is already decoded.
    pub fn with_atlas(atlas: SpriteAtlas) -> Self {
        Self {
            atlas: Lifecycle::ready(COMPONENT, atlas),
            surfaces: [None, None],
        }
    }

    /// Current readiness of the sprite atlas.
    pub fn state(&self) -> LoadState {
        self.atlas.state()
    }

    /// Loads the sprite atlas from `source`.
    ///
    /// May only be called once. A failure leaves the compositor in
    /// [`LoadState::Failed`] and every later draw reports
    /// [`Error::LoadFailed`].
    pub async fn load<S: SpriteSource>(&mut self, source: &S) -> Result<()> {
        self.atlas.begin()?;
        let outcome = SpriteAtlas::load(source).await;
        self.atlas.finish(outcome)?;
        info!("sprite atlas ready");
        Ok(())
    }

    /// Renders `pattern` at `size` pixels.
    ///
    /// Convenience over [`render`](Self::render) taking the pattern as text
    /// (e.g. `"46"`) and the size in pixels.
    pub fn build_icon(&mut self, pattern: &str, size: u32, scheme: ColorScheme) -> Result<RgbaImage> {
        let pattern: Pattern = pattern.parse()?;
        let size = IconSize::try_from(size)?;
        self.render(&pattern, size, scheme)
    }

    /// Renders `pattern` at both sizes.
    pub fn build_icon_set(&mut self, pattern: &Pattern, scheme: ColorScheme) -> Result<IconSet> {
        let px16 = self.render(pattern, IconSize::Px16, scheme)?;
        let px32 = self.render(pattern, IconSize::Px32, scheme)?;
        Ok(IconSet::new(px16, px32))
    }

    /// Renders `pattern` at `size` and returns a copy of the result.
    pub fn render(&mut self, pattern: &Pattern, size: IconSize, scheme: ColorScheme) -> Result<RgbaImage> {
        let atlas = self.atlas.get()?;
        let sheet = atlas.sheet(size);

        let surface = self.surfaces[size.index()]
            .get_or_insert_with(|| RgbaImage::new(size.pixels(), size.pixels()));
        clear(surface);

        let [upper, lower] = pattern.small_slots();
        let placements = [
            pattern.big().map(|glyph| big_sprite(glyph, size)),
            upper.and_then(Glyph::small).map(|glyph| small_sprite(glyph, size)),
            lower.and_then(Glyph::small).map(|glyph| small_sprite(glyph, size)),
        ];
        for (slot, source) in Slot::BY_POSITION.into_iter().zip(placements) {
            if let Some(source) = source {
                draw_sprite(surface, sheet, source, slot, size);
            }
        }

        if scheme == ColorScheme::LightForeground {
            brighten(surface, LIGHT_FOREGROUND_FLOOR);
        }

        debug!(%pattern, %size, %scheme, "built icon");
        Ok(surface.clone())
    }
}

fn clear(surface: &mut RgbaImage) {
    for pixel in surface.pixels_mut() {
        *pixel = Rgba([0, 0, 0, 0]);
    }
}

/// Copies `source` out of `sheet` onto `surface` at the slot's offset.
///
/// The surface is freshly cleared and slots never overlap, so a plain copy
/// matches source-over compositing.
fn draw_sprite(surface: &mut RgbaImage, sheet: &RgbaImage, source: RectPx, slot: Slot, size: IconSize) {
    let sprite = imageops::crop_imm(sheet, source.x, source.y, source.width, source.height).to_image();
    let target = slot.target(size);
    imageops::replace(surface, &sprite, i64::from(target.x), i64::from(target.y));
}

/// Adds `floor` to the color channels of every pixel, saturating at 255.
fn brighten(surface: &mut RgbaImage, floor: u8) {
    for pixel in surface.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [
            r.saturating_add(floor),
            g.saturating_add(floor),
            b.saturating_add(floor),
            a,
        ];
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::fixtures::{self, big_color, small_color, MemorySource};
    use crate::glyph::SmallGlyph;

    const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

    fn ready_compositor() -> IconCompositor {
        IconCompositor::with_atlas(fixtures::atlas())
    }

    /// Pixels inside `rect` placed at the slot offset.
    fn assert_region(img: &RgbaImage, slot: Slot, size: IconSize, rect: RectPx, expected: Rgba<u8>) {
        let target = slot.target(size);
        for dy in 0..rect.height {
            for dx in 0..rect.width {
                assert_eq!(
                    img.get_pixel(target.x + dx, target.y + dy),
                    &expected,
                    "pixel ({}, {}) in {slot:?}",
                    target.x + dx,
                    target.y + dy
                );
            }
        }
    }

    fn assert_region_empty(img: &RgbaImage, slot: Slot, size: IconSize, rect: RectPx) {
        assert_region(img, slot, size, rect, Rgba(TRANSPARENT));
    }

    #[test]
    fn build_before_load_is_not_ready() {
        let mut compositor = IconCompositor::new();
        let err = compositor
            .build_icon("4", 16, ColorScheme::DarkForeground)
            .unwrap_err();
        assert!(matches!(err, Error::NotReady { .. }));
    }

    #[test]
    fn load_then_build() {
        let mut compositor = IconCompositor::new();
        pollster::block_on(compositor.load(&MemorySource::with_sheets())).unwrap();
        assert_eq!(compositor.state(), LoadState::Ready);

        let icon = compositor
            .build_icon("6", 32, ColorScheme::DarkForeground)
            .unwrap();
        assert_eq!(icon.dimensions(), (32, 32));
        assert_eq!(icon.get_pixel(0, 2), &big_color(Glyph::Six));
    }

    #[test]
    fn failed_load_is_distinct_from_not_ready() {
        let mut compositor = IconCompositor::new();
        let err = pollster::block_on(compositor.load(&MemorySource::default())).unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert_eq!(compositor.state(), LoadState::Failed);

        match compositor.build_icon("4", 16, ColorScheme::DarkForeground) {
            Err(Error::LoadFailed { reason, .. }) => {
                assert!(reason.contains("ext://sprites16.png"), "{reason}");
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }

        // No retry once failed.
        let again = pollster::block_on(compositor.load(&MemorySource::with_sheets()));
        assert!(matches!(again, Err(Error::AlreadyStarted { .. })));
    }

    #[test]
    fn single_big_glyph_leaves_small_slots_empty() {
        let mut compositor = ready_compositor();
        let size = IconSize::Px16;
        let icon = compositor
            .build_icon("4", 16, ColorScheme::DarkForeground)
            .unwrap();

        assert_eq!(icon.dimensions(), (16, 16));
        assert_region(&icon, Slot::Big, size, big_sprite(Glyph::Four, size), big_color(Glyph::Four));
        assert_region_empty(&icon, Slot::SmallUpper, size, small_sprite(SmallGlyph::Four, size));
        assert_region_empty(&icon, Slot::SmallLower, size, small_sprite(SmallGlyph::Four, size));

        // Row 0 sits above the big glyph and stays transparent.
        assert!((0..16).all(|x| icon.get_pixel(x, 0).0 == TRANSPARENT));
    }

    #[test]
    fn full_pattern_fills_every_slot() {
        let mut compositor = ready_compositor();
        let size = IconSize::Px32;
        let pattern: Pattern = "?64".parse().unwrap();
        let icon = compositor
            .render(&pattern, size, ColorScheme::DarkForeground)
            .unwrap();

        assert_region(&icon, Slot::Big, size, big_sprite(Glyph::Unknown, size), big_color(Glyph::Unknown));
        assert_region(
            &icon,
            Slot::SmallUpper,
            size,
            small_sprite(SmallGlyph::Six, size),
            small_color(SmallGlyph::Six),
        );
        assert_region(
            &icon,
            Slot::SmallLower,
            size,
            small_sprite(SmallGlyph::Four, size),
            small_color(SmallGlyph::Four),
        );
    }

    #[test]
    fn unknown_in_small_slot_draws_nothing() {
        let mut compositor = ready_compositor();
        let size = IconSize::Px32;
        let icon = compositor
            .build_icon("46?", 32, ColorScheme::DarkForeground)
            .unwrap();
        assert_region(
            &icon,
            Slot::SmallUpper,
            size,
            small_sprite(SmallGlyph::Six, size),
            small_color(SmallGlyph::Six),
        );
        assert_region_empty(&icon, Slot::SmallLower, size, small_sprite(SmallGlyph::Six, size));
    }

    #[test]
    fn light_scheme_brightens_color_channels_only() {
        let mut compositor = ready_compositor();
        let dark = compositor
            .build_icon("46?", 32, ColorScheme::DarkForeground)
            .unwrap();
        let light = compositor
            .build_icon("46?", 32, ColorScheme::LightForeground)
            .unwrap();

        assert_eq!(dark.dimensions(), light.dimensions());
        for (d, l) in dark.pixels().zip(light.pixels()) {
            assert_eq!(l[3], d[3], "alpha must be untouched");
            for c in 0..3 {
                assert_eq!(l[c], d[c].saturating_add(LIGHT_FOREGROUND_FLOOR));
            }
        }

        // 200 + 128 saturates.
        assert_eq!(light.get_pixel(0, 2).0, [255, 138, 138, 255]);
    }

    #[test]
    fn surface_is_cleared_between_calls() {
        let mut compositor = ready_compositor();
        let first = compositor
            .build_icon("466", 16, ColorScheme::DarkForeground)
            .unwrap();
        let empty = compositor
            .build_icon("", 16, ColorScheme::DarkForeground)
            .unwrap();

        assert!(empty.pixels().all(|p| p.0 == TRANSPARENT));
        // The earlier result is a snapshot, not a view of the surface.
        assert_eq!(first.get_pixel(0, 1), &big_color(Glyph::Four));
    }

    #[test]
    fn lookup_failures() {
        let mut compositor = ready_compositor();
        assert!(matches!(
            compositor.build_icon("4", 24, ColorScheme::DarkForeground),
            Err(Error::UnsupportedSize(24))
        ));
        assert!(matches!(
            compositor.build_icon("5", 16, ColorScheme::DarkForeground),
            Err(Error::UnknownGlyph { symbol: '5', position: 0 })
        ));
    }

    #[test]
    fn icon_set_has_both_sizes() {
        let mut compositor = ready_compositor();
        let set = compositor
            .build_icon_set(&"64".parse().unwrap(), ColorScheme::DarkForeground)
            .unwrap();
        assert_eq!(set.get(IconSize::Px16).dimensions(), (16, 16));
        assert_eq!(set.get(IconSize::Px32).dimensions(), (32, 32));
        assert_eq!(set.get(IconSize::Px16).get_pixel(0, 1), &big_color(Glyph::Six));
    }

    #[test]
    fn color_scheme_names() {
        assert_eq!("lightfg".parse::<ColorScheme>().unwrap(), ColorScheme::LightForeground);
        assert_eq!(ColorScheme::DarkForeground.to_string(), "darkfg");
        assert!(matches!(
            "sepia".parse::<ColorScheme>(),
            Err(Error::UnknownColorScheme(_))
        ));
        assert_eq!(
            serde_json::to_string(&ColorScheme::LightForeground).unwrap(),
            "\"lightfg\""
        );
    }
}
