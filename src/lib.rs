//! addr-badge: toolbar icon rendering and synced options for a browser extension
//!
//! The crate has two independent halves:
//!
//! - [`IconCompositor`] draws a glyph [`Pattern`] such as `"46"` onto a 16 or
//!   32 pixel bitmap using the bundled sprite sheets.
//! - [`OptionsStore`] mirrors the extension's options from synced storage,
//!   fills in defaults and notifies a single observer when they change.
//!
//! Both load asynchronously through traits the host implements
//! ([`SpriteSource`], [`SyncStorage`]) and report their progress as a
//! [`LoadState`].
//!
//! # Example
//!
//! ```
//! use addr_badge::{ColorScheme, IconCompositor, IconSize, Pattern, SpriteSource};
//!
//! struct Bundled;
//!
//! impl SpriteSource for Bundled {
//!     type Error = std::io::Error;
//!
//!     async fn fetch(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
//!         std::fs::read(url)
//!     }
//! }
//!
//! # async fn demo() -> addr_badge::Result<()> {
//! let mut compositor = IconCompositor::new();
//! compositor.load(&Bundled).await?;
//!
//! let pattern: Pattern = "64".parse()?;
//! let icon = compositor.render(&pattern, IconSize::Px16, ColorScheme::LightForeground)?;
//! let rgba: Vec<u8> = icon.into_raw();
//! # Ok(())
//! # }
//! ```

mod atlas;
mod compositor;
mod error;
mod glyph;
mod icon;
mod lifecycle;
mod options;

#[cfg(feature = "wasm")]
mod wasm;

pub use atlas::{big_sprite, required_extent, small_sprite, Slot, SpriteAtlas, SpriteSource};
pub use compositor::{ColorScheme, IconCompositor, LIGHT_FOREGROUND_FLOOR};
pub use error::{Error, Result};
pub use glyph::{Glyph, Pattern, SmallGlyph, MAX_PATTERN_LEN};
pub use icon::{IconSet, IconSize, PointPx, RectPx};
pub use lifecycle::LoadState;
pub use options::{
    ChangeSet, OptionName, OptionsObserver, OptionsSnapshot, OptionsStore, PartialOptions,
    StorageChange, SyncStorage,
};

#[cfg(feature = "wasm")]
pub use wasm::IconRenderer;
