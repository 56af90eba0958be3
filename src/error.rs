//! Error type shared by the icon compositor and the options store.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while loading sprites, rendering icons,
/// or talking to the synced options store.
#[derive(Debug, Error)]
pub enum Error {
    /// The component has not finished its asynchronous initialization.
    #[error("{component} is not ready; await its initialization first")]
    NotReady { component: &'static str },

    /// Initialization failed earlier; the component stays unusable.
    #[error("{component} failed to initialize: {reason}")]
    LoadFailed {
        component: &'static str,
        reason: String,
    },

    /// Initialization was already started once. There is no retry.
    #[error("{component} initialization was already started")]
    AlreadyStarted { component: &'static str },

    /// A sprite resource could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A sprite resource was fetched but is not a decodable image.
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// A decoded sprite sheet does not cover every glyph rectangle.
    #[error(
        "{size}px sprite sheet is {width}x{height}, \
         needs at least {required_width}x{required_height}"
    )]
    AtlasTooSmall {
        size: u32,
        width: u32,
        height: u32,
        required_width: u32,
        required_height: u32,
    },

    /// A pattern symbol is not one of `4`, `6` or `?`.
    #[error("unknown glyph symbol {symbol:?} at position {position}")]
    UnknownGlyph { symbol: char, position: usize },

    /// A pattern longer than the three available slots.
    #[error("pattern has {0} symbols, at most 3 are supported")]
    PatternTooLong(usize),

    /// Icons are only drawn at 16 and 32 pixels.
    #[error("unsupported icon size {0}px, expected 16 or 32")]
    UnsupportedSize(u32),

    /// A color scheme name other than `darkfg` / `lightfg`.
    #[error("unknown color scheme {0:?}")]
    UnknownColorScheme(String),

    /// Only one options observer may be registered.
    #[error("an options observer is already registered")]
    AlreadyWatching,

    /// The synced storage backend reported a failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Options snapshot (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
