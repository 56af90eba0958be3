//! Recognized extension options and their in-memory snapshot.
//!
//! The options live in the browser's synced storage under camelCase keys.
//! [`OptionsSnapshot`] mirrors them with defaults filled in, and
//! [`OptionsStore`] keeps the snapshot consistent with the remote store.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "regularColorScheme": "darkfg",
//!   "incognitoColorScheme": "lightfg"
//! }
//! ```

mod store;

pub use store::{ChangeSet, OptionsObserver, OptionsStore, StorageChange, SyncStorage};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::compositor::ColorScheme;
use crate::error::Result;

// ============================================================================
// OptionName
// ============================================================================

/// One of the option keys this library understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum OptionName {
    /// Color scheme for icons in regular windows.
    RegularColorScheme,
    /// Color scheme for icons in private-browsing windows.
    IncognitoColorScheme,
}

impl OptionName {
    /// Every recognized option, in a stable order.
    pub const ALL: [OptionName; 2] = [OptionName::RegularColorScheme, OptionName::IncognitoColorScheme];

    /// Storage key of this option.
    pub const fn key(self) -> &'static str {
        match self {
            Self::RegularColorScheme => "regularColorScheme",
            Self::IncognitoColorScheme => "incognitoColorScheme",
        }
    }

    /// Looks up a recognized option by storage key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }

    /// Value used when storage holds nothing for this option.
    pub const fn default_value(self) -> ColorScheme {
        match self {
            Self::RegularColorScheme => ColorScheme::DarkForeground,
            Self::IncognitoColorScheme => ColorScheme::LightForeground,
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// OptionsSnapshot
// ============================================================================

/// Current value of every recognized option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct OptionsSnapshot {
    pub regular_color_scheme: ColorScheme,
    pub incognito_color_scheme: ColorScheme,
}

impl Default for OptionsSnapshot {
    fn default() -> Self {
        Self {
            regular_color_scheme: OptionName::RegularColorScheme.default_value(),
            incognito_color_scheme: OptionName::IncognitoColorScheme.default_value(),
        }
    }
}

impl OptionsSnapshot {
    /// Builds a snapshot from everything persisted in storage.
    ///
    /// Unrecognized keys are ignored. Recognized keys that are missing or
    /// hold an unparseable value fall back to their default.
    pub fn from_items(items: &Map<String, Value>) -> Self {
        let mut snapshot = Self::default();
        for name in OptionName::ALL {
            snapshot.set(name, resolve(name, items.get(name.key())));
        }
        snapshot
    }

    pub fn get(&self, name: OptionName) -> ColorScheme {
        match name {
            OptionName::RegularColorScheme => self.regular_color_scheme,
            OptionName::IncognitoColorScheme => self.incognito_color_scheme,
        }
    }

    pub fn set(&mut self, name: OptionName, value: ColorScheme) {
        match name {
            OptionName::RegularColorScheme => self.regular_color_scheme = value,
            OptionName::IncognitoColorScheme => self.incognito_color_scheme = value,
        }
    }

    /// Color scheme for a window, picking the private-browsing option when
    /// `incognito` is set.
    pub fn color_scheme(&self, incognito: bool) -> ColorScheme {
        if incognito {
            self.incognito_color_scheme
        } else {
            self.regular_color_scheme
        }
    }

    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the snapshot to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a snapshot from a JSON string. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Interprets a stored value for `name`, falling back to the default.
pub(crate) fn resolve(name: OptionName, stored: Option<&Value>) -> ColorScheme {
    let Some(value) = stored else {
        return name.default_value();
    };
    match ColorScheme::deserialize(value) {
        Ok(scheme) => scheme,
        Err(err) => {
            warn!(option = %name, %value, error = %err, "ignoring unparseable stored option");
            name.default_value()
        }
    }
}

// ============================================================================
// PartialOptions
// ============================================================================

/// Proposed values for some recognized options. `None` leaves an option alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PartialOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_color_scheme: Option<ColorScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incognito_color_scheme: Option<ColorScheme>,
}

impl PartialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proposed value of `name`.
    pub fn with(mut self, name: OptionName, value: ColorScheme) -> Self {
        match name {
            OptionName::RegularColorScheme => self.regular_color_scheme = Some(value),
            OptionName::IncognitoColorScheme => self.incognito_color_scheme = Some(value),
        }
        self
    }

    pub fn get(&self, name: OptionName) -> Option<ColorScheme> {
        match name {
            OptionName::RegularColorScheme => self.regular_color_scheme,
            OptionName::IncognitoColorScheme => self.incognito_color_scheme,
        }
    }

    /// Storage items for the proposed values that differ from `current`.
    pub(crate) fn diff(&self, current: &OptionsSnapshot) -> Map<String, Value> {
        OptionName::ALL
            .into_iter()
            .filter_map(|name| {
                let proposed = self.get(name)?;
                (proposed != current.get(name))
                    .then(|| (name.key().to_owned(), Value::from(proposed.as_str())))
            })
            .collect()
    }
}

impl From<OptionsSnapshot> for PartialOptions {
    fn from(snapshot: OptionsSnapshot) -> Self {
        Self {
            regular_color_scheme: Some(snapshot.regular_color_scheme),
            incognito_color_scheme: Some(snapshot.incognito_color_scheme),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
