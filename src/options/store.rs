//! Single-observer wrapper around the synced options storage.

use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{resolve, OptionName, OptionsSnapshot, PartialOptions};
use crate::error::{Error, Result};
use crate::lifecycle::{LoadState, Lifecycle};

const COMPONENT: &str = "options";

/// Host access to the browser's synced key/value storage.
///
/// Change notifications are not part of this trait: the host forwards them
/// to [`OptionsStore::handle_changes`] as they arrive.
#[allow(async_fn_in_trait)]
pub trait SyncStorage {
    type Error: Display;

    /// Reads every persisted key/value pair.
    async fn get_all(&self) -> Result<Map<String, Value>, Self::Error>;

    /// Persists `items`, leaving other keys untouched.
    fn set(&self, items: Map<String, Value>) -> Result<(), Self::Error>;
}

/// One entry of a storage change notification.
///
/// ```json
/// { "oldValue": "darkfg", "newValue": "lightfg" }
/// ```
///
/// A missing `newValue` means the key was removed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// A storage change notification, keyed by storage key.
pub type ChangeSet = HashMap<String, StorageChange>;

/// Callback fired with the current snapshot and the options that changed.
pub type OptionsObserver = Box<dyn FnMut(&OptionsSnapshot, &[OptionName])>;

/// Keeps an [`OptionsSnapshot`] in sync with a [`SyncStorage`] backend.
///
/// # Example
///
/// ```
/// use addr_badge::{ColorScheme, OptionName, OptionsStore, PartialOptions, SyncStorage};
/// use serde_json::{Map, Value};
///
/// struct Empty;
///
/// impl SyncStorage for Empty {
///     type Error = String;
///     async fn get_all(&self) -> Result<Map<String, Value>, String> {
///         Ok(Map::new())
///     }
///     fn set(&self, _items: Map<String, Value>) -> Result<(), String> {
///         Ok(())
///     }
/// }
///
/// # async fn demo() -> addr_badge::Result<()> {
/// let mut store = OptionsStore::new(Empty);
/// store.watch(|snapshot, changed| {
///     for name in changed {
///         println!("{name} = {}", snapshot.get(*name));
///     }
/// })?;
/// store.load().await?;
///
/// let proposed = PartialOptions::new()
///     .with(OptionName::RegularColorScheme, ColorScheme::LightForeground);
/// assert!(store.set(&proposed)?);
/// # Ok(())
/// # }
/// ```
pub struct OptionsStore<S> {
    storage: S,
    snapshot: Lifecycle<OptionsSnapshot>,
    observer: Option<OptionsObserver>,
}

impl<S: SyncStorage> OptionsStore<S> {
    /// Creates a store that has not read from `storage` yet.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            snapshot: Lifecycle::new(COMPONENT),
            observer: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current readiness of the snapshot.
    pub fn state(&self) -> LoadState {
        self.snapshot.state()
    }

    /// The current snapshot. Fails until [`load`](Self::load) completes.
    pub fn snapshot(&self) -> Result<&OptionsSnapshot> {
        self.snapshot.get()
    }

    /// Reads all persisted values and marks the snapshot ready.
    ///
    /// An observer registered beforehand fires once with every recognized
    /// option.
    pub async fn load(&mut self) -> Result<()> {
        self.snapshot.begin()?;
        let outcome = self
            .storage
            .get_all()
            .await
            .map(|items| OptionsSnapshot::from_items(&items))
            .map_err(|e| Error::Storage(e.to_string()));
        let snapshot = self.snapshot.finish(outcome)?;
        info!(?snapshot, "options ready");
        self.notify(&OptionName::ALL);
        Ok(())
    }

    /// Registers the observer for option changes.
    ///
    /// Only one observer may be registered at a time. If the snapshot is
    /// already ready the observer fires immediately with every option.
    pub fn watch<F>(&mut self, observer: F) -> Result<()>
    where
        F: FnMut(&OptionsSnapshot, &[OptionName]) + 'static,
    {
        if self.observer.is_some() {
            return Err(Error::AlreadyWatching);
        }
        self.observer = Some(Box::new(observer));
        if self.state().is_ready() {
            self.notify(&OptionName::ALL);
        }
        Ok(())
    }

    /// Removes the registered observer. Returns false if there was none.
    pub fn unwatch(&mut self) -> bool {
        self.observer.take().is_some()
    }

    /// Applies a storage change notification.
    ///
    /// Unrecognized keys are ignored and a removed value reverts to the
    /// option's default. The observer fires with the options whose value
    /// actually changed, if any. Notifications that arrive before the
    /// snapshot is ready are dropped; the pending initial read already sees
    /// the new values.
    pub fn handle_changes(&mut self, changes: &ChangeSet) -> Vec<OptionName> {
        let Ok(snapshot) = self.snapshot.get_mut() else {
            debug!(keys = changes.len(), "options not ready, dropping change notification");
            return Vec::new();
        };

        let mut changed = Vec::new();
        for name in OptionName::ALL {
            let Some(change) = changes.get(name.key()) else {
                continue;
            };
            let value = resolve(name, change.new_value.as_ref());
            if snapshot.get(name) != value {
                snapshot.set(name, value);
                changed.push(name);
            }
        }

        debug!(?changed, "applied storage changes");
        if !changed.is_empty() {
            self.notify(&changed);
        }
        changed
    }

    /// Parses a JSON change notification and applies it.
    pub fn handle_changes_json(&mut self, json: &str) -> Result<Vec<OptionName>> {
        let changes: ChangeSet = serde_json::from_str(json)?;
        Ok(self.handle_changes(&changes))
    }

    /// Writes the proposed options that differ from the snapshot.
    ///
    /// Returns `false` without touching storage when nothing differs. A
    /// `true` return only means the write was issued: the snapshot updates
    /// when the change notification comes back through
    /// [`handle_changes`](Self::handle_changes).
    pub fn set(&mut self, proposed: &PartialOptions) -> Result<bool> {
        let items = proposed.diff(self.snapshot.get()?);
        debug!(?proposed, changed = items.len(), "set options");
        if items.is_empty() {
            return Ok(false);
        }
        self.storage
            .set(items)
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(true)
    }

    fn notify(&mut self, names: &[OptionName]) {
        let (Some(observer), Ok(snapshot)) = (self.observer.as_mut(), self.snapshot.get()) else {
            return;
        };
        observer(snapshot, names);
    }
}
