//! Readiness tracking for components that initialize asynchronously.
//!
//! Both the sprite atlas and the options snapshot are loaded once at startup.
//! [`Lifecycle`] holds the loaded value together with the state it is in, so
//! a component can only hand out the value after the load has finished.

use crate::error::{Error, Result};

/// Observable initialization state of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing has been requested yet.
    #[default]
    Uninitialized,
    /// The load is in flight.
    Loading,
    /// The component can be used.
    Ready,
    /// The load failed. This is permanent for the lifetime of the component.
    Failed,
}

impl LoadState {
    /// Returns true once the component is usable.
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// A value that moves through `Uninitialized -> Loading -> Ready | Failed`.
#[derive(Debug)]
pub(crate) struct Lifecycle<T> {
    component: &'static str,
    stage: Stage<T>,
}

#[derive(Debug)]
enum Stage<T> {
    Uninitialized,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Lifecycle<T> {
    pub(crate) fn new(component: &'static str) -> Self {
        Self {
            component,
            stage: Stage::Uninitialized,
        }
    }

    /// Creates a lifecycle that is already ready with `value`.
    pub(crate) fn ready(component: &'static str, value: T) -> Self {
        Self {
            component,
            stage: Stage::Ready(value),
        }
    }

    pub(crate) fn state(&self) -> LoadState {
        match self.stage {
            Stage::Uninitialized => LoadState::Uninitialized,
            Stage::Loading => LoadState::Loading,
            Stage::Ready(_) => LoadState::Ready,
            Stage::Failed(_) => LoadState::Failed,
        }
    }

    /// Moves to `Loading`. Only valid from `Uninitialized`.
    pub(crate) fn begin(&mut self) -> Result<()> {
        match self.stage {
            Stage::Uninitialized => {
                self.stage = Stage::Loading;
                Ok(())
            }
            _ => Err(Error::AlreadyStarted {
                component: self.component,
            }),
        }
    }

    /// Records the outcome of the load started with [`begin`](Self::begin).
    ///
    /// On failure the error is returned unchanged and its message is kept so
    /// later calls can report why the component is unusable.
    pub(crate) fn finish(&mut self, outcome: Result<T>) -> Result<&mut T> {
        match outcome {
            Ok(value) => {
                self.stage = Stage::Ready(value);
                self.get_mut()
            }
            Err(err) => {
                self.stage = Stage::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub(crate) fn get(&self) -> Result<&T> {
        match &self.stage {
            Stage::Ready(value) => Ok(value),
            other => Err(self.unavailable(other)),
        }
    }

    pub(crate) fn get_mut(&mut self) -> Result<&mut T> {
        let component = self.component;
        match &mut self.stage {
            Stage::Ready(value) => Ok(value),
            Stage::Failed(reason) => Err(Error::LoadFailed {
                component,
                reason: reason.clone(),
            }),
            Stage::Uninitialized | Stage::Loading => Err(Error::NotReady { component }),
        }
    }

    fn unavailable(&self, stage: &Stage<T>) -> Error {
        match stage {
            Stage::Failed(reason) => Error::LoadFailed {
                component: self.component,
                reason: reason.clone(),
            },
            _ => Error::NotReady {
                component: self.component,
            },
        }
    }
}
