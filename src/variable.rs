// A variable keeps an authored `initial` value and a `runtime` copy. Reads
// and writes go to `initial` while persistent, to `runtime` otherwise.
// Read-only variables refuse writes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MapError, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeMode {
    #[default]
    ReadOnly,
    ReadWrite,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persistence {
    #[default]
    None,
    Persist,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable<T> {
    initial: T,
    runtime: T,
    mode: RuntimeMode,
    persistence: Persistence,
}

impl<T: Clone> Variable<T> {
    /// Read-only, non-persistent variable whose runtime value starts at `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            runtime: initial.clone(),
            initial,
            mode: RuntimeMode::ReadOnly,
            persistence: Persistence::None,
        }
    }

    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = persistence;
        self
    }

    /// Reset the runtime value after loading. Persistent variables keep it.
    pub fn after_load(&mut self) {
        if !self.is_persistent() {
            self.runtime = self.initial.clone();
        }
    }

    /// Copy the runtime value over the initial one.
    pub fn save_to_initial(&mut self) {
        self.initial = self.runtime.clone();
    }
}

impl<T> Variable<T> {
    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.persistence == Persistence::Persist
    }

    pub fn mode(&self) -> RuntimeMode {
        self.mode
    }

    pub fn persistence(&self) -> Persistence {
        self.persistence
    }

    pub fn initial(&self) -> &T {
        &self.initial
    }

    pub fn get(&self) -> &T {
        if self.is_persistent() { &self.initial } else { &self.runtime }
    }

    pub fn set(&mut self, value: T) -> Result<()> {
        match self.mode {
            RuntimeMode::ReadOnly => {
                warn!("attempted to set a read-only variable");
                Err(MapError::ReadOnly)
            }
            RuntimeMode::ReadWrite => {
                if self.is_persistent() {
                    self.initial = value;
                } else {
                    self.runtime = value;
                }
                Ok(())
            }
        }
    }

    pub fn toggle_persistence(&mut self) {
        self.persistence = match self.persistence {
            Persistence::None => Persistence::Persist,
            Persistence::Persist => Persistence::None,
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            RuntimeMode::ReadOnly => RuntimeMode::ReadWrite,
            RuntimeMode::ReadWrite => RuntimeMode::ReadOnly,
        };
    }
}

// ── Reference ────────────────────────────────────────────────────────────────

/// A value that is either written inline or read through a shared [`Variable`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Reference<T> {
    Constant(T),
    Variable(Variable<T>),
}

impl<T> Reference<T> {
    pub fn is_constant(&self) -> bool {
        matches!(self, Reference::Constant(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Reference::Constant(v) => v,
            Reference::Variable(var) => var.get(),
        }
    }

    /// Constants are always writable; variables follow their runtime mode.
    pub fn set(&mut self, value: T) -> Result<()> {
        match self {
            Reference::Constant(v) => {
                *v = value;
                Ok(())
            }
            Reference::Variable(var) => var.set(value),
        }
    }

    pub fn as_variable(&self) -> Option<&Variable<T>> {
        match self {
            Reference::Constant(_) => None,
            Reference::Variable(var) => Some(var),
        }
    }
}

impl<T: Clone> Reference<T> {
    /// Current value of `self`, detached from any variable.
    pub fn to_constant(&self) -> Self {
        Reference::Constant(self.get().clone())
    }
}

impl<T> From<T> for Reference<T> {
    fn from(value: T) -> Self {
        Reference::Constant(value)
    }
}

impl<T> From<Variable<T>> for Reference<T> {
    fn from(var: Variable<T>) -> Self {
        Reference::Variable(var)
    }
}
