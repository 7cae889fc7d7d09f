// A mapping is an ordered list. When two entries share a key the first one
// wins and later ones are dead; that is reported, never rejected.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::color::ColorKey;
use crate::error::Result;

/// One row of a [`Mapping`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry<Id> {
    pub color: ColorKey,
    pub object: Id,
}

/// Ordered `(ColorKey, Id)` table. `Id` is an opaque handle chosen by the
/// caller (a prefab name, an asset index, an enum...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping<Id> {
    entries: Vec<MappingEntry<Id>>,
}

impl<Id> Default for Mapping<Id> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<Id> Mapping<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, color: ColorKey, object: Id) {
        self.entries.push(MappingEntry { color, object });
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, color: ColorKey, object: Id) -> Self {
        self.push(color, object);
        self
    }

    pub fn entries(&self) -> &[MappingEntry<Id>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear first-match lookup.
    pub fn lookup(&self, color: ColorKey) -> Option<&Id> {
        self.entries.iter().find(|e| e.color == color).map(|e| &e.object)
    }

    /// Hashed index answering the same question as [`lookup`](Self::lookup).
    pub fn index(&self) -> MappingIndex {
        let mut slots = HashMap::with_capacity(self.entries.len());
        for (i, e) in self.entries.iter().enumerate() {
            slots.entry(e.color).or_insert(i);
        }
        MappingIndex { slots }
    }

    /// Entries shadowed by an earlier entry with the same key.
    pub fn duplicate_keys(&self) -> Vec<DuplicateKey> {
        let mut first: HashMap<ColorKey, usize> = HashMap::new();
        let mut dups = Vec::new();

        for (i, e) in self.entries.iter().enumerate() {
            match first.entry(e.color) {
                Entry::Vacant(v) => {
                    v.insert(i);
                }
                Entry::Occupied(o) => dups.push(DuplicateKey {
                    color: e.color,
                    kept: *o.get(),
                    shadowed: i,
                }),
            }
        }
        dups
    }
}

impl<Id: Serialize> Mapping<Id> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<Id: DeserializeOwned> Mapping<Id> {
    /// Parse a table written by [`to_json`](Self::to_json):
    ///
    /// ```json
    /// [ { "color": "#ff0000ff", "object": "Red" }, ... ]
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<Id> FromIterator<(ColorKey, Id)> for Mapping<Id> {
    fn from_iter<I: IntoIterator<Item = (ColorKey, Id)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(color, object)| MappingEntry { color, object }).collect(),
        }
    }
}

// ── MappingIndex ─────────────────────────────────────────────────────────────

/// Exact-key hash index into a [`Mapping`], keeping the first entry per key.
///
/// The index stores entry positions, so it is only valid for the mapping it
/// was built from.
#[derive(Clone, Debug, Default)]
pub struct MappingIndex {
    slots: HashMap<ColorKey, usize>,
}

impl MappingIndex {
    /// Position of the winning entry for `color`.
    #[inline]
    pub fn position(&self, color: ColorKey) -> Option<usize> {
        self.slots.get(&color).copied()
    }

    #[inline]
    pub fn resolve<'m, Id>(&self, mapping: &'m Mapping<Id>, color: ColorKey) -> Option<&'m Id> {
        self.position(color).and_then(|i| mapping.entries.get(i)).map(|e| &e.object)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A mapping entry that can never match because an earlier entry has its key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DuplicateKey {
    pub color: ColorKey,
    /// Index of the entry that wins.
    pub kept: usize,
    /// Index of the dead entry.
    pub shadowed: usize,
}
