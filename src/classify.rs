// Only used to pre-fill a table from a palette. Placement generation never
// looks at categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::ColorKey;
use crate::error::{MapError, Result};
use crate::mapping::Mapping;
use crate::palette::Palette;

// ── Category ─────────────────────────────────────────────────────────────────

/// Coarse object category guessed from a colour's full-intensity channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    White,
    Red,
    Green,
    Blue,
    Black,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::White,
        Category::Red,
        Category::Green,
        Category::Blue,
        Category::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::White => "White",
            Category::Red => "Red",
            Category::Green => "Green",
            Category::Blue => "Blue",
            Category::Black => "Black",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Guess a category, first match wins:
///
/// | test            | category |
/// |-----------------|----------|
/// | r full, g full  | White    |
/// | r full          | Red      |
/// | g full          | Green    |
/// | b full          | Blue     |
/// | otherwise       | Black    |
///
/// "Full" means 255. Yellow lands on White and magenta on Red; anything
/// without a full channel is Black. Alpha is ignored.
pub fn classify_color(c: ColorKey) -> Category {
    let full = ColorKey::is_full;
    if full(c.r) && full(c.g) {
        Category::White
    } else if full(c.r) {
        Category::Red
    } else if full(c.g) {
        Category::Green
    } else if full(c.b) {
        Category::Blue
    } else {
        Category::Black
    }
}

// ── Prototypes ───────────────────────────────────────────────────────────────

/// Object handle registered per [`Category`], injected by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prototypes<Id> {
    slots: [Option<Id>; 5],
}

impl<Id> Default for Prototypes<Id> {
    fn default() -> Self {
        Self { slots: [None, None, None, None, None] }
    }
}

impl<Id> Prototypes<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `object` for `category`, returning the handle it replaced.
    pub fn register(&mut self, category: Category, object: Id) -> Option<Id> {
        self.slots[category.slot()].replace(object)
    }

    pub fn with(mut self, category: Category, object: Id) -> Self {
        self.register(category, object);
        self
    }

    pub fn get(&self, category: Category) -> Option<&Id> {
        self.slots[category.slot()].as_ref()
    }

    /// Categories with nothing registered, in [`Category::ALL`] order.
    pub fn missing(&self) -> Vec<Category> {
        Category::ALL.into_iter().filter(|c| self.get(*c).is_none()).collect()
    }
}

impl<Id: Clone> Prototypes<Id> {
    /// Register one handle per category produced by `f`.
    pub fn from_fn(mut f: impl FnMut(Category) -> Id) -> Self {
        let mut p = Self::new();
        for c in Category::ALL {
            p.register(c, f(c));
        }
        p
    }
}

// ── AuthoringTable ───────────────────────────────────────────────────────────

/// One auto-filled row: a palette colour, its guessed category and the object
/// registered for that category (if any).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow<Id> {
    pub color: ColorKey,
    pub category: Category,
    pub object: Option<Id>,
}

/// A row whose category had no registered object.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedSlot {
    pub row: usize,
    pub color: ColorKey,
    pub category: Category,
}

/// Editable colour → object table pre-filled from a palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthoringTable<Id> {
    rows: Vec<TableRow<Id>>,
}

impl<Id> AuthoringTable<Id> {
    pub fn rows(&self) -> &[TableRow<Id>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Override the object of row `index`. Returns `false` if out of range.
    pub fn set_object(&mut self, index: usize, object: Id) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.object = Some(object);
                true
            }
            None => false,
        }
    }

    pub fn unresolved(&self) -> Vec<UnresolvedSlot> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.object.is_none())
            .map(|(row, r)| UnresolvedSlot { row, color: r.color, category: r.category })
            .collect()
    }

    /// Convert to a [`Mapping`]; fails listing every unresolved row.
    pub fn into_mapping(self) -> Result<Mapping<Id>> {
        let unresolved = self.unresolved();
        if !unresolved.is_empty() {
            return Err(MapError::Unresolved(unresolved));
        }
        Ok(self.rows.into_iter().filter_map(|r| r.object.map(|o| (r.color, o))).collect())
    }
}

impl<Id: Clone> AuthoringTable<Id> {
    /// Mapping of the resolved rows only; unresolved rows are dropped with a
    /// warning.
    pub fn resolved_mapping(&self) -> Mapping<Id> {
        for slot in self.unresolved() {
            warn!(row = slot.row, color = %slot.color, category = %slot.category, "no object registered; row dropped");
        }
        self.rows
            .iter()
            .filter_map(|r| r.object.clone().map(|o| (r.color, o)))
            .collect()
    }
}

/// Pre-fill an authoring table: one row per palette colour, in palette order.
pub fn auto_fill<Id: Clone>(palette: &Palette, prototypes: &Prototypes<Id>) -> AuthoringTable<Id> {
    let rows = palette
        .iter()
        .map(|&color| {
            let category = classify_color(color);
            TableRow { color, category, object: prototypes.get(category).cloned() }
        })
        .collect();
    AuthoringTable { rows }
}
