use std::collections::HashSet;

use tracing::debug;

use crate::color::ColorKey;
use crate::grid::{PixelGrid, ScanOrder};

/// Distinct opaque colours of a grid in first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<ColorKey>,
}

impl Palette {
    pub fn colors(&self) -> &[ColorKey] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: ColorKey) -> bool {
        self.colors.contains(&color)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorKey> {
        self.colors.iter()
    }
}

impl IntoIterator for Palette {
    type Item = ColorKey;
    type IntoIter = std::vec::IntoIter<ColorKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a ColorKey;
    type IntoIter = std::slice::Iter<'a, ColorKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

/// Collect the palette of `grid`, scanning x outer / y inner.
///
/// Transparent cells (alpha 0) are ignored. Pure: the same grid always yields
/// the same palette in the same order.
pub fn extract_palette(grid: &PixelGrid) -> Palette {
    extract_palette_in(grid, ScanOrder::ColumnMajor)
}

/// [`extract_palette`] with an explicit scan order. The order only changes
/// which colour is discovered first.
pub fn extract_palette_in(grid: &PixelGrid, order: ScanOrder) -> Palette {
    let mut seen: HashSet<ColorKey> = HashSet::new();
    let mut colors = Vec::new();

    for (x, y) in grid.cells(order) {
        let Some(c) = grid.get(x, y) else { continue };
        if c.is_transparent() {
            continue;
        }
        if seen.insert(c) {
            colors.push(c);
        }
    }

    debug!(colors = colors.len(), width = grid.width(), height = grid.height(), "palette extracted");
    Palette { colors }
}
