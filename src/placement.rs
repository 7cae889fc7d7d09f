// Every cell is visited once in scan order. An opaque cell whose colour is a
// mapping key yields one placement with the first matching entry's object;
// transparent and unmapped cells yield nothing. Output order is scan order
// and callers instantiate in that order.

use std::collections::HashMap;
use std::ops::Range;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::ColorKey;
use crate::grid::{PixelGrid, ScanCells, ScanOrder};
use crate::mapping::{Mapping, MappingIndex};

/// One decided spawn: object `object` at grid cell `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement<Id> {
    pub x: u32,
    pub y: u32,
    pub object: Id,
}

impl<Id> Placement<Id> {
    pub fn new(x: u32, y: u32, object: Id) -> Self {
        Self { x, y, object }
    }

    /// Pixel `(x, y)` lies on the ground plane at world `(x, 0, y)`.
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.x as f32, 0.0, self.y as f32)
    }
}

// ── Lazy iterator ────────────────────────────────────────────────────────────

/// Lazily yields placements in scan order. Built by [`placements`].
pub struct Placements<'a, Id> {
    grid: &'a PixelGrid,
    mapping: &'a Mapping<Id>,
    index: MappingIndex,
    cells: ScanCells,
}

impl<'a, Id: Clone> Iterator for Placements<'a, Id> {
    type Item = Placement<Id>;

    fn next(&mut self) -> Option<Placement<Id>> {
        for (x, y) in self.cells.by_ref() {
            let Some(c) = self.grid.get(x, y) else { continue };
            if c.is_transparent() {
                continue;
            }
            if let Some(object) = self.index.resolve(self.mapping, c) {
                return Some(Placement::new(x, y, object.clone()));
            }
        }
        None
    }
}

/// Lazy form of [`generate_placements`] with an explicit scan order.
pub fn placements<'a, Id: Clone>(
    grid: &'a PixelGrid,
    mapping: &'a Mapping<Id>,
    order: ScanOrder,
) -> Placements<'a, Id> {
    Placements { grid, mapping, index: mapping.index(), cells: grid.cells(order) }
}

fn placements_in<'a, Id: Clone>(
    grid: &'a PixelGrid,
    mapping: &'a Mapping<Id>,
    index: MappingIndex,
    order: ScanOrder,
    outer: Range<u32>,
) -> Placements<'a, Id> {
    let cells = ScanCells::outer_range(grid.width(), grid.height(), order, outer);
    Placements { grid, mapping, index, cells }
}

pub(crate) fn warn_duplicates<Id>(mapping: &Mapping<Id>) {
    for d in mapping.duplicate_keys() {
        warn!(color = %d.color, kept = d.kept, shadowed = d.shadowed, "duplicate mapping key; later entry is never used");
    }
}

// ── Eager generation ─────────────────────────────────────────────────────────

/// Generate every placement for `grid`, x outer / y inner.
pub fn generate_placements<Id: Clone>(grid: &PixelGrid, mapping: &Mapping<Id>) -> Vec<Placement<Id>> {
    generate_placements_in(grid, mapping, ScanOrder::ColumnMajor)
}

pub fn generate_placements_in<Id: Clone>(
    grid: &PixelGrid,
    mapping: &Mapping<Id>,
    order: ScanOrder,
) -> Vec<Placement<Id>> {
    warn_duplicates(mapping);
    let out: Vec<_> = placements(grid, mapping, order).collect();
    debug!(placements = out.len(), entries = mapping.len(), "placements generated");
    out
}

/// Same output as [`generate_placements_in`], computed on up to `workers`
/// scoped threads.
///
/// The outer scan axis is cut into contiguous chunks, one per thread; chunk
/// results are concatenated in chunk order, which is scan order.
pub fn generate_placements_parallel<Id: Clone + Send + Sync>(
    grid: &PixelGrid,
    mapping: &Mapping<Id>,
    order: ScanOrder,
    workers: usize,
) -> Vec<Placement<Id>> {
    let outer = order.outer_len(grid.width(), grid.height());
    let workers = workers.clamp(1, outer as usize);
    if workers == 1 {
        return generate_placements_in(grid, mapping, order);
    }

    warn_duplicates(mapping);
    let index = mapping.index();
    let chunk = outer.div_ceil(workers as u32);

    let parts: Vec<Vec<Placement<Id>>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..outer)
            .step_by(chunk as usize)
            .map(|start| {
                let range = start..(start + chunk).min(outer);
                let index = index.clone();
                s.spawn(move || placements_in(grid, mapping, index, order, range).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
            .collect()
    });

    let out: Vec<_> = parts.into_iter().flatten().collect();
    debug!(placements = out.len(), workers, "placements generated in parallel");
    out
}

// ── Coverage report ──────────────────────────────────────────────────────────

/// An opaque colour with no mapping entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnmatchedColor {
    pub color: ColorKey,
    /// Number of cells with this colour.
    pub count: usize,
    /// First cell (in scan order) with this colour.
    pub first_seen: (u32, u32),
}

/// Opt-in diagnostic describing what a generation pass skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Unmapped opaque colours in discovery order.
    pub unmatched: Vec<UnmatchedColor>,
    pub matched_pixels: usize,
    pub transparent_pixels: usize,
}

impl CoverageReport {
    /// Every opaque cell produced a placement.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    pub fn unmatched_pixels(&self) -> usize {
        self.unmatched.iter().map(|u| u.count).sum()
    }
}

/// [`generate_placements_in`] plus a [`CoverageReport`] of skipped cells.
/// The placements are identical to the plain call.
pub fn generate_with_report<Id: Clone>(
    grid: &PixelGrid,
    mapping: &Mapping<Id>,
    order: ScanOrder,
) -> (Vec<Placement<Id>>, CoverageReport) {
    warn_duplicates(mapping);
    let index = mapping.index();

    let mut out = Vec::new();
    let mut report = CoverageReport::default();
    let mut unmatched_at: HashMap<ColorKey, usize> = HashMap::new();

    for (x, y) in grid.cells(order) {
        let Some(c) = grid.get(x, y) else { continue };
        if c.is_transparent() {
            report.transparent_pixels += 1;
            continue;
        }
        match index.resolve(mapping, c) {
            Some(object) => {
                report.matched_pixels += 1;
                out.push(Placement::new(x, y, object.clone()));
            }
            None => {
                let slot = *unmatched_at.entry(c).or_insert_with(|| {
                    report.unmatched.push(UnmatchedColor { color: c, count: 0, first_seen: (x, y) });
                    report.unmatched.len() - 1
                });
                report.unmatched[slot].count += 1;
            }
        }
    }

    if !report.is_complete() {
        debug!(colors = report.unmatched.len(), pixels = report.unmatched_pixels(), "unmapped colours skipped");
    }
    (out, report)
}
