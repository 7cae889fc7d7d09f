pub mod config;
pub mod level;

pub use config::GeneratorConfig;
pub use level::Level;

use std::path::Path;

use glam::Vec3;
use tracing::debug;

use crate::error::Result;
use crate::grid::PixelGrid;
use crate::mapping::Mapping;
use crate::placement::{
    generate_placements_parallel, generate_with_report, CoverageReport, Placement,
};

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Output boundary: whatever creates world objects from placements.
///
/// Handles arrive explicitly with each call; a spawner never looks objects up
/// by name. Closures `FnMut(&Id, Vec3)` are spawners.
pub trait Spawner<Id> {
    fn spawn(&mut self, object: &Id, position: Vec3);
}

impl<Id, F: FnMut(&Id, Vec3)> Spawner<Id> for F {
    fn spawn(&mut self, object: &Id, position: Vec3) {
        self(object, position)
    }
}

/// Hand every placement to `spawner` in placement order, at its world
/// position. Returns the number spawned.
pub fn spawn_level<Id>(placements: &[Placement<Id>], spawner: &mut impl Spawner<Id>) -> usize {
    for p in placements {
        spawner.spawn(&p.object, p.world_position());
    }
    placements.len()
}

// ── Generator ────────────────────────────────────────────────────────────────

/// Result of one [`Generator::generate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation<Id> {
    pub placements: Vec<Placement<Id>>,
    /// Present when `coverage_report` is enabled in the config.
    pub report: Option<CoverageReport>,
}

/// A mapping bound to a config, reusable across many maps.
#[derive(Clone, Debug)]
pub struct Generator<Id> {
    mapping: Mapping<Id>,
    config: GeneratorConfig,
}

impl<Id: Clone + Send + Sync> Generator<Id> {
    pub fn new(mapping: Mapping<Id>, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { mapping, config })
    }

    pub fn mapping(&self) -> &Mapping<Id> {
        &self.mapping
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Placements for `grid` in configured scan order.
    ///
    /// With `coverage_report` on, the scan runs on one thread regardless of
    /// `workers`; the placements are the same either way.
    pub fn generate(&self, grid: &PixelGrid) -> Generation<Id> {
        let order = self.config.scan_order;
        if self.config.coverage_report {
            let (placements, report) = generate_with_report(grid, &self.mapping, order);
            return Generation { placements, report: Some(report) };
        }
        let placements = generate_placements_parallel(grid, &self.mapping, order, self.config.workers);
        Generation { placements, report: None }
    }

    /// Decode the image at `path` with the configured origin and generate.
    pub fn load_and_generate(&self, path: impl AsRef<Path>) -> Result<Generation<Id>> {
        let grid = PixelGrid::load(path.as_ref(), self.config.origin)?;
        debug!(path = %path.as_ref().display(), width = grid.width(), height = grid.height(), "map loaded");
        Ok(self.generate(&grid))
    }

    /// Generate and wrap the result as a named [`Level`].
    pub fn build_level(&self, name: impl Into<String>, grid: &PixelGrid) -> Result<Level<Id>> {
        let generation = self.generate(grid);
        Level::new(name, grid.width(), grid.height(), generation.placements)
    }
}
