use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::ColorKey;
use crate::error::{MapError, Result};

// ── Origin ───────────────────────────────────────────────────────────────────

/// Where `y = 0` sits when a picture is turned into a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// `y = 0` is the bottom row of the picture (texture-coordinate convention).
    #[default]
    BottomLeft,
    /// `y = 0` is the top row, as stored in most image files.
    TopLeft,
}

// ── ScanOrder ────────────────────────────────────────────────────────────────

/// Cell visiting order shared by palette extraction and placement generation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// x outer, y inner: `(0,0), (0,1), … (1,0), (1,1), …`
    #[default]
    ColumnMajor,
    /// y outer, x inner: `(0,0), (1,0), … (0,1), (1,1), …`
    RowMajor,
}

impl ScanOrder {
    /// Length of the outer axis for a `width × height` grid.
    pub fn outer_len(self, width: u32, height: u32) -> u32 {
        match self {
            ScanOrder::ColumnMajor => width,
            ScanOrder::RowMajor => height,
        }
    }

    fn inner_len(self, width: u32, height: u32) -> u32 {
        match self {
            ScanOrder::ColumnMajor => height,
            ScanOrder::RowMajor => width,
        }
    }
}

/// Iterator over `(x, y)` cell coordinates in a [`ScanOrder`].
#[derive(Clone, Debug)]
pub struct ScanCells {
    order: ScanOrder,
    inner: u32,
    next: u64,
    end: u64,
}

impl ScanCells {
    pub fn new(width: u32, height: u32, order: ScanOrder) -> Self {
        Self::outer_range(width, height, order, 0..order.outer_len(width, height))
    }

    /// Only the cells whose outer coordinate lies in `outer`.
    /// Chunks of consecutive outer ranges concatenate back into the full scan.
    pub fn outer_range(width: u32, height: u32, order: ScanOrder, outer: Range<u32>) -> Self {
        let inner = order.inner_len(width, height);
        let limit = order.outer_len(width, height);
        let start = outer.start.min(limit) as u64;
        let end = outer.end.min(limit).max(outer.start.min(limit)) as u64;
        Self { order, inner, next: start * inner as u64, end: end * inner as u64 }
    }
}

impl Iterator for ScanCells {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.next >= self.end || self.inner == 0 {
            return None;
        }
        let outer = (self.next / self.inner as u64) as u32;
        let inner = (self.next % self.inner as u64) as u32;
        self.next += 1;

        Some(match self.order {
            ScanOrder::ColumnMajor => (outer, inner),
            ScanOrder::RowMajor => (inner, outer),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end.saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ScanCells {}

// ── PixelGrid ────────────────────────────────────────────────────────────────

/// Immutable `width × height` grid of RGBA colours.
///
/// Storage is row-major with row 0 at the **bottom**: `pixels[y * width + x]`.
/// A grid is never empty; constructors reject zero dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<ColorKey>,
}

impl PixelGrid {
    /// Build a grid from bottom-up row-major pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<ColorKey>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::invalid(format!("grid must not be empty (got {width}x{height})")));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(MapError::invalid(format!(
                "pixel buffer holds {} colours, {width}x{height} grid needs {expected}",
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Build from rows listed top to bottom, the way a picture reads.
    /// All rows must have the same length.
    pub fn from_rows_top_down(rows: &[&[ColorKey]]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        if rows.iter().any(|r| r.len() as u32 != width) {
            return Err(MapError::invalid("rows have differing lengths"));
        }
        let pixels = rows.iter().rev().flat_map(|r| r.iter().copied()).collect();
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bottom-up row-major pixel buffer.
    pub fn pixels(&self) -> &[ColorKey] {
        &self.pixels
    }

    /// Colour at `(x, y)`, or `None` out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<ColorKey> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|c| !c.is_transparent()).count()
    }

    pub fn cells(&self, order: ScanOrder) -> ScanCells {
        ScanCells::new(self.width, self.height, order)
    }

    // ── Image boundary ───────────────────────────────────────────────────────

    pub fn from_image(img: &DynamicImage, origin: Origin) -> Result<Self> {
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();

        let mut pixels = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            let src_y = match origin {
                Origin::BottomLeft => h - 1 - y,
                Origin::TopLeft => y,
            };
            for x in 0..w {
                pixels.push(ColorKey::from(*rgba.get_pixel(x, src_y)));
            }
        }
        Self::new(w, h, pixels)
    }

    /// Decode an encoded image (PNG) held in memory.
    pub fn from_memory(bytes: &[u8], origin: Origin) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(&img, origin)
    }

    pub fn load(path: impl AsRef<Path>, origin: Origin) -> Result<Self> {
        let img = image::open(path.as_ref())?;
        Self::from_image(&img, origin)
    }

    /// Scan `path` recursively for `.png` files and decode each as a map named
    /// after its file stem.
    ///
    /// Symlinks are followed. Unreadable entries, files that fail to decode
    /// and repeated stem names are skipped with a warning. The result is sorted by name.
    pub fn load_folder(path: impl AsRef<Path>, origin: Origin) -> Result<Vec<NamedMap>> {
        let root = path.as_ref();
        if !root.is_dir() {
            return Err(MapError::invalid(format!("{} is not a directory", root.display())));
        }

        let mut maps = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        for entry in walkdir::WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(path = ?e.path(), error = %e, "failed to read directory entry; skipping");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };

            if !seen_names.insert(name.clone()) {
                warn!(map = %name, path = ?file_path, "duplicate map name; skipping");
                continue;
            }

            match Self::load(file_path, origin) {
                Ok(grid) => maps.push(NamedMap { name, grid }),
                Err(e) => warn!(path = ?file_path, error = %e, "failed to load map; skipping"),
            }
        }

        maps.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = maps.len(), dir = %root.display(), "loaded pixel maps");
        Ok(maps)
    }
}

/// A decoded map paired with the file stem it was loaded from.
#[derive(Clone, Debug)]
pub struct NamedMap {
    pub name: String,
    pub grid: PixelGrid,
}
