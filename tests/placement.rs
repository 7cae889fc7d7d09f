use glam::Vec3;
use pixelmap::classify::{auto_fill, Prototypes};
use pixelmap::color::ColorKey;
use pixelmap::grid::{PixelGrid, ScanOrder};
use pixelmap::mapping::Mapping;
use pixelmap::palette::extract_palette;
use pixelmap::placement::*;

const R: ColorKey = ColorKey::RED;
const B: ColorKey = ColorKey::BLUE;
const G: ColorKey = ColorKey::GREEN;
const T: ColorKey = ColorKey::TRANSPARENT;

// ── helpers ───────────────────────────────────────────────────────────────────

/// (0,0)=red  (1,0)=transparent  (0,1)=blue  (1,1)=red
fn two_by_two() -> PixelGrid {
    PixelGrid::new(2, 2, vec![R, T, B, R]).unwrap()
}

fn red_blue() -> Mapping<&'static str> {
    Mapping::new().with(R, "A").with(B, "B")
}

/// Deterministic pseudo-random grid with a few colours and holes.
fn noisy_grid(w: u32, h: u32) -> PixelGrid {
    let colours = [R, G, B, T, ColorKey::WHITE, ColorKey::rgb(10, 20, 30)];
    let mut s = 0x2545_F491u32;
    let pixels = (0..w * h)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            colours[(s % colours.len() as u32) as usize]
        })
        .collect();
    PixelGrid::new(w, h, pixels).unwrap()
}

// ── generate_placements ───────────────────────────────────────────────────────

#[test]
fn two_by_two_scenario() {
    let out = generate_placements(&two_by_two(), &red_blue());
    assert_eq!(out, vec![
        Placement::new(0, 0, "A"),
        Placement::new(0, 1, "B"),
        Placement::new(1, 1, "A"),
    ]);
}

#[test]
fn row_major_changes_only_order() {
    let out = generate_placements_in(&two_by_two(), &red_blue(), ScanOrder::RowMajor);
    assert_eq!(out, vec![
        Placement::new(0, 0, "A"),
        Placement::new(0, 1, "B"),
        Placement::new(1, 1, "A"),
    ]);

    let grid = PixelGrid::new(2, 2, vec![R, B, B, R]).unwrap();
    let col: Vec<_> = generate_placements(&grid, &red_blue()).iter().map(|p| (p.x, p.y)).collect();
    let row: Vec<_> = generate_placements_in(&grid, &red_blue(), ScanOrder::RowMajor).iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(col, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    assert_eq!(row, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn duplicate_keys_resolve_to_first_entry() {
    let mapping = Mapping::new().with(R, "first").with(R, "second");
    let out = generate_placements(&PixelGrid::new(3, 1, vec![R; 3]).unwrap(), &mapping);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|p| p.object == "first"));
}

#[test]
fn unmapped_colour_is_silently_skipped() {
    let out = generate_placements(&PixelGrid::new(2, 1, vec![G, R]).unwrap(), &red_blue());
    assert_eq!(out, vec![Placement::new(1, 0, "A")]);
}

#[test]
fn transparent_key_never_places() {
    // Even a mapping entry for the transparent colour cannot produce a placement.
    let mapping = Mapping::new().with(T, "ghost").with(ColorKey::rgba(255, 0, 0, 0), "ghost");
    let grid = PixelGrid::new(2, 1, vec![T, ColorKey::rgba(255, 0, 0, 0)]).unwrap();
    assert!(generate_placements(&grid, &mapping).is_empty());
}

#[test]
fn empty_mapping_places_nothing() {
    let mapping: Mapping<u8> = Mapping::new();
    assert!(generate_placements(&two_by_two(), &mapping).is_empty());
}

#[test]
fn one_placement_per_mapped_opaque_pixel_and_none_on_transparent() {
    let grid = noisy_grid(13, 7);
    let mapping = Mapping::new().with(R, 'r').with(G, 'g').with(ColorKey::WHITE, 'w');
    let out = generate_placements(&grid, &mapping);

    for (x, y) in grid.cells(ScanOrder::ColumnMajor) {
        let c = grid.get(x, y).unwrap();
        let here: Vec<_> = out.iter().filter(|p| p.x == x && p.y == y).collect();
        match mapping.lookup(c) {
            Some(obj) if !c.is_transparent() => {
                assert_eq!(here.len(), 1, "cell ({x},{y})");
                assert_eq!(&here[0].object, obj);
            }
            _ => assert!(here.is_empty(), "cell ({x},{y})"),
        }
    }
}

#[test]
fn auto_filled_mapping_covers_every_opaque_pixel() {
    let grid = noisy_grid(9, 11);
    let table = auto_fill(&extract_palette(&grid), &Prototypes::from_fn(|c| c));
    let mapping = table.into_mapping().unwrap();
    assert_eq!(generate_placements(&grid, &mapping).len(), grid.opaque_count());
}

#[test]
fn world_position_is_ground_plane() {
    let p = Placement::new(3, 7, ());
    assert_eq!(p.world_position(), Vec3::new(3.0, 0.0, 7.0));
}

// ── lazy iterator ─────────────────────────────────────────────────────────────

#[test]
fn lazy_iterator_matches_eager() {
    let grid = noisy_grid(6, 6);
    let mapping = Mapping::new().with(B, 1).with(G, 2);
    let lazy: Vec<_> = placements(&grid, &mapping, ScanOrder::ColumnMajor).collect();
    assert_eq!(lazy, generate_placements(&grid, &mapping));
}

#[test]
fn lazy_iterator_can_stop_early() {
    let mapping = Mapping::new().with(R, "A");
    let first = placements(&two_by_two(), &mapping, ScanOrder::ColumnMajor).next();
    assert_eq!(first, Some(Placement::new(0, 0, "A")));
}

// ── parallel ──────────────────────────────────────────────────────────────────

#[test]
fn parallel_matches_serial() {
    let grid = noisy_grid(37, 23);
    let mapping = Mapping::new().with(R, 1).with(G, 2).with(B, 3).with(R, 4);
    for order in [ScanOrder::ColumnMajor, ScanOrder::RowMajor] {
        let serial = generate_placements_in(&grid, &mapping, order);
        for workers in [1, 2, 3, 8, 64] {
            assert_eq!(generate_placements_parallel(&grid, &mapping, order, workers), serial, "workers={workers}");
        }
    }
}

#[test]
fn parallel_zero_workers_runs_serial() {
    let out = generate_placements_parallel(&two_by_two(), &red_blue(), ScanOrder::ColumnMajor, 0);
    assert_eq!(out.len(), 3);
}

// ── coverage report ───────────────────────────────────────────────────────────

#[test]
fn report_lists_unmatched_colours_once_in_discovery_order() {
    // bottom-up rows: y=0: G R W ; y=1: T G B
    let w = ColorKey::WHITE;
    let grid = PixelGrid::new(3, 2, vec![G, R, w, T, G, B]).unwrap();
    let (out, report) = generate_with_report(&grid, &red_blue(), ScanOrder::ColumnMajor);

    assert_eq!(out, generate_placements(&grid, &red_blue()));
    assert_eq!(report.matched_pixels, 2);
    assert_eq!(report.transparent_pixels, 1);
    assert_eq!(report.unmatched, vec![
        UnmatchedColor { color: G, count: 2, first_seen: (0, 0) },
        UnmatchedColor { color: w, count: 1, first_seen: (2, 0) },
    ]);
    assert_eq!(report.unmatched_pixels(), 3);
    assert!(!report.is_complete());
}

#[test]
fn report_complete_when_everything_mapped() {
    let (_, report) = generate_with_report(&two_by_two(), &red_blue(), ScanOrder::ColumnMajor);
    assert!(report.is_complete());
    assert_eq!(report.matched_pixels + report.transparent_pixels, 4);
}
