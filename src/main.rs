// pixelmap - decode a pixel map into object placements
//
// Usage: pixelmap <map.png> [--mapping table.json] [--workers N] [--report] [--top-left]
//
// Without --mapping the table is auto-filled from the map's palette, using
// each guessed category name ("Red", "White", ...) as the object handle.

use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use pixelmap::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixelmap")]
#[command(about = "Decode a pixel map into colour-keyed object placements")]
struct Cli {
    /// PNG map to decode
    map: PathBuf,

    /// JSON mapping table; auto-filled from the palette when omitted
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Generation threads (at least 1)
    #[arg(long, default_value = "1")]
    workers: NonZeroUsize,

    /// Print a coverage report of unmapped colours
    #[arg(long)]
    report: bool,

    /// Treat the first image row as y = 0
    #[arg(long)]
    top_left: bool,
}

impl Cli {
    fn origin(&self) -> Origin {
        if self.top_left { Origin::TopLeft } else { Origin::BottomLeft }
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!(error = %err, "pixelmap failed");
        process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let grid = PixelGrid::load(&args.map, args.origin())?;
    info!(map = %args.map.display(), width = grid.width(), height = grid.height(), "map loaded");

    let palette = extract_palette(&grid);
    println!("Palette ({} colours):", palette.len());
    for c in &palette {
        println!("  {c}  -> {}", classify_color(*c));
    }

    let mapping: Mapping<String> = match &args.mapping {
        Some(path) => Mapping::from_json(&fs::read_to_string(path)?)?,
        None => {
            let prototypes = Prototypes::from_fn(|c| c.name().to_string());
            auto_fill(&palette, &prototypes).into_mapping()?
        }
    };

    let config = GeneratorConfig {
        origin: args.origin(),
        workers: args.workers.get(),
        coverage_report: args.report,
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(mapping, config)?;
    let generation = generator.generate(&grid);

    println!("Placements ({}):", generation.placements.len());
    for p in &generation.placements {
        let w = p.world_position();
        println!("  ({:>3}, {:>3})  {:<12} world ({}, {}, {})", p.x, p.y, p.object, w.x, w.y, w.z);
    }

    if let Some(report) = generation.report {
        println!(
            "Coverage: {} matched, {} transparent, {} unmatched",
            report.matched_pixels,
            report.transparent_pixels,
            report.unmatched_pixels()
        );
        for u in &report.unmatched {
            println!("  unmatched {}  x{}  first at {:?}", u.color, u.count, u.first_seen);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
