use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use letter_mosaic::options::{DEFAULT_CELL_SIZE, DEFAULT_MAX_WIDTH, DEFAULT_OUTPUT, DEFAULT_TILE_DIR};
use letter_mosaic::{MosaicError, MosaicOptions, ResizeFilter, TileOrder, build_palette, read_source, render_mosaic};
use tracing_subscriber::{EnvFilter, fmt};

/// Rebuild an image as a mosaic of letter tiles.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source image path
    input: Option<PathBuf>,

    /// Directory of tile images
    #[arg(short, long, default_value = DEFAULT_TILE_DIR)]
    tiles: PathBuf,

    /// Widest working resolution, in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_MAX_WIDTH)]
    max_width: u32,

    /// Edge length of one tile in the output, in pixels
    #[arg(short, long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Output PNG path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Resampling filter for the source and the tiles
    #[arg(long, value_enum, default_value_t = ResizeFilter::CatmullRom)]
    filter: ResizeFilter,

    /// Scan tiles in file-name order instead of directory order
    #[arg(long)]
    sort_tiles: bool,
}

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    fmt().with_env_filter(EnvFilter::new(filter)).init();

    let args = Args::parse();

    let Some(input) = args.input else {
        println!("No image path provided");
        return Ok(());
    };

    let source = match read_source(&input) {
        Ok(bytes) => bytes,
        Err(MosaicError::InputNotFound(path)) => {
            println!("Couldn't find image at {}", path.display());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let options = MosaicOptions::default()
        .with_max_width(args.max_width)
        .with_cell_size(args.cell_size)
        .with_filter(args.filter)
        .with_tile_order(if args.sort_tiles {
            TileOrder::Name
        } else {
            TileOrder::Filesystem
        });
    options.validate()?;

    println!("Creating image. This may take a while...");

    let palette = build_palette(&args.tiles, options.tile_order)
        .with_context(|| format!("building palette from {}", args.tiles.display()))?;

    let png = render_mosaic(&source, &palette, &options)
        .with_context(|| format!("rendering mosaic for {}", input.display()))?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.output, png)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Saved → {}", args.output.display());
    println!("Done!");

    Ok(())
}
