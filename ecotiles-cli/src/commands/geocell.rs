//! `ecotiles geocell` - show how a tile maps to its geocell and cache keys.

use clap::Args;
use ecotiles::cache::{BucketKey, TileKey};
use ecotiles::config::ConfigFile;
use ecotiles::coord::{tile_bounds, TileCoord};
use ecotiles::dataset::Band;
use ecotiles::geocell::{cell_for_tile, covering_region};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct GeocellArgs {
    /// Tile column
    pub x: u32,
    /// Tile row
    pub y: u32,
    /// Zoom level
    pub z: u8,

    /// Geohash length (defaults to tiles.geocell_precision)
    #[arg(long)]
    pub precision: Option<usize>,

    /// Year used in the cache keys
    #[arg(long, default_value = "2023")]
    pub year: i32,

    /// Band used in the cache keys (presence or height)
    #[arg(long, default_value = "presence")]
    pub band: String,
}

pub fn run(config: &ConfigFile, args: GeocellArgs) -> Result<(), CliError> {
    let tile = TileCoord::checked(args.x, args.y, args.z)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let band: Band = args
        .band
        .parse()
        .map_err(|e: ecotiles::dataset::UnknownBand| CliError::InvalidInput(e.to_string()))?;
    let precision = args.precision.unwrap_or(config.tiles.geocell_precision);

    let cell = cell_for_tile(&tile, precision).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let bucket = BucketKey::new(&config.tiles.default_dataset, band.as_str(), args.year, &cell);
    let tile_key = TileKey::for_tile(&bucket, &tile);

    println!("Tile:            {}", tile);
    println!("Tile bounds:     {}", tile_bounds(&tile));
    println!("Geocell:         {} (precision {})", cell, precision);
    println!("Geocell bounds:  {}", cell.bounding_box());
    println!(
        "Query region:    {}",
        covering_region(&cell, config.tiles.min_zoom)
    );
    println!("URL cache key:   {}", bucket);
    println!("Image cache key: {}", tile_key);
    Ok(())
}
