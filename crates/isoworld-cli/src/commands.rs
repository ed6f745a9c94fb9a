//! Subcommand implementations.
//!
//! Every command writes its report to the given writer so it can be
//! captured in tests; diagnostics go through `tracing`.

use crate::config::{Cli, Command};
use anyhow::{Context, Result, bail};
use isoworld_formats::segment::{BlockCoord, MapSegment};
use isoworld_formats::tileset::{TileEncoding, TileSet};
use isoworld_storage::{ArchivePack, BlockSource, DirectoryBlockSource, World, WorldConfig};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Run the command selected on the command line.
///
/// # Errors
///
/// Returns error if the configuration is invalid, an input cannot be read
/// or writing the report fails
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = cli.world_config().context("Invalid configuration")?;

    match &cli.command {
        Command::List { filter } => list(&config, filter.as_deref(), out),
        Command::Extract { name, out: path } => extract(&config, name, path, out),
        Command::Tileset { tileset: arg } => tileset(&config, arg, out),
        Command::Block { x, y } => block(&config, *x, *y, out),
        Command::Walk {
            x,
            y,
            dx,
            dy,
            steps,
        } => walk(config, (*x, *y), (*dx, *dy), *steps, out),
    }
}

fn open_pack(config: &WorldConfig) -> Result<ArchivePack> {
    ArchivePack::open(&config.pack_index, &config.pack_data).with_context(|| {
        format!(
            "Failed to open pack {} / {}",
            config.pack_index.display(),
            config.pack_data.display()
        )
    })
}

fn list(config: &WorldConfig, filter: Option<&str>, out: &mut impl Write) -> Result<()> {
    let pack = open_pack(config)?;
    let filter = filter.map(str::to_lowercase);

    let mut shown = 0usize;
    for entry in pack.entries() {
        if filter.as_ref().is_some_and(|f| !entry.name.contains(f.as_str())) {
            continue;
        }
        writeln!(out, "{:<20} {:>10} {:>10}", entry.name, entry.offset, entry.size)?;
        shown += 1;
    }

    writeln!(out, "{shown} of {} entries", pack.len())?;
    Ok(())
}

fn extract(config: &WorldConfig, name: &str, path: &Path, out: &mut impl Write) -> Result<()> {
    let pack = open_pack(config)?;
    let Some(data) = pack.raw_file_contents(name)? else {
        bail!("No entry named {name} in {}", config.pack_index.display());
    };

    std::fs::write(path, &data)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Extracted {} to {}", name, path.display());
    writeln!(out, "{} bytes written to {}", data.len(), path.display())?;
    Ok(())
}

/// Pack entry name for a tileset argument: bare ids become `<id>.til`.
fn tileset_entry(arg: &str) -> String {
    arg.parse::<u32>()
        .map_or_else(|_| arg.to_string(), TileSet::entry_name)
}

fn tileset(config: &WorldConfig, arg: &str, out: &mut impl Write) -> Result<()> {
    let pack = open_pack(config)?;
    let name = tileset_entry(arg);
    let Some(data) = pack.raw_file_contents(&name)? else {
        bail!("No tileset named {name} in {}", config.pack_index.display());
    };

    let set = TileSet::parse(&data).with_context(|| format!("Failed to decode {name}"))?;
    writeln!(
        out,
        "{name}: {} tiles, {} failed",
        set.len(),
        set.failures().len()
    )?;

    for (index, slot) in set.slots().iter().enumerate() {
        match slot {
            Some(tile) => {
                let encoding = match tile.encoding {
                    TileEncoding::Standard => "standard",
                    TileEncoding::Sprite => "sprite",
                };
                writeln!(
                    out,
                    "  {index:>3} {encoding:<8} {:>4} opaque",
                    tile.grid.opaque_count()
                )?;
            }
            None => writeln!(out, "  {index:>3} failed")?,
        }
    }

    for failure in set.failures() {
        writeln!(
            out,
            "  tile {} at offset {}: {}",
            failure.index, failure.offset, failure.error
        )?;
    }
    Ok(())
}

fn block(config: &WorldConfig, x: i32, y: i32, out: &mut impl Write) -> Result<()> {
    let coord = BlockCoord::containing(x, y);
    let Some(file_name) = coord.file_name() else {
        bail!("Block {coord} is outside the addressable range");
    };

    let source = DirectoryBlockSource::new(&config.map_root);
    let Some(data) = source
        .read_block(config.map_id, coord)
        .with_context(|| format!("Failed to read block {file_name}"))?
    else {
        bail!(
            "No block file {file_name} for map {} under {}",
            config.map_id,
            config.map_root.display()
        );
    };

    let segment = MapSegment::parse(&data, config.map_id, x, y)
        .with_context(|| format!("Failed to decode block {file_name}"))?;

    let ids: Vec<String> = segment.tile_ids().iter().map(u32::to_string).collect();
    writeln!(out, "block {} ({file_name}) on map {}", segment.origin(), segment.map_id())?;
    writeln!(out, "  decorations:  {}", segment.decoration_count())?;
    writeln!(
        out,
        "  objects:      {} ({} tiles)",
        segment.objects().len(),
        segment.object_tile_count()
    )?;
    writeln!(out, "  tilesets:     {}", ids.join(" "))?;
    Ok(())
}

fn walk(
    config: WorldConfig,
    start: (i32, i32),
    step: (i32, i32),
    steps: u32,
    out: &mut impl Write,
) -> Result<()> {
    let mut world = World::open(config).context("Failed to open world")?;
    let (mut cx, mut cy) = start;

    for n in 0..=steps {
        let report = world.tick(cx, cy);
        writeln!(
            out,
            "step {n:>3} ({cx}, {cy}): +{} -{} blocks ({} resident, {} missing, {} failed), +{} -{} tilesets ({} cached)",
            report.segments.loaded.len(),
            report.segments.evicted.len(),
            world.segments().resident_len(),
            report.segments.missing.len(),
            report.segments.failed.len(),
            report.tilesets.loaded.len(),
            report.tilesets.evicted.len(),
            world.tilesets().len()
        )?;

        cx = cx.saturating_add(step.0);
        cy = cy.saturating_add(step.1);
    }

    let stats = world.segments().stats();
    writeln!(
        out,
        "totals: {} loads, {} evictions, {} misses, {} failures",
        stats.loads, stats.evictions, stats.misses, stats.failures
    )?;
    Ok(())
}
