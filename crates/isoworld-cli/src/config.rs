//! Command-line configuration.
//!
//! Settings are resolved in this order, later sources winning:
//! - Built-in defaults (see [`WorldConfig::default`])
//! - A JSON file given with `--config`
//! - Individual flags or their `ISOWORLD_*` environment variables
//!
//! # Example
//!
//! ```no_run
//! use isoworld_cli::Cli;
//!
//! let cli = Cli::from_args();
//! let config = cli.world_config().expect("Invalid configuration");
//! println!("Reading blocks of map {} from {}", config.map_id, config.map_root.display());
//! ```

use clap::{ArgAction, Parser, Subcommand};
use isoworld_storage::{Result, WorldConfig};
use std::path::PathBuf;

/// Inspect isometric world packs, tilesets and map blocks.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "isoworld",
    about = "Inspect isometric world packs, tilesets and map blocks",
    version
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "ISOWORLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pack index file
    #[arg(long, global = true, env = "ISOWORLD_PACK_INDEX")]
    pub pack_index: Option<PathBuf>,

    /// Pack data file
    #[arg(long, global = true, env = "ISOWORLD_PACK_DATA")]
    pub pack_data: Option<PathBuf>,

    /// Directory holding one sub-directory of block files per map id
    #[arg(long, global = true, env = "ISOWORLD_MAP_ROOT")]
    pub map_root: Option<PathBuf>,

    /// Map id
    #[arg(long, global = true, env = "ISOWORLD_MAP_ID")]
    pub map_id: Option<u32>,

    /// Viewport width in pixels
    #[arg(long, global = true, env = "ISOWORLD_VIEW_WIDTH")]
    pub view_width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long, global = true, env = "ISOWORLD_VIEW_HEIGHT")]
    pub view_height: Option<u32>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List pack entries
    List {
        /// Only show entries whose name contains this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Copy a pack entry to a file
    Extract {
        /// Entry name
        name: String,
        /// Output file
        out: PathBuf,
    },

    /// Decode a tileset and describe its tiles
    Tileset {
        /// Entry name (`12.til`) or tile id (`12`)
        tileset: String,
    },

    /// Decode the block containing a world position
    #[command(allow_negative_numbers = true)]
    Block {
        /// World column
        x: i32,
        /// World row
        y: i32,
    },

    /// Move the camera in steps and report cache changes
    #[command(allow_negative_numbers = true)]
    Walk {
        /// Starting world column
        x: i32,
        /// Starting world row
        y: i32,
        /// Columns moved per step
        #[arg(long, default_value_t = 64)]
        dx: i32,
        /// Rows moved per step
        #[arg(long, default_value_t = 0)]
        dy: i32,
        /// Number of steps after the starting position
        #[arg(long, default_value_t = 10)]
        steps: u32,
    },
}

impl Cli {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Resolve the world configuration from the file and flag layers.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration file cannot be loaded or the
    /// result fails validation
    pub fn world_config(&self) -> Result<WorldConfig> {
        let mut config = match &self.config {
            Some(path) => WorldConfig::from_json_file(path)?,
            None => WorldConfig::default(),
        };

        if let Some(path) = &self.pack_index {
            config.pack_index.clone_from(path);
        }
        if let Some(path) = &self.pack_data {
            config.pack_data.clone_from(path);
        }
        if let Some(path) = &self.map_root {
            config.map_root.clone_from(path);
        }
        if let Some(map_id) = self.map_id {
            config.map_id = map_id;
        }
        if let Some(width) = self.view_width {
            config.viewport.width = width;
        }
        if let Some(height) = self.view_height {
            config.viewport.height = height;
        }

        config.validate()?;
        Ok(config)
    }

    /// Default log filter for the requested verbosity.
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("isoworld").chain(args.iter().copied()))
            .expect("Operation should succeed")
    }

    #[test]
    fn test_subcommands() {
        assert_eq!(
            parse(&["list", "--filter", "til"]).command,
            Command::List {
                filter: Some("til".to_string())
            }
        );
        assert_eq!(
            parse(&["block", "-64", "640"]).command,
            Command::Block { x: -64, y: 640 }
        );
        assert_eq!(
            parse(&["walk", "10", "20", "--dy", "-8", "--steps", "3"]).command,
            Command::Walk {
                x: 10,
                y: 20,
                dx: 64,
                dy: -8,
                steps: 3
            }
        );
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "--pack-index",
            "a.idx",
            "--map-id",
            "5",
            "--view-width",
            "640",
            "-vv",
            "list",
        ]);
        let config = cli.world_config().expect("Operation should succeed");
        assert_eq!(config.pack_index, PathBuf::from("a.idx"));
        assert_eq!(config.pack_data, PathBuf::from("Tile.pak"));
        assert_eq!(config.map_id, 5);
        assert_eq!(config.viewport.width, 640);
        assert_eq!(config.viewport.height, 900);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        std::fs::write(&path, r#"{"map_id": 9, "map_root": "/srv/maps"}"#).unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "--map-id", "2", "list"]);
        let config = cli.world_config().expect("Operation should succeed");
        assert_eq!(config.map_id, 2);
        assert_eq!(config.map_root, PathBuf::from("/srv/maps"));
    }

    #[test]
    fn test_zero_viewport_rejected() {
        let cli = parse(&["--view-height", "0", "list"]);
        assert!(cli.world_config().is_err());
    }
}
