//! Serde data structures for settings and atlas files.

use serde::{Deserialize, Serialize};
use switchboard_core::payload::{DEFAULT_MAX_DECODED_BYTES, PayloadLimits};
use switchboard_render::{DEFAULT_CELL_SIZE, SpriteAtlas};

fn default_max_decoded_bytes() -> usize {
    DEFAULT_MAX_DECODED_BYTES
}

fn default_cell_size() -> u32 {
    DEFAULT_CELL_SIZE
}

fn default_tile_size() -> u32 {
    SpriteAtlas::DEFAULT_TILE_SIZE
}

// ===========================================================================
// Settings
// ===========================================================================

/// Decoder and renderer settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsData {
    /// Largest decompressed payload accepted before decoding.
    #[serde(default = "default_max_decoded_bytes")]
    pub max_decoded_bytes: usize,
    /// Decode with the permissive policy.
    #[serde(default)]
    pub lenient: bool,
    /// Output size of one grid cell in pixels.
    #[serde(default = "default_cell_size")]
    pub output_cell_size: u32,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
            lenient: false,
            output_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl SettingsData {
    pub fn limits(&self) -> PayloadLimits {
        PayloadLimits::new(self.max_decoded_bytes)
    }
}

// ===========================================================================
// Atlas
// ===========================================================================

/// One row of the atlas lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileData {
    pub cell_type: i32,
    pub col: i32,
    pub row: i32,
}

/// An atlas lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasData {
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default)]
    pub tiles: Vec<TileData>,
}

impl From<&SpriteAtlas> for AtlasData {
    fn from(atlas: &SpriteAtlas) -> Self {
        Self {
            tile_size: atlas.tile_size(),
            tiles: atlas
                .iter()
                .map(|(cell_type, tile)| TileData {
                    cell_type: cell_type.0,
                    col: tile.col,
                    row: tile.row,
                })
                .collect(),
        }
    }
}
