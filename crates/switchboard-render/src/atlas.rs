//! Sprite atlas lookup: which tile of the atlas image shows each cell type.
//!
//! The atlas is a plain value handed to the planner, so tests and multiple
//! renderers can each use their own table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use switchboard_core::CellType;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Column/row of a tile in the atlas grid. Negative coordinates mark a cell
/// type with no sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn is_blank(&self) -> bool {
        self.col < 0 || self.row < 0
    }
}

/// A pixel rectangle in the atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Errors from building an atlas table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    #[error("cell type {0} is mapped twice")]
    DuplicateCellType(i32),
    #[error("tile size must be non-zero")]
    ZeroTileSize,
}

// ---------------------------------------------------------------------------
// SpriteAtlas
// ---------------------------------------------------------------------------

/// Maps cell types to fixed-size tiles of an atlas image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAtlas {
    tile_size: u32,
    tiles: BTreeMap<CellType, TileCoord>,
}

impl SpriteAtlas {
    pub const DEFAULT_TILE_SIZE: u32 = 128;

    pub fn new(tile_size: u32) -> Result<Self, AtlasError> {
        if tile_size == 0 {
            return Err(AtlasError::ZeroTileSize);
        }
        Ok(Self {
            tile_size,
            tiles: BTreeMap::new(),
        })
    }

    /// The stock tileset layout: 128px tiles, types 0..=10 in reading order
    /// four to a row, 11 and 12 in column 5, and the `-1` sentinel blank.
    pub fn standard() -> Self {
        let mut tiles = BTreeMap::new();
        tiles.insert(CellType::NONE, TileCoord::new(-1, -1));
        for id in 0..=10 {
            tiles.insert(CellType(id), TileCoord::new(id % 4, id / 4));
        }
        tiles.insert(CellType(11), TileCoord::new(5, 1));
        tiles.insert(CellType(12), TileCoord::new(5, 0));
        Self {
            tile_size: Self::DEFAULT_TILE_SIZE,
            tiles,
        }
    }

    /// Map a cell type to a tile. Each cell type may be mapped once.
    pub fn insert(&mut self, cell_type: CellType, tile: TileCoord) -> Result<(), AtlasError> {
        if self.tiles.contains_key(&cell_type) {
            return Err(AtlasError::DuplicateCellType(cell_type.0));
        }
        self.tiles.insert(cell_type, tile);
        Ok(())
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, cell_type: CellType) -> Option<TileCoord> {
        self.tiles.get(&cell_type).copied()
    }

    /// Pixel region for a cell type, or `None` when it has no sprite.
    pub fn region(&self, cell_type: CellType) -> Option<TileRegion> {
        let tile = self.tile(cell_type)?;
        if tile.is_blank() {
            return None;
        }
        Some(TileRegion {
            x: (tile.col as u32).checked_mul(self.tile_size)?,
            y: (tile.row as u32).checked_mul(self.tile_size)?,
            width: self.tile_size,
            height: self.tile_size,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellType, TileCoord)> + '_ {
        self.tiles.iter().map(|(&cell_type, &tile)| (cell_type, tile))
    }
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::standard()
    }
}
