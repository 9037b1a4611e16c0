//! Reads settings and atlas files in RON, TOML, or JSON.
//!
//! The format is picked from the file extension.

use crate::schema::{AtlasData, SettingsData};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use switchboard_core::CellType;
use switchboard_render::{AtlasError, SpriteAtlas, TileCoord};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The atlas table is inconsistent.
    #[error("invalid atlas in {file}: {source}")]
    Atlas {
        file: PathBuf,
        #[source]
        source: AtlasError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Look for `{base_name}.ron`, `.toml`, or `.json` in `dir`.
///
/// Returns `Ok(None)` if none exists, or `Err(ConflictingFormats)` if more
/// than one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `path` is only used in errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Typed loaders
// ===========================================================================

pub fn load_settings(path: &Path) -> Result<SettingsData, DataLoadError> {
    let settings: SettingsData = deserialize_file(path)?;
    log::debug!("loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

/// Load an atlas table and build a [`SpriteAtlas`] from it.
pub fn load_atlas(path: &Path) -> Result<SpriteAtlas, DataLoadError> {
    let data: AtlasData = deserialize_file(path)?;
    build_atlas(data).map_err(|source| DataLoadError::Atlas {
        file: path.to_path_buf(),
        source,
    })
}

pub fn build_atlas(data: AtlasData) -> Result<SpriteAtlas, AtlasError> {
    let mut atlas = SpriteAtlas::new(data.tile_size)?;
    for tile in data.tiles {
        atlas.insert(CellType(tile.cell_type), TileCoord::new(tile.col, tile.row))?;
    }
    log::debug!("built atlas with {} tiles", atlas.len());
    Ok(atlas)
}

// ===========================================================================
// Tests
// ===========================================================================
