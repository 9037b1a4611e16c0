//! Data-file loading for switchboard settings and sprite atlases.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, find_data_file, load_atlas, load_settings};
pub use schema::{AtlasData, SettingsData, TileData};
