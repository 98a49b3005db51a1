//! Infrastructure layer: file-based persistence and fixture loaders

pub mod fleet_toml;
pub mod manifest_csv;
pub mod persistence;
