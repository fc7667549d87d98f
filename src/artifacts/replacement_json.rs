use crate::core::errors::BuildError;
use crate::symbols::ReplacementMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPLACEMENT_MAP_FILE: &str = "replacement_map.json";

/// Write `map` as `replacement_map.json` inside `output_dir`
pub fn write_replacement_map(map: &ReplacementMap, output_dir: &Path) -> Result<PathBuf, BuildError> {
    let path = output_dir.join(REPLACEMENT_MAP_FILE);
    let json = map
        .to_json_pretty()
        .map_err(|e| BuildError::artifact_io(&path, e))?;
    fs::write(&path, json).map_err(|e| BuildError::artifact_io(&path, e))?;
    info!("Replacement map with {} entries saved to: {:?}", map.len(), path);
    Ok(path)
}
