//! Checksums of generated fonts

use crate::core::errors::BuildError;
use indexmap::IndexMap;
use md5::{Digest, Md5};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CHECKSUM_FILE: &str = "checksum.json";

/// Compute the MD5 of in-memory data, returning the lowercase hex string.
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}

/// Target name → MD5 of its generated binary, in build order.
///
/// Only written once every target has been generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChecksumManifest {
    entries: IndexMap<String, String>,
}

impl ChecksumManifest {
    /// Hash `data` and record it for `target_name`, returning the digest
    pub fn record(&mut self, target_name: &str, data: &[u8]) -> &str {
        let digest = md5_hex(data);
        self.entries.insert(target_name.to_string(), digest);
        &self.entries[target_name]
    }

    pub fn get(&self, target_name: &str) -> Option<&str> {
        self.entries.get(target_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delete the manifest of a previous run from `output_dir`, if any
    pub fn remove_stale(output_dir: &Path) -> Result<(), BuildError> {
        let path = output_dir.join(CHECKSUM_FILE);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed stale checksum manifest: {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::artifact_io(&path, e)),
        }
    }

    pub fn write(&self, output_dir: &Path) -> Result<PathBuf, BuildError> {
        let path = output_dir.join(CHECKSUM_FILE);
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| BuildError::artifact_io(&path, e))?;
        fs::write(&path, contents).map_err(|e| BuildError::artifact_io(&path, e))?;
        info!("MD5 checksums saved to: {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            md5_hex(b"The quick brown fox jumps over the lazy dog"),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }

    #[test]
    fn test_manifest_is_written_in_build_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut manifest = ChecksumManifest::default();
        manifest.record("sans", b"sans bytes");
        let mono = manifest.record("mono", b"").to_string();
        assert_eq!(mono, "d41d8cd98f00b204e9800998ecf8427e");

        let path = manifest.write(dir.path()).expect("write manifest");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(CHECKSUM_FILE));

        let written = std::fs::read_to_string(&path).expect("read manifest");
        let value: serde_json::Value = serde_json::from_str(&written).expect("json");
        let targets: Vec<&String> = value.as_object().expect("object").keys().collect();
        assert_eq!(targets, ["sans", "mono"]);
        assert_eq!(value["sans"], md5_hex(b"sans bytes"));
    }

    #[test]
    fn test_remove_stale_manifest() {
        let dir = tempfile::tempdir().expect("temp dir");
        ChecksumManifest::remove_stale(dir.path()).expect("nothing to remove");

        let mut manifest = ChecksumManifest::default();
        manifest.record("mono", b"old bytes");
        let path = manifest.write(dir.path()).expect("write manifest");
        assert!(path.exists());

        ChecksumManifest::remove_stale(dir.path()).expect("remove");
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_directory_is_an_artifact_error() {
        let manifest = ChecksumManifest::default();
        let result = manifest.write(Path::new("/nonexistent/dist"));
        assert!(matches!(result, Err(BuildError::ArtifactIo { .. })));
    }
}
