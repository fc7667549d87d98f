//! Build outputs besides the fonts themselves: the replacement map, the
//! checksum manifest and the HTML previews

pub mod checksum;
pub mod preview;
pub mod replacement_json;

pub use checksum::{md5_hex, ChecksumManifest, CHECKSUM_FILE};
pub use preview::{preview_file_name, PreviewRenderer};
pub use replacement_json::{write_replacement_map, REPLACEMENT_MAP_FILE};
