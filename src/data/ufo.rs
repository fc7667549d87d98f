//! UFO file I/O operations

use crate::merge::StoreError;
use norad::Font;
use std::collections::HashMap;
use std::path::Path;

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font, StoreError> {
    let path = path.as_ref();
    Font::load(path).map_err(|e| StoreError::Ufo(format!("cannot load {}: {e}", path.display())))
}

/// Save a UFO font to disk, replacing anything already at `path`
pub fn save_ufo_to_path(font: &Font, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    font.save(path)
        .map_err(|e| StoreError::Ufo(format!("cannot save {}: {e}", path.display())))
}

/// Map every code point of the default layer to the glyph that carries it.
///
/// When two glyphs claim the same code point the first one in layer order
/// wins.
pub fn codepoint_index(font: &Font) -> HashMap<char, String> {
    let mut index = HashMap::new();
    for glyph in font.default_layer().iter() {
        for codepoint in glyph.codepoints.iter() {
            index
                .entry(codepoint)
                .or_insert_with(|| glyph.name().to_string());
        }
    }
    index
}

/// Default name for a glyph living at `codepoint`
pub fn default_glyph_name(codepoint: char) -> String {
    let value = u32::from(codepoint);
    if value > 0xFFFF {
        format!("u{value:05X}")
    } else {
        format!("uni{value:04X}")
    }
}
