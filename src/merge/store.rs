//! Glyph store seam
//!
//! The merge only ever talks to fonts through these two traits, mirroring the
//! select/copy/paste workflow of a font editor. Copying hands back an owned
//! clip instead of going through a process-wide clipboard, and a store is
//! released when its handle is dropped.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no glyph is mapped to U+{0:04X}")]
    GlyphNotFound(u32),

    #[error("nothing is selected")]
    NothingSelected,

    #[error("'{0}' is not a valid glyph name")]
    InvalidName(String),

    #[error("glyph name '{0}' is already taken")]
    NameTaken(String),

    #[error("glyph '{glyph}' references missing glyph '{base}'")]
    MissingComponentBase { glyph: String, base: String },

    #[error("glyph '{0}' references itself through its components")]
    ComponentCycle(String),

    #[error("UFO error: {0}")]
    Ufo(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("font compilation failed: {0}")]
    Compile(String),
}

/// An opened font that glyphs can be moved in and out of
pub trait GlyphStore {
    /// A copied glyph, ready to be pasted into another store of the same kind
    type Clip;

    /// Make `codepoint` the current selection
    fn select(&mut self, codepoint: char);

    /// Copy the glyph at the current selection
    fn copy(&self) -> Result<Self::Clip, StoreError>;

    /// Put `clip` at the current selection, replacing whatever was there
    fn paste(&mut self, clip: &Self::Clip) -> Result<(), StoreError>;

    /// Rename the glyph mapped to `codepoint`
    fn rename(&mut self, codepoint: char, name: &str) -> Result<(), StoreError>;

    /// Replace every component reference in every glyph with the outlines it
    /// points at, so a copied glyph never depends on another one
    fn unlink_references(&mut self) -> Result<(), StoreError>;

    fn set_family_name(&mut self, family_name: &str);

    /// Write the store out as a binary font at `path`
    fn generate(&mut self, path: &Path) -> Result<(), StoreError>;
}

/// Opens glyph stores
pub trait FontBackend {
    type Store: GlyphStore;

    fn open(&self, path: &Path) -> Result<Self::Store, StoreError>;
}
