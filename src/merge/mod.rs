//! Glyph merging
//!
//! This module contains everything that touches font data:
//! - The glyph store seam and its error type
//! - The UFO store, component decomposition and the font compiler driver
//! - The orchestrator that assembles each target font

pub mod compiler;
pub mod decompose;
#[cfg(test)]
pub(crate) mod memory;
pub mod orchestrator;
pub mod store;
pub mod ufo_store;

pub use compiler::FontCompiler;
pub use orchestrator::{merged_glyph_name, Merger};
pub use store::{FontBackend, GlyphStore, StoreError};
pub use ufo_store::{UfoBackend, UfoGlyphStore};
