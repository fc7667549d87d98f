//! Target font assembly
//!
//! For one target: open its base font, copy every allocated glyph of every
//! source font into its replacement slot, then generate the binary.

use crate::core::config_file::TargetConfig;
use crate::core::errors::BuildError;
use crate::merge::{FontBackend, GlyphStore, StoreError};
use crate::symbols::ReplacementMap;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Traceable name of a pasted glyph: where it landed and where it came from
pub fn merged_glyph_name(replacement: char, font_name: &str) -> String {
    format!("uni{:04X}_from_{}", u32::from(replacement), font_name)
}

/// Drives a [`FontBackend`] to build target fonts from one replacement map
pub struct Merger<'a, B: FontBackend> {
    backend: &'a B,
    map: &'a ReplacementMap,
    /// Source font identity → path of its glyph store
    sources: &'a IndexMap<String, PathBuf>,
}

impl<'a, B: FontBackend> Merger<'a, B> {
    pub fn new(backend: &'a B, map: &'a ReplacementMap, sources: &'a IndexMap<String, PathBuf>) -> Self {
        Self {
            backend,
            map,
            sources,
        }
    }

    /// Build `target` on top of `base_font` and generate it at `output_path`.
    ///
    /// Every store opened here is released before returning, on success and
    /// on failure.
    pub fn merge_into(
        &self,
        target_name: &str,
        target: &TargetConfig,
        base_font: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, BuildError> {
        info!(
            "Merging {} font(s) into target '{}' from {:?}",
            self.map.font_names().count(),
            target_name,
            base_font
        );

        let mut merged = self
            .backend
            .open(base_font)
            .map_err(|source| BuildError::Store {
                font: target_name.to_string(),
                source,
            })?;
        if let Some(family_name) = &target.family_name {
            merged.set_family_name(family_name);
        }

        for (font_name, replacements) in self.map.iter() {
            let source_path = self.sources.get(font_name).ok_or_else(|| {
                BuildError::Config(format!("no source font declared for '{font_name}'"))
            })?;
            debug!(
                "Processing font '{}' from {:?}: {} glyph(s)",
                font_name,
                source_path,
                replacements.len()
            );

            let store_error = |source| BuildError::Store {
                font: font_name.to_string(),
                source,
            };
            let mut source = self.backend.open(source_path).map_err(store_error)?;
            source.unlink_references().map_err(store_error)?;

            for (&symbol, &replacement) in replacements {
                copy_glyph(&mut source, &mut merged, font_name, symbol, replacement)?;
            }
        }

        info!("Generating merged font at: {:?}", output_path);
        merged
            .generate(output_path)
            .map_err(|source| BuildError::Generate {
                target: target_name.to_string(),
                source,
            })?;

        Ok(output_path.to_path_buf())
    }
}

fn copy_glyph<S: GlyphStore>(
    source: &mut S,
    merged: &mut S,
    font_name: &str,
    symbol: char,
    replacement: char,
) -> Result<(), BuildError> {
    let at = |codepoint: char| {
        move |source: StoreError| BuildError::Merge {
            font: font_name.to_string(),
            codepoint: u32::from(codepoint),
            source,
        }
    };

    source.select(symbol);
    let clip = source.copy().map_err(at(symbol))?;
    merged.select(replacement);
    merged.paste(&clip).map_err(at(replacement))?;
    merged
        .rename(replacement, &merged_glyph_name(replacement, font_name))
        .map_err(at(replacement))
}
