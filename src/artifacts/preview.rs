//! HTML previews of merged fonts
//!
//! Each preview embeds the merged font and a fallback font as base64 and
//! shows every remapped glyph, grouped by the source font it came from.
//! Rendering depends only on its inputs, so identical builds produce
//! byte-identical previews.

use crate::core::errors::{BuildError, ResourceKind};
use crate::symbols::ReplacementMap;
use base64::Engine as _;
use indexmap::IndexMap;
use minijinja::{context, Environment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Template used when the configuration doesn't name one
pub const BUILTIN_TEMPLATE: &str = include_str!("../../assets/preview.html.jinja");

/// Label of the reference text entry
pub const BASE_PREVIEW_LABEL: &str = "base";

/// ASCII letters, digits and punctuation, rendered for comparison with the
/// fallback font
pub const BASE_PREVIEW_TEXT: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

/// Characters per preview line
pub const PREVIEW_LINE_WIDTH: usize = 64;

/// Split `text` into chunks of `width` characters; the last may be shorter
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Label → wrapped lines: every source font's replacement characters in
/// allocation order, then the reference text
pub fn preview_text(map: &ReplacementMap) -> IndexMap<String, Vec<String>> {
    let mut table: IndexMap<String, Vec<String>> = map
        .iter()
        .map(|(font_name, replacements)| {
            let glyphs: String = replacements.values().collect();
            (font_name.to_string(), wrap(&glyphs, PREVIEW_LINE_WIDTH))
        })
        .collect();
    table.insert(
        BASE_PREVIEW_LABEL.to_string(),
        wrap(BASE_PREVIEW_TEXT, PREVIEW_LINE_WIDTH),
    );
    table
}

pub fn preview_file_name(target_name: &str) -> String {
    format!("preview_{target_name}.html")
}

pub struct PreviewRenderer {
    template: String,
    fallback_font: String,
    preview_text: IndexMap<String, Vec<String>>,
}

impl PreviewRenderer {
    pub fn new(template: String, fallback_font: &[u8], map: &ReplacementMap) -> Self {
        Self {
            template,
            fallback_font: base64::engine::general_purpose::STANDARD.encode(fallback_font),
            preview_text: preview_text(map),
        }
    }

    /// Read the template (or take the built-in one) and the fallback font
    pub fn load(
        template_path: Option<&Path>,
        fallback_font_path: &Path,
        map: &ReplacementMap,
    ) -> Result<Self, BuildError> {
        let template = match template_path {
            Some(path) => fs::read_to_string(path).map_err(|_| BuildError::ResourceNotFound {
                kind: ResourceKind::PreviewTemplate,
                path: path.to_path_buf(),
            })?,
            None => {
                debug!("Using built-in preview template");
                BUILTIN_TEMPLATE.to_string()
            }
        };
        let fallback_font = fs::read(fallback_font_path).map_err(|_| BuildError::ResourceNotFound {
            kind: ResourceKind::FallbackFont,
            path: fallback_font_path.to_path_buf(),
        })?;
        Ok(Self::new(template, &fallback_font, map))
    }

    pub fn render(&self, target_name: &str, font_data: &[u8]) -> Result<String, minijinja::Error> {
        let env = Environment::new();
        env.render_str(
            &self.template,
            context! {
                font_name => target_name,
                font_data => base64::engine::general_purpose::STANDARD.encode(font_data),
                fallback_font => &self.fallback_font,
                preview_text => &self.preview_text,
            },
        )
    }

    /// Render and write `preview_<target>.html` inside `output_dir`
    pub fn write(&self, target_name: &str, font_data: &[u8], output_dir: &Path) -> Result<PathBuf, BuildError> {
        let path = output_dir.join(preview_file_name(target_name));
        let html = self
            .render(target_name, font_data)
            .map_err(|e| BuildError::artifact_io(&path, e))?;
        fs::write(&path, html).map_err(|e| BuildError::artifact_io(&path, e))?;
        info!("Preview for '{}' saved to: {:?}", target_name, path);
        Ok(path)
    }
}
