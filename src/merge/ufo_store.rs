//! UFO-backed glyph store
//!
//! Glyphs live in the default layer of a `norad` font and are addressed by
//! their Unicode code points, which UFO stores as full scalar values, so any
//! private-use plane is addressable. Generation saves the merged UFO to a
//! staging directory and compiles it with [`FontCompiler`].

use crate::data::ufo::{codepoint_index, default_glyph_name, load_ufo_from_path, save_ufo_to_path};
use crate::merge::compiler::FontCompiler;
use crate::merge::decompose::decompose_layer;
use crate::merge::{FontBackend, GlyphStore, StoreError};
use norad::{Font, Glyph, Name};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Opens UFO sources as glyph stores
#[derive(Debug, Clone)]
pub struct UfoBackend {
    compiler: FontCompiler,
}

impl UfoBackend {
    pub fn new(compiler: FontCompiler) -> Self {
        Self { compiler }
    }
}

impl FontBackend for UfoBackend {
    type Store = UfoGlyphStore;

    fn open(&self, path: &Path) -> Result<Self::Store, StoreError> {
        UfoGlyphStore::open(path, self.compiler.clone())
    }
}

const GLYPH_ORDER_KEY: &str = "public.glyphOrder";

pub struct UfoGlyphStore {
    path: PathBuf,
    font: Font,
    by_codepoint: HashMap<char, String>,
    selection: Option<char>,
    compiler: FontCompiler,
}

impl UfoGlyphStore {
    pub fn open(path: &Path, compiler: FontCompiler) -> Result<Self, StoreError> {
        let font = load_ufo_from_path(path)?;
        let by_codepoint = codepoint_index(&font);
        debug!(
            "Opened {:?}: {} glyph(s), {} encoded",
            path,
            font.default_layer().len(),
            by_codepoint.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            font,
            by_codepoint,
            selection: None,
            compiler,
        })
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Name of the glyph mapped to `codepoint`
    pub fn glyph_name(&self, codepoint: char) -> Option<&str> {
        self.by_codepoint.get(&codepoint).map(String::as_str)
    }

    fn selected(&self) -> Result<char, StoreError> {
        self.selection.ok_or(StoreError::NothingSelected)
    }
}

/// A fresh glyph called `name` with the outlines and metrics of `source`.
///
/// Code points are left empty for the caller to fill in.
fn with_name(source: &Glyph, name: &str) -> Result<Glyph, StoreError> {
    if name.parse::<norad::Name>().is_err() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    let mut glyph = Glyph::new(name);
    glyph.width = source.width;
    glyph.height = source.height;
    glyph.contours = source.contours.clone();
    glyph.components = source.components.clone();
    glyph.anchors = source.anchors.clone();
    glyph.note = source.note.clone();
    Ok(glyph)
}

/// Point everything that refers to glyph `old` at `new` instead: the glyph
/// itself in other layers, components, groups, kerning and the glyph order.
fn retarget_references(font: &mut Font, old: &str, new: &Name) -> Result<(), StoreError> {
    for layer in font.layers.iter_mut() {
        if layer.contains_glyph(old) && !layer.contains_glyph(new) {
            layer
                .rename_glyph(old, new, false)
                .map_err(|e| StoreError::Ufo(e.to_string()))?;
        }
        for glyph in layer.iter_mut() {
            for component in glyph.components.iter_mut().filter(|c| c.base == old) {
                component.base = new.clone();
            }
        }
    }

    for members in font.groups.values_mut() {
        for member in members.iter_mut().filter(|member| **member == old) {
            *member = new.clone();
        }
    }

    let retarget = |name: Name| if name == old { new.clone() } else { name };
    font.kerning = std::mem::take(&mut font.kerning)
        .into_iter()
        .map(|(first, pairs)| {
            let pairs: BTreeMap<Name, f64> = pairs
                .into_iter()
                .map(|(second, value)| (retarget(second), value))
                .collect();
            (retarget(first), pairs)
        })
        .collect();

    if let Some(order) = font
        .lib
        .get_mut(GLYPH_ORDER_KEY)
        .and_then(|value| value.as_array_mut())
    {
        for entry in order.iter_mut().filter(|entry| entry.as_string() == Some(old)) {
            *entry = new.to_string().into();
        }
    }

    debug!("Renamed '{}' to '{}' throughout the font", old, new);
    Ok(())
}

impl GlyphStore for UfoGlyphStore {
    type Clip = Glyph;

    fn select(&mut self, codepoint: char) {
        self.selection = Some(codepoint);
    }

    fn copy(&self) -> Result<Glyph, StoreError> {
        let codepoint = self.selected()?;
        self.by_codepoint
            .get(&codepoint)
            .and_then(|name| self.font.default_layer().get_glyph(name))
            .cloned()
            .ok_or(StoreError::GlyphNotFound(u32::from(codepoint)))
    }

    fn paste(&mut self, clip: &Glyph) -> Result<(), StoreError> {
        let codepoint = self.selected()?;
        let layer = self.font.default_layer_mut();

        // Pasting over an occupied slot replaces the glyph that was there,
        // including at the other code points it was encoded at
        let (name, carried) = match self.by_codepoint.get(&codepoint) {
            Some(existing) => {
                let carried: Vec<char> = layer
                    .remove_glyph(existing)
                    .map(|old| old.codepoints.iter().collect())
                    .unwrap_or_default();
                (existing.clone(), carried)
            }
            None => (default_glyph_name(codepoint), Vec::new()),
        };
        if layer.get_glyph(&name).is_some() {
            return Err(StoreError::NameTaken(name));
        }

        let mut glyph = with_name(clip, &name)?;
        glyph.codepoints.set(carried);
        glyph.codepoints.insert(codepoint);
        layer.insert_glyph(glyph);
        trace!("Pasted '{}' at U+{:04X}", clip.name(), u32::from(codepoint));

        self.by_codepoint.insert(codepoint, name);
        Ok(())
    }

    fn rename(&mut self, codepoint: char, name: &str) -> Result<(), StoreError> {
        let Some(old_name) = self.by_codepoint.get(&codepoint).cloned() else {
            return Err(StoreError::GlyphNotFound(u32::from(codepoint)));
        };
        if old_name == name {
            return Ok(());
        }
        let new_name: Name = name
            .parse()
            .map_err(|_| StoreError::InvalidName(name.to_string()))?;

        let layer = self.font.default_layer_mut();
        if layer.contains_glyph(name) {
            return Err(StoreError::NameTaken(name.to_string()));
        }
        layer
            .rename_glyph(&old_name, name, false)
            .map_err(|e| StoreError::Ufo(e.to_string()))?;
        let carried: Vec<char> = layer
            .get_glyph(name)
            .map(|glyph| glyph.codepoints.iter().collect())
            .unwrap_or_default();
        for point in carried {
            self.by_codepoint.insert(point, name.to_string());
        }

        retarget_references(&mut self.font, &old_name, &new_name)
    }

    fn unlink_references(&mut self) -> Result<(), StoreError> {
        let changed = decompose_layer(self.font.default_layer_mut())?;
        debug!("Decomposed {} composite glyph(s) in {:?}", changed, self.path);
        Ok(())
    }

    fn set_family_name(&mut self, family_name: &str) {
        let info = &mut self.font.font_info;
        let postscript: String = family_name.chars().filter(|c| !c.is_whitespace()).collect();
        info.family_name = Some(family_name.to_string());
        info.postscript_full_name = Some(family_name.to_string());
        info.postscript_font_name = Some(postscript);
    }

    fn generate(&mut self, path: &Path) -> Result<(), StoreError> {
        let staging = tempfile::Builder::new().prefix("fontmerge-").tempdir()?;
        let ufo_path = staging.path().join("merged.ufo");
        save_ufo_to_path(&self.font, &ufo_path)?;

        debug!(
            "Compiling {} glyph(s) with {} into {:?}",
            self.font.default_layer().len(),
            self.compiler.program(),
            path
        );
        self.compiler
            .compile(&ufo_path, path, &staging.path().join("build"))
    }
}

impl Drop for UfoGlyphStore {
    fn drop(&mut self) {
        trace!("Released glyph store for {:?}", self.path);
    }
}
