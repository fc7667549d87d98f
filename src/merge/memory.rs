//! In-memory glyph store for tests
//!
//! Glyphs are plain records keyed by code point. Every open, unlink,
//! generate and release is logged so tests can check the order of store
//! operations.

use crate::data::ufo::default_glyph_name;
use crate::merge::{FontBackend, GlyphStore, StoreError};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGlyph {
    pub name: String,
    pub outline: String,
    /// Code points of glyphs used as components
    pub references: Vec<char>,
    codepoint: char,
}

impl MemoryGlyph {
    pub fn new(name: &str, codepoint: char, outline: &str) -> Self {
        Self {
            name: name.to_string(),
            outline: outline.to_string(),
            references: Vec::new(),
            codepoint,
        }
    }

    pub fn referencing(mut self, references: &[char]) -> Self {
        self.references = references.to_vec();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFont {
    pub family_name: Option<String>,
    glyphs: BTreeMap<char, MemoryGlyph>,
}

impl MemoryFont {
    pub fn glyph(&self, codepoint: char) -> Option<&MemoryGlyph> {
        self.glyphs.get(&codepoint)
    }

    /// Stand-in for a binary font: one line per glyph in code point order
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("family {}\n", self.family_name.as_deref().unwrap_or("-"));
        for (codepoint, glyph) in &self.glyphs {
            out.push_str(&format!(
                "U+{:04X} {} {}\n",
                u32::from(*codepoint),
                glyph.name,
                glyph.outline
            ));
        }
        out.into_bytes()
    }
}

#[derive(Debug, Default)]
struct Shared {
    fonts: HashMap<PathBuf, MemoryFont>,
    generated: HashMap<PathBuf, MemoryFont>,
    events: Vec<String>,
    fail_generation: bool,
    write_outputs: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    shared: Rc<RefCell<Shared>>,
}

impl MemoryBackend {
    pub fn add_font(&self, path: impl Into<PathBuf>, glyphs: Vec<MemoryGlyph>) {
        let font = MemoryFont {
            family_name: None,
            glyphs: glyphs.into_iter().map(|glyph| (glyph.codepoint, glyph)).collect(),
        };
        self.shared.borrow_mut().fonts.insert(path.into(), font);
    }

    /// Make every `generate` fail
    pub fn fail_generation(&self) {
        self.shared.borrow_mut().fail_generation = true;
    }

    /// Also write generated fonts to disk
    pub fn write_outputs(&self) {
        self.shared.borrow_mut().write_outputs = true;
    }

    pub fn generated(&self, path: impl AsRef<Path>) -> Option<MemoryFont> {
        self.shared.borrow().generated.get(path.as_ref()).cloned()
    }

    pub fn events(&self) -> Vec<String> {
        self.shared.borrow().events.clone()
    }

    fn log(&self, event: String) {
        self.shared.borrow_mut().events.push(event);
    }
}

impl FontBackend for MemoryBackend {
    type Store = MemoryStore;

    fn open(&self, path: &Path) -> Result<MemoryStore, StoreError> {
        let font = self
            .shared
            .borrow()
            .fonts
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::Ufo(format!("no such font: {}", path.display())))?;
        self.log(format!("open {}", path.display()));
        Ok(MemoryStore {
            path: path.to_path_buf(),
            font,
            selection: None,
            backend: self.clone(),
        })
    }
}

pub struct MemoryStore {
    path: PathBuf,
    font: MemoryFont,
    selection: Option<char>,
    backend: MemoryBackend,
}

impl MemoryStore {
    fn selected(&self) -> Result<char, StoreError> {
        self.selection.ok_or(StoreError::NothingSelected)
    }
}

impl GlyphStore for MemoryStore {
    type Clip = MemoryGlyph;

    fn select(&mut self, codepoint: char) {
        self.selection = Some(codepoint);
    }

    fn copy(&self) -> Result<MemoryGlyph, StoreError> {
        let codepoint = self.selected()?;
        self.font
            .glyph(codepoint)
            .cloned()
            .ok_or(StoreError::GlyphNotFound(u32::from(codepoint)))
    }

    fn paste(&mut self, clip: &MemoryGlyph) -> Result<(), StoreError> {
        let codepoint = self.selected()?;
        let name = self
            .font
            .glyph(codepoint)
            .map(|existing| existing.name.clone())
            .unwrap_or_else(|| default_glyph_name(codepoint));
        let glyph = MemoryGlyph {
            name,
            codepoint,
            ..clip.clone()
        };
        self.font.glyphs.insert(codepoint, glyph);
        Ok(())
    }

    fn rename(&mut self, codepoint: char, name: &str) -> Result<(), StoreError> {
        let glyph = self
            .font
            .glyphs
            .get_mut(&codepoint)
            .ok_or(StoreError::GlyphNotFound(u32::from(codepoint)))?;
        glyph.name = name.to_string();
        Ok(())
    }

    fn unlink_references(&mut self) -> Result<(), StoreError> {
        let outlines: HashMap<char, String> = self
            .font
            .glyphs
            .iter()
            .map(|(codepoint, glyph)| (*codepoint, glyph.outline.clone()))
            .collect();
        for glyph in self.font.glyphs.values_mut() {
            for reference in glyph.references.drain(..) {
                let outline = outlines.get(&reference).ok_or_else(|| StoreError::MissingComponentBase {
                    glyph: glyph.name.clone(),
                    base: default_glyph_name(reference),
                })?;
                glyph.outline = format!("{}+{}", glyph.outline, outline);
            }
        }
        self.backend.log(format!("unlink {}", self.path.display()));
        Ok(())
    }

    fn set_family_name(&mut self, family_name: &str) {
        self.font.family_name = Some(family_name.to_string());
    }

    fn generate(&mut self, path: &Path) -> Result<(), StoreError> {
        if self.backend.shared.borrow().fail_generation {
            return Err(StoreError::Compile("generation disabled".to_string()));
        }
        if self.backend.shared.borrow().write_outputs {
            std::fs::write(path, self.font.to_bytes())?;
        }
        self.backend
            .shared
            .borrow_mut()
            .generated
            .insert(path.to_path_buf(), self.font.clone());
        self.backend.log(format!("generate {}", path.display()));
        Ok(())
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        self.backend.log(format!("close {}", self.path.display()));
    }
}
