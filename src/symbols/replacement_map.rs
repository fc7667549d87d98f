//! The allocation table: source font → original symbol → replacement

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Replacements for one source font, in allocation order
pub type FontReplacements = IndexMap<char, char>;

/// Where every extracted symbol of every source font ends up in the merged font.
///
/// Built once by the allocator and read-only afterwards. Fonts and symbols
/// keep the order they were allocated in, which is also the order of the
/// JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementMap {
    fonts: IndexMap<String, FontReplacements>,
}

impl ReplacementMap {
    pub(crate) fn insert_font(&mut self, font_name: String, replacements: FontReplacements) {
        self.fonts.insert(font_name, replacements);
    }

    /// Replacements allocated for `font_name`
    pub fn font(&self, font_name: &str) -> Option<&FontReplacements> {
        self.fonts.get(font_name)
    }

    /// Where `symbol` from `font_name` was moved to
    pub fn replacement(&self, font_name: &str, symbol: char) -> Option<char> {
        self.font(font_name)?.get(&symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FontReplacements)> {
        self.fonts
            .iter()
            .map(|(name, replacements)| (name.as_str(), replacements))
    }

    pub fn font_names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Total number of (font, symbol) entries
    pub fn len(&self) -> usize {
        self.fonts.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
