//! Build configuration file handling
//!
//! Loads `fontmerge.toml`, resolves every path it mentions and validates the
//! whole document before any font is touched.

use crate::artifacts::preview::BASE_PREVIEW_LABEL;
use crate::core::errors::{BuildError, ResourceKind};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "fontmerge.toml";

/// Compiler used to turn the merged UFO into a binary font
pub const DEFAULT_COMPILER: &str = "fontc";

const SURROGATES: std::ops::Range<u32> = 0xD800..0xE000;
const CODEPOINT_LIMIT: u32 = 0x11_0000;

/// Window of code points that remapped glyphs are allocated from.
///
/// `lower` is the first code point handed out. The allocation cursor must
/// stay strictly below `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "[u32; 2]")]
pub struct PrivateRange {
    lower: u32,
    upper: u32,
}

impl PrivateRange {
    pub fn new(lower: u32, upper: u32) -> Result<Self, BuildError> {
        if lower >= upper {
            return Err(BuildError::Config(format!(
                "private_range lower bound {lower:#X} must be below upper bound {upper:#X}"
            )));
        }
        if upper > CODEPOINT_LIMIT {
            return Err(BuildError::Config(format!(
                "private_range upper bound {upper:#X} is past the last Unicode code point"
            )));
        }
        if lower < SURROGATES.end && upper > SURROGATES.start {
            return Err(BuildError::Config(format!(
                "private_range {lower:#X}..{upper:#X} overlaps the surrogate block D800..DFFF"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> u32 {
        self.lower
    }

    pub fn upper(&self) -> u32 {
        self.upper
    }

    /// Number of code points between the bounds
    pub fn width(&self) -> u32 {
        self.upper - self.lower
    }
}

impl Default for PrivateRange {
    /// The Basic Multilingual Plane private use area
    fn default() -> Self {
        Self {
            lower: 0xE000,
            upper: 0xF8FF,
        }
    }
}

impl TryFrom<[u32; 2]> for PrivateRange {
    type Error = BuildError;

    fn try_from([lower, upper]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(lower, upper)
    }
}

/// A font glyphs are pulled out of
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontConfig {
    /// Human readable name
    pub name: String,
    /// UFO source, relative to `fonts_dir`
    pub filename: PathBuf,
    /// Text file listing the characters to extract, relative to `fonts_dir`
    pub symbols: PathBuf,
    /// Code points extracted in addition to the corpus
    #[serde(default)]
    pub extra_codepoints: Vec<u32>,
}

/// One merged font to produce
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Output file name inside the output directory
    pub filename: String,
    /// UFO the merge starts from, relative to `fonts_dir`
    pub base_font: PathBuf,
    /// Family name written into the merged font
    pub family_name: Option<String>,
}

/// The whole build description
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default)]
    pub private_range: PrivateRange,
    /// Font whose symbols keep their original code points
    pub default_font: Option<String>,
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
    /// Font embedded into every preview for comparison, relative to `fonts_dir`
    pub fallback_font: PathBuf,
    /// Preview template, relative to the configuration file.
    /// The built-in template is used when unset.
    pub preview_template: Option<PathBuf>,
    #[serde(default = "default_compiler")]
    pub compiler: String,
    pub fonts: IndexMap<String, FontConfig>,
    pub targets: IndexMap<String, TargetConfig>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    root: PathBuf,
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_compiler() -> String {
    DEFAULT_COMPILER.to_string()
}

impl BuildConfig {
    /// Load, validate and check the configuration at `path`.
    ///
    /// Relative paths inside the file are resolved against the directory the
    /// file lives in.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents = fs::read_to_string(path).map_err(|_| BuildError::ResourceNotFound {
            kind: ResourceKind::Config,
            path: path.to_path_buf(),
        })?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let config = Self::from_toml(&contents, root)?;
        config.check_resources()?;
        debug!(
            "Loaded build configuration from {:?}: {} font(s), {} target(s)",
            path,
            config.fonts.len(),
            config.targets.len()
        );
        Ok(config)
    }

    /// Parse and validate a configuration document without touching the disk
    pub fn from_toml(contents: &str, root: PathBuf) -> Result<Self, BuildError> {
        let mut config: BuildConfig =
            toml::from_str(contents).map_err(|e| BuildError::Config(e.to_string()))?;
        config.root = root;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that don't need the filesystem
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.fonts.is_empty() {
            return Err(BuildError::Config("no fonts declared".to_string()));
        }
        if self.targets.is_empty() {
            return Err(BuildError::Config("no targets declared".to_string()));
        }

        if let Some(default_font) = &self.default_font {
            if !self.fonts.contains_key(default_font) {
                return Err(BuildError::Config(format!(
                    "default_font '{default_font}' is not one of the declared fonts"
                )));
            }
        }

        if self.fonts.contains_key(BASE_PREVIEW_LABEL) {
            return Err(BuildError::Config(format!(
                "'{BASE_PREVIEW_LABEL}' is reserved for the preview reference text and cannot name a font"
            )));
        }

        for (font_name, font) in &self.fonts {
            for &codepoint in &font.extra_codepoints {
                if char::from_u32(codepoint).is_none() {
                    return Err(BuildError::Config(format!(
                        "font '{font_name}' lists {codepoint:#X} in extra_codepoints, which is not a Unicode scalar value"
                    )));
                }
            }
        }

        let mut filenames = HashSet::new();
        for (target_name, target) in &self.targets {
            let is_plain = !target.filename.is_empty()
                && Path::new(&target.filename).file_name() == Some(OsStr::new(&target.filename));
            if !is_plain {
                return Err(BuildError::Config(format!(
                    "target '{target_name}' filename '{}' must be a plain file name",
                    target.filename
                )));
            }
            if !filenames.insert(target.filename.as_str()) {
                return Err(BuildError::Config(format!(
                    "target '{target_name}' reuses output filename '{}'",
                    target.filename
                )));
            }
        }

        Ok(())
    }

    /// Make sure every file the run will read is present
    pub fn check_resources(&self) -> Result<(), BuildError> {
        let mut expected = Vec::new();
        for font in self.fonts.values() {
            expected.push((ResourceKind::SourceFont, self.font_path(font)));
            expected.push((ResourceKind::SymbolCorpus, self.corpus_path(font)));
        }
        for target in self.targets.values() {
            expected.push((ResourceKind::BaseFont, self.base_font_path(target)));
        }
        expected.push((ResourceKind::FallbackFont, self.fallback_font_path()));
        if let Some(template) = self.template_path() {
            expected.push((ResourceKind::PreviewTemplate, template));
        }

        match expected.into_iter().find(|(_, path)| !path.exists()) {
            Some((kind, path)) => Err(BuildError::ResourceNotFound { kind, path }),
            None => Ok(()),
        }
    }

    fn fonts_root(&self) -> PathBuf {
        self.root.join(&self.fonts_dir)
    }

    pub fn font_path(&self, font: &FontConfig) -> PathBuf {
        self.fonts_root().join(&font.filename)
    }

    pub fn corpus_path(&self, font: &FontConfig) -> PathBuf {
        self.fonts_root().join(&font.symbols)
    }

    pub fn base_font_path(&self, target: &TargetConfig) -> PathBuf {
        self.fonts_root().join(&target.base_font)
    }

    pub fn fallback_font_path(&self) -> PathBuf {
        self.fonts_root().join(&self.fallback_font)
    }

    pub fn template_path(&self) -> Option<PathBuf> {
        self.preview_template
            .as_ref()
            .map(|template| self.root.join(template))
    }
}
