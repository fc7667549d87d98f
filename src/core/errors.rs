//! Typed errors for a merge run
//!
//! Every failure aborts the run. The variants exist so callers (and tests)
//! can tell what went wrong and for which font, symbol or target, not so
//! anything can be retried.

use crate::merge::StoreError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of file a configuration entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Config,
    SourceFont,
    SymbolCorpus,
    BaseFont,
    FallbackFont,
    PreviewTemplate,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Config => "configuration file",
            ResourceKind::SourceFont => "source font",
            ResourceKind::SymbolCorpus => "symbol corpus",
            ResourceKind::BaseFont => "base font",
            ResourceKind::FallbackFont => "fallback font",
            ResourceKind::PreviewTemplate => "preview template",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// Malformed or missing configuration fields.
    #[error("configuration error: {0}")]
    Config(String),

    /// A declared file does not exist or cannot be read.
    #[error("{kind} not found: {}", .path.display())]
    ResourceNotFound { kind: ResourceKind, path: PathBuf },

    /// The private-use range cannot hold every symbol that needs a new home.
    #[error(
        "private range exhausted while allocating {symbol:?} ({}) for font '{font}': \
         {unassigned} symbol(s) could not be assigned, use a wider range",
        u_plus(.symbol)
    )]
    AllocationExhausted {
        font: String,
        symbol: char,
        unassigned: usize,
    },

    /// A font could not be opened or prepared as a glyph store.
    #[error("glyph store error for font '{font}': {source}")]
    Store {
        font: String,
        #[source]
        source: StoreError,
    },

    /// A glyph could not be located, copied, pasted or renamed.
    #[error("merge failed for font '{font}' at U+{codepoint:04X}: {source}")]
    Merge {
        font: String,
        codepoint: u32,
        #[source]
        source: StoreError,
    },

    /// The merged glyph store could not be turned into a binary font.
    #[error("failed to generate target '{target}': {source}")]
    Generate {
        target: String,
        #[source]
        source: StoreError,
    },

    /// Writing the replacement map, checksums or a preview failed.
    #[error("failed to write {}: {reason}", .path.display())]
    ArtifactIo { path: PathBuf, reason: String },
}

fn u_plus(symbol: &char) -> String {
    format!("U+{:04X}", u32::from(*symbol))
}

impl BuildError {
    pub fn artifact_io(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        BuildError::ArtifactIo {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
