//! Symbol corpus reading
//!
//! A corpus is a plain text file listing the characters to pull out of a
//! font. Line breaks and the whitespace around each line are layout only.

use crate::core::config_file::FontConfig;
use crate::core::errors::{BuildError, ResourceKind};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Collect the symbols to extract from `font`, in corpus order followed by
/// the extra code points.
///
/// Duplicates are kept. The allocator decides which occurrence wins.
pub fn collect(font_name: &str, font: &FontConfig, corpus_path: &Path) -> Result<Vec<char>, BuildError> {
    let corpus = fs::read_to_string(corpus_path).map_err(|_| BuildError::ResourceNotFound {
        kind: ResourceKind::SymbolCorpus,
        path: corpus_path.to_path_buf(),
    })?;

    let symbols = collect_from_text(&corpus, &font.extra_codepoints).map_err(|codepoint| {
        BuildError::Config(format!(
            "font '{font_name}' lists {codepoint:#X} in extra_codepoints, which is not a Unicode scalar value"
        ))
    })?;

    debug!(
        "Collected {} symbol(s) for font '{}' from {:?}",
        symbols.len(),
        font_name,
        corpus_path
    );
    Ok(symbols)
}

/// Strip every line, join the lines, then append `extra_codepoints`.
///
/// Fails with the first extra code point that is not a valid `char`.
pub fn collect_from_text(corpus: &str, extra_codepoints: &[u32]) -> Result<Vec<char>, u32> {
    let mut symbols: Vec<char> = corpus.lines().flat_map(|line| line.trim().chars()).collect();

    for &codepoint in extra_codepoints {
        symbols.push(char::from_u32(codepoint).ok_or(codepoint)?);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_newlines_are_not_symbols() {
        assert_eq!(collect_from_text("ab\ncd", &[]), Ok(vec!['a', 'b', 'c', 'd']));
    }

    #[test]
    fn test_lines_are_trimmed_but_inner_characters_kept() {
        let corpus = "  ← →  \r\n\t⚙ ⚠\n\n";
        assert_eq!(
            collect_from_text(corpus, &[]),
            Ok(vec!['←', ' ', '→', '⚙', ' ', '⚠'])
        );
    }

    #[test]
    fn test_extra_codepoints_follow_corpus_in_order() {
        let symbols = collect_from_text("ab", &[0x2603, 0x41, 0x2603]).expect("valid");
        assert_eq!(symbols, ['a', 'b', '☃', 'A', '☃']);
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(collect_from_text("aba", &[0x61]), Ok(vec!['a', 'b', 'a', 'a']));
    }

    #[test]
    fn test_invalid_extra_codepoint_is_reported() {
        assert_eq!(collect_from_text("a", &[0x41, 0xDC00]), Err(0xDC00));
    }

    #[test]
    fn test_collect_reads_corpus_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let corpus_path = dir.path().join("icons.txt");
        std::fs::write(&corpus_path, "★☆\n♥\n").expect("write corpus");

        let font = FontConfig {
            name: "Icons".to_string(),
            filename: PathBuf::from("Icons.ufo"),
            symbols: PathBuf::from("icons.txt"),
            extra_codepoints: vec![0x266A],
        };

        let symbols = collect("icons", &font, &corpus_path).expect("collect");
        assert_eq!(symbols, ['★', '☆', '♥', '♪']);
    }

    #[test]
    fn test_missing_corpus_is_reported() {
        let font = FontConfig {
            name: "Icons".to_string(),
            filename: PathBuf::from("Icons.ufo"),
            symbols: PathBuf::from("missing.txt"),
            extra_codepoints: Vec::new(),
        };
        let result = collect("icons", &font, Path::new("/nonexistent/missing.txt"));
        assert!(matches!(
            result,
            Err(BuildError::ResourceNotFound {
                kind: ResourceKind::SymbolCorpus,
                ..
            })
        ));
    }
}
