//! Replacement allocation
//!
//! Every non-identity font gets its symbols moved into the private range, in
//! declared font order and corpus order, from one cursor shared by all fonts.
//! That makes each (font, symbol) pair land on its own code point without a
//! separate collision check, and makes the result depend only on the inputs.

use crate::core::config_file::PrivateRange;
use crate::core::errors::BuildError;
use crate::symbols::replacement_map::{FontReplacements, ReplacementMap};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Next free code point of a single allocation pass
#[derive(Debug)]
struct Cursor {
    next: u32,
    upper: u32,
}

impl Cursor {
    fn new(range: PrivateRange) -> Self {
        Self {
            next: range.lower(),
            upper: range.upper(),
        }
    }

    /// Hand out the current code point and advance.
    ///
    /// Returns `None` when advancing would make the cursor reach the upper
    /// bound of the range.
    fn advance(&mut self) -> Option<char> {
        if self.next + 1 >= self.upper {
            return None;
        }
        let replacement = char::from_u32(self.next)?;
        self.next += 1;
        Some(replacement)
    }
}

/// Build the replacement map for the collected symbols of every font.
///
/// `symbols` maps font identity to the symbols collected for it, in declared
/// font order. Symbols of `default_font` map to themselves and don't consume
/// the range. Fails without returning a partial map when the range runs out.
pub fn allocate(
    symbols: &IndexMap<String, Vec<char>>,
    default_font: Option<&str>,
    range: PrivateRange,
) -> Result<ReplacementMap, BuildError> {
    let mut cursor = Cursor::new(range);
    let mut map = ReplacementMap::default();

    for (font_index, (font_name, font_symbols)) in symbols.iter().enumerate() {
        let is_identity = default_font == Some(font_name.as_str());
        let mut replacements = FontReplacements::new();

        for (position, &symbol) in font_symbols.iter().enumerate() {
            if replacements.contains_key(&symbol) {
                continue;
            }

            if is_identity {
                replacements.insert(symbol, symbol);
                continue;
            }

            let Some(replacement) = cursor.advance() else {
                let unassigned = pending_symbols(&font_symbols[position..], &replacements)
                    + symbols
                        .iter()
                        .skip(font_index + 1)
                        .filter(|(name, _)| default_font != Some(name.as_str()))
                        .map(|(_, later)| pending_symbols(later, &FontReplacements::new()))
                        .sum::<usize>();
                return Err(BuildError::AllocationExhausted {
                    font: font_name.clone(),
                    symbol,
                    unassigned,
                });
            };

            trace!(
                "{}: U+{:04X} -> U+{:04X}",
                font_name,
                u32::from(symbol),
                u32::from(replacement)
            );
            replacements.insert(symbol, replacement);
        }

        debug!(
            "Allocated {} symbol(s) for font '{}'{}",
            replacements.len(),
            font_name,
            if is_identity { " (identity)" } else { "" }
        );
        map.insert_font(font_name.clone(), replacements);
    }

    Ok(map)
}

/// Distinct symbols in `symbols` that are not in `done` yet
fn pending_symbols(symbols: &[char], done: &FontReplacements) -> usize {
    symbols
        .iter()
        .filter(|symbol| !done.contains_key(*symbol))
        .collect::<HashSet<_>>()
        .len()
}
