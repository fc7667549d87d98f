//! Symbol collection and replacement allocation
//!
//! Turns the configured fonts into a [`ReplacementMap`]: which symbols are
//! pulled out of each font and which code point each one lands on.

pub mod allocator;
pub mod collector;
pub mod replacement_map;

pub use allocator::allocate;
pub use collector::{collect, collect_from_text};
pub use replacement_map::{FontReplacements, ReplacementMap};
