//! fontmerge: pulls selected glyphs out of several UFO fonts, re-homes them at
//! collision-free private-use code points, and merges them into target fonts.
pub mod artifacts;
pub mod core;
pub mod data;
pub mod logging;
pub mod merge;
pub mod symbols;
