//! Font source data access

pub mod ufo;
