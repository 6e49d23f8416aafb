//! Layout compositor: flyer content and design in, visual tree out.

/// Pure compositor functions.
pub mod compose;
/// Per-format type scale lookup.
pub mod preset;
/// Visual tree types.
pub mod tree;
