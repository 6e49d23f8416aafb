//! Color parsing and inline image payloads.

pub mod color;
pub mod media;
