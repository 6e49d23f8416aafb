//! Export of a rendered flyer to an image file.

/// Export state machine, rasterizer and sink contracts.
pub mod export;
