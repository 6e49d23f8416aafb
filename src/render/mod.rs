//! Rendering backend: flexbox measurement, SVG emission, and rasterization.

/// Box geometry for a visual tree.
pub mod measure;
/// PNG rasterization via `resvg`.
pub mod raster;
/// SVG document writer.
pub mod svg;
