//! Default rasterizer: measure, emit SVG, render with resvg, encode PNG.

use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::assets::media::encode_data_url;
use crate::encode::export::{RasterOptions, Rasterizer};
use crate::foundation::error::{FlyerError, FlyerResult};
use crate::layout::tree::FlyerTree;
use crate::render::measure::measure;
use crate::render::svg::to_svg;

/// CPU rasterizer backed by `resvg`.
#[derive(Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

impl SvgRasterizer {
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::with_fontdb(Arc::new(db))
    }

    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Render `tree` to PNG bytes at `opts.pixel_ratio`.
    pub fn render_png(&self, tree: &FlyerTree, opts: RasterOptions) -> FlyerResult<Vec<u8>> {
        if !(0.0..=1.0).contains(&opts.quality) {
            return Err(FlyerError::validation("quality must be in [0, 1]"));
        }
        let (w, h) = tree.canvas.scaled(opts.pixel_ratio)?;

        let layout = measure(tree)?;
        let svg = to_svg(tree, &layout)?;
        let usvg_opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let svg_tree = usvg::Tree::from_str(&svg, &usvg_opts)
            .map_err(|e| FlyerError::export(format!("parse svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| FlyerError::export("failed to allocate export pixmap"))?;
        let sx = w as f32 / tree.canvas.width as f32;
        let sy = h as f32 / tree.canvas.height as f32;
        resvg::render(
            &svg_tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        let mut rgba = Vec::with_capacity((w as usize) * (h as usize) * 4);
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        let compression = if opts.quality >= 0.9 {
            CompressionType::Best
        } else if opts.quality >= 0.5 {
            CompressionType::Default
        } else {
            CompressionType::Fast
        };
        let mut png = Vec::new();
        PngEncoder::new_with_quality(&mut png, compression, FilterType::Adaptive)
            .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
            .map_err(|e| FlyerError::export(format!("encode png: {e}")))?;
        Ok(png)
    }
}

#[async_trait]
impl Rasterizer for SvgRasterizer {
    #[tracing::instrument(level = "debug", skip_all, fields(ratio = %tree.aspect_ratio))]
    async fn rasterize(&self, tree: &FlyerTree, opts: RasterOptions) -> FlyerResult<String> {
        let this = self.clone();
        let tree = tree.clone();
        let png = tokio::task::spawn_blocking(move || this.render_png(&tree, opts))
            .await
            .map_err(|e| FlyerError::export(format!("rasterizer task failed: {e}")))??;
        Ok(encode_data_url("image/png", &png))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
