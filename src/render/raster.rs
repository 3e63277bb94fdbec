use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    foundation::error::{PodiumError, PodiumResult},
    render::svg::SvgDocument,
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Turns SVG frame documents into pixels with `resvg`.
///
/// The font database is loaded once and shared by every frame.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("resources_dir", &self.options.resources_dir)
            .field("font_faces", &self.options.fontdb.len())
            .finish()
    }
}

impl Rasterizer {
    /// `resources_dir` resolves relative image references such as a theme icon.
    pub fn new(resources_dir: Option<PathBuf>) -> Self {
        let fontdb = build_fontdb(resources_dir.as_deref());
        Self {
            options: usvg::Options {
                resources_dir,
                fontdb,
                ..Default::default()
            },
        }
    }

    pub fn rasterize(&self, doc: &SvgDocument) -> PodiumResult<FrameRGBA> {
        let tree = usvg::Tree::from_data(doc.as_str().as_bytes(), &self.options)
            .map_err(|e| PodiumError::render(format!("parse svg frame: {e}")))?;
        let data = rasterize_svg_to_premul_rgba8(&tree, doc.width, doc.height)?;
        Ok(FrameRGBA {
            width: doc.width,
            height: doc.height,
            data,
            premultiplied: true,
        })
    }
}

pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> PodiumResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PodiumError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Premultiplied RGBA8 to straight alpha, as PNG encoders expect.
pub fn unpremultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn build_fontdb(resources_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = resources_dir {
        db.load_fonts_dir(dir.join("fonts"));
    }
    Arc::new(db)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
