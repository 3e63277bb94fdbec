//! Frame rendering: SVG documents and their rasterization.

/// `resvg` rasterization to RGBA8.
pub mod raster;
/// SVG document writer for sampled scenes.
pub mod svg;
