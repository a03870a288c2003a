//! riverspiral-export: Pure frame serializers (sans-IO)
//!
//! Converts a computed [`Frame`](riverspiral_pipeline::Frame) into output
//! formats: an SVG document with all labels, and a PNG raster of the
//! geometry only.

pub mod raster;
pub mod scene;
pub mod svg;

pub use raster::{ExportError, render_pixmap, to_png};
pub use scene::{Rgb, SceneOptions};
pub use svg::{SvgMetadata, build_path_data, document_height, to_svg};
