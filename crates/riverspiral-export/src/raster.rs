//! PNG rasterizer.
//!
//! Draws a frame's spirals and marker dots with `tiny-skia`. Text is not
//! rasterized; use [`to_svg`](crate::to_svg) for a labelled frame.

use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use riverspiral_pipeline::{ContinentFrame, Frame};

use crate::scene::{MARKER_DIAMETER, Rgb, SPIRAL_STROKE_WIDTH, SceneOptions};

/// Errors that can occur while rasterizing a frame.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The canvas has a zero dimension or is too large to allocate.
    #[error("cannot allocate a {width}x{height} canvas")]
    EmptyCanvas {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

fn paint(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

/// Stroke the outline and fill the marker dots of one continent.
#[allow(clippy::cast_possible_truncation)]
fn draw_continent(pixmap: &mut Pixmap, continent: &ContinentFrame, paint: &Paint<'_>) {
    let transform =
        Transform::from_translate(continent.origin.x as f32, continent.origin.y as f32);

    let points = continent.outline.points();
    if points.len() >= 2 {
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x as f32, points[0].y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: SPIRAL_STROKE_WIDTH as f32,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, paint, &stroke, transform, None);
        }
    }

    let radius = (MARKER_DIAMETER / 2.0) as f32;
    for marker in &continent.markers {
        if let Some(dot) =
            PathBuilder::from_circle(marker.point.x as f32, marker.point.y as f32, radius)
        {
            pixmap.fill_path(&dot, paint, FillRule::Winding, transform, None);
        }
    }
}

/// Rasterize a frame onto a canvas-sized pixmap.
///
/// # Errors
///
/// Returns [`ExportError::EmptyCanvas`] if the frame's canvas cannot be
/// allocated.
pub fn render_pixmap(frame: &Frame, scene: &SceneOptions) -> Result<Pixmap, ExportError> {
    let width = frame.canvas.width;
    let height = frame.canvas.height;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::EmptyCanvas { width, height })?;

    let bg = scene.background;
    pixmap.fill(Color::from_rgba8(bg.r, bg.g, bg.b, 255));

    let fg = paint(scene.foreground);
    for continent in &frame.continents {
        draw_continent(&mut pixmap, continent, &fg);
    }
    Ok(pixmap)
}

/// Rasterize a frame and encode it as PNG.
///
/// # Errors
///
/// Returns [`ExportError::EmptyCanvas`] if the canvas cannot be allocated
/// and [`ExportError::PngEncode`] if encoding fails.
pub fn to_png(frame: &Frame, scene: &SceneOptions) -> Result<Vec<u8>, ExportError> {
    let pixmap = render_pixmap(frame, scene)?;
    pixmap
        .encode_png()
        .map_err(|e| ExportError::PngEncode(e.to_string()))
}
