//! SVG frame serializer.
//!
//! Draws one computed [`Frame`] as an SVG document using the [`svg`]
//! crate for document construction, XML escaping, and path data
//! formatting:
//!
//! - a background rectangle and the static title, subtitle, hint, scroll
//!   arrow and optional credit;
//! - one `<g>` per continent, translated to the continent origin, holding
//!   the spiral `<path>` and one `<circle>` per river marker;
//! - the continent name under each spiral;
//! - for hovered markers, the reference number next to the dot and the
//!   river caption under the spiral;
//! - the descending river list below the canvas, with the document grown
//!   to include it.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>`, and the layout
//! configuration JSON.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Rectangle, Title};
use svg::node::{Node, Text, Value};

use riverspiral_pipeline::{ContinentFrame, Frame, MarkerHit, Polyline, hovered_per_continent};

use crate::scene::{
    ARROW_INSET, CONTINENT_LABEL_INSET, CONTINENT_LABEL_SIZE, CREDIT_INSET, CREDIT_SIZE,
    HINT_POS, HINT_SIZE, HOVER_CAPTION_INSET, HOVER_CAPTION_SIZE, INDEX_LABEL_OFFSET,
    INDEX_LABEL_SIZE, LISTING_GAP, LISTING_LINE_HEIGHT, LISTING_SIZE, MARKER_DIAMETER,
    SPIRAL_STROKE_WIDTH, SUBTITLE_POS, SUBTITLE_SIZE, SceneOptions, TITLE_POS, TITLE_SIZE,
};

/// Namespace of the embedded layout configuration element.
const LAYOUT_NAMESPACE: &str = "https://riverspiral.dev/ns/1";

/// Metadata to embed in the SVG document.
///
/// All fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the input file name (without extension).
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized [`LayoutConfig`](riverspiral_pipeline::LayoutConfig),
    /// emitted inside a `<metadata>` element wrapped in a namespaced
    /// `<riverspiral:layout>` element.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a polyline.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for polylines with fewer than 2 points.
///
/// # Examples
///
/// ```
/// use riverspiral_pipeline::{Point, Polyline};
/// use riverspiral_export::build_path_data;
///
/// let polyline = Polyline::new(vec![
///     Point::new(10.0, 20.0),
///     Point::new(30.0, 40.0),
/// ]);
/// assert_eq!(build_path_data(&polyline), "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(polyline: &Polyline) -> String {
    let points = polyline.points();
    if points.len() < 2 {
        return String::new();
    }

    let first = &points[0];
    let mut data = Data::new().move_to((first.x, first.y));
    for p in &points[1..] {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

/// Height of the document: the canvas plus room for the longest river
/// list when listings are drawn.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn document_height(frame: &Frame, scene: &SceneOptions) -> f64 {
    let canvas = f64::from(frame.canvas.height);
    let rows = frame
        .continents
        .iter()
        .map(|c| c.listing.len())
        .max()
        .unwrap_or(0);
    if !scene.include_listing || rows == 0 {
        return canvas;
    }
    (rows as f64).mul_add(LISTING_LINE_HEIGHT, canvas + LISTING_GAP)
}

/// A `<text>` element.
fn text_element(content: &str, x: f64, y: f64, size: f64, fill: &str) -> Element {
    let mut el = Element::new("text");
    el.assign("x", x);
    el.assign("y", y);
    el.assign("font-size", size);
    el.assign("fill", fill);
    el.append(Text::new(content));
    el
}

fn bold(mut el: Element) -> Element {
    el.assign("font-weight", "bold");
    el
}

fn centered(mut el: Element) -> Element {
    el.assign("text-anchor", "middle");
    el
}

/// Text positioned by its top edge rather than its baseline.
fn hanging(mut el: Element) -> Element {
    el.assign("dominant-baseline", "hanging");
    el
}

/// Title, subtitle, hint, scroll arrow and credit.
fn chrome(frame: &Frame, scene: &SceneOptions, fill: &str) -> Vec<Element> {
    let width = f64::from(frame.canvas.width);
    let height = f64::from(frame.canvas.height);
    let mut out = vec![
        bold(hanging(text_element(
            &scene.title,
            TITLE_POS.0,
            TITLE_POS.1,
            TITLE_SIZE,
            fill,
        ))),
        bold(hanging(text_element(
            &scene.subtitle,
            SUBTITLE_POS.0,
            SUBTITLE_POS.1,
            SUBTITLE_SIZE,
            fill,
        ))),
        bold(hanging(text_element(
            &scene.hint,
            HINT_POS.0,
            HINT_POS.1,
            HINT_SIZE,
            fill,
        ))),
        bold(hanging(text_element(
            ">",
            width - ARROW_INSET.0,
            height - ARROW_INSET.1,
            TITLE_SIZE,
            fill,
        ))),
    ];
    if let Some(credit) = &scene.credit {
        out.push(bold(hanging(text_element(
            credit,
            TITLE_POS.0,
            height - CREDIT_INSET,
            CREDIT_SIZE,
            fill,
        ))));
    }
    out
}

/// Spiral and marker dots of one continent, in continent coordinates.
fn continent_group(continent: &ContinentFrame, fill: &str) -> Group {
    let mut group = Group::new().set(
        "transform",
        format!("translate({},{})", continent.origin.x, continent.origin.y),
    );

    let d = build_path_data(&continent.outline);
    if !d.is_empty() {
        group = group.add(
            Path::new()
                .set("d", d)
                .set("fill", "none")
                .set("stroke", fill)
                .set("stroke-width", SPIRAL_STROKE_WIDTH),
        );
    }

    for marker in &continent.markers {
        group = group.add(
            Circle::new()
                .set("cx", marker.point.x)
                .set("cy", marker.point.y)
                .set("r", MARKER_DIAMETER / 2.0)
                .set("fill", fill),
        );
    }
    group
}

/// Serialize a frame into an SVG document string.
///
/// `hits` are the markers under the pointer, as returned by
/// [`hit_test`](riverspiral_pipeline::hit_test). Every hit gets its
/// reference number drawn; the caption under each spiral shows the last
/// hit of that continent.
///
/// # Examples
///
/// ```
/// use riverspiral_pipeline::{AnimationState, SpiralLayoutEngine, Table, process};
/// use riverspiral_export::{SceneOptions, SvgMetadata, to_svg};
///
/// let table = Table::from_rows(
///     ["name", "continent", "length"],
///     [["Nile", "Africa", "6650"]],
/// );
/// let groups = process(&table, &Default::default()).unwrap();
/// let frame = SpiralLayoutEngine::default()
///     .compute_frame(&groups, &AnimationState::default());
/// let svg = to_svg(&frame, &SceneOptions::default(), &[], &SvgMetadata::default());
/// assert!(svg.contains(">Africa</text>"));
/// assert!(svg.contains(">1. Nile (6650 km)</text>"));
/// ```
#[must_use]
pub fn to_svg(
    frame: &Frame,
    scene: &SceneOptions,
    hits: &[MarkerHit<'_>],
    metadata: &SvgMetadata<'_>,
) -> String {
    let width = frame.canvas.width;
    let canvas_height = f64::from(frame.canvas.height);
    let height = document_height(frame, scene);
    let fill = scene.foreground.to_css();

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, f64::from(width), height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut layout_el = Element::new("riverspiral:layout");
        layout_el.assign("xmlns:riverspiral", LAYOUT_NAMESPACE);
        layout_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(layout_el);
        doc = doc.add(metadata_el);
    }

    doc = doc.add(
        Rectangle::new()
            .set("width", width)
            .set("height", height)
            .set("fill", scene.background.to_css()),
    );

    for el in chrome(frame, scene, &fill) {
        doc = doc.add(el);
    }

    for continent in &frame.continents {
        doc = doc.add(continent_group(continent, &fill));
        doc = doc.add(bold(centered(text_element(
            &continent.continent,
            continent.origin.x,
            canvas_height - CONTINENT_LABEL_INSET,
            CONTINENT_LABEL_SIZE,
            &fill,
        ))));
    }

    for hit in hits {
        let p = hit.canvas_point();
        let mut label = centered(text_element(
            &hit.marker.reverse_index.to_string(),
            p.x + INDEX_LABEL_OFFSET.0,
            p.y + INDEX_LABEL_OFFSET.1,
            INDEX_LABEL_SIZE,
            &fill,
        ));
        label.assign("dominant-baseline", "central");
        doc = doc.add(label);
    }

    for hit in hovered_per_continent(hits) {
        doc = doc.add(centered(text_element(
            &hit.marker.river.caption(),
            hit.continent.origin.x,
            canvas_height - HOVER_CAPTION_INSET,
            HOVER_CAPTION_SIZE,
            &fill,
        )));
    }

    if scene.include_listing {
        for continent in &frame.continents {
            let mut y = canvas_height + LISTING_GAP;
            for entry in &continent.listing {
                doc = doc.add(text_element(
                    &entry.label(),
                    continent.origin.x,
                    y,
                    LISTING_SIZE,
                    &fill,
                ));
                y += LISTING_LINE_HEIGHT;
            }
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
