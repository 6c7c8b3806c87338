//! SVG export serializer.
//!
//! Converts a solved stroke path into an SVG string with a single
//! `<path>` element, using the [`svg`] crate for document construction,
//! XML escaping, and path data formatting.
//!
//! The stroke becomes one `<path>` element with `M` (move to) and `L`
//! (line to) commands, since the whole point of the solver is a single
//! continuous pen-down stroke.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements for
//! accessibility and to help file managers identify exported files.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Path, Title};
use svg::node::{Node, Text, Value};

use hitofude_solver::Point;

/// Margin added around the stroke's bounding box, as a fraction of the
/// larger bounding-box extent.
const VIEWBOX_MARGIN_RATIO: f64 = 0.05;

/// Minimum viewBox extent, so degenerate strokes (all points collinear
/// or coincident on one axis) still render with a visible canvas.
const MIN_VIEWBOX_EXTENT: f64 = 1.0;

/// Metadata to embed in the SVG document.
///
/// All fields are optional.  When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.  These
/// are standard SVG accessibility elements and are surfaced by some file
/// managers and screen readers.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title — emitted as `<title>`.
    ///
    /// Typically the name of the point set or source file.
    pub title: Option<&'a str>,

    /// Document description — emitted as `<desc>`.
    ///
    /// Typically contains solver parameters so exported files are
    /// distinguishable.
    pub description: Option<&'a str>,

    /// Structured solver configuration JSON — emitted inside a
    /// `<metadata>` element wrapped in a namespaced
    /// `<hitofude:solver>` element.
    ///
    /// When present, the full serialized `SolverConfig` is embedded so
    /// exported files carry machine-parseable settings for
    /// reproducibility.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from an ordered point
/// sequence.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for strokes with fewer than 2 points.
///
/// Coordinates are formatted by the [`svg`] crate using `f32` precision
/// (sufficient for the solver's working-space coordinates).
///
/// # Examples
///
/// ```
/// use hitofude_solver::Point;
/// use hitofude_export::build_path_data;
///
/// let stroke = vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)];
/// let d = build_path_data(&stroke);
/// assert_eq!(d, "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(stroke: &[Point]) -> String {
    if stroke.len() < 2 {
        return String::new();
    }

    let first = stroke[0];
    let mut data = Data::new().move_to((first.x, first.y));
    for p in &stroke[1..] {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

/// Axis-aligned viewBox enclosing the stroke with a proportional
/// margin.  Returned as `(min_x, min_y, width, height)`.
fn view_box(stroke: &[Point]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in stroke {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if stroke.is_empty() {
        return (0.0, 0.0, MIN_VIEWBOX_EXTENT, MIN_VIEWBOX_EXTENT);
    }

    let width = (max_x - min_x).max(MIN_VIEWBOX_EXTENT);
    let height = (max_y - min_y).max(MIN_VIEWBOX_EXTENT);
    let margin = width.max(height) * VIEWBOX_MARGIN_RATIO;
    (
        min_x - margin,
        min_y - margin,
        2.0f64.mul_add(margin, width),
        2.0f64.mul_add(margin, height),
    )
}

/// Serialize a solved stroke into an SVG document string.
///
/// The stroke is emitted as a single `<path>` element when it has 2 or
/// more points; shorter strokes produce a document with no path (a
/// single point cannot form a visible line segment).
///
/// The `viewBox` is fitted to the stroke's bounding box with a small
/// proportional margin, so working-space coordinates render without any
/// caller-side transform.
///
/// If [`SvgMetadata::title`] or [`SvgMetadata::description`] is
/// provided, the corresponding `<title>` / `<desc>` element is emitted
/// after the opening `<svg>` tag.  If [`SvgMetadata::config_json`] is
/// provided, a `<metadata>` element is emitted containing the JSON
/// wrapped in a namespaced `<hitofude:solver>` element.
///
/// # Examples
///
/// ```
/// use hitofude_solver::Point;
/// use hitofude_export::{SvgMetadata, to_svg};
///
/// let stroke = vec![Point::new(10.0, 15.0), Point::new(12.5, 18.3)];
/// let metadata = SvgMetadata {
///     title: Some("scatter-24"),
///     description: Some("Exported by hitofude"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&stroke, &metadata);
/// assert!(svg.contains("<title>scatter-24</title>"));
/// assert!(svg.contains("<desc>Exported by hitofude</desc>"));
/// assert!(svg.contains("M10,15 L12.5,18.3"));
/// ```
#[must_use]
pub fn to_svg(stroke: &[Point], metadata: &SvgMetadata<'_>) -> String {
    let (vb_x, vb_y, vb_width, vb_height) = view_box(stroke);
    let mut doc = Document::new()
        .set("width", vb_width)
        .set("height", vb_height)
        .set("viewBox", format!("{vb_x} {vb_y} {vb_width} {vb_height}"));

    // Optional <title> element
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    // Optional <metadata> element with structured solver config
    if let Some(config_json) = metadata.config_json {
        let mut solver_el = Element::new("hitofude:solver");
        solver_el.assign("xmlns:hitofude", "https://hitofude.dev/ns/1");
        solver_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(solver_el);
        doc = doc.add(metadata_el);
    }

    let d = build_path_data(stroke);
    if !d.is_empty() {
        let path = Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 1)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round");
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Shorthand: no metadata (most tests don't care about it).
    fn no_meta() -> SvgMetadata<'static> {
        SvgMetadata::default()
    }

    // --- build_path_data ---

    #[test]
    fn build_path_data_empty_stroke() {
        assert_eq!(build_path_data(&[]), "");
    }

    #[test]
    fn build_path_data_single_point() {
        assert_eq!(build_path_data(&[Point::new(5.0, 5.0)]), "");
    }

    #[test]
    fn build_path_data_two_points() {
        let stroke = vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)];
        assert_eq!(build_path_data(&stroke), "M10,20 L30,40");
    }

    #[test]
    fn build_path_data_three_points() {
        let stroke = vec![
            Point::new(10.0, 15.0),
            Point::new(12.5, 18.3),
            Point::new(14.0, 20.1),
        ];
        assert_eq!(build_path_data(&stroke), "M10,15 L12.5,18.3 L14,20.1");
    }

    // --- Empty / degenerate inputs ---

    #[test]
    fn empty_stroke_produces_valid_svg_with_no_path() {
        let svg = to_svg(&[], &no_meta());
        assert!(svg.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains("viewBox"));
        assert!(!svg.contains("<path"));
        // Empty SVGs use self-closing <svg .../> tag
        assert!(svg.contains("<svg "));
        assert!(svg.trim_end().ends_with("/>"));
    }

    #[test]
    fn single_point_stroke_is_skipped() {
        let svg = to_svg(&[Point::new(5.0, 5.0)], &no_meta());
        assert!(!svg.contains("<path"));
    }

    // --- Basic output structure ---

    #[test]
    fn two_point_stroke_renders_one_path() {
        let stroke = vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)];
        let svg = to_svg(&stroke, &no_meta());

        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r#"d="M10,20 L30,40""#));
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"stroke="black""#));
        assert!(svg.contains(r#"stroke-width="1""#));
    }

    #[test]
    fn svg_has_xml_declaration_and_namespace() {
        let svg = to_svg(&[], &no_meta());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    }

    #[test]
    fn svg_ends_with_closing_tag() {
        // With children, the svg crate emits </svg>
        let stroke = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let svg = to_svg(&stroke, &no_meta());
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    // --- viewBox fitting ---

    #[test]
    fn viewbox_encloses_the_stroke() {
        let stroke = vec![Point::new(10.0, 20.0), Point::new(110.0, 220.0)];
        let (x, y, w, h) = view_box(&stroke);
        assert!(x < 10.0);
        assert!(y < 20.0);
        assert!(x + w > 110.0);
        assert!(y + h > 220.0);
    }

    #[test]
    fn viewbox_margin_is_proportional() {
        let stroke = vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0)];
        let (x, y, w, h) = view_box(&stroke);
        // Larger extent is 100, margin = 5 on every side.
        assert!((x - -5.0).abs() < 1e-12);
        assert!((y - -5.0).abs() < 1e-12);
        assert!((w - 110.0).abs() < 1e-12);
        assert!((h - 60.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_extent_gets_minimum_size() {
        // Horizontal line: zero height, the viewBox must still have one.
        let stroke = vec![Point::new(0.0, 5.0), Point::new(10.0, 5.0)];
        let (_, _, w, h) = view_box(&stroke);
        assert!(w >= MIN_VIEWBOX_EXTENT);
        assert!(h >= MIN_VIEWBOX_EXTENT);
    }

    // --- Metadata ---

    #[test]
    fn title_element_emitted_when_present() {
        let meta = SvgMetadata {
            title: Some("scatter-24"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&[], &meta);
        assert!(svg.contains("<title>scatter-24</title>"));
        assert!(!svg.contains("<desc>"));
    }

    #[test]
    fn desc_element_emitted_when_present() {
        let meta = SvgMetadata {
            description: Some("Exported by hitofude"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&[], &meta);
        assert!(svg.contains("<desc>Exported by hitofude</desc>"));
        assert!(!svg.contains("<title>"));
    }

    #[test]
    fn title_and_desc_omitted_when_none() {
        let svg = to_svg(&[], &no_meta());
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("<desc>"));
    }

    #[test]
    fn title_appears_before_the_path() {
        let stroke = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let meta = SvgMetadata {
            title: Some("test"),
            description: Some("desc"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&stroke, &meta);

        let title_pos = svg.find("<title>").unwrap();
        let desc_pos = svg.find("<desc>").unwrap();
        let path_pos = svg.find("<path").unwrap();
        assert!(title_pos < desc_pos, "title should come before desc");
        assert!(desc_pos < path_pos, "desc should come before the path");
    }

    #[test]
    fn special_characters_in_title_are_escaped() {
        let meta = SvgMetadata {
            title: Some("A <B> & C"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&[], &meta);
        assert!(svg.contains("<title>A &lt;B&gt; &amp; C</title>"));
    }

    // --- Config JSON / <metadata> ---

    #[test]
    fn metadata_element_emitted_when_config_json_present() {
        let meta = SvgMetadata {
            config_json: Some(r#"{"window_size":5}"#),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&[], &meta);
        assert!(svg.contains("<metadata>"));
        assert!(svg.contains("</metadata>"));
        assert!(svg.contains(r#"<hitofude:solver xmlns:hitofude="https://hitofude.dev/ns/1">"#));
        assert!(svg.contains("</hitofude:solver>"));
    }

    #[test]
    fn metadata_element_omitted_when_config_json_none() {
        let svg = to_svg(&[], &no_meta());
        assert!(!svg.contains("<metadata>"));
    }

    #[test]
    fn config_json_special_characters_are_escaped() {
        let meta = SvgMetadata {
            config_json: Some(r#"{"note":"a < b & c > d"}"#),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&[], &meta);
        // The svg crate escapes <, >, & in text content
        assert!(svg.contains("&lt;"));
        assert!(svg.contains("&amp;"));
        assert!(svg.contains("&gt;"));
    }

    // --- End-to-end: solve() -> to_svg() ---

    #[test]
    fn end_to_end_points_to_svg() {
        use hitofude_solver::{SolverConfig, solve};

        let points: Vec<Point> = (0..12)
            .map(|i| Point::new(f64::from(i * 7 % 12), f64::from(i * 5 % 12)))
            .collect();
        let result = solve(&points, &SolverConfig::default(), |_| true).unwrap();
        let config_json = serde_json::to_string(&SolverConfig::default()).unwrap();
        let meta = SvgMetadata {
            title: Some("grid-12"),
            config_json: Some(&config_json),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&result.polyline(), &meta);

        assert!(svg.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains("<title>grid-12</title>"));
        assert!(svg.contains("<metadata>"));
        assert!(svg.contains('M'));
        assert!(svg.contains('L'));
        assert!(svg.contains("</svg>"));
    }
}
