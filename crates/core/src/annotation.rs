//! Annotation data model
//!
//! Geometry, style and identity for the markup kinds the editor can create.
//! All coordinates are stored in document space: page-local units with the
//! origin at the top-left corner of the page, X to the right, Y downward.

use serde::{Deserialize, Serialize};

/// Stable identity of an annotation
///
/// Survives document saves and re-renders. A recreated annotation (vertex-kind
/// move, FreeText reflow) always receives a fresh identity.
pub type AnnotationId = uuid::Uuid;

/// Zero-based page index
pub type PageIndex = u32;

/// Point in document space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f32,
    pub y: f32,
}

impl DocPoint {
    /// Create a new document point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance_to(&self, other: &DocPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Return this point moved by (dx, dy)
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle in document space
///
/// `(x0, y0)` is the top-left corner and `(x1, y1)` the bottom-right corner
/// once the rectangle is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl DocRect {
    /// Create a rectangle from its corner coordinates
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a normalized rectangle spanning two arbitrary corner points
    pub fn from_points(a: DocPoint, b: DocPoint) -> Self {
        Self::new(a.x, a.y, b.x, b.y).normalized()
    }

    /// Create a rectangle of the given size centered on a point
    pub fn centered_at(center: DocPoint, width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(center.x - half_w, center.y - half_h, center.x + half_w, center.y + half_h)
    }

    /// Return a copy with `x0 <= x1` and `y0 <= y1`
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    pub fn center(&self) -> DocPoint {
        DocPoint::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Check whether a point lies inside the rectangle (edges inclusive)
    pub fn contains(&self, point: &DocPoint) -> bool {
        self.contains_with_tolerance(point, 0.0)
    }

    /// Check whether a point lies inside the rectangle grown by `tolerance`
    pub fn contains_with_tolerance(&self, point: &DocPoint, tolerance: f32) -> bool {
        let r = self.normalized();
        point.x >= r.x0 - tolerance
            && point.x <= r.x1 + tolerance
            && point.y >= r.y0 - tolerance
            && point.y <= r.y1 + tolerance
    }

    /// Return this rectangle moved by (dx, dy)
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }
}

/// Closed taxonomy of annotation kinds
///
/// Must match the engine's taxonomy. `PolyLine` and `Polygon` never come from
/// the tool palette but may exist in opened documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationKind {
    Note,
    FreeText,
    Line,
    Circle,
    Highlight,
    Stamp,
    PolyLine,
    Polygon,
}

impl AnnotationKind {
    /// Name reported to the style-editing surface on selection
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Note => "Note",
            AnnotationKind::FreeText => "FreeText",
            AnnotationKind::Line => "Line",
            AnnotationKind::Circle => "Circle",
            AnnotationKind::Highlight => "Highlight",
            AnnotationKind::Stamp => "Stamp",
            AnnotationKind::PolyLine => "PolyLine",
            AnnotationKind::Polygon => "Polygon",
        }
    }

    /// Whether the kind stores an ordered vertex list instead of a rectangle
    pub fn is_vertex_kind(&self) -> bool {
        match self {
            AnnotationKind::Line | AnnotationKind::PolyLine | AnnotationKind::Polygon => true,
            AnnotationKind::Note
            | AnnotationKind::FreeText
            | AnnotationKind::Circle
            | AnnotationKind::Highlight
            | AnnotationKind::Stamp => false,
        }
    }

    /// Vertex kinds have no resize handles
    pub fn is_resizable(&self) -> bool {
        !self.is_vertex_kind()
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Annotation geometry
///
/// Rectangle kinds and vertex kinds are kept apart so that move and resize
/// logic has to handle both branches explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// Axis-aligned rectangle (Note, FreeText, Circle, Highlight, Stamp)
    Rect(DocRect),

    /// Ordered vertex list (Line, PolyLine, Polygon)
    Vertices(Vec<DocPoint>),
}

impl Geometry {
    /// Get the bounding rectangle for this geometry
    pub fn bounding_rect(&self) -> DocRect {
        match self {
            Geometry::Rect(rect) => rect.normalized(),
            Geometry::Vertices(points) => {
                let Some(first) = points.first() else {
                    return DocRect::default();
                };
                let mut bounds = DocRect::new(first.x, first.y, first.x, first.y);
                for point in points.iter().skip(1) {
                    bounds.x0 = bounds.x0.min(point.x);
                    bounds.y0 = bounds.y0.min(point.y);
                    bounds.x1 = bounds.x1.max(point.x);
                    bounds.y1 = bounds.y1.max(point.y);
                }
                bounds
            }
        }
    }

    /// Return this geometry moved by (dx, dy)
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        match self {
            Geometry::Rect(rect) => Geometry::Rect(rect.translated(dx, dy)),
            Geometry::Vertices(points) => {
                Geometry::Vertices(points.iter().map(|p| p.offset(dx, dy)).collect())
            }
        }
    }

    /// Check if a point hits this geometry
    ///
    /// Rectangles use plain containment. Vertex lists accept points within
    /// `tolerance` of any segment; `closed` also tests the closing segment.
    pub fn contains_point(&self, point: &DocPoint, tolerance: f32, closed: bool) -> bool {
        match self {
            Geometry::Rect(rect) => rect.contains(point),
            Geometry::Vertices(points) => match points.len() {
                0 => false,
                1 => point.distance_to(&points[0]) <= tolerance,
                len => {
                    let open_hit = points
                        .windows(2)
                        .any(|seg| point_near_segment(point, &seg[0], &seg[1], tolerance));
                    open_hit
                        || (closed
                            && len > 2
                            && point_near_segment(point, &points[len - 1], &points[0], tolerance))
                }
            },
        }
    }

    pub fn as_rect(&self) -> Option<DocRect> {
        match self {
            Geometry::Rect(rect) => Some(*rect),
            Geometry::Vertices(_) => None,
        }
    }

    pub fn vertices(&self) -> Option<&[DocPoint]> {
        match self {
            Geometry::Rect(_) => None,
            Geometry::Vertices(points) => Some(points),
        }
    }
}

/// Point-to-segment distance check
fn point_near_segment(point: &DocPoint, start: &DocPoint, end: &DocPoint, tolerance: f32) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-6 {
        return point.distance_to(start) <= tolerance;
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    let closest = DocPoint::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(&closest) <= tolerance
}

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an opaque color from unit-range channels (0.0 to 1.0)
    pub fn from_unit_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
    }

    /// Promote a single gray channel to RGB
    pub fn from_unit_gray(gray: f32) -> Self {
        Self::from_unit_rgb(gray, gray, gray)
    }

    /// Return the same color with a different alpha
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Convert to normalized RGB values (0.0 to 1.0)
    pub fn to_unit_rgb(&self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }

    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Common annotation colors
impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
}

/// Arrow decoration at the endpoints of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowEnds {
    #[default]
    None,
    Start,
    End,
    Both,
}

impl std::str::FromStr for ArrowEnds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ArrowEnds::None),
            "start" => Ok(ArrowEnds::Start),
            "end" => Ok(ArrowEnds::End),
            "both" => Ok(ArrowEnds::Both),
            other => Err(format!("unknown arrow configuration '{other}'")),
        }
    }
}

/// Visual styling of an annotation
///
/// Font fields only matter for FreeText and arrow ends only for lines, but
/// every kind carries the full record so the editing surface can round-trip it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Stroke color for lines and outlines
    pub stroke_color: Color,

    /// Fill color for closed shapes (None for no fill)
    pub fill_color: Option<Color>,

    /// Border thickness in document units
    pub thickness: f32,

    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: f32,

    /// Font family for FreeText (engine short name, e.g. "helv")
    pub font_family: String,

    /// Font size for FreeText in points
    pub font_size: f32,

    /// Text color for FreeText
    pub text_color: Color,

    /// Endpoint decorations for lines
    pub arrow_ends: ArrowEnds,
}

impl Style {
    /// Create default style (black stroke, 1pt width, no fill)
    pub fn new() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: None,
            thickness: 1.0,
            opacity: 1.0,
            font_family: "helv".to_string(),
            font_size: 12.0,
            text_color: Color::BLACK,
            arrow_ends: ArrowEnds::None,
        }
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn with_fill(mut self, color: Option<Color>) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f32, color: Color) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self.text_color = color;
        self
    }

    pub fn with_arrow_ends(mut self, arrow_ends: ArrowEnds) -> Self {
        self.arrow_ends = arrow_ends;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

/// Live reference to an engine-side annotation
///
/// Pairs the stable identity with the handle epoch it was acquired in. The
/// engine rejects handles from an older epoch with a stale-handle error; the
/// identity is then used to re-acquire a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationHandle {
    id: AnnotationId,
    epoch: u64,
}

impl AnnotationHandle {
    pub fn new(id: AnnotationId, epoch: u64) -> Self {
        Self { id, epoch }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Descriptive annotation metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    /// Author or creator of the annotation
    pub author: Option<String>,

    /// Text contents (FreeText body, note text, tooltip)
    #[serde(default)]
    pub contents: String,

    /// Creation timestamp (Unix timestamp in seconds)
    pub created_at: i64,
}

impl AnnotationMetadata {
    /// Create new metadata stamped with the current time
    pub fn new(author: Option<String>, contents: impl Into<String>) -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        Self { author, contents: contents.into(), created_at: now }
    }
}

/// Snapshot of an engine-side annotation
///
/// Returned by the gateway. The snapshot is only valid for the render pass it
/// was read in; its handle may go stale after the next document mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    handle: AnnotationHandle,
    page: PageIndex,
    kind: AnnotationKind,
    geometry: Geometry,
    style: Style,
    metadata: AnnotationMetadata,
}

impl Annotation {
    pub fn new(
        handle: AnnotationHandle,
        page: PageIndex,
        kind: AnnotationKind,
        geometry: Geometry,
        style: Style,
        metadata: AnnotationMetadata,
    ) -> Self {
        Self { handle, page, kind, geometry, style, metadata }
    }

    pub fn handle(&self) -> AnnotationHandle {
        self.handle
    }

    /// Get the stable identity
    pub fn id(&self) -> AnnotationId {
        self.handle.id()
    }

    pub fn page(&self) -> PageIndex {
        self.page
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn metadata(&self) -> &AnnotationMetadata {
        &self.metadata
    }

    /// Get the bounding rectangle in document space
    pub fn bounds(&self) -> DocRect {
        self.geometry.bounding_rect()
    }

    /// Check if a point hits this annotation (for selection)
    pub fn hit_test(&self, point: &DocPoint, tolerance: f32) -> bool {
        let closed = self.kind == AnnotationKind::Polygon;
        self.geometry.contains_point(point, tolerance, closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = DocPoint::new(0.0, 0.0);
        let p2 = DocPoint::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_from_points_normalizes() {
        let rect = DocRect::from_points(DocPoint::new(40.0, 90.0), DocPoint::new(10.0, 20.0));
        assert_eq!(rect, DocRect::new(10.0, 20.0, 40.0, 90.0));
        assert_eq!(rect.width(), 30.0);
        assert_eq!(rect.height(), 70.0);
    }

    #[test]
    fn test_rect_centered_at() {
        let rect = DocRect::centered_at(DocPoint::new(100.0, 100.0), 50.0, 50.0);
        assert_eq!(rect, DocRect::new(75.0, 75.0, 125.0, 125.0));
    }

    #[test]
    fn test_vertex_bounding_rect() {
        let geometry = Geometry::Vertices(vec![
            DocPoint::new(10.0, 80.0),
            DocPoint::new(50.0, 20.0),
            DocPoint::new(30.0, 40.0),
        ]);
        assert_eq!(geometry.bounding_rect(), DocRect::new(10.0, 20.0, 50.0, 80.0));
    }

    #[test]
    fn test_translated_vertices() {
        let geometry = Geometry::Vertices(vec![DocPoint::new(0.0, 0.0), DocPoint::new(10.0, 5.0)]);
        let moved = geometry.translated(3.0, -2.0);
        assert_eq!(
            moved.vertices(),
            Some(&[DocPoint::new(3.0, -2.0), DocPoint::new(13.0, 3.0)][..])
        );
    }

    #[test]
    fn test_line_hit_uses_tolerance() {
        let line = Geometry::Vertices(vec![DocPoint::new(0.0, 0.0), DocPoint::new(100.0, 0.0)]);
        assert!(line.contains_point(&DocPoint::new(50.0, 3.0), 5.0, false));
        assert!(!line.contains_point(&DocPoint::new(50.0, 8.0), 5.0, false));
        // Beyond the endpoint the distance is measured to the endpoint
        assert!(!line.contains_point(&DocPoint::new(110.0, 0.0), 5.0, false));
    }

    #[test]
    fn test_polygon_closing_segment() {
        let triangle = Geometry::Vertices(vec![
            DocPoint::new(0.0, 0.0),
            DocPoint::new(100.0, 0.0),
            DocPoint::new(0.0, 100.0),
        ]);
        let on_closing_edge = DocPoint::new(0.0, 50.0);
        assert!(triangle.contains_point(&on_closing_edge, 1.0, true));
        assert!(!triangle.contains_point(&on_closing_edge, 1.0, false));
    }

    #[test]
    fn test_rect_hit_is_plain_containment() {
        let rect = Geometry::Rect(DocRect::new(50.0, 50.0, 150.0, 150.0));
        assert!(rect.contains_point(&DocPoint::new(60.0, 60.0), 5.0, false));
        assert!(!rect.contains_point(&DocPoint::new(48.0, 60.0), 5.0, false));
    }

    #[test]
    fn test_kind_taxonomy() {
        assert!(AnnotationKind::Line.is_vertex_kind());
        assert!(AnnotationKind::Polygon.is_vertex_kind());
        assert!(AnnotationKind::FreeText.is_resizable());
        assert!(!AnnotationKind::PolyLine.is_resizable());
        assert_eq!(AnnotationKind::Circle.to_string(), "Circle");
    }

    #[test]
    fn test_gray_promotion() {
        let gray = Color::from_unit_gray(0.5);
        assert_eq!(gray, Color::rgb(128, 128, 128));
        assert!(gray.is_gray());
    }

    #[test]
    fn test_arrow_ends_parse() {
        assert_eq!("Both".parse::<ArrowEnds>(), Ok(ArrowEnds::Both));
        assert!("sideways".parse::<ArrowEnds>().is_err());
    }
}
