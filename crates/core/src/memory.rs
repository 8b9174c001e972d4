//! In-memory annotation engine
//!
//! A complete [`AnnotationGateway`] backed by per-page vectors. It enforces
//! the same contract a PDF engine binding does: z-ordered listing, degenerate
//! geometry rejection, in-place geometry edits for rectangle kinds only, and
//! handle invalidation across render epochs.

use crate::annotation::{
    Annotation, AnnotationHandle, AnnotationId, AnnotationKind, AnnotationMetadata, Color,
    Geometry, PageIndex, Style,
};
use crate::gateway::{AnnotationGateway, GatewayError, GatewayResult, NewAnnotation};
use tracing::debug;

/// Extent below which a geometry counts as degenerate
const DEGENERATE_EXTENT: f32 = 1e-3;

#[derive(Debug, Clone)]
struct StoredAnnotation {
    id: AnnotationId,
    kind: AnnotationKind,
    geometry: Geometry,
    style: Style,
    metadata: AnnotationMetadata,
}

#[derive(Debug, Clone)]
pub struct MemoryGateway {
    pages: Vec<Vec<StoredAnnotation>>,
    epoch: u64,
}

impl MemoryGateway {
    pub fn new(page_count: u32) -> Self {
        Self { pages: vec![Vec::new(); page_count as usize], epoch: 0 }
    }

    /// Current handle epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drop every outstanding handle, as an engine does when it re-renders
    /// or re-opens the document. Identities keep resolving.
    pub fn invalidate_handles(&mut self) {
        self.epoch += 1;
        debug!(epoch = self.epoch, "invalidated annotation handles");
    }

    pub fn annotation_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    fn check_page(&self, page: PageIndex) -> GatewayResult<&Vec<StoredAnnotation>> {
        self.pages
            .get(page as usize)
            .ok_or(GatewayError::PageOutOfRange { page, page_count: self.page_count() })
    }

    fn locate(&self, handle: &AnnotationHandle) -> GatewayResult<(usize, usize)> {
        if handle.epoch() != self.epoch {
            return Err(GatewayError::stale(*handle));
        }
        self.pages
            .iter()
            .enumerate()
            .find_map(|(page, annotations)| {
                annotations.iter().position(|a| a.id == handle.id()).map(|index| (page, index))
            })
            .ok_or_else(|| GatewayError::stale(*handle))
    }

    fn snapshot(&self, page: usize, stored: &StoredAnnotation) -> Annotation {
        Annotation::new(
            AnnotationHandle::new(stored.id, self.epoch),
            page as PageIndex,
            stored.kind,
            stored.geometry.clone(),
            stored.style.clone(),
            stored.metadata.clone(),
        )
    }
}

impl AnnotationGateway for MemoryGateway {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn list_annotations(&self, page: PageIndex) -> GatewayResult<Vec<Annotation>> {
        let annotations = self.check_page(page)?;
        Ok(annotations.iter().map(|stored| self.snapshot(page as usize, stored)).collect())
    }

    fn read(&self, handle: &AnnotationHandle) -> GatewayResult<Annotation> {
        let (page, index) = self.locate(handle)?;
        Ok(self.snapshot(page, &self.pages[page][index]))
    }

    fn create(&mut self, page: PageIndex, request: NewAnnotation) -> GatewayResult<Annotation> {
        self.check_page(page)?;
        let geometry = validate_geometry(request.kind, request.geometry)?;

        let stored = StoredAnnotation {
            id: AnnotationId::new_v4(),
            kind: request.kind,
            geometry,
            style: request.style,
            metadata: request.metadata,
        };
        debug!(id = %stored.id, kind = %stored.kind, page, "created annotation");

        let snapshot = self.snapshot(page as usize, &stored);
        self.pages[page as usize].push(stored);
        Ok(snapshot)
    }

    fn set_geometry(&mut self, handle: &AnnotationHandle, geometry: Geometry) -> GatewayResult<()> {
        let (page, index) = self.locate(handle)?;
        let stored = &mut self.pages[page][index];

        match (&geometry, stored.kind.is_vertex_kind()) {
            (Geometry::Rect(rect), false) => {
                stored.geometry = Geometry::Rect(rect.normalized());
                Ok(())
            }
            _ => Err(GatewayError::UnsupportedGeometryEdit(stored.kind)),
        }
    }

    fn set_style(&mut self, handle: &AnnotationHandle, style: &Style) -> GatewayResult<()> {
        let (page, index) = self.locate(handle)?;
        self.pages[page][index].style = style.clone();
        Ok(())
    }

    fn delete(&mut self, handle: &AnnotationHandle) -> GatewayResult<()> {
        let (page, index) = self.locate(handle)?;
        let removed = self.pages[page].remove(index);
        debug!(id = %removed.id, kind = %removed.kind, page, "deleted annotation");
        Ok(())
    }

    fn resolve_by_identity(&self, page: PageIndex, id: AnnotationId) -> Option<Annotation> {
        let annotations = self.pages.get(page as usize)?;
        annotations
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| self.snapshot(page as usize, stored))
    }

    fn default_appearance(&self, handle: &AnnotationHandle) -> GatewayResult<Option<String>> {
        let (page, index) = self.locate(handle)?;
        let stored = &self.pages[page][index];
        if stored.kind != AnnotationKind::FreeText {
            return Ok(None);
        }
        Ok(Some(format_default_appearance(&stored.style)))
    }
}

/// Reject geometry the kind cannot hold and normalize rectangles
fn validate_geometry(kind: AnnotationKind, geometry: Geometry) -> GatewayResult<Geometry> {
    let creation_error = |reason: &str| GatewayError::Creation { kind, reason: reason.to_string() };

    match geometry {
        Geometry::Rect(rect) => {
            if kind.is_vertex_kind() {
                return Err(creation_error("expected a vertex list"));
            }
            let rect = rect.normalized();
            if rect.width() < DEGENERATE_EXTENT || rect.height() < DEGENERATE_EXTENT {
                return Err(creation_error("empty rectangle"));
            }
            Ok(Geometry::Rect(rect))
        }
        Geometry::Vertices(points) => {
            if !kind.is_vertex_kind() {
                return Err(creation_error("expected a rectangle"));
            }
            let required = match kind {
                AnnotationKind::Polygon => 3,
                _ => 2,
            };
            if points.len() < required {
                return Err(creation_error("too few vertices"));
            }
            if kind == AnnotationKind::Line && points.len() != 2 {
                return Err(creation_error("a line has exactly two vertices"));
            }
            let geometry = Geometry::Vertices(points);
            let bounds = geometry.bounding_rect();
            if bounds.width() < DEGENERATE_EXTENT && bounds.height() < DEGENERATE_EXTENT {
                return Err(creation_error("zero-length geometry"));
            }
            Ok(geometry)
        }
    }
}

/// Render a style as a default-appearance string
///
/// Gray text colors use the single-channel `g` operator, everything else `rg`.
pub fn format_default_appearance(style: &Style) -> String {
    let font = capitalize(&style.font_family);
    let color = style.text_color;
    format!("/{font} {} Tf {}", style.font_size, color_operator(color))
}

fn color_operator(color: Color) -> String {
    let (r, g, b) = color.to_unit_rgb();
    if color.is_gray() {
        format!("{r} g")
    } else {
        format!("{r} {g} {b} rg")
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{DocPoint, DocRect};

    fn circle_request(rect: DocRect) -> NewAnnotation {
        NewAnnotation::new(AnnotationKind::Circle, Geometry::Rect(rect), Style::new())
    }

    #[test]
    fn test_list_preserves_creation_order() {
        let mut gateway = MemoryGateway::new(2);
        let first = gateway.create(1, circle_request(DocRect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        let second = gateway.create(1, circle_request(DocRect::new(5.0, 5.0, 20.0, 20.0))).unwrap();

        let listed = gateway.list_annotations(1).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id(), first.id());
        assert_eq!(listed[1].id(), second.id());
        assert!(gateway.list_annotations(0).unwrap().is_empty());
    }

    #[test]
    fn test_page_out_of_range() {
        let gateway = MemoryGateway::new(1);
        assert_eq!(
            gateway.list_annotations(3),
            Err(GatewayError::PageOutOfRange { page: 3, page_count: 1 })
        );
    }

    #[test]
    fn test_create_rejects_zero_length_line() {
        let mut gateway = MemoryGateway::new(1);
        let point = DocPoint::new(10.0, 10.0);
        let result = gateway.create(
            0,
            NewAnnotation::new(AnnotationKind::Line, Geometry::Vertices(vec![point, point]), Style::new()),
        );
        assert!(matches!(result, Err(GatewayError::Creation { kind: AnnotationKind::Line, .. })));
        assert_eq!(gateway.annotation_count(), 0);
    }

    #[test]
    fn test_create_rejects_kind_mismatch() {
        let mut gateway = MemoryGateway::new(1);
        let result = gateway.create(
            0,
            NewAnnotation::new(
                AnnotationKind::Note,
                Geometry::Vertices(vec![DocPoint::new(0.0, 0.0), DocPoint::new(5.0, 5.0)]),
                Style::new(),
            ),
        );
        assert!(matches!(result, Err(GatewayError::Creation { .. })));
    }

    #[test]
    fn test_rect_geometry_edit_keeps_handle_valid() {
        let mut gateway = MemoryGateway::new(1);
        let created = gateway.create(0, circle_request(DocRect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        let handle = created.handle();

        gateway.set_geometry(&handle, Geometry::Rect(DocRect::new(30.0, 30.0, 5.0, 5.0))).unwrap();
        let read = gateway.read(&handle).unwrap();
        assert_eq!(read.geometry(), &Geometry::Rect(DocRect::new(5.0, 5.0, 30.0, 30.0)));
    }

    #[test]
    fn test_vertex_geometry_edit_is_unsupported() {
        let mut gateway = MemoryGateway::new(1);
        let line = gateway
            .create(
                0,
                NewAnnotation::new(
                    AnnotationKind::Line,
                    Geometry::Vertices(vec![DocPoint::new(0.0, 0.0), DocPoint::new(40.0, 0.0)]),
                    Style::new(),
                ),
            )
            .unwrap();

        let result = gateway.set_geometry(
            &line.handle(),
            Geometry::Vertices(vec![DocPoint::new(1.0, 0.0), DocPoint::new(41.0, 0.0)]),
        );
        assert_eq!(result, Err(GatewayError::UnsupportedGeometryEdit(AnnotationKind::Line)));
    }

    #[test]
    fn test_invalidated_handle_is_stale_but_identity_resolves() {
        let mut gateway = MemoryGateway::new(1);
        let created = gateway.create(0, circle_request(DocRect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        let old_handle = created.handle();

        gateway.invalidate_handles();

        assert!(gateway.read(&old_handle).unwrap_err().is_stale());
        assert!(gateway.delete(&old_handle).unwrap_err().is_stale());

        let fresh = gateway.resolve_by_identity(0, created.id()).expect("identity should resolve");
        assert_eq!(fresh.handle().epoch(), gateway.epoch());
        gateway.delete(&fresh.handle()).unwrap();
        assert!(gateway.resolve_by_identity(0, created.id()).is_none());
    }

    #[test]
    fn test_deleted_handle_is_stale() {
        let mut gateway = MemoryGateway::new(1);
        let created = gateway.create(0, circle_request(DocRect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        gateway.delete(&created.handle()).unwrap();
        assert!(gateway.set_style(&created.handle(), &Style::new()).unwrap_err().is_stale());
    }

    #[test]
    fn test_default_appearance_format() {
        let mut gateway = MemoryGateway::new(1);
        let style = Style::new().with_font("helv", 14.0, Color::rgb(0, 0, 255));
        let text = gateway
            .create(
                0,
                NewAnnotation::new(
                    AnnotationKind::FreeText,
                    Geometry::Rect(DocRect::new(0.0, 0.0, 100.0, 40.0)),
                    style,
                ),
            )
            .unwrap();
        assert_eq!(
            gateway.default_appearance(&text.handle()).unwrap().as_deref(),
            Some("/Helv 14 Tf 0 0 1 rg")
        );

        let gray = Style::new().with_font("cour", 9.0, Color::BLACK);
        assert_eq!(format_default_appearance(&gray), "/Cour 9 Tf 0 g");
    }
}
