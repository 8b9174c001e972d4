//! Boundary to the PDF engine
//!
//! The editor never touches engine objects directly; everything goes through
//! [`AnnotationGateway`]. Handles returned by the gateway are only valid until
//! the engine invalidates them (re-render, re-open, delete). Callers keep the
//! stable identity alongside and re-acquire with
//! [`AnnotationGateway::resolve_by_identity`].

use crate::annotation::{
    Annotation, AnnotationHandle, AnnotationId, AnnotationKind, AnnotationMetadata, DocPoint,
    Geometry, PageIndex, Style,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("stale annotation handle {id} (epoch {epoch})")]
    StaleHandle { id: AnnotationId, epoch: u64 },
    #[error("cannot create {kind} annotation: {reason}")]
    Creation { kind: AnnotationKind, reason: String },
    #[error("geometry of {0} annotations cannot be edited in place")]
    UnsupportedGeometryEdit(AnnotationKind),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: PageIndex, page_count: u32 },
    #[error("annotation {0} no longer resolves")]
    Resolution(AnnotationId),
}

impl GatewayError {
    pub fn stale(handle: AnnotationHandle) -> Self {
        Self::StaleHandle { id: handle.id(), epoch: handle.epoch() }
    }

    /// Whether the error means the referenced annotation is gone
    ///
    /// Resolution failures are treated exactly like stale handles.
    pub fn is_stale(&self) -> bool {
        matches!(self, GatewayError::StaleHandle { .. } | GatewayError::Resolution(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Request to create a new annotation
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnotation {
    pub kind: AnnotationKind,
    pub geometry: Geometry,
    pub style: Style,
    pub metadata: AnnotationMetadata,
}

impl NewAnnotation {
    pub fn new(kind: AnnotationKind, geometry: Geometry, style: Style) -> Self {
        Self { kind, geometry, style, metadata: AnnotationMetadata::default() }
    }

    pub fn with_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Annotation operations the editor requires from the PDF engine
///
/// Contract:
/// - `list_annotations` returns page annotations in z-order, topmost last.
/// - `create` fails with [`GatewayError::Creation`] on degenerate geometry
///   (zero-length line, empty rectangle) or a geometry/kind mismatch.
/// - `set_geometry` mutates rectangle kinds in place without invalidating the
///   handle; vertex kinds fail with [`GatewayError::UnsupportedGeometryEdit`].
/// - Any operation on an invalidated handle fails with
///   [`GatewayError::StaleHandle`].
pub trait AnnotationGateway {
    fn page_count(&self) -> u32;

    fn list_annotations(&self, page: PageIndex) -> GatewayResult<Vec<Annotation>>;

    /// Read the current state behind a handle
    fn read(&self, handle: &AnnotationHandle) -> GatewayResult<Annotation>;

    fn create(&mut self, page: PageIndex, request: NewAnnotation) -> GatewayResult<Annotation>;

    fn set_geometry(&mut self, handle: &AnnotationHandle, geometry: Geometry) -> GatewayResult<()>;

    fn set_style(&mut self, handle: &AnnotationHandle, style: &Style) -> GatewayResult<()>;

    fn delete(&mut self, handle: &AnnotationHandle) -> GatewayResult<()>;

    /// Re-acquire a live annotation by its stable identity
    fn resolve_by_identity(&self, page: PageIndex, id: AnnotationId) -> Option<Annotation>;

    /// Engine default-appearance string of a FreeText annotation
    ///
    /// The format is `"/<Font> <size> Tf <color operator>"`; `None` for kinds
    /// without text appearance.
    fn default_appearance(&self, handle: &AnnotationHandle) -> GatewayResult<Option<String>>;
}

/// Reverse-order linear hit-test over a page's annotations
///
/// Iterates topmost first and returns the first annotation whose geometry
/// contains `point`.
pub fn topmost_at<'a>(
    annotations: &'a [Annotation],
    point: &DocPoint,
    tolerance: f32,
) -> Option<&'a Annotation> {
    annotations.iter().rev().find(|annotation| annotation.hit_test(point, tolerance))
}
