//! Annotation lifecycle reconciliation
//!
//! Engine handles do not outlive a render pass, and some edits can only be
//! expressed by replacing the annotation. The helpers here re-acquire handles
//! by identity and perform the replace-style edits: vertex-kind moves and
//! FreeText reflow.

use crate::annotation::{Annotation, AnnotationHandle, AnnotationId, AnnotationKind, Geometry, PageIndex};
use crate::gateway::{AnnotationGateway, GatewayError, GatewayResult, NewAnnotation};
use tracing::{debug, warn};

/// Result of committing a move
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Geometry was edited in place; the handle stays valid
    Updated,
    /// The annotation was replaced and has a new identity
    Recreated(Annotation),
}

/// Re-acquire a live annotation by identity
pub fn rebind<G: AnnotationGateway>(
    gateway: &G,
    page: PageIndex,
    id: AnnotationId,
) -> GatewayResult<Annotation> {
    gateway.resolve_by_identity(page, id).ok_or(GatewayError::Resolution(id))
}

/// Commit a move of `(dx, dy)` relative to the geometry captured at gesture start
///
/// Rectangle geometry is edited in place. Vertex geometry cannot be, so the
/// annotation is recreated at the translated vertices with its captured style.
pub fn apply_move<G: AnnotationGateway>(
    gateway: &mut G,
    handle: &AnnotationHandle,
    original: &Geometry,
    dx: f32,
    dy: f32,
) -> GatewayResult<MoveOutcome> {
    let moved = original.translated(dx, dy);
    match original {
        Geometry::Rect(_) => {
            gateway.set_geometry(handle, moved)?;
            Ok(MoveOutcome::Updated)
        }
        Geometry::Vertices(_) => recreate_with(gateway, handle, moved).map(MoveOutcome::Recreated),
    }
}

/// Replace an annotation with a copy carrying new geometry
///
/// Kind, style and metadata are captured from the live annotation first. The
/// replacement is created before the original is deleted so a rejected
/// geometry leaves the document untouched.
pub fn recreate_with<G: AnnotationGateway>(
    gateway: &mut G,
    handle: &AnnotationHandle,
    geometry: Geometry,
) -> GatewayResult<Annotation> {
    let current = gateway.read(handle)?;
    let request = NewAnnotation::new(current.kind(), geometry, current.style().clone())
        .with_metadata(current.metadata().clone());

    let replacement = gateway.create(current.page(), request)?;

    if let Err(err) = gateway.delete(handle) {
        // Keep the document free of duplicates when the original cannot go
        if let Err(rollback) = gateway.delete(&replacement.handle()) {
            warn!(id = %replacement.id(), %rollback, "could not roll back replacement annotation");
        }
        return Err(err);
    }

    debug!(
        old = %current.id(),
        new = %replacement.id(),
        kind = %current.kind(),
        "recreated annotation"
    );
    Ok(replacement)
}

/// Recreate a FreeText annotation at its current rectangle so the engine lays
/// the text out again; other kinds are returned unchanged.
pub fn reflow_free_text<G: AnnotationGateway>(
    gateway: &mut G,
    handle: &AnnotationHandle,
) -> GatewayResult<Annotation> {
    let current = gateway.read(handle)?;
    if current.kind() != AnnotationKind::FreeText {
        return Ok(current);
    }
    let geometry = current.geometry().clone();
    recreate_with(gateway, handle, geometry)
}
