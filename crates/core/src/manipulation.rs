//! Resize handles and resize computation
//!
//! A selected rectangle-kind annotation shows eight square handles on its
//! screen-space bounding box: four corners and four edge midpoints. Handles
//! have a fixed pixel size regardless of zoom. Vertex-kind annotations get no
//! handles at all.

use crate::annotation::{AnnotationKind, DocPoint, DocRect};
use crate::coords::{ScreenPoint, ScreenRect};

/// Type of resize handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleType {
    /// Corner handles move two edges
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,

    /// Edge handles move one edge
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleType {
    /// All handles: corners clockwise from top-left, then edges clockwise
    /// from top
    pub const ALL: [HandleType; 8] = [
        HandleType::TopLeft,
        HandleType::TopRight,
        HandleType::BottomRight,
        HandleType::BottomLeft,
        HandleType::Top,
        HandleType::Right,
        HandleType::Bottom,
        HandleType::Left,
    ];

    fn moves_left(&self) -> bool {
        matches!(self, HandleType::TopLeft | HandleType::BottomLeft | HandleType::Left)
    }

    fn moves_right(&self) -> bool {
        matches!(self, HandleType::TopRight | HandleType::BottomRight | HandleType::Right)
    }

    fn moves_top(&self) -> bool {
        matches!(self, HandleType::TopLeft | HandleType::TopRight | HandleType::Top)
    }

    fn moves_bottom(&self) -> bool {
        matches!(self, HandleType::BottomLeft | HandleType::BottomRight | HandleType::Bottom)
    }

    /// Anchor point of this handle on a bounding box
    fn anchor(&self, bounds: &ScreenRect) -> ScreenPoint {
        let center = bounds.center();
        match self {
            HandleType::TopLeft => ScreenPoint::new(bounds.left, bounds.top),
            HandleType::TopRight => ScreenPoint::new(bounds.right, bounds.top),
            HandleType::BottomRight => ScreenPoint::new(bounds.right, bounds.bottom),
            HandleType::BottomLeft => ScreenPoint::new(bounds.left, bounds.bottom),
            HandleType::Top => ScreenPoint::new(center.x, bounds.top),
            HandleType::Right => ScreenPoint::new(bounds.right, center.y),
            HandleType::Bottom => ScreenPoint::new(center.x, bounds.bottom),
            HandleType::Left => ScreenPoint::new(bounds.left, center.y),
        }
    }
}

/// Resize handle with its on-screen square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandle {
    pub handle_type: HandleType,
    pub rect: ScreenRect,
}

/// Generate the resize handles for a selection
///
/// Returns an empty list for kinds that cannot be resized.
pub fn generate_handles(kind: AnnotationKind, bounds: &ScreenRect, handle_size: f32) -> Vec<ResizeHandle> {
    if !kind.is_resizable() {
        return Vec::new();
    }

    HandleType::ALL
        .iter()
        .map(|handle_type| ResizeHandle {
            handle_type: *handle_type,
            rect: ScreenRect::square_at(handle_type.anchor(bounds), handle_size),
        })
        .collect()
}

/// Find the handle under a screen point, if any
pub fn hit_handle(
    kind: AnnotationKind,
    bounds: &ScreenRect,
    handle_size: f32,
    point: ScreenPoint,
) -> Option<HandleType> {
    generate_handles(kind, bounds, handle_size)
        .into_iter()
        .find(|handle| handle.rect.contains(point))
        .map(|handle| handle.handle_type)
}

/// Compute the resized rectangle for a handle drag
///
/// Only the edges the handle controls move. A moving edge is clamped so the
/// rectangle never gets narrower or shorter than `min_size`; edges never
/// cross.
pub fn resize_rect(
    original: &DocRect,
    handle_type: HandleType,
    start: DocPoint,
    current: DocPoint,
    min_size: f32,
) -> DocRect {
    let original = original.normalized();
    let delta_x = current.x - start.x;
    let delta_y = current.y - start.y;
    let mut rect = original;

    if handle_type.moves_left() {
        rect.x0 = (original.x0 + delta_x).min(original.x1 - min_size);
    }
    if handle_type.moves_right() {
        rect.x1 = (original.x1 + delta_x).max(original.x0 + min_size);
    }
    if handle_type.moves_top() {
        rect.y0 = (original.y0 + delta_y).min(original.y1 - min_size);
    }
    if handle_type.moves_bottom() {
        rect.y1 = (original.y1 + delta_y).max(original.y0 + min_size);
    }

    rect
}
