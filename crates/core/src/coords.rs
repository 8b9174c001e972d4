//! Screen ↔ document coordinate mapping
//!
//! The rendered page image sits inside its container at a centering offset
//! and is drawn at a zoom scale. Every pointer position the editor receives
//! is in screen pixels and must be mapped into document units before it can
//! be compared against annotation geometry.

use crate::annotation::{DocPoint, DocRect};

/// Lower zoom bound enforced by the zoom controller
pub const MIN_SCALE: f32 = 0.1;

/// Upper zoom bound enforced by the zoom controller
pub const MAX_SCALE: f32 = 10.0;

/// Multiplicative step for zoom in / zoom out
pub const ZOOM_STEP: f32 = 1.2;

/// Point in screen pixels, relative to the page container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Create a normalized rectangle spanning two corner points
    pub fn from_points(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Square of side `size` centered on a point
    pub fn square_at(center: ScreenPoint, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, center.x + half, center.y + half)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Pure mapping between screen pixels and document units
///
/// `scale` is always positive; the zoom controller clamps it to
/// [`MIN_SCALE`, `MAX_SCALE`] before a mapper is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, scale: 1.0 }
    }
}

impl CoordinateMapper {
    pub fn new(offset_x: f32, offset_y: f32, scale: f32) -> Self {
        Self { offset_x, offset_y, scale }
    }

    /// Build a mapper for a page drawn centered inside its container
    ///
    /// The page is centered on each axis where it is smaller than the
    /// container and pinned to the origin where it overflows.
    pub fn centered(container: (f32, f32), page_size: (f32, f32), scale: f32) -> Self {
        let scale = clamp_scale(scale);
        let offset_x = ((container.0 - page_size.0 * scale) / 2.0).max(0.0);
        let offset_y = ((container.1 - page_size.1 * scale) / 2.0).max(0.0);
        Self { offset_x, offset_y, scale }
    }

    pub fn to_document(&self, point: ScreenPoint) -> DocPoint {
        DocPoint::new((point.x - self.offset_x) / self.scale, (point.y - self.offset_y) / self.scale)
    }

    pub fn to_screen(&self, point: DocPoint) -> ScreenPoint {
        ScreenPoint::new(point.x * self.scale + self.offset_x, point.y * self.scale + self.offset_y)
    }

    pub fn rect_to_screen(&self, rect: &DocRect) -> ScreenRect {
        let r = rect.normalized();
        let top_left = self.to_screen(DocPoint::new(r.x0, r.y0));
        let bottom_right = self.to_screen(DocPoint::new(r.x1, r.y1));
        ScreenRect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }

    pub fn rect_to_document(&self, rect: &ScreenRect) -> DocRect {
        DocRect::from_points(
            self.to_document(ScreenPoint::new(rect.left, rect.top)),
            self.to_document(ScreenPoint::new(rect.right, rect.bottom)),
        )
    }
}

/// Clamp a zoom scale into the supported range
pub fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

pub fn zoom_in(scale: f32) -> f32 {
    clamp_scale(scale * ZOOM_STEP)
}

pub fn zoom_out(scale: f32) -> f32 {
    clamp_scale(scale / ZOOM_STEP)
}

/// Scale at which the whole page fits inside the viewport
///
/// Returns `None` for a degenerate page size.
pub fn fit_page_scale(viewport: (f32, f32), page_size: (f32, f32)) -> Option<f32> {
    if page_size.0 <= 0.0 || page_size.1 <= 0.0 {
        return None;
    }
    let scale_w = viewport.0 / page_size.0;
    let scale_h = viewport.1 / page_size.1;
    Some(clamp_scale(scale_w.min(scale_h)))
}

/// Scale at which the page width matches the viewport width
pub fn fit_width_scale(viewport_width: f32, page_width: f32) -> Option<f32> {
    if page_width <= 0.0 {
        return None;
    }
    Some(clamp_scale(viewport_width / page_width))
}
