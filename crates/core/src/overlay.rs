//! Rubber-band and selection overlay
//!
//! Turns the current interaction state into drawable primitives in screen
//! space: the in-progress shape preview while drawing, and the selection
//! outline with its resize handles. Pure: no engine calls, only geometry that
//! was already resolved by the caller.

use crate::annotation::{AnnotationKind, Color, DocRect, Style};
use crate::coords::{CoordinateMapper, ScreenPoint, ScreenRect};
use crate::editor::InteractionState;
use crate::manipulation::{generate_handles, HandleType};
use crate::tool::Tool;

/// Fixed accent used for the selection outline and handles
pub const SELECTION_ACCENT: Color = Color { r: 0, g: 120, b: 215, a: 255 };

/// Alpha applied to the highlight preview fill
const HIGHLIGHT_PREVIEW_ALPHA: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
}

/// Drawable overlay primitive in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Line { from: ScreenPoint, to: ScreenPoint, stroke: Stroke },
    Ellipse { bounds: ScreenRect, stroke: Stroke },
    Rect { bounds: ScreenRect, stroke: Option<Stroke>, fill: Option<Color> },
    Label { bounds: ScreenRect, text: String, color: Color },
    Handle { bounds: ScreenRect, handle: HandleType },
}

/// Resolved selection the overlay should outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionView {
    pub kind: AnnotationKind,
    pub bounds: DocRect,
}

/// Compute the overlay for the current state
///
/// While dragging, the selection outline follows the pointer even though the
/// engine geometry is only updated on release.
pub fn render(
    state: &InteractionState,
    selection: Option<&SelectionView>,
    mapper: &CoordinateMapper,
    tool_style: &Style,
    handle_size: f32,
) -> Vec<DrawPrimitive> {
    let mut primitives = Vec::new();

    if let InteractionState::Drawing { tool, start, current } = state {
        let stroke = Stroke {
            color: tool_style.stroke_color,
            width: (tool_style.thickness * mapper.scale).max(1.0),
            dashed: true,
        };
        preview_shape(*tool, *start, *current, stroke, &mut primitives);
    }

    if let Some(selection) = selection {
        let bounds = match state {
            InteractionState::Dragging { start, current, .. } => {
                selection.bounds.translated(current.x - start.x, current.y - start.y)
            }
            _ => selection.bounds,
        };
        let screen_bounds = mapper.rect_to_screen(&bounds);

        primitives.push(DrawPrimitive::Rect {
            bounds: screen_bounds,
            stroke: Some(Stroke { color: SELECTION_ACCENT, width: 1.0, dashed: false }),
            fill: None,
        });
        primitives.extend(
            generate_handles(selection.kind, &screen_bounds, handle_size)
                .into_iter()
                .map(|handle| DrawPrimitive::Handle { bounds: handle.rect, handle: handle.handle_type }),
        );
    }

    primitives
}

fn preview_shape(
    tool: Tool,
    start: ScreenPoint,
    current: ScreenPoint,
    stroke: Stroke,
    primitives: &mut Vec<DrawPrimitive>,
) {
    let bounds = ScreenRect::from_points(start, current);
    match tool {
        Tool::Line => primitives.push(DrawPrimitive::Line { from: start, to: current, stroke }),
        Tool::Circle => primitives.push(DrawPrimitive::Ellipse { bounds, stroke }),
        Tool::Highlight => primitives.push(DrawPrimitive::Rect {
            bounds,
            stroke: Some(stroke),
            fill: Some(stroke.color.with_alpha(HIGHLIGHT_PREVIEW_ALPHA)),
        }),
        Tool::Stamp => {
            primitives.push(DrawPrimitive::Rect { bounds, stroke: Some(stroke), fill: None });
            primitives.push(DrawPrimitive::Label {
                bounds,
                text: AnnotationKind::Stamp.name().to_string(),
                color: stroke.color,
            });
        }
        Tool::Note | Tool::Text => {
            primitives.push(DrawPrimitive::Rect { bounds, stroke: Some(stroke), fill: None })
        }
        Tool::Select => {}
    }
}
