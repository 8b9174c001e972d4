//! Interaction state machine
//!
//! [`AnnotationEditor`] turns pointer and key events into gateway calls.
//! It owns the current tool mode, the selection and the in-flight gesture;
//! the annotations themselves live behind the [`AnnotationGateway`].
//!
//! # Gestures
//!
//! - Drawing tools rubber-band a shape and create it on release.
//! - The select tool picks the topmost annotation under the pointer and drags
//!   it, or resizes the selection by one of its eight handles.
//! - Drags are applied once on release. Resizes are applied live, since the
//!   engine has to re-layout the annotation for the user to see the result.
//!   Cancelling a resize puts the rectangle back.
//!
//! # Failures
//!
//! No entry point returns an error. A gateway failure aborts the gesture and
//! is logged; a stale handle additionally clears the selection. The host only
//! ever sees a gesture that did not take effect, plus an optional status
//! message through [`EditorListener::on_status`].

use crate::annotation::{
    AnnotationHandle, AnnotationId, AnnotationKind, AnnotationMetadata, DocPoint, DocRect,
    Geometry, PageIndex, Style,
};
use crate::config::EditorConfig;
use crate::coords::{CoordinateMapper, ScreenPoint};
use crate::gateway::{topmost_at, AnnotationGateway, GatewayError, NewAnnotation};
use crate::manipulation::{hit_handle, resize_rect, HandleType};
use crate::overlay::{self, DrawPrimitive, SelectionView};
use crate::reconcile::{self, MoveOutcome};
use crate::style::StyleStore;
use crate::tool::Tool;
use tracing::{debug, warn};

/// Outbound notifications for the style-editing surface
pub trait EditorListener {
    /// An annotation became selected
    fn on_selected(&mut self, kind_name: &str, style: &Style);

    /// The selection was cleared
    fn on_deselected(&mut self);

    /// Best-effort human-readable status text
    fn on_status(&mut self, _message: &str) {}
}

/// Listener that ignores every notification
impl EditorListener for () {
    fn on_selected(&mut self, _kind_name: &str, _style: &Style) {}

    fn on_deselected(&mut self) {}
}

/// Currently selected annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub handle: AnnotationHandle,
    pub kind: AnnotationKind,
}

impl Selection {
    pub fn id(&self) -> AnnotationId {
        self.handle.id()
    }
}

/// In-flight gesture
///
/// Geometry captured here is only kept for the duration of one gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Drawing {
        tool: Tool,
        start: ScreenPoint,
        current: ScreenPoint,
    },
    Dragging {
        target: AnnotationId,
        start: DocPoint,
        current: DocPoint,
        original: Geometry,
    },
    Resizing {
        target: AnnotationId,
        handle: HandleType,
        start: DocPoint,
        current: DocPoint,
        original: DocRect,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Drawing { .. } => "drawing",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Resizing { .. } => "resizing",
        }
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Escape,
}

pub struct AnnotationEditor<G: AnnotationGateway, L: EditorListener> {
    gateway: G,
    listener: L,
    config: EditorConfig,
    styles: StyleStore,
    mapper: CoordinateMapper,
    page: PageIndex,
    mode: Option<Tool>,
    active_style: Style,
    selection: Option<Selection>,
    state: InteractionState,
}

impl<G: AnnotationGateway, L: EditorListener> AnnotationEditor<G, L> {
    /// Create an idle editor on page 0 with no tool selected
    pub fn new(gateway: G, listener: L, config: EditorConfig) -> Self {
        Self {
            gateway,
            listener,
            config,
            styles: StyleStore::new(),
            mapper: CoordinateMapper::default(),
            page: 0,
            mode: None,
            active_style: Style::new(),
            selection: None,
            state: InteractionState::Idle,
        }
    }

    /// Replace the seeded per-tool default styles
    pub fn with_styles(mut self, styles: StyleStore) -> Self {
        self.styles = styles;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Mutable engine access for hosts that change the document themselves;
    /// call [`Self::on_after_mutation`] afterwards.
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleStore {
        &self.styles
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn page(&self) -> PageIndex {
        self.page
    }

    pub fn mode(&self) -> Option<Tool> {
        self.mode
    }

    /// Style shown on the editing surface for the current tool or selection
    pub fn active_style(&self) -> &Style {
        &self.active_style
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn into_parts(self) -> (G, L) {
        (self.gateway, self.listener)
    }

    // --- Mode, view and page ---

    /// Switch tool, or pass `None` to leave every tool
    ///
    /// Discards the in-flight gesture and the selection, then loads the
    /// tool's default style.
    pub fn set_mode(&mut self, mode: Option<Tool>) {
        self.cancel_gesture();
        self.clear_selection();
        self.mode = mode;
        self.active_style = mode.map(|tool| self.styles.get_default(tool)).unwrap_or_default();
        debug!(mode = ?mode, "tool mode changed");

        let status = match mode {
            Some(Tool::Select) => "Select: click an annotation".to_string(),
            Some(tool) => format!("Draw {tool}: drag on the page"),
            None => "Ready".to_string(),
        };
        self.listener.on_status(&status);
    }

    /// Update the screen mapping after a zoom, scroll or resize
    ///
    /// The selection survives; a gesture in progress is discarded because its
    /// screen-space start point no longer means the same thing.
    pub fn set_view(&mut self, mapper: CoordinateMapper) {
        self.cancel_gesture();
        self.mapper = mapper;
    }

    /// Show another page
    ///
    /// Returns `false` and changes nothing when the page does not exist.
    pub fn set_page(&mut self, page: PageIndex) -> bool {
        let page_count = self.gateway.page_count();
        if page >= page_count {
            warn!(page, page_count, "ignoring navigation to missing page");
            return false;
        }
        self.cancel_gesture();
        self.clear_selection();
        self.page = page;
        debug!(page, "page changed");
        true
    }

    // --- Pointer events ---

    pub fn pointer_down(&mut self, point: ScreenPoint) {
        if !self.state.is_idle() {
            debug!(state = self.state.name(), "ignoring pointer down during gesture");
            return;
        }

        match self.mode {
            Some(Tool::Select) => self.select_down(point),
            Some(tool) => {
                self.state = InteractionState::Drawing { tool, start: point, current: point };
                debug!(%tool, x = point.x, y = point.y, "drawing started");
            }
            None => {}
        }
    }

    pub fn pointer_move(&mut self, point: ScreenPoint) {
        let doc_point = self.mapper.to_document(point);
        if matches!(self.state, InteractionState::Resizing { .. }) {
            self.resize_to(doc_point);
            return;
        }

        match &mut self.state {
            InteractionState::Drawing { current, .. } => *current = point,
            InteractionState::Dragging { current, .. } => *current = doc_point,
            InteractionState::Idle | InteractionState::Resizing { .. } => {}
        }
    }

    pub fn pointer_up(&mut self, point: ScreenPoint) {
        self.pointer_move(point);
        let finished = std::mem::replace(&mut self.state, InteractionState::Idle);

        match finished {
            InteractionState::Idle => {}
            InteractionState::Drawing { tool, start, current } => self.finish_drawing(tool, start, current),
            InteractionState::Dragging { target, start, current, original } => {
                self.finish_dragging(target, start, current, &original)
            }
            InteractionState::Resizing { target, .. } => self.finish_resizing(target),
        }
    }

    // --- Keys and style editing ---

    pub fn key_press(&mut self, key: EditorKey) {
        match key {
            EditorKey::Escape => self.set_mode(None),
            EditorKey::Delete => {
                if !self.state.is_idle() {
                    return;
                }
                let Some(selection) = self.selection else {
                    return;
                };
                match self.gateway.delete(&selection.handle) {
                    Ok(()) => {
                        debug!(id = %selection.id(), kind = %selection.kind, "deleted selection");
                        self.clear_selection();
                        self.listener.on_status(&format!("Deleted {}", selection.kind));
                        self.on_after_mutation();
                    }
                    Err(err) => self.absorb_failure(err),
                }
            }
        }
    }

    /// Apply a style from the editing surface
    ///
    /// With a selection the style is pushed to that annotation immediately.
    /// Without one it becomes the active drawing tool's default.
    pub fn edit_style(&mut self, style: Style) {
        if let Some(selection) = self.selection {
            match self.styles.apply_to_selection(&mut self.gateway, Some(&selection.handle), &style) {
                Ok(_) => {
                    self.active_style = style;
                    self.on_after_mutation();
                }
                Err(err) => self.absorb_failure(err),
            }
            return;
        }

        match self.mode {
            Some(tool) if tool != Tool::Select => {
                self.styles.set_default(tool, style.clone());
                self.active_style = style;
            }
            _ => debug!("style edit without selection or drawing tool ignored"),
        }
    }

    // --- Re-render hook ---

    /// Re-acquire the selection after the document changed
    ///
    /// Must run after any mutation that may invalidate handles, whether made
    /// by this editor or by the host. If the selection no longer resolves it
    /// is cleared and the gesture aborted.
    pub fn on_after_mutation(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };
        match reconcile::rebind(&self.gateway, self.page, selection.id()) {
            Ok(annotation) => {
                self.selection = Some(Selection { handle: annotation.handle(), kind: annotation.kind() });
            }
            Err(err) => self.absorb_failure(err),
        }
    }

    // --- Queries ---

    /// Contents of the topmost annotation under the pointer
    ///
    /// Only answers while no gesture is in progress.
    pub fn hover_text(&self, point: ScreenPoint) -> Option<String> {
        if !self.state.is_idle() {
            return None;
        }
        let doc_point = self.mapper.to_document(point);
        let annotations = self.gateway.list_annotations(self.page).ok()?;
        topmost_at(&annotations, &doc_point, self.config.hit_tolerance)
            .map(|annotation| annotation.metadata().contents.clone())
            .filter(|contents| !contents.is_empty())
    }

    /// Overlay primitives for the next paint
    pub fn overlay(&self) -> Vec<DrawPrimitive> {
        let selection = self
            .selection
            .and_then(|selection| self.gateway.read(&selection.handle).ok())
            .map(|annotation| SelectionView { kind: annotation.kind(), bounds: annotation.bounds() });

        overlay::render(
            &self.state,
            selection.as_ref(),
            &self.mapper,
            &self.active_style,
            self.config.handle_size_px,
        )
    }

    // --- Gesture internals ---

    fn select_down(&mut self, point: ScreenPoint) {
        let doc_point = self.mapper.to_document(point);

        if let Some(selection) = self.selection {
            match self.gateway.read(&selection.handle) {
                Ok(current) => {
                    let bounds = current.bounds();
                    let screen_bounds = self.mapper.rect_to_screen(&bounds);

                    let handle = hit_handle(current.kind(), &screen_bounds, self.config.handle_size_px, point);
                    if let (Some(handle), Some(original)) = (handle, current.geometry().as_rect()) {
                        self.state = InteractionState::Resizing {
                            target: selection.id(),
                            handle,
                            start: doc_point,
                            current: doc_point,
                            original: original.normalized(),
                        };
                        debug!(id = %selection.id(), ?handle, "resize started");
                        return;
                    }

                    let tolerance = if current.kind().is_vertex_kind() { self.config.hit_tolerance } else { 0.0 };
                    if bounds.contains_with_tolerance(&doc_point, tolerance) {
                        self.start_drag(selection.id(), doc_point, current.geometry().clone());
                        return;
                    }
                }
                Err(err) => self.absorb_failure(err),
            }
        }

        let annotations = match self.gateway.list_annotations(self.page) {
            Ok(annotations) => annotations,
            Err(err) => {
                self.absorb_failure(err);
                return;
            }
        };

        match topmost_at(&annotations, &doc_point, self.config.hit_tolerance) {
            Some(hit) => {
                let style = self.styles.extract_from(&self.gateway, hit);
                self.selection = Some(Selection { handle: hit.handle(), kind: hit.kind() });
                self.active_style = style.clone();
                self.listener.on_selected(hit.kind().name(), &style);
                self.listener.on_status(&format!("Selected {}", hit.kind()));
                self.start_drag(hit.id(), doc_point, hit.geometry().clone());
            }
            None => self.clear_selection(),
        }
    }

    fn start_drag(&mut self, target: AnnotationId, start: DocPoint, original: Geometry) {
        debug!(id = %target, "drag started");
        self.state = InteractionState::Dragging { target, start, current: start, original };
    }

    fn resize_to(&mut self, doc_point: DocPoint) {
        let InteractionState::Resizing { target, handle, start, current, original } = self.state else {
            return;
        };
        if current == doc_point {
            return;
        }
        let Some(selection) = self.selection_for(target) else {
            self.cancel_gesture();
            return;
        };

        let candidate = resize_rect(&original, handle, start, doc_point, self.config.min_resize_size);
        match self.gateway.set_geometry(&selection.handle, Geometry::Rect(candidate)) {
            Ok(()) => {
                self.state = InteractionState::Resizing { target, handle, start, current: doc_point, original };
            }
            Err(err) => self.absorb_failure(err),
        }
    }

    fn finish_drawing(&mut self, tool: Tool, start: ScreenPoint, end: ScreenPoint) {
        let Some(kind) = tool.annotation_kind() else {
            return;
        };

        let threshold = self.config.click_threshold_px;
        let is_small = (end.x - start.x).abs() < threshold && (end.y - start.y).abs() < threshold;

        let start_doc = self.mapper.to_document(start);
        let end_doc = self.mapper.to_document(end);

        let geometry = if is_small {
            if !tool.is_point_like() {
                debug!(%tool, "discarding draw gesture below click threshold");
                return;
            }
            let size = self.config.default_shape_size;
            Geometry::Rect(DocRect::centered_at(start_doc, size, size))
        } else if kind.is_vertex_kind() {
            Geometry::Vertices(vec![start_doc, end_doc])
        } else {
            Geometry::Rect(DocRect::from_points(start_doc, end_doc))
        };

        let contents = match kind {
            AnnotationKind::FreeText => self.config.free_text_placeholder.clone(),
            _ => String::new(),
        };
        let request = NewAnnotation::new(kind, geometry, self.styles.get_default(tool))
            .with_metadata(AnnotationMetadata::new(Some(self.config.author.clone()), contents));

        match self.gateway.create(self.page, request) {
            Ok(created) => {
                debug!(id = %created.id(), %kind, page = self.page, "annotation created");
                self.listener.on_status(&format!("Added {kind}"));
                self.on_after_mutation();
            }
            Err(err) => self.absorb_failure(err),
        }
    }

    fn finish_dragging(&mut self, target: AnnotationId, start: DocPoint, end: DocPoint, original: &Geometry) {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let epsilon = self.config.drag_epsilon;
        if dx.abs() <= epsilon && dy.abs() <= epsilon {
            return;
        }
        let Some(selection) = self.selection_for(target) else {
            return;
        };

        match reconcile::apply_move(&mut self.gateway, &selection.handle, original, dx, dy) {
            Ok(MoveOutcome::Updated) => {}
            Ok(MoveOutcome::Recreated(replacement)) => {
                self.selection = Some(Selection { handle: replacement.handle(), kind: replacement.kind() });
            }
            Err(err) => {
                self.absorb_failure(err);
                return;
            }
        }
        debug!(id = %target, dx, dy, "annotation moved");
        self.listener.on_status(&format!("Moved {}", selection.kind));
        self.on_after_mutation();
    }

    fn finish_resizing(&mut self, target: AnnotationId) {
        let Some(selection) = self.selection_for(target) else {
            return;
        };

        if selection.kind == AnnotationKind::FreeText {
            match reconcile::reflow_free_text(&mut self.gateway, &selection.handle) {
                Ok(replacement) => {
                    self.selection = Some(Selection { handle: replacement.handle(), kind: replacement.kind() });
                }
                Err(err) => {
                    self.absorb_failure(err);
                    return;
                }
            }
        }
        debug!(id = %target, "resize finished");
        self.listener.on_status(&format!("Resized {}", selection.kind));
        self.on_after_mutation();
    }

    fn selection_for(&self, target: AnnotationId) -> Option<Selection> {
        self.selection.filter(|selection| selection.id() == target)
    }

    /// Drop the in-flight gesture
    ///
    /// A resize writes live, so its rectangle is put back to where the gesture
    /// started. Other gestures never touched the document.
    fn cancel_gesture(&mut self) {
        let cancelled = std::mem::replace(&mut self.state, InteractionState::Idle);
        if cancelled.is_idle() {
            return;
        }
        debug!(state = cancelled.name(), "gesture cancelled");

        if let InteractionState::Resizing { target, start, current, original, .. } = cancelled {
            if current == start {
                return;
            }
            let Some(selection) = self.selection_for(target) else {
                return;
            };
            if let Err(err) = self.gateway.set_geometry(&selection.handle, Geometry::Rect(original)) {
                warn!(id = %target, %err, "could not restore rectangle of cancelled resize");
            }
        }
    }

    fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.listener.on_deselected();
        }
    }

    /// Turn a gateway failure into a no-op
    fn absorb_failure(&mut self, err: GatewayError) {
        warn!(%err, "gateway operation failed; gesture discarded");
        self.cancel_gesture();
        if err.is_stale() {
            self.clear_selection();
        }
        let status = match err {
            GatewayError::Creation { kind, .. } => format!("Could not add {kind}"),
            _ if err.is_stale() => "Selection no longer exists".to_string(),
            _ => "Edit was not applied".to_string(),
        };
        self.listener.on_status(&status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Color;
    use crate::memory::MemoryGateway;

    #[derive(Debug, Default)]
    struct Events(Vec<String>);

    impl EditorListener for Events {
        fn on_selected(&mut self, kind_name: &str, _style: &Style) {
            self.0.push(format!("selected {kind_name}"));
        }

        fn on_deselected(&mut self) {
            self.0.push("deselected".to_string());
        }
    }

    fn editor() -> AnnotationEditor<MemoryGateway, Events> {
        AnnotationEditor::new(MemoryGateway::new(2), Events::default(), EditorConfig::default())
    }

    fn draw<L: EditorListener>(editor: &mut AnnotationEditor<MemoryGateway, L>, from: (f32, f32), to: (f32, f32)) {
        editor.pointer_down(ScreenPoint::new(from.0, from.1));
        editor.pointer_move(ScreenPoint::new(to.0, to.1));
        editor.pointer_up(ScreenPoint::new(to.0, to.1));
    }

    fn click<L: EditorListener>(editor: &mut AnnotationEditor<MemoryGateway, L>, at: (f32, f32)) {
        editor.pointer_down(ScreenPoint::new(at.0, at.1));
        editor.pointer_up(ScreenPoint::new(at.0, at.1));
    }

    #[test]
    fn test_draw_rect_from_any_corner() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Highlight));
        draw(&mut editor, (120.0, 90.0), (20.0, 40.0));

        let annotations = editor.gateway().list_annotations(0).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].kind(), AnnotationKind::Highlight);
        assert_eq!(annotations[0].geometry(), &Geometry::Rect(DocRect::new(20.0, 40.0, 120.0, 90.0)));
        assert!(editor.state().is_idle());
        assert_eq!(editor.mode(), Some(Tool::Highlight));
    }

    #[test]
    fn test_draw_line_uses_scaled_vertices() {
        let mut editor = editor();
        editor.set_view(CoordinateMapper::new(10.0, 10.0, 2.0));
        editor.set_mode(Some(Tool::Line));
        draw(&mut editor, (10.0, 10.0), (110.0, 50.0));

        let annotations = editor.gateway().list_annotations(0).unwrap();
        assert_eq!(
            annotations[0].geometry(),
            &Geometry::Vertices(vec![DocPoint::new(0.0, 0.0), DocPoint::new(50.0, 20.0)])
        );
    }

    #[test]
    fn test_free_text_metadata() {
        let mut editor =
            AnnotationEditor::new(MemoryGateway::new(1), (), EditorConfig::default().with_author("Reviewer"));
        editor.set_mode(Some(Tool::Text));
        click(&mut editor, (200.0, 200.0));

        let created = &editor.gateway().list_annotations(0).unwrap()[0];
        assert_eq!(created.kind(), AnnotationKind::FreeText);
        assert_eq!(created.metadata().author.as_deref(), Some("Reviewer"));
        assert_eq!(created.metadata().contents, "Text");
    }

    #[test]
    fn test_mode_switch_deselects_once() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Circle));
        draw(&mut editor, (10.0, 10.0), (60.0, 60.0));
        editor.set_mode(Some(Tool::Select));
        click(&mut editor, (30.0, 30.0));
        assert!(editor.selection().is_some());

        editor.set_mode(Some(Tool::Line));
        editor.set_mode(Some(Tool::Note));
        assert_eq!(editor.listener().0, vec!["selected Circle", "deselected"]);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn test_click_on_empty_page_deselects() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Stamp));
        click(&mut editor, (100.0, 100.0));
        editor.set_mode(Some(Tool::Select));
        click(&mut editor, (100.0, 100.0));
        click(&mut editor, (400.0, 400.0));
        click(&mut editor, (400.0, 400.0));

        assert_eq!(editor.listener().0, vec!["selected Stamp", "deselected"]);
    }

    #[test]
    fn test_escape_cancels_drawing() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Circle));
        editor.pointer_down(ScreenPoint::new(10.0, 10.0));
        editor.pointer_move(ScreenPoint::new(80.0, 80.0));
        editor.key_press(EditorKey::Escape);
        editor.pointer_up(ScreenPoint::new(80.0, 80.0));

        assert_eq!(editor.gateway().annotation_count(), 0);
        assert_eq!(editor.mode(), None);
    }

    #[test]
    fn test_view_change_keeps_selection() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Note));
        click(&mut editor, (100.0, 100.0));
        editor.set_mode(Some(Tool::Select));
        editor.pointer_down(ScreenPoint::new(100.0, 100.0));
        editor.set_view(CoordinateMapper::new(0.0, 0.0, 2.0));

        assert!(editor.state().is_idle());
        assert!(editor.selection().is_some());
    }

    #[test]
    fn test_set_page_detaches_selection() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Note));
        click(&mut editor, (100.0, 100.0));
        editor.set_mode(Some(Tool::Select));
        click(&mut editor, (100.0, 100.0));

        assert!(!editor.set_page(5));
        assert!(editor.selection().is_some());
        assert!(editor.set_page(1));
        assert!(editor.selection().is_none());
        assert_eq!(editor.page(), 1);
        assert_eq!(editor.gateway().annotation_count(), 1);

        click(&mut editor, (100.0, 100.0));
        assert!(editor.selection().is_none());
    }

    #[test]
    fn test_edit_style_updates_tool_default_without_selection() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Circle));
        let blue = Style::new().with_stroke(Color::BLUE).with_thickness(4.0);
        editor.edit_style(blue.clone());
        draw(&mut editor, (10.0, 10.0), (60.0, 60.0));

        assert_eq!(editor.styles().get_default(Tool::Circle), blue);
        assert_eq!(editor.gateway().list_annotations(0).unwrap()[0].style(), &blue);
    }

    #[test]
    fn test_edit_style_applies_to_selection() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Circle));
        draw(&mut editor, (10.0, 10.0), (60.0, 60.0));
        editor.set_mode(Some(Tool::Select));
        click(&mut editor, (30.0, 30.0));

        let blue = Style::new().with_stroke(Color::BLUE);
        editor.edit_style(blue.clone());

        assert_eq!(editor.gateway().list_annotations(0).unwrap()[0].style(), &blue);
        assert_eq!(editor.styles().get_default(Tool::Circle).stroke_color, Color::RED);
    }

    #[test]
    fn test_hover_text() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Text));
        click(&mut editor, (100.0, 100.0));
        editor.set_mode(Some(Tool::Stamp));
        click(&mut editor, (300.0, 300.0));

        assert_eq!(editor.hover_text(ScreenPoint::new(100.0, 100.0)), Some("Text".to_string()));
        assert_eq!(editor.hover_text(ScreenPoint::new(300.0, 300.0)), None);
        assert_eq!(editor.hover_text(ScreenPoint::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_overlay_while_drawing_and_selected() {
        let mut editor = editor();
        editor.set_mode(Some(Tool::Circle));
        editor.pointer_down(ScreenPoint::new(10.0, 10.0));
        editor.pointer_move(ScreenPoint::new(60.0, 60.0));
        assert!(matches!(editor.overlay().as_slice(), [DrawPrimitive::Ellipse { .. }]));

        editor.pointer_up(ScreenPoint::new(60.0, 60.0));
        editor.set_mode(Some(Tool::Select));
        click(&mut editor, (30.0, 30.0));
        assert_eq!(editor.overlay().len(), 9);
    }
}
