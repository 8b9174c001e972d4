//! PDF Annotator Core Library
//!
//! Interactive annotation editing for a PDF viewer: pointer gestures become
//! create, move, resize, restyle and delete operations on an annotation
//! engine reached through [`AnnotationGateway`].

pub mod annotation;
pub mod config;
pub mod coords;
pub mod editor;
pub mod gateway;
pub mod manipulation;
pub mod memory;
pub mod overlay;
pub mod persistence;
pub mod reconcile;
pub mod style;
pub mod tool;

pub use annotation::{
    Annotation, AnnotationHandle, AnnotationId, AnnotationKind, AnnotationMetadata, ArrowEnds,
    Color, DocPoint, DocRect, Geometry, PageIndex, Style,
};
pub use config::{ConfigError, EditorConfig};
pub use coords::{CoordinateMapper, ScreenPoint, ScreenRect};
pub use editor::{AnnotationEditor, EditorKey, EditorListener, InteractionState, Selection};
pub use gateway::{AnnotationGateway, GatewayError, GatewayResult, NewAnnotation};
pub use manipulation::{generate_handles, HandleType, ResizeHandle};
pub use memory::MemoryGateway;
pub use overlay::{DrawPrimitive, SelectionView, Stroke};
pub use persistence::{AnnotationRecord, AnnotationSidecar, PersistenceError, PersistenceResult};
pub use reconcile::MoveOutcome;
pub use style::{StyleParseError, StyleStore};
pub use tool::Tool;
