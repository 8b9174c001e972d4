//! Tool palette

use crate::annotation::AnnotationKind;
use serde::{Deserialize, Serialize};

/// Editor tool mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Select,
    Note,
    Text,
    Line,
    Circle,
    Highlight,
    Stamp,
}

impl Tool {
    /// Tools that draw a new annotation
    pub const DRAWING: [Tool; 6] =
        [Tool::Note, Tool::Text, Tool::Line, Tool::Circle, Tool::Highlight, Tool::Stamp];

    /// Kind of annotation this tool creates; `None` for the select tool
    pub fn annotation_kind(&self) -> Option<AnnotationKind> {
        match self {
            Tool::Select => None,
            Tool::Note => Some(AnnotationKind::Note),
            Tool::Text => Some(AnnotationKind::FreeText),
            Tool::Line => Some(AnnotationKind::Line),
            Tool::Circle => Some(AnnotationKind::Circle),
            Tool::Highlight => Some(AnnotationKind::Highlight),
            Tool::Stamp => Some(AnnotationKind::Stamp),
        }
    }

    /// Point-like tools turn a click into a fixed-size annotation; the others
    /// discard gestures below the click threshold.
    pub fn is_point_like(&self) -> bool {
        matches!(self, Tool::Note | Tool::Text | Tool::Stamp | Tool::Circle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Note => "note",
            Tool::Text => "text",
            Tool::Line => "line",
            Tool::Circle => "circle",
            Tool::Highlight => "highlight",
            Tool::Stamp => "stamp",
        }
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(Tool::Select),
            "note" => Ok(Tool::Note),
            "text" => Ok(Tool::Text),
            "line" => Ok(Tool::Line),
            "circle" => Ok(Tool::Circle),
            "highlight" => Ok(Tool::Highlight),
            "stamp" => Ok(Tool::Stamp),
            other => Err(format!("unknown tool '{other}'")),
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
