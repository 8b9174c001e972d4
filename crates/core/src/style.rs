//! Style property store
//!
//! Holds the per-tool default styles used for new annotations and moves
//! styles between the current selection and the style-editing surface.

use crate::annotation::{Annotation, AnnotationHandle, AnnotationKind, Color, Style};
use crate::gateway::{AnnotationGateway, GatewayResult};
use crate::tool::Tool;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleParseError {
    #[error("default appearance has no font operator")]
    MissingFont,
    #[error("operator '{operator}' expects {expected} operands")]
    MissingOperands { operator: &'static str, expected: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Font and text color parsed from a default-appearance string
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultAppearance {
    pub font_family: String,
    pub font_size: f32,
    pub color: Color,
}

/// Parse a default-appearance string such as `/Helv 12 Tf 0 0 1 rg`
///
/// Font names are reported lowercase without the leading slash. A gray `g`
/// color is promoted to RGB by replicating its channel; `k` (CMYK) is
/// converted naively. Without a color operator the text is black.
pub fn parse_default_appearance(da: &str) -> Result<DefaultAppearance, StyleParseError> {
    let mut operands: Vec<&str> = Vec::new();
    let mut font: Option<(String, f32)> = None;
    let mut color = Color::BLACK;

    for token in da.split_whitespace() {
        match token {
            "Tf" => {
                let [name, size] = take_operands::<2>(&mut operands, "Tf")?;
                font = Some((name.trim_start_matches('/').to_ascii_lowercase(), parse_number(size)?));
            }
            "g" => {
                let [gray] = take_operands::<1>(&mut operands, "g")?;
                color = Color::from_unit_gray(parse_number(gray)?);
            }
            "rg" => {
                let [r, g, b] = take_operands::<3>(&mut operands, "rg")?;
                color = Color::from_unit_rgb(parse_number(r)?, parse_number(g)?, parse_number(b)?);
            }
            "k" => {
                let [c, m, y, k] = take_operands::<4>(&mut operands, "k")?;
                let k = parse_number(k)?;
                color = Color::from_unit_rgb(
                    (1.0 - parse_number(c)?) * (1.0 - k),
                    (1.0 - parse_number(m)?) * (1.0 - k),
                    (1.0 - parse_number(y)?) * (1.0 - k),
                );
            }
            operand => operands.push(operand),
        }
    }

    let (font_family, font_size) = font.ok_or(StyleParseError::MissingFont)?;
    Ok(DefaultAppearance { font_family, font_size, color })
}

fn take_operands<'a, const N: usize>(
    operands: &mut Vec<&'a str>,
    operator: &'static str,
) -> Result<[&'a str; N], StyleParseError> {
    if operands.len() < N {
        return Err(StyleParseError::MissingOperands { operator, expected: N });
    }
    let tail = operands.split_off(operands.len() - N);
    operands.clear();
    let mut taken = [""; N];
    taken.copy_from_slice(&tail);
    Ok(taken)
}

fn parse_number(token: &str) -> Result<f32, StyleParseError> {
    token.parse::<f32>().map_err(|_| StyleParseError::InvalidNumber(token.to_string()))
}

/// Seed style for a tool
pub fn default_style_for(tool: Tool) -> Style {
    match tool {
        Tool::Select => Style::new(),
        Tool::Note => Style::new().with_stroke(Color::YELLOW),
        Tool::Text => Style::new().with_font("helv", 12.0, Color::BLACK),
        Tool::Line => Style::new().with_stroke(Color::RED).with_thickness(2.0),
        Tool::Circle => Style::new().with_stroke(Color::RED).with_thickness(2.0),
        Tool::Highlight => Style::new()
            .with_stroke(Color::YELLOW)
            .with_fill(Some(Color::YELLOW))
            .with_thickness(0.0)
            .with_opacity(0.4),
        Tool::Stamp => Style::new().with_stroke(Color::RED).with_thickness(2.0),
    }
}

/// Per-tool default styles
#[derive(Debug, Clone)]
pub struct StyleStore {
    defaults: HashMap<Tool, Style>,
}

impl StyleStore {
    /// Create a store seeded with every drawing tool's default style
    pub fn new() -> Self {
        let defaults = Tool::DRAWING.iter().map(|tool| (*tool, default_style_for(*tool))).collect();
        Self { defaults }
    }

    pub fn get_default(&self, tool: Tool) -> Style {
        self.defaults.get(&tool).cloned().unwrap_or_else(|| default_style_for(tool))
    }

    pub fn set_default(&mut self, tool: Tool, style: Style) {
        self.defaults.insert(tool, style);
    }

    /// Push a style onto the selected annotation immediately
    ///
    /// Returns `Ok(false)` when there is no selection.
    pub fn apply_to_selection<G: AnnotationGateway>(
        &self,
        gateway: &mut G,
        selection: Option<&AnnotationHandle>,
        style: &Style,
    ) -> GatewayResult<bool> {
        match selection {
            Some(handle) => {
                gateway.set_style(handle, style)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read an annotation's current style for the editing surface
    ///
    /// FreeText font, size and text color come from the engine's
    /// default-appearance string; if that cannot be read or parsed the stored
    /// style is reported unchanged.
    pub fn extract_from<G: AnnotationGateway>(&self, gateway: &G, annotation: &Annotation) -> Style {
        let mut style = annotation.style().clone();
        if annotation.kind() != AnnotationKind::FreeText {
            return style;
        }

        let appearance = match gateway.default_appearance(&annotation.handle()) {
            Ok(Some(da)) => da,
            Ok(None) => return style,
            Err(err) => {
                warn!(id = %annotation.id(), %err, "could not read default appearance");
                return style;
            }
        };

        match parse_default_appearance(&appearance) {
            Ok(parsed) => {
                style.font_family = parsed.font_family;
                style.font_size = parsed.font_size;
                style.text_color = parsed.color;
            }
            Err(err) => warn!(id = %annotation.id(), da = %appearance, %err, "unparseable default appearance"),
        }
        style
    }
}

impl Default for StyleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{DocRect, Geometry};
    use crate::gateway::NewAnnotation;
    use crate::memory::MemoryGateway;

    #[test]
    fn test_parse_rgb_appearance() {
        let parsed = parse_default_appearance("/Helv 12 Tf 0 0 1 rg").unwrap();
        assert_eq!(parsed.font_family, "helv");
        assert_eq!(parsed.font_size, 12.0);
        assert_eq!(parsed.color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_parse_gray_promotes_to_rgb() {
        let parsed = parse_default_appearance("/TiRo 9.5 Tf 0.5 g").unwrap();
        assert_eq!(parsed.font_family, "tiro");
        assert_eq!(parsed.font_size, 9.5);
        assert_eq!(parsed.color, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_parse_color_before_font() {
        let parsed = parse_default_appearance("1 0 0 rg /Cour 10 Tf").unwrap();
        assert_eq!(parsed.color, Color::RED);
        assert_eq!(parsed.font_family, "cour");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_default_appearance("0 g"), Err(StyleParseError::MissingFont));
        assert_eq!(
            parse_default_appearance("/Helv Tf"),
            Err(StyleParseError::MissingOperands { operator: "Tf", expected: 2 })
        );
        assert_eq!(
            parse_default_appearance("/Helv big Tf"),
            Err(StyleParseError::InvalidNumber("big".to_string()))
        );
    }

    #[test]
    fn test_seeded_defaults() {
        let store = StyleStore::new();
        assert_eq!(store.get_default(Tool::Note).stroke_color, Color::YELLOW);

        let line = store.get_default(Tool::Line);
        assert_eq!(line.stroke_color, Color::RED);
        assert_eq!(line.thickness, 2.0);
    }

    #[test]
    fn test_set_default_overrides_seed() {
        let mut store = StyleStore::new();
        let custom = Style::new().with_stroke(Color::BLUE).with_thickness(5.0);
        store.set_default(Tool::Circle, custom.clone());
        assert_eq!(store.get_default(Tool::Circle), custom);
        assert_eq!(store.get_default(Tool::Stamp).thickness, 2.0);
    }

    #[test]
    fn test_apply_to_selection() {
        let store = StyleStore::new();
        let mut gateway = MemoryGateway::new(1);
        let created = gateway
            .create(
                0,
                NewAnnotation::new(
                    AnnotationKind::Circle,
                    Geometry::Rect(DocRect::new(0.0, 0.0, 20.0, 20.0)),
                    Style::new(),
                ),
            )
            .unwrap();
        let blue = Style::new().with_stroke(Color::BLUE);

        assert_eq!(store.apply_to_selection(&mut gateway, None, &blue), Ok(false));
        assert_eq!(store.apply_to_selection(&mut gateway, Some(&created.handle()), &blue), Ok(true));
        assert_eq!(gateway.read(&created.handle()).unwrap().style(), &blue);
    }

    #[test]
    fn test_extract_free_text_reads_appearance() {
        let store = StyleStore::new();
        let mut gateway = MemoryGateway::new(1);
        let style = Style::new().with_font("cour", 18.0, Color::from_unit_gray(0.25));
        let created = gateway
            .create(
                0,
                NewAnnotation::new(
                    AnnotationKind::FreeText,
                    Geometry::Rect(DocRect::new(0.0, 0.0, 120.0, 40.0)),
                    style,
                ),
            )
            .unwrap();

        let extracted = store.extract_from(&gateway, &created);
        assert_eq!(extracted.font_family, "cour");
        assert_eq!(extracted.font_size, 18.0);
        assert_eq!(extracted.text_color, Color::rgb(64, 64, 64));
    }
}
