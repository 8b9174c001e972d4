use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_annotator_core::coords::{fit_page_scale, fit_width_scale, zoom_in, zoom_out};
use pdf_annotator_core::persistence::{
    delete_sidecar, load_sidecar, read_sidecar, restore_document, save_sidecar, snapshot_document, write_sidecar,
    AnnotationSidecar,
};
use pdf_annotator_core::{
    AnnotationEditor, AnnotationGateway, AnnotationId, AnnotationKind, AnnotationMetadata,
    CoordinateMapper, EditorConfig, EditorKey, EditorListener, Geometry, MemoryGateway, PageIndex,
    ScreenPoint, Style, Tool,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "pdf-annotator")]
#[command(about = "Headless PDF annotation editor")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a gesture script and print the resulting annotations.
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// Editor configuration JSON.
        #[arg(long)]
        config: Option<PathBuf>,
        /// PDF whose `.annotations.json` sidecar is loaded before and saved after replaying.
        #[arg(long, value_name = "PDF", conflicts_with_all = ["sidecar", "save"])]
        document: Option<PathBuf>,
        /// Annotation sidecar to load before replaying.
        #[arg(long)]
        sidecar: Option<PathBuf>,
        /// Write the resulting annotations as a sidecar.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print CLI version.
    Version,
}

/// Gesture script
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    #[serde(default = "default_pages")]
    pages: u32,
    #[serde(default)]
    view: Option<ViewSpec>,
    /// Visible area in screen pixels, used by `zoom` steps
    #[serde(default = "default_viewport")]
    viewport: (f32, f32),
    /// Page size in document units, used by `zoom` steps
    #[serde(default = "default_page_size")]
    page_size: (f32, f32),
    #[serde(default)]
    steps: Vec<Step>,
}

fn default_pages() -> u32 {
    1
}

fn default_viewport() -> (f32, f32) {
    (800.0, 1000.0)
}

// US Letter
fn default_page_size() -> (f32, f32) {
    (612.0, 792.0)
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ViewSpec {
    #[serde(default)]
    offset_x: f32,
    #[serde(default)]
    offset_y: f32,
    scale: f32,
}

impl ViewSpec {
    fn mapper(&self) -> Result<CoordinateMapper> {
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            anyhow::bail!("view scale must be positive, got {}", self.scale);
        }
        Ok(CoordinateMapper::new(self.offset_x, self.offset_y, self.scale))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Point(f32, f32);

impl From<Point> for ScreenPoint {
    fn from(point: Point) -> Self {
        ScreenPoint::new(point.0, point.1)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Key {
    Delete,
    Escape,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Zoom {
    In,
    Out,
    FitPage,
    FitWidth,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Mode(Option<Tool>),
    Down(Point),
    Move(Point),
    Up(Point),
    Key(Key),
    Style(Style),
    Page(PageIndex),
    View(ViewSpec),
    Zoom(Zoom),
    Rerender,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Notification {
    Selected { kind: String, style: Style },
    Deselected,
}

#[derive(Debug, Default)]
struct CollectingListener {
    notifications: Vec<Notification>,
}

impl EditorListener for CollectingListener {
    fn on_selected(&mut self, kind_name: &str, style: &Style) {
        self.notifications.push(Notification::Selected { kind: kind_name.to_string(), style: style.clone() });
    }

    fn on_deselected(&mut self) {
        self.notifications.push(Notification::Deselected);
    }

    fn on_status(&mut self, message: &str) {
        debug!(message, "status");
    }
}

#[derive(Debug, Serialize)]
struct AnnotationOutput {
    id: AnnotationId,
    kind: AnnotationKind,
    geometry: Geometry,
    style: Style,
    metadata: AnnotationMetadata,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    annotations: BTreeMap<PageIndex, Vec<AnnotationOutput>>,
    notifications: Vec<Notification>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Replay { script, config, document, sidecar, save } => {
            let storage = match document {
                Some(pdf) => Storage::Document(pdf),
                None => Storage::Explicit { load: sidecar, save },
            };
            run_replay(&script, config.as_deref(), &storage)
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Where annotations are loaded from and saved to
enum Storage {
    /// The sidecar beside a PDF, removed again when no annotations remain
    Document(PathBuf),
    Explicit { load: Option<PathBuf>, save: Option<PathBuf> },
}

impl Storage {
    fn load(&self) -> Result<Option<AnnotationSidecar>> {
        match self {
            Storage::Document(pdf) => {
                ensure_file_exists(pdf)?;
                load_sidecar(pdf).context("failed to load annotation sidecar")
            }
            Storage::Explicit { load: Some(path), .. } => {
                ensure_file_exists(path)?;
                read_sidecar(path).map(Some).context("failed to load annotation sidecar")
            }
            Storage::Explicit { load: None, .. } => Ok(None),
        }
    }

    fn save(&self, snapshot: &AnnotationSidecar) -> Result<()> {
        match self {
            Storage::Document(pdf) => {
                let saved = save_sidecar(pdf, snapshot)
                    .with_context(|| format!("failed to save annotations for {}", pdf.display()))?;
                match saved {
                    Some(path) => {
                        info!(path = %path.display(), annotations = snapshot.annotation_count(), "saved annotation sidecar");
                    }
                    None => {
                        delete_sidecar(pdf)
                            .with_context(|| format!("failed to remove annotations for {}", pdf.display()))?;
                        info!(pdf = %pdf.display(), "no annotations left; sidecar removed");
                    }
                }
            }
            Storage::Explicit { save: Some(path), .. } => {
                write_sidecar(path, snapshot)
                    .with_context(|| format!("failed to write sidecar to {}", path.display()))?;
                info!(path = %path.display(), annotations = snapshot.annotation_count(), "saved annotation sidecar");
            }
            Storage::Explicit { save: None, .. } => {}
        }
        Ok(())
    }

    fn saves(&self) -> bool {
        !matches!(self, Storage::Explicit { save: None, .. })
    }
}

fn run_replay(script: &Path, config: Option<&Path>, storage: &Storage) -> Result<()> {
    ensure_file_exists(script)?;

    let contents =
        fs::read_to_string(script).with_context(|| format!("failed to read {}", script.display()))?;
    let script: Script = serde_json::from_str(&contents).context("failed to parse gesture script")?;
    if script.pages == 0 {
        anyhow::bail!("script must declare at least one page");
    }

    let config = match config {
        Some(path) => {
            ensure_file_exists(path)?;
            EditorConfig::from_file(path)
                .and_then(EditorConfig::with_env_overrides)
                .context("failed to load editor configuration")?
        }
        None => EditorConfig::from_env().context("failed to load editor configuration")?,
    };

    let mut gateway = MemoryGateway::new(script.pages);
    if let Some(loaded) = storage.load()? {
        let skipped = restore_document(&mut gateway, &loaded);
        info!(restored = loaded.annotation_count() - skipped, skipped, "loaded annotation sidecar");
    }

    let mut editor = AnnotationEditor::new(gateway, CollectingListener::default(), config);
    if let Some(view) = script.view {
        editor.set_view(view.mapper()?);
    }

    let layout = Layout { viewport: script.viewport, page_size: script.page_size };
    let step_count = script.steps.len();
    for (index, step) in script.steps.into_iter().enumerate() {
        apply_step(&mut editor, &layout, step).with_context(|| format!("step {} failed", index + 1))?;
    }
    info!(steps = step_count, "replay finished");

    let (gateway, listener) = editor.into_parts();

    if storage.saves() {
        storage.save(&snapshot_document(&gateway)?)?;
    }

    let mut annotations = BTreeMap::new();
    for page in 0..gateway.page_count() {
        let listed = gateway.list_annotations(page)?;
        if listed.is_empty() {
            continue;
        }
        let outputs = listed
            .into_iter()
            .map(|annotation| AnnotationOutput {
                id: annotation.id(),
                kind: annotation.kind(),
                geometry: annotation.geometry().clone(),
                style: annotation.style().clone(),
                metadata: annotation.metadata().clone(),
            })
            .collect();
        annotations.insert(page, outputs);
    }

    let payload = ReplayOutput { annotations, notifications: listener.notifications };
    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");

    Ok(())
}

/// Viewport geometry the zoom steps lay the page out in
struct Layout {
    viewport: (f32, f32),
    page_size: (f32, f32),
}

impl Layout {
    fn zoomed(&self, current_scale: f32, zoom: Zoom) -> Result<CoordinateMapper> {
        let scale = match zoom {
            Zoom::In => Some(zoom_in(current_scale)),
            Zoom::Out => Some(zoom_out(current_scale)),
            Zoom::FitPage => fit_page_scale(self.viewport, self.page_size),
            Zoom::FitWidth => fit_width_scale(self.viewport.0, self.page_size.0),
        };
        let Some(scale) = scale else {
            anyhow::bail!("page size {:?} cannot be fitted", self.page_size);
        };
        Ok(CoordinateMapper::centered(self.viewport, self.page_size, scale))
    }
}

fn apply_step(
    editor: &mut AnnotationEditor<MemoryGateway, CollectingListener>,
    layout: &Layout,
    step: Step,
) -> Result<()> {
    match step {
        Step::Mode(mode) => editor.set_mode(mode),
        Step::Down(point) => editor.pointer_down(point.into()),
        Step::Move(point) => editor.pointer_move(point.into()),
        Step::Up(point) => editor.pointer_up(point.into()),
        Step::Key(Key::Delete) => editor.key_press(EditorKey::Delete),
        Step::Key(Key::Escape) => editor.key_press(EditorKey::Escape),
        Step::Style(style) => editor.edit_style(style),
        Step::Page(page) => {
            if !editor.set_page(page) {
                anyhow::bail!("page {page} does not exist");
            }
        }
        Step::View(view) => editor.set_view(view.mapper()?),
        Step::Zoom(zoom) => {
            let mapper = layout.zoomed(editor.mapper().scale, zoom)?;
            debug!(scale = mapper.scale, offset_x = mapper.offset_x, offset_y = mapper.offset_y, "zoomed");
            editor.set_view(mapper);
        }
        Step::Rerender => {
            editor.gateway_mut().invalidate_handles();
            editor.on_after_mutation();
        }
    }
    Ok(())
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
