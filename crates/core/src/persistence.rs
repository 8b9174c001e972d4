//! Annotation sidecar persistence
//!
//! Saves and restores a document's annotations as a JSON sidecar file
//! alongside the PDF. Snapshots can be taken from any [`AnnotationGateway`]
//! and restored into any other; identities are not preserved, the engine
//! assigns fresh ones on restore.

use crate::annotation::{AnnotationKind, AnnotationMetadata, Geometry, PageIndex, Style};
use crate::gateway::{AnnotationGateway, GatewayResult, NewAnnotation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current sidecar format version
pub const SIDECAR_VERSION: u32 = 1;

/// Error types for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed annotation sidecar: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported sidecar version {0} (newest known is {max})", max = SIDECAR_VERSION)]
    UnsupportedVersion(u32),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One stored annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub kind: AnnotationKind,
    pub geometry: Geometry,
    pub style: Style,
    #[serde(default)]
    pub metadata: AnnotationMetadata,
}

/// Annotations of a whole document, keyed by page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSidecar {
    pub version: u32,
    #[serde(default)]
    pub pages: BTreeMap<PageIndex, Vec<AnnotationRecord>>,
}

impl AnnotationSidecar {
    pub fn new() -> Self {
        Self { version: SIDECAR_VERSION, pages: BTreeMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.values().all(Vec::is_empty)
    }

    pub fn annotation_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }
}

impl Default for AnnotationSidecar {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the sidecar path for a given PDF path
///
/// # Example
/// ```
/// use std::path::Path;
/// use pdf_annotator_core::persistence::sidecar_path;
///
/// let path = sidecar_path(Path::new("/path/to/document.pdf"));
/// assert_eq!(path, Path::new("/path/to/document.pdf.annotations.json"));
/// ```
pub fn sidecar_path(pdf_path: &Path) -> PathBuf {
    let mut path = pdf_path.as_os_str().to_owned();
    path.push(".annotations.json");
    PathBuf::from(path)
}

/// Capture every annotation the gateway holds, in z-order per page
///
/// Pages without annotations are left out.
pub fn snapshot_document<G: AnnotationGateway>(gateway: &G) -> GatewayResult<AnnotationSidecar> {
    let mut sidecar = AnnotationSidecar::new();
    for page in 0..gateway.page_count() {
        let records: Vec<AnnotationRecord> = gateway
            .list_annotations(page)?
            .into_iter()
            .map(|annotation| AnnotationRecord {
                kind: annotation.kind(),
                geometry: annotation.geometry().clone(),
                style: annotation.style().clone(),
                metadata: annotation.metadata().clone(),
            })
            .collect();
        if !records.is_empty() {
            sidecar.pages.insert(page, records);
        }
    }
    Ok(sidecar)
}

/// Recreate every record through the gateway
///
/// Records the gateway rejects (degenerate geometry, missing page) are
/// skipped. Returns the number of skipped records.
pub fn restore_document<G: AnnotationGateway>(gateway: &mut G, sidecar: &AnnotationSidecar) -> usize {
    let mut skipped = 0;
    for (page, records) in &sidecar.pages {
        for record in records {
            let request = NewAnnotation::new(record.kind, record.geometry.clone(), record.style.clone())
                .with_metadata(record.metadata.clone());
            if let Err(err) = gateway.create(*page, request) {
                warn!(page, kind = %record.kind, %err, "skipping annotation record");
                skipped += 1;
            }
        }
    }
    debug!(restored = sidecar.annotation_count() - skipped, skipped, "restored annotations");
    skipped
}

/// Save annotations to the sidecar of `pdf_path`
///
/// An empty snapshot writes nothing and returns `None`; otherwise returns the
/// path written.
///
/// # Errors
/// Returns `PersistenceError` if serialization or file write fails
pub fn save_sidecar(pdf_path: &Path, sidecar: &AnnotationSidecar) -> PersistenceResult<Option<PathBuf>> {
    if sidecar.is_empty() {
        return Ok(None);
    }
    let path = sidecar_path(pdf_path);
    write_sidecar(&path, sidecar)?;
    Ok(Some(path))
}

/// Write a sidecar to an explicit path, even when it is empty
///
/// Missing parent directories are created.
pub fn write_sidecar(path: &Path, sidecar: &AnnotationSidecar) -> PersistenceResult<()> {
    let json = serde_json::to_string_pretty(sidecar)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Write atomically through a temporary file
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    debug!(path = %path.display(), annotations = sidecar.annotation_count(), "saved annotation sidecar");
    Ok(())
}

/// Load the sidecar of `pdf_path`, or `None` if there is none
pub fn load_sidecar(pdf_path: &Path) -> PersistenceResult<Option<AnnotationSidecar>> {
    let path = sidecar_path(pdf_path);
    if !path.exists() {
        return Ok(None);
    }
    read_sidecar(&path).map(Some)
}

/// Read a sidecar file from an explicit path
pub fn read_sidecar(path: &Path) -> PersistenceResult<AnnotationSidecar> {
    let json = fs::read_to_string(path)?;
    let sidecar: AnnotationSidecar = serde_json::from_str(&json)?;
    if sidecar.version > SIDECAR_VERSION {
        return Err(PersistenceError::UnsupportedVersion(sidecar.version));
    }
    Ok(sidecar)
}

/// Delete the sidecar of `pdf_path` if present
pub fn delete_sidecar(pdf_path: &Path) -> PersistenceResult<()> {
    let path = sidecar_path(pdf_path);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
