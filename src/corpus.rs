//! Corpus loading: HTML directories, precomputed document files and
//! optional visual feature maps.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use canonical::{Document, ExtractConfig, extract_html};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::PipelineError;

/// Documents loaded from disk plus the inputs that could not be used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub failures: Vec<LoadFailure>,
}

/// An input left out of the corpus and the reason why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn fail(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        let failure = LoadFailure {
            path: path.into(),
            reason: reason.into(),
        };
        warn!(path = %failure.path.display(), reason = %failure.reason, "skipping input");
        self.failures.push(failure);
    }
}

/// Extract every `*.html` / `*.htm` file below `dir`, in sorted path order.
///
/// Each document id is the file's path as walked from `dir`. Unreadable or
/// empty pages are recorded in [`Corpus::failures`]; non-UTF-8 bytes are
/// replaced rather than rejected.
pub fn load_html_dir(dir: impl AsRef<Path>, cfg: &ExtractConfig) -> Result<Corpus, PipelineError> {
    let dir = dir.as_ref();
    cfg.validate()?;
    if !dir.is_dir() {
        return Err(PipelineError::MissingInput(dir.to_path_buf()));
    }

    let mut corpus = Corpus::default();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                corpus.fail(path, err.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_html(entry.path()) {
            continue;
        }

        let path = entry.path();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                corpus.fail(path, err.to_string());
                continue;
            }
        };
        let html = String::from_utf8_lossy(&bytes);

        match extract_html(path.to_string_lossy(), &html, cfg) {
            Ok(doc) => corpus.documents.push(doc),
            Err(err) => corpus.fail(path, err.to_string()),
        }
    }

    info!(
        dir = %dir.display(),
        documents = corpus.documents.len(),
        failures = corpus.failures.len(),
        "html corpus loaded"
    );
    Ok(corpus)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Read precomputed documents from a JSON array or a JSON-lines file.
///
/// A syntactically broken array is an error. Records that do not describe a
/// document, whether array elements or JSON lines, are logged and skipped.
pub fn load_documents_json(path: impl AsRef<Path>) -> Result<Vec<Document>, PipelineError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| PipelineError::io(path, err))?;

    let mut docs = Vec::new();
    if content.trim_start().starts_with('[') {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(|err| PipelineError::json(path, err))?;
        for (idx, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Document>(record) {
                Ok(doc) => docs.push(doc),
                Err(err) => warn!(path = %path.display(), index = idx, error = %err, "skipping malformed document"),
            }
        }
        info!(path = %path.display(), documents = docs.len(), "documents loaded");
        return Ok(docs);
    }

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Document>(line) {
            Ok(doc) => docs.push(doc),
            Err(err) => warn!(path = %path.display(), line = idx + 1, error = %err, "skipping malformed document"),
        }
    }
    info!(path = %path.display(), documents = docs.len(), "documents loaded");
    Ok(docs)
}

/// Attach visual feature vectors from a JSON object mapping document id to
/// a list of floats. Returns how many documents received a vector.
///
/// Documents absent from the map keep their current features.
pub fn attach_visual_features(docs: &mut [Document], path: impl AsRef<Path>) -> Result<usize, PipelineError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| PipelineError::io(path, err))?;
    let mut features: HashMap<String, Vec<f32>> =
        serde_json::from_str(&content).map_err(|err| PipelineError::json(path, err))?;

    let mut attached = 0;
    for doc in docs.iter_mut() {
        if let Some(vector) = features.remove(&doc.id) {
            doc.visual_features = Some(vector);
            attached += 1;
        }
    }
    if !features.is_empty() {
        debug!(unmatched = features.len(), "visual features for unknown documents ignored");
    }
    info!(path = %path.display(), attached, "visual features attached");
    Ok(attached)
}
