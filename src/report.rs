//! Cluster report rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use cluster::Cluster;
use tracing::info;

use crate::PipelineError;

const RULE_WIDTH: usize = 40;

/// Render one cluster in the text report format.
///
/// `number` is the 1-based position of the cluster in the output. Member ids
/// that are paths beneath `relative_to` are shown relative to it.
pub fn render_cluster(number: usize, cluster: &Cluster, relative_to: Option<&Path>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Cluster {number} ({} documents)", cluster.len());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    for id in cluster.members() {
        let _ = writeln!(out, "- {}", display_id(id, relative_to));
    }
    out
}

fn display_id(id: &str, relative_to: Option<&Path>) -> String {
    relative_to
        .and_then(|base| Path::new(id).strip_prefix(base).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string())
}

/// Write `cluster_001.txt`, `cluster_002.txt`, ... into `output_dir`,
/// creating it if needed. Returns the written paths in cluster order.
pub fn write_report(
    clusters: &[Cluster],
    output_dir: impl AsRef<Path>,
    relative_to: Option<&Path>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).map_err(|err| PipelineError::io(output_dir, err))?;

    let mut written = Vec::with_capacity(clusters.len());
    for (idx, cluster) in clusters.iter().enumerate() {
        let number = idx + 1;
        let path = output_dir.join(format!("cluster_{number:03}.txt"));
        fs::write(&path, render_cluster(number, cluster, relative_to))
            .map_err(|err| PipelineError::io(&path, err))?;
        written.push(path);
    }

    info!(dir = %output_dir.display(), clusters = written.len(), "report written");
    Ok(written)
}

/// Write the clusters as a JSON array of `{"members": [...]}` objects.
pub fn write_summary_json(clusters: &[Cluster], path: impl AsRef<Path>) -> Result<(), PipelineError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| PipelineError::io(parent, err))?;
    }
    let json = serde_json::to_string_pretty(clusters).map_err(|err| PipelineError::json(path, err))?;
    fs::write(path, json).map_err(|err| PipelineError::io(path, err))
}
