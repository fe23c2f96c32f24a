//! Dated JSON output tree

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::types::QaPair;

/// Per-document entry in the run summary
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub file_path: String,
    pub chunks: usize,
    pub qa_pairs: usize,
}

/// Totals for one extraction run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub date: String,
    pub total_documents: usize,
    pub total_qa_pairs: usize,
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            date: date.into(),
            total_documents: 0,
            total_qa_pairs: 0,
            documents: Vec::new(),
        }
    }

    /// Record one successfully processed document
    pub fn record(&mut self, report: DocumentReport) {
        self.total_documents += 1;
        self.total_qa_pairs += report.qa_pairs;
        self.documents.push(report);
    }
}

/// Writes extraction results under `{root}/{date}/`, mirroring the
/// relative directory layout of the inputs
pub struct OutputWriter {
    run_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl AsRef<Path>, date: &str) -> Result<Self> {
        let run_dir = root.as_ref().join(date);
        fs::create_dir_all(&run_dir)?;
        Ok(Self { run_dir })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Write one document's pairs to `{run_dir}/{relative dir}/{stem}.json`
    /// and return the path written
    pub fn write_document(&self, rel_path: &Path, pairs: &[QaPair]) -> Result<PathBuf> {
        let stem = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let mut target = self.run_dir.clone();
        if let Some(parent) = rel_path.parent() {
            target.push(parent);
        }
        fs::create_dir_all(&target)?;

        let target = target.join(format!("{}.json", sanitize_name(&stem)));
        fs::write(&target, serde_json::to_string_pretty(pairs)?)?;

        tracing::info!("saved {} QA pairs to {}", pairs.len(), target.display());
        Ok(target)
    }

    /// Write the run summary to `{run_dir}/summary.json`
    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        let target = self.run_dir.join("summary.json");
        fs::write(&target, serde_json::to_string_pretty(summary)?)?;
        Ok(target)
    }
}

/// Keep alphanumerics, dashes, underscores and dots; anything else
/// becomes an underscore
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("Q1", "A1"),
            QaPair::new("Q2", "A2"),
        ]
    }

    #[test]
    fn test_writes_dated_tree_preserving_layout() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "2026-08-25").unwrap();

        let written = writer
            .write_document(Path::new("manuals/printer.txt"), &sample_pairs())
            .unwrap();

        assert_eq!(
            written,
            dir.path().join("2026-08-25").join("manuals").join("printer.json")
        );

        let loaded: Vec<QaPair> =
            serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(loaded, sample_pairs());
    }

    #[test]
    fn test_sanitizes_awkward_stems() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "2026-08-25").unwrap();

        let written = writer
            .write_document(Path::new("weird name?.txt"), &sample_pairs())
            .unwrap();

        assert_eq!(
            written.file_name().unwrap().to_str().unwrap(),
            "weird_name_.json"
        );
        assert!(written.exists());
    }

    #[test]
    fn test_unicode_stems_survive() {
        assert_eq!(sanitize_name("说明书-v2"), "说明书-v2");
        assert_eq!(sanitize_name("a b/c"), "a_b_c");
    }

    #[test]
    fn test_summary_totals_and_roundtrip() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "2026-08-25").unwrap();

        let mut summary = RunSummary::new("2026-08-25");
        summary.record(DocumentReport {
            file_path: "a.txt".to_string(),
            chunks: 3,
            qa_pairs: 5,
        });
        summary.record(DocumentReport {
            file_path: "sub/b.pdf".to_string(),
            chunks: 2,
            qa_pairs: 4,
        });

        assert_eq!(summary.total_documents, 2);
        assert_eq!(summary.total_qa_pairs, 9);

        let written = writer.write_summary(&summary).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();

        assert_eq!(value["total_documents"], 2);
        assert_eq!(value["total_qa_pairs"], 9);
        assert_eq!(value["documents"].as_array().unwrap().len(), 2);
        assert!(value["run_id"].as_str().unwrap().len() >= 32);
    }
}
