use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::error::ReportError;

/// A simulation report held in memory as an immutable sequence of lines.
///
/// The report is read once; the detector index and every detector table are then
/// pure functions over the same lines.
#[derive(Debug, Clone, Default)]
pub struct Report {
    path: PathBuf,
    lines: Vec<String>,
}

impl Report {
    /// Read the report at path. The file is closed before this returns, error or not.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let unavailable = |source: std::io::Error| ReportError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unavailable)?;
        let size_bytes = file.metadata().map_err(unavailable)?.len();
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<String>, _>>()
            .map_err(unavailable)?;

        spdlog::info!(
            "Loaded report {} ({}, {} lines)",
            path.display(),
            human_bytes::human_bytes(size_bytes as f64),
            lines.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    /// Build a report from text already in memory. The path is only used as a name.
    pub fn from_text(path: &Path, text: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: text.lines().map(String::from).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
