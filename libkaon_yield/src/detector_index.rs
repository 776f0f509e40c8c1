// A declaration line looks like
//   "Detector n:   1 kp (integrated over solid angle)"
// i.e. the marker, the detector number, and the symbolic name as the fifth
// whitespace separated token (Detector, n:, number, ... name).
use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ReportError;
use super::report::Report;

const NAME_TOKEN_INDEX: usize = 4;

static DECLARATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Detector n:\s*(\d+)").expect("valid declaration regex"));

/// Mapping of detector name to detector number for a single report.
///
/// Names keep the order of their first declaration. A name declared again replaces
/// its number in place, so the last declaration in the report wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorIndex {
    entries: Vec<(String, u32)>,
    positions: FxHashMap<String, usize>,
}

impl DetectorIndex {
    /// Scan every line of the report for detector declarations.
    ///
    /// A report without declarations gives an empty index.
    pub fn from_report(report: &Report) -> Result<Self, ReportError> {
        let mut index = Self::default();
        for (idx, line) in report.lines().iter().enumerate() {
            let Some(caps) = DECLARATION_REGEX.captures(line) else {
                continue;
            };
            let malformed = || ReportError::MalformedDeclaration {
                line_number: idx + 1,
                line: line.clone(),
            };
            let number: u32 = caps[1].parse().map_err(|_| malformed())?;
            let name = line
                .split_whitespace()
                .nth(NAME_TOKEN_INDEX)
                .ok_or_else(malformed)?;
            index.upsert(name, number);
        }
        Ok(index)
    }

    /// Insert a detector, or overwrite the number of one already present.
    pub fn upsert(&mut self, name: &str, number: u32) {
        if let Some(&pos) = self.positions.get(name) {
            spdlog::debug!(
                "Detector {name} redeclared: number {} replaced by {number}",
                self.entries[pos].1
            );
            self.entries[pos].1 = number;
        } else {
            self.positions.insert(name.to_string(), self.entries.len());
            self.entries.push((name.to_string(), number));
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.positions.get(name).map(|&pos| self.entries[pos].1)
    }

    /// Iterate over (name, number) in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, number)| (name.as_str(), *number))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
