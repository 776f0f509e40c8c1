use regex::Regex;

use super::error::ReportError;
use super::report::Report;

/// Lines between a declaration and the first data row (the units header).
const HEADER_LINES: usize = 1;
/// E_min, E_max, counts, relative error (%)
const MIN_FIELDS_PER_ROW: usize = 4;

/// One energy bin of a detector table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBinRow {
    pub e_min: f64,
    pub e_max: f64,
    pub counts: f64,
    pub abs_error: f64,
}

impl EnergyBinRow {
    pub fn width(&self) -> f64 {
        self.e_max - self.e_min
    }
}

/// The energy bin table of one detector in one report, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorTable {
    rows: Vec<EnergyBinRow>,
}

impl DetectorTable {
    /// Read the table that follows the declaration of `detector_number`.
    ///
    /// If the detector is not declared in the report the table is empty. Rows with
    /// fewer than four fields are skipped; a row whose fields do not parse as numbers
    /// fails the whole read.
    pub fn read(report: &Report, detector_number: u32) -> Result<Self, ReportError> {
        let lines = report.lines();
        let declaration = declaration_regex(detector_number);

        let Some(decl_idx) = lines.iter().position(|line| declaration.is_match(line)) else {
            spdlog::debug!(
                "Detector {detector_number} not declared in {}",
                report.path().display()
            );
            return Ok(Self::default());
        };

        let mut rows = Vec::new();
        let start = decl_idx + 1 + HEADER_LINES;
        for (idx, line) in lines.iter().enumerate().skip(start) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            if let Some(row) = parse_row(trimmed, idx + 1)? {
                rows.push(row);
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[EnergyBinRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnergyBinRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<EnergyBinRow>> for DetectorTable {
    fn from(rows: Vec<EnergyBinRow>) -> Self {
        Self { rows }
    }
}

/// The number must stand alone: detector 1 does not match a declaration of 10
fn declaration_regex(detector_number: u32) -> Regex {
    Regex::new(&format!(r"Detector n:\s*{detector_number}\b"))
        .expect("an integer always forms a valid pattern")
}

/// Parse a trimmed, non-empty data line. Returns None for short rows.
fn parse_row(line: &str, line_number: usize) -> Result<Option<EnergyBinRow>, ReportError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS_PER_ROW {
        spdlog::debug!("Skipping short row at line {line_number}: {line:?}");
        return Ok(None);
    }

    let parse = |field: &str| {
        field
            .parse::<f64>()
            .map_err(|source| ReportError::MalformedRow {
                line_number,
                line: line.to_string(),
                source,
            })
    };

    let e_min = parse(fields[0])?;
    let e_max = parse(fields[1])?;
    let counts = parse(fields[2])?;
    let rel_error_percent = parse(fields[3])?;

    Ok(Some(EnergyBinRow {
        e_min,
        e_max,
        counts,
        abs_error: rel_error_percent / 100.0 * counts,
    }))
}
