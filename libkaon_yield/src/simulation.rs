use std::path::{Path, PathBuf};

use super::detector_index::DetectorIndex;
use super::detector_table::DetectorTable;
use super::error::ReportError;
use super::report::Report;
use super::yields::YieldResult;

/// The integrated yields of every detector in one simulation report.
///
/// Built once, never modified. If any detector fails to parse, no record is built.
#[derive(Debug, Clone)]
pub struct SimulationRecord {
    label: String,
    path: PathBuf,
    detectors: DetectorIndex,
    yields: Vec<(String, YieldResult)>,
}

impl SimulationRecord {
    /// Read the report at path and integrate all of its detectors
    pub fn load(label: &str, path: &Path) -> Result<Self, ReportError> {
        let report = Report::load(path)?;
        Self::from_report(label, &report)
    }

    /// Integrate all detectors of a report already in memory
    pub fn from_report(label: &str, report: &Report) -> Result<Self, ReportError> {
        let detectors = DetectorIndex::from_report(report)?;
        let mut yields = Vec::with_capacity(detectors.len());
        for (name, number) in detectors.iter() {
            let table = DetectorTable::read(report, number)?;
            let result = YieldResult::from_table(&table);
            spdlog::debug!(
                "{label}: detector {name} ({number}) has {} bins, yield {:e} +/- {:e}",
                table.len(),
                result.value,
                result.abs_error
            );
            yields.push((name.to_string(), result));
        }

        spdlog::info!(
            "Simulation {label}: integrated {} detectors from {}",
            yields.len(),
            report.path().display()
        );

        Ok(Self {
            label: label.to_string(),
            path: report.path().to_path_buf(),
            detectors,
            yields,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn detectors(&self) -> &DetectorIndex {
        &self.detectors
    }

    /// (detector name, yield) in declaration order
    pub fn yields(&self) -> &[(String, YieldResult)] {
        &self.yields
    }

    pub fn get_yield(&self, detector_name: &str) -> Option<&YieldResult> {
        self.yields
            .iter()
            .find(|(name, _)| name == detector_name)
            .map(|(_, result)| result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EPS: f64 = 1.0e-12;

    const SAMPLE_REPORT: &str = "\
 Some FLUKA-like preamble
 # Detector n:  1 kp (integrated over solid angle)
 # E_min E_max dN/dE err(%)
   0.0  2.0  10.0  10.0

 # Detector n:  2 km (integrated over solid angle)
 # E_min E_max dN/dE err(%)
   0.0  1.0  4.0  50.0
   1.0  2.0  2.0  100.0

 # Detector n:  10 pip (integrated over solid angle)
 # E_min E_max dN/dE err(%)
   0.0  1.0  1.0
";

    #[test]
    fn test_simulation_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_REPORT.as_bytes()).unwrap();
        let sim = SimulationRecord::load("440GeV", file.path()).unwrap();

        assert_eq!(sim.label(), "440GeV");
        assert_eq!(sim.path(), file.path());
        assert_eq!(sim.yields().len(), sim.detectors().len());
        assert_eq!(sim.yields().len(), 3);

        let kp = sim.get_yield("kp").unwrap();
        assert!((kp.value - 20.0).abs() < EPS);
        assert!((kp.abs_error - 2.0).abs() < EPS);

        let km = sim.get_yield("km").unwrap();
        assert!((km.value - 6.0).abs() < EPS);
        assert!((km.abs_error - 8.0_f64.sqrt()).abs() < EPS);

        // Only short rows
        assert_eq!(*sim.get_yield("pip").unwrap(), YieldResult::new(0.0, 0.0));
        assert!(sim.get_yield("pim").is_none());
    }

    #[test]
    fn test_keys_match_index() {
        let report = Report::from_text(Path::new("mem.lis"), SAMPLE_REPORT);
        let index = DetectorIndex::from_report(&report).unwrap();
        let sim = SimulationRecord::from_report("mem", &report).unwrap();
        let sim_names: Vec<&str> = sim.yields().iter().map(|(n, _)| n.as_str()).collect();
        let index_names: Vec<&str> = index.names().collect();
        assert_eq!(sim_names, index_names);
    }

    #[test]
    fn test_malformed_row_fails_record() {
        let text = format!("{SAMPLE_REPORT}\n # Detector n:  3 pim (x)\n header\n abc 1 2 3\n");
        let report = Report::from_text(Path::new("bad.lis"), &text);
        assert!(matches!(
            SimulationRecord::from_report("bad", &report),
            Err(ReportError::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SimulationRecord::load("nope", &dir.path().join("nope.lis"));
        assert!(matches!(result, Err(ReportError::SourceUnavailable { .. })));
    }
}
