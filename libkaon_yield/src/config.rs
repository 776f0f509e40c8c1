use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Placeholder in `file_pattern` replaced by the beam energy
pub const ENERGY_PLACEHOLDER: &str = "{energy}";

/// Structure representing the sweep configuration. Contains pathing and energy information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub runs_path: PathBuf,
    pub file_pattern: String,
    pub energies: Vec<f64>,
    pub output_path: PathBuf,
    pub detector_labels: BTreeMap<String, String>,
    pub n_threads: i32,
}

impl Default for Config {
    /// The standard kaon/pion energy loop
    fn default() -> Self {
        let detector_labels = [("kp", "K+"), ("km", "K-"), ("pip", "pi+"), ("pim", "pi-")]
            .into_iter()
            .map(|(name, label)| (name.to_string(), label.to_string()))
            .collect();
        Self {
            runs_path: PathBuf::from("../runs_loop_energy"),
            file_pattern: format!("{ENERGY_PLACEHOLDER}_21_tab.lis"),
            energies: vec![10.0, 20.0, 50.0, 100.0, 200.0],
            output_path: PathBuf::from("yields.yml"),
            detector_labels,
            n_threads: 1,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file, replacing any existing file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Replace the energies with a comma separated list, i.e. "10, 20, 50"
    ///
    /// On a parse error the current energies are kept.
    pub fn set_energies_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let energies = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<f64>)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|source| ConfigError::BadEnergies {
                text: text.to_string(),
                source,
            })?;
        self.energies = energies;
        Ok(())
    }

    /// Comma separated list of the energies, the inverse of set_energies_from_str
    pub fn energies_to_string(&self) -> String {
        self.energies
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Get the path to the report for a given beam energy
    pub fn get_report_path(&self, energy: f64) -> PathBuf {
        self.runs_path.join(
            self.file_pattern
                .replace(ENERGY_PLACEHOLDER, &energy.to_string()),
        )
    }

    /// Label of a run, i.e. 10GeV
    pub fn get_run_label(&self, energy: f64) -> String {
        format!("{energy}GeV")
    }

    pub fn does_report_exist(&self, energy: f64) -> bool {
        self.get_report_path(energy).exists()
    }

    /// Display label for a detector, falling back to the detector name
    pub fn get_detector_label<'a>(&'a self, detector_name: &'a str) -> &'a str {
        self.detector_labels
            .get(detector_name)
            .map(String::as_str)
            .unwrap_or(detector_name)
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path() {
        let config = Config::default();
        assert_eq!(
            config.get_report_path(10.0),
            PathBuf::from("../runs_loop_energy/10_21_tab.lis")
        );
        assert_eq!(
            config.get_report_path(12.5),
            PathBuf::from("../runs_loop_energy/12.5_21_tab.lis")
        );
        assert_eq!(config.get_run_label(200.0), "200GeV");
    }

    #[test]
    fn test_detector_label() {
        let config = Config::default();
        assert_eq!(config.get_detector_label("kp"), "K+");
        assert_eq!(config.get_detector_label("neutron"), "neutron");
    }

    #[test]
    fn test_energies_from_str() {
        let mut config = Config::default();
        config.set_energies_from_str(" 10, 12.5,200 ,").unwrap();
        assert_eq!(config.energies, vec![10.0, 12.5, 200.0]);
        assert_eq!(config.energies_to_string(), "10, 12.5, 200");

        match config.set_energies_from_str("10, 2o") {
            Err(ConfigError::BadEnergies { text, .. }) => assert_eq!(text, "10, 2o"),
            other => panic!("Expected BadEnergies, got {other:?}"),
        }
        assert_eq!(config.energies, vec![10.0, 12.5, 200.0]);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert!(matches!(
            Config::read_config_file(&path),
            Err(ConfigError::BadFilePath(_))
        ));

        let mut config = Config::default();
        config.n_threads = 3;
        config.energies = vec![1.0, 2.0];
        config.write_config_file(&path).unwrap();
        let read = Config::read_config_file(&path).unwrap();
        assert_eq!(read.n_threads, 3);
        assert_eq!(read.energies, vec![1.0, 2.0]);
        assert_eq!(read.file_pattern, config.file_pattern);
        assert!(read.is_n_threads_valid());
    }
}
