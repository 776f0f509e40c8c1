use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::Sender;

use super::config::Config;
use super::error::SweepError;
use super::series::YieldSeries;
use super::simulation::SimulationRecord;
use super::worker_status::WorkerStatus;
use super::yields::YieldResult;

/// A simulation record tagged with the beam energy of its run
#[derive(Debug, Clone)]
pub struct SweepPoint {
    pub energy: f64,
    pub record: SimulationRecord,
}

/// All runs of an energy sweep, ordered by energy.
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    points: Vec<SweepPoint>,
}

#[derive(Debug, Serialize)]
struct ExportYield<'a> {
    detector: &'a str,
    number: Option<u32>,
    #[serde(flatten)]
    result: &'a YieldResult,
}

#[derive(Debug, Serialize)]
struct ExportRun<'a> {
    label: &'a str,
    energy: f64,
    path: &'a Path,
    yields: Vec<ExportYield<'a>>,
}

impl SweepResult {
    pub fn from_points(mut points: Vec<SweepPoint>) -> Self {
        points.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        Self { points }
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Yield-per-energy curves, one per detector
    pub fn series(&self, config: &Config) -> Vec<YieldSeries> {
        YieldSeries::from_sweep(config, &self.points)
    }

    /// Serialize every run and detector yield to YAML
    pub fn to_yaml(&self) -> Result<String, SweepError> {
        let runs: Vec<ExportRun> = self
            .points
            .iter()
            .map(|point| ExportRun {
                label: point.record.label(),
                energy: point.energy,
                path: point.record.path(),
                yields: point
                    .record
                    .yields()
                    .iter()
                    .map(|(name, result)| ExportYield {
                        detector: name,
                        number: point.record.detectors().get(name),
                        result,
                    })
                    .collect(),
            })
            .collect();
        Ok(serde_yaml::to_string(&runs)?)
    }

    pub fn write_yaml(&self, path: &Path) -> Result<(), SweepError> {
        std::fs::write(path, self.to_yaml()?)?;
        spdlog::info!("Wrote {} runs to {}", self.points.len(), path.display());
        Ok(())
    }
}

/// Process a subset of energies
///
/// Energies whose report does not exist are skipped. Any report that fails to parse
/// fails the whole subset.
pub fn process_subset(
    config: Config,
    tx: Sender<WorkerStatus>,
    worker_id: usize,
    subset: Vec<f64>,
) -> Result<Vec<SweepPoint>, SweepError> {
    let mut points = Vec::with_capacity(subset.len());
    let n_runs = subset.len();
    for (idx, energy) in subset.into_iter().enumerate() {
        let label = config.get_run_label(energy);
        if config.does_report_exist(energy) {
            spdlog::info!("Processing run {label}...");
            let record = SimulationRecord::load(&label, &config.get_report_path(energy))?;
            points.push(SweepPoint { energy, record });
            spdlog::info!("Finished processing run {label}.");
        } else {
            spdlog::warn!(
                "Report {} does not exist, skipping...",
                config.get_report_path(energy).display()
            );
        }
        tx.send(WorkerStatus::new(
            (idx + 1) as f32 / n_runs as f32,
            &label,
            worker_id,
        ))?;
    }
    Ok(points)
}

/// Divide the energies in to a set of subsets (per thread/worker)
pub fn create_subsets(config: &Config) -> Vec<Vec<f64>> {
    let n_subsets = config.n_threads.max(1) as usize;
    let mut subsets: Vec<Vec<f64>> = vec![Vec::new(); n_subsets];

    for (idx, energy) in config.energies.iter().enumerate() {
        subsets[idx % n_subsets].push(*energy)
    }

    subsets
}

/// Run the full sweep, one thread per non-empty subset, and gather the results.
///
/// Reports share no state, so workers need no coordination beyond the join. The
/// first worker error fails the sweep.
pub fn process(config: Config, tx: Sender<WorkerStatus>) -> Result<SweepResult, SweepError> {
    if !config.is_n_threads_valid() {
        return Err(SweepError::InvalidThreads(config.n_threads));
    }

    let mut workers = Vec::new();
    for (idx, subset) in create_subsets(&config).into_iter().enumerate() {
        // Dont make empty workers
        if subset.is_empty() {
            continue;
        }
        let conf = config.clone();
        let tx = tx.clone();
        workers.push((
            idx,
            std::thread::spawn(move || process_subset(conf, tx, idx, subset)),
        ));
    }
    drop(tx);

    // Every worker is joined before an error is returned
    let mut points = Vec::new();
    let mut first_error: Option<SweepError> = None;
    for (idx, worker) in workers {
        let result = match worker.join() {
            Ok(result) => result,
            Err(_) => Err(SweepError::WorkerPanic(idx)),
        };
        match result {
            Ok(worker_points) => points.extend(worker_points),
            Err(e) => {
                spdlog::error!("Worker {idx} failed: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(SweepResult::from_points(points)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    const EPS: f64 = 1.0e-12;

    fn write_report(dir: &Path, energy: f64, counts: f64) {
        let text = format!(
            " # Detector n:  1 kp (integrated over solid angle)\n\
             \x20# E_min E_max dN/dE err(%)\n\
             \x20 0.0 1.0 {counts} 10.0\n\
             \n\
             \x20# Detector n:  2 pim (integrated over solid angle)\n\
             \x20# E_min E_max dN/dE err(%)\n\
             \x20 0.0 2.0 1.0 0.0\n"
        );
        std::fs::write(dir.join(format!("{energy}_21_tab.lis")), text).unwrap();
    }

    fn test_config(dir: &Path, n_threads: i32) -> Config {
        Config {
            runs_path: dir.to_path_buf(),
            energies: vec![50.0, 10.0, 20.0, 30.0],
            n_threads,
            ..Config::default()
        }
    }

    #[test]
    fn test_create_subsets() {
        let config = Config {
            energies: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            n_threads: 2,
            ..Config::default()
        };
        let subsets = create_subsets(&config);
        assert_eq!(subsets, vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn test_sweep() {
        let dir = tempfile::tempdir().unwrap();
        for energy in [10.0, 20.0, 50.0] {
            write_report(dir.path(), energy, energy * 2.0);
        }
        let config = test_config(dir.path(), 3);
        let (tx, rx) = mpsc::channel();
        let result = process(config.clone(), tx).unwrap();

        // 30 GeV is missing and skipped
        let energies: Vec<f64> = result.points().iter().map(|p| p.energy).collect();
        assert_eq!(energies, vec![10.0, 20.0, 50.0]);
        assert_eq!(rx.iter().count(), 4);

        let series = result.series(&config);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "K+");
        for point in series[0].points.iter() {
            assert!((point.yield_per_energy - 2.0).abs() < EPS);
        }

        let yaml = result.to_yaml().unwrap();
        assert!(yaml.contains("label: 10GeV"));
        assert!(yaml.contains("detector: pim"));
        assert!(yaml.contains("yield: 20"));

        let out = dir.path().join("yields.yml");
        result.write_yaml(&out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_sweep_fails_on_bad_report() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), 10.0, 1.0);
        std::fs::write(
            dir.path().join("20_21_tab.lis"),
            "# Detector n: 1 kp (x)\nheader\n1.0 two 3 4\n",
        )
        .unwrap();
        let config = test_config(dir.path(), 1);
        let (tx, _rx) = mpsc::channel();
        assert!(matches!(
            process(config, tx),
            Err(SweepError::ReportError(_))
        ));
    }

    #[test]
    fn test_failed_sweep_joins_all_workers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("20_21_tab.lis"),
            "# Detector n: 1 kp (x)\nheader\n1.0 two 3 4\n",
        )
        .unwrap();
        write_report(dir.path(), 10.0, 1.0);
        write_report(dir.path(), 50.0, 1.0);
        let config = Config {
            runs_path: dir.path().to_path_buf(),
            energies: vec![20.0, 10.0, 50.0],
            n_threads: 3,
            ..Config::default()
        };
        let (tx, rx) = mpsc::channel();
        assert!(matches!(
            process(config, tx),
            Err(SweepError::ReportError(_))
        ));

        // Both healthy workers reported, and no worker still holds a sender
        assert_eq!(rx.try_iter().count(), 2);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_invalid_threads() {
        let config = Config {
            n_threads: 0,
            ..Config::default()
        };
        let (tx, _rx) = mpsc::channel();
        assert!(matches!(
            process(config, tx),
            Err(SweepError::InvalidThreads(0))
        ));
    }
}
