use super::config::Config;
use super::sweep::SweepPoint;

/// One point of a yield-per-energy curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub energy: f64,
    pub yield_per_energy: f64,
    pub abs_error_per_energy: f64,
}

/// The yield-per-energy curve of a single detector across an energy sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldSeries {
    pub name: String,
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

impl YieldSeries {
    /// Build one series per detector name seen in the sweep, in first-seen order.
    ///
    /// A detector missing from one of the reports simply has no point at that energy.
    /// Points are ordered by energy.
    pub fn from_sweep(config: &Config, sweep_points: &[SweepPoint]) -> Vec<Self> {
        let mut series: Vec<Self> = Vec::new();
        for sweep_point in sweep_points {
            for (name, _) in sweep_point.record.yields() {
                if !series.iter().any(|s| &s.name == name) {
                    series.push(Self {
                        name: name.clone(),
                        label: config.get_detector_label(name).to_string(),
                        points: Vec::new(),
                    });
                }
            }
        }

        for s in series.iter_mut() {
            for sweep_point in sweep_points {
                match sweep_point.record.get_yield(&s.name) {
                    Some(result) => {
                        let scaled = result.per_unit_energy(sweep_point.energy);
                        s.points.push(SeriesPoint {
                            energy: sweep_point.energy,
                            yield_per_energy: scaled.value,
                            abs_error_per_energy: scaled.abs_error,
                        });
                    }
                    None => spdlog::warn!(
                        "Detector {} is missing from {}; no point at {} GeV",
                        s.name,
                        sweep_point.record.label(),
                        sweep_point.energy
                    ),
                }
            }
            s.points.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        }

        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::simulation::SimulationRecord;
    use std::path::Path;

    const EPS: f64 = 1.0e-12;

    fn sweep_point(energy: f64, text: &str) -> SweepPoint {
        let report = Report::from_text(Path::new("mem.lis"), text);
        SweepPoint {
            energy,
            record: SimulationRecord::from_report(&format!("{energy}GeV"), &report).unwrap(),
        }
    }

    #[test]
    fn test_series_from_sweep() {
        let points = vec![
            sweep_point(20.0, "# Detector n: 1 kp (x)\nh\n0 2 10 10\n"),
            sweep_point(
                10.0,
                "# Detector n: 1 kp (x)\nh\n0 1 5 0\n\n# Detector n: 2 zz (x)\nh\n0 1 1 0\n",
            ),
        ];
        let series = YieldSeries::from_sweep(&Config::default(), &points);
        assert_eq!(series.len(), 2);

        let kp = &series[0];
        assert_eq!(kp.name, "kp");
        assert_eq!(kp.label, "K+");
        assert_eq!(kp.points.len(), 2);
        assert!((kp.points[0].energy - 10.0).abs() < EPS);
        assert!((kp.points[0].yield_per_energy - 0.5).abs() < EPS);
        assert!((kp.points[1].yield_per_energy - 1.0).abs() < EPS);
        assert!((kp.points[1].abs_error_per_energy - 0.1).abs() < EPS);

        let zz = &series[1];
        assert_eq!(zz.label, "zz");
        assert_eq!(zz.points.len(), 1);
    }
}
