use serde::{Deserialize, Serialize};

use super::detector_table::DetectorTable;

/// Integrated yield of one detector and its absolute error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YieldResult {
    #[serde(rename = "yield")]
    pub value: f64,
    pub abs_error: f64,
}

impl YieldResult {
    pub fn new(value: f64, abs_error: f64) -> Self {
        Self { value, abs_error }
    }

    /// Integrate a table: bin-width weighted counts, errors combined in quadrature.
    ///
    /// Rows are summed in table order. An empty table integrates to zero.
    pub fn from_table(table: &DetectorTable) -> Self {
        let mut value: f64 = 0.0;
        let mut error_sq: f64 = 0.0;
        for row in table.iter() {
            let width = row.width();
            value += row.counts * width;
            error_sq += (row.abs_error * width).powi(2);
        }
        Self {
            value,
            abs_error: error_sq.sqrt(),
        }
    }

    /// Scale to yield per unit beam energy
    pub fn per_unit_energy(&self, energy: f64) -> Self {
        Self {
            value: self.value / energy,
            abs_error: self.abs_error / energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector_table::EnergyBinRow;

    const EPS: f64 = 1.0e-12;

    fn row(e_min: f64, e_max: f64, counts: f64, rel_percent: f64) -> EnergyBinRow {
        EnergyBinRow {
            e_min,
            e_max,
            counts,
            abs_error: rel_percent / 100.0 * counts,
        }
    }

    #[test]
    fn test_single_row() {
        let table = DetectorTable::from(vec![row(0.0, 2.0, 10.0, 10.0)]);
        let result = YieldResult::from_table(&table);
        assert!((result.value - 20.0).abs() < EPS);
        assert!((result.abs_error - 2.0).abs() < EPS);
    }

    #[test]
    fn test_two_rows() {
        let table = DetectorTable::from(vec![row(0.0, 1.0, 4.0, 50.0), row(1.0, 2.0, 2.0, 100.0)]);
        let result = YieldResult::from_table(&table);
        assert!((result.value - 6.0).abs() < EPS);
        assert!((result.abs_error - 8.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_empty_table() {
        let result = YieldResult::from_table(&DetectorTable::default());
        assert_eq!(result, YieldResult::new(0.0, 0.0));
    }

    #[test]
    fn test_per_unit_energy() {
        let result = YieldResult::new(20.0, 2.0).per_unit_energy(10.0);
        assert!((result.value - 2.0).abs() < EPS);
        assert!((result.abs_error - 0.2).abs() < EPS);
    }
}
