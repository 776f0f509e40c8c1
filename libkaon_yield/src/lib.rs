//! # kaon_yield
//!
//! kaon_yield extracts particle yields from the tabulated detector output of a
//! simulation run (`*_tab.lis` reports) and compares them across a sweep of beam
//! energies. For every detector in a report the energy spectrum is integrated into a
//! single yield with a propagated uncertainty.
//!
//! ## Building & Install
//!
//! To build and install the GUI use `cargo install --path ./kaon_yield` from the top
//! level repository.
//!
//! To build and install the CLI use `cargo install --path ./kaon_yield_cli` from the top
//! level repository.
//!
//! ## Report Format
//!
//! Reports are plain text. Each detector is declared on a line containing the marker
//! `Detector n:` followed by the detector number, with the detector name as the fifth
//! whitespace separated token. Exactly one header line follows, then the energy bins up
//! to the next blank line or the end of the file:
//!
//! ```text
//!  # Detector n:  1 kp (integrated over solid angle)
//!  # E_min E_max dN/dE err(%)
//!    0.000E+00  1.000E+00  4.000E+00  5.000E+01
//!    1.000E+00  2.000E+00  2.000E+00  1.000E+02
//!
//! ```
//!
//! The four columns are the lower and upper bin edge, the counts, and the relative error
//! of the counts in percent. Any further columns are ignored, and rows with fewer than
//! four columns are skipped.
//!
//! ## Yield
//!
//! The yield of a detector is the bin-width weighted sum of the counts,
//! `sum(counts * (E_max - E_min))`. The absolute error of every bin is
//! `err% / 100 * counts`, and the bin errors (also weighted by the bin width) are added
//! in quadrature.
//!
//! ## Configuration
//!
//! An energy sweep is described by a YAML file. The GUI can save and open these, and the
//! CLI can write a template with `kaon_yield_cli -p config.yml new`:
//!
//! ```yml
//! runs_path: ../runs_loop_energy
//! file_pattern: '{energy}_21_tab.lis'
//! energies: [10.0, 20.0, 50.0, 100.0, 200.0]
//! output_path: yields.yml
//! detector_labels:
//!   km: K-
//!   kp: K+
//!   pim: pi-
//!   pip: pi+
//! n_threads: 1
//! ```
//!
//! `{energy}` in the file pattern is replaced by each beam energy to locate the report
//! of that run. Energies whose report does not exist are skipped.
//!
//! ## Output
//!
//! The CLI writes every run and detector yield to `output_path` as YAML, and both
//! applications write a log file. The GUI plots the yield per GeV of every detector
//! against the beam energy on log-log axes.
pub mod config;
pub mod detector_index;
pub mod detector_table;
pub mod error;
pub mod report;
pub mod series;
pub mod simulation;
pub mod sweep;
pub mod worker_status;
pub mod yields;
