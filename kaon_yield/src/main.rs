//! # kaon_yield
//!
//! Part of the kaon_yield crate family.
//!
//! This is the application to run energy sweeps with a GUI using [egui](https://github.com/emilk/egui).
//!
//! ## Install
//!
//! Use `cargo install --path ./kaon_yield`
//!
//! ## Use
//!
//! To launch the application simply invoke it after it is installed
//!
//! ```bash
//! kaon_yield
//! ```
//!
//! Fill out the configuration fields and click the run button to integrate the reports.
//! Once every worker is done the yield per GeV of each detector is plotted against the
//! beam energy.
//!
//! ## Configuration
//!
//! The following configuration controls are available in the GUI:
//!
//! - Runs directory: Specifies the full-path to the directory containing the reports of the sweep
//! - File pattern: Name of a report, where `{energy}` is replaced by the beam energy (i.e. `{energy}_21_tab.lis`)
//! - Energies: Comma separated list of beam energies in GeV
//! - Output file: Path of the YAML file written by File->Export Yields
//! - Number of Workers: The number of parallel worker threads to divide the energies amongst
//!
//! Configurations can be saved using File->Save and loaded using File->Open

mod app;
mod plot;
use app::YieldApp;
use std::path::PathBuf;
use std::sync::Arc;

/// The program entry point
fn main() {
    // Setup logging to a file
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from("./kaon_yield.log"))
            .formatter(Box::new(spdlog::formatter::PatternFormatter::new(
                spdlog::formatter::pattern!(
                    "[{date_short} {time_short}] - [thread: {tid}] - [{^{level}}] - {payload}{eol}"
                ),
            )))
            .truncate(true)
            .build()
            .expect("Could not create log file!"),
    );
    let logger = Arc::new(
        spdlog::Logger::builder()
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(file_sink)
            .build()
            .expect("Could not create logger!"),
    );
    spdlog::set_default_logger(logger);
    spdlog::info!("Starting Kaon Yield UI");

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Kaon Yield")
            .with_inner_size(eframe::epaint::vec2(900.0, 700.0))
            .with_min_inner_size(eframe::epaint::vec2(600.0, 400.0)),
        ..Default::default()
    };
    match eframe::run_native(
        "kaon_yield",
        native_options,
        Box::new(|cc| Ok(Box::new(YieldApp::new(cc)))),
    ) {
        Ok(()) => (),
        Err(e) => spdlog::error!("Eframe error: {}", e),
    }
}
