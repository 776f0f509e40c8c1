use clap::{Arg, Command};
use indicatif::{ProgressBar, ProgressStyle};
use spdlog::sink::{Sink, StdStreamSink};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use libkaon_yield::config::Config;
use libkaon_yield::simulation::SimulationRecord;
use libkaon_yield::sweep::{process, SweepResult};
use libkaon_yield::worker_status::WorkerStatus;

/// Terminal output level while no progress bar is drawing
const TERMINAL_LEVEL: spdlog::LevelFilter =
    spdlog::LevelFilter::MoreSevereEqual(spdlog::Level::Info);
/// Terminal output level while the progress bar is drawing. Worker info and warning
/// lines still reach the log file.
const TERMINAL_LEVEL_PROGRESS: spdlog::LevelFilter =
    spdlog::LevelFilter::MoreSevereEqual(spdlog::Level::Error);

const PROGRESS_TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} {msg}";

/// Install the terminal and file sinks. Returns the terminal sink so its level can be
/// raised while the progress bar is active.
fn init_logging() -> Arc<StdStreamSink> {
    let formatter = Box::new(spdlog::formatter::PatternFormatter::new(
        spdlog::formatter::pattern!(
            "[{date_short} {time_short}] - [thread: {tid}] - [{^{level}}] - {payload}{eol}"
        ),
    ));
    let stdout_sink = Arc::new(
        StdStreamSink::builder()
            .std_stream(spdlog::sink::StdStream::Stdout)
            .level_filter(TERMINAL_LEVEL)
            .build()
            .expect("Could not create terminal logging!"),
    );
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from("./kaon_yield_cli.log"))
            .formatter(formatter)
            .truncate(true)
            .build()
            .expect("Could not create log file!"),
    );
    let logger = Arc::new(
        spdlog::Logger::builder()
            .level_filter(spdlog::LevelFilter::All)
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(stdout_sink.clone())
            .sink(file_sink)
            .build()
            .expect("Could not create logger!"),
    );
    spdlog::set_default_logger(logger);
    stdout_sink
}

fn make_template_config(path: &Path) {
    match Config::default().write_config_file(path) {
        Ok(()) => spdlog::info!("Done."),
        Err(e) => spdlog::error!("Could not write template config: {e}"),
    }
}

fn print_record(record: &SimulationRecord) {
    println!("{} ({})", record.label(), record.path().display());
    println!("{:<12} {:>8} {:>14} {:>14}", "detector", "number", "yield", "abs_error");
    for (name, result) in record.yields() {
        println!(
            "{:<12} {:>8} {:>14.6e} {:>14.6e}",
            name,
            record.detectors().get(name).unwrap_or_default(),
            result.value,
            result.abs_error
        );
    }
}

fn print_sweep(config: &Config, sweep: &SweepResult) {
    for series in sweep.series(config) {
        println!("{} [N/pr/GeV]", series.label);
        for point in series.points.iter() {
            println!(
                "  {:>8} GeV {:>14.6e} +/- {:>12.4e}",
                point.energy, point.yield_per_energy, point.abs_error_per_energy
            );
        }
    }
}

fn main() {
    // Create a cli
    let matches = Command::new("kaon_yield_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(
            Command::new("report")
                .about("Print the detector yields of a single report")
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .required(true)
                        .help("Path to the report"),
                ),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the config file"),
        )
        .get_matches();

    let terminal_sink = init_logging();

    if let Some(("report", sub)) = matches.subcommand() {
        let Some(file) = sub.get_one::<String>("file") else {
            spdlog::error!("A report file is required");
            return;
        };
        let path = PathBuf::from(file);
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match SimulationRecord::load(&label, &path) {
            Ok(record) => print_record(&record),
            Err(e) => spdlog::error!("{e}"),
        }
        return;
    }

    // Parse the cli
    let Some(config_path) = matches.get_one::<String>("path").map(PathBuf::from) else {
        spdlog::error!("A config path is required (-p/--path)");
        return;
    };

    if let Some(("new", _)) = matches.subcommand() {
        spdlog::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        return;
    }

    // Load our config
    spdlog::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            spdlog::error!("{e}");
            return;
        }
    };
    spdlog::info!("Config successfully loaded.");
    spdlog::info!("Runs Path: {}", config.runs_path.to_string_lossy());
    spdlog::info!("File Pattern: {}", config.file_pattern);
    spdlog::info!("Energies: {:?}", config.energies);
    spdlog::info!("Output Path: {}", config.output_path.to_string_lossy());
    spdlog::info!("Number of Workers: {}", config.n_threads);

    // Setup the progress bar
    let pb = ProgressBar::new(config.energies.len() as u64).with_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    terminal_sink.set_level_filter(TERMINAL_LEVEL_PROGRESS);
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let sweep_config = config.clone();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(sweep_config, tx));

    // Ends once every worker has dropped its sender
    for status in rx.iter() {
        pb.inc(1);
        pb.set_message(status.run_label);
    }
    pb.finish();
    terminal_sink.set_level_filter(TERMINAL_LEVEL);

    let sweep = match handle.join() {
        Ok(Ok(sweep)) => sweep,
        Ok(Err(e)) => {
            spdlog::error!("Sweep failed with error: {e}");
            return;
        }
        Err(_) => {
            spdlog::error!("Failed to join sweep task!");
            return;
        }
    };

    if sweep.is_empty() {
        spdlog::warn!("No reports were found, nothing to write.");
        return;
    }

    if let Err(e) = sweep.write_yaml(&config.output_path) {
        spdlog::error!("{e}");
        return;
    }
    print_sweep(&config, &sweep);

    spdlog::info!("Done.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_template() {
        assert!(ProgressStyle::with_template(PROGRESS_TEMPLATE).is_ok());
        assert!(PROGRESS_TEMPLATE.contains("{msg}"));
    }

    #[test]
    fn test_terminal_quiet_during_progress() {
        assert!(TERMINAL_LEVEL.test(spdlog::Level::Info));
        assert!(!TERMINAL_LEVEL_PROGRESS.test(spdlog::Level::Info));
        assert!(!TERMINAL_LEVEL_PROGRESS.test(spdlog::Level::Warn));
        assert!(TERMINAL_LEVEL_PROGRESS.test(spdlog::Level::Error));
    }
}
