use std::path::Path;
use std::sync::mpsc;
use std::thread::JoinHandle;

use eframe::egui::{Color32, DragValue, ProgressBar, RichText};
use rfd::FileDialog;

use libkaon_yield::config::Config;
use libkaon_yield::error::SweepError;
use libkaon_yield::series::YieldSeries;
use libkaon_yield::sweep::{create_subsets, process_subset, SweepPoint, SweepResult};
use libkaon_yield::worker_status::WorkerStatus;

use super::plot::yield_plot;

fn render_error_dialog(show: &mut bool, ctx: &eframe::egui::Context) {
    eframe::egui::Window::new("Error")
        .open(show)
        .show(ctx, |ui| {
            ui.label("There was an error! Check the log file kaon_yield.log for more information.")
        });
}

/// The UI app which inherits the eframe::App trait.
///
/// The parent for all processing.
#[derive(Debug)]
pub struct YieldApp {
    config: Config,
    energies_text: String,
    workers: Vec<JoinHandle<Result<Vec<SweepPoint>, SweepError>>>,
    worker_statuses: Vec<WorkerStatus>,
    collected: Vec<SweepPoint>,
    sweep: Option<SweepResult>,
    series: Vec<YieldSeries>,
    show_error_window: bool,
    worker_rx: mpsc::Receiver<WorkerStatus>,
    worker_tx: mpsc::Sender<WorkerStatus>,
}

impl YieldApp {
    /// Create the application
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut visuals = eframe::egui::Visuals::dark();
        visuals.override_text_color = Some(Color32::LIGHT_GRAY);
        cc.egui_ctx.set_visuals(visuals);
        let (tx, rx) = mpsc::channel::<WorkerStatus>();
        let config = Config::default();
        YieldApp {
            energies_text: config.energies_to_string(),
            config,
            workers: vec![],
            worker_statuses: vec![],
            collected: vec![],
            sweep: None,
            series: vec![],
            show_error_window: false,
            worker_rx: rx,
            worker_tx: tx,
        }
    }

    /// Start some workers
    fn start_workers(&mut self) {
        if !self.workers.is_empty() {
            return;
        }
        if let Err(e) = self.config.set_energies_from_str(&self.energies_text) {
            self.show_error_window = true;
            spdlog::error!("{e}");
            return;
        }
        self.worker_statuses.clear();
        self.collected.clear();
        self.sweep = None;
        self.series.clear();
        let subsets = create_subsets(&self.config);
        for (idx, subset) in subsets.into_iter().enumerate() {
            // Dont make empty workers
            if subset.is_empty() {
                continue;
            }
            // Spawn it
            let conf = self.config.clone();
            let tx = self.worker_tx.clone();
            self.worker_statuses.push(WorkerStatus::new(0.0, "", idx));
            self.workers.push(std::thread::spawn(move || {
                process_subset(conf, tx, idx, subset)
            }))
        }
    }

    /// Join the workers and gather their results
    fn stop_workers(&mut self) {
        let n_workers = self.workers.len();
        let mut failed = false;
        for _ in 0..n_workers {
            if let Some(worker) = self.workers.pop() {
                match worker.join() {
                    Ok(res) => match res {
                        Ok(points) => {
                            spdlog::info!("Worker complete");
                            self.collected.extend(points);
                        }
                        Err(e) => {
                            failed = true;
                            spdlog::error!("Sweep error: {e}")
                        }
                    },
                    Err(_) => {
                        failed = true;
                        spdlog::error!("An error occured joining one of the workers!")
                    }
                }
            }
        }
        // A failed worker fails the sweep
        if failed {
            self.show_error_window = true;
            self.collected.clear();
        } else if n_workers > 0 {
            let sweep = SweepResult::from_points(std::mem::take(&mut self.collected));
            self.series = sweep.series(&self.config);
            self.sweep = Some(sweep);
        }
    }

    /// Check if there are any workers still doing stuff
    fn are_any_workers_alive(&self) -> bool {
        self.workers.iter().any(|worker| !worker.is_finished())
    }

    fn poll_messages(&mut self) {
        // Check messages
        loop {
            match self.worker_rx.try_recv() {
                Ok(status) => {
                    if let Some(slot) = self
                        .worker_statuses
                        .iter_mut()
                        .find(|s| s.worker_id == status.worker_id)
                    {
                        *slot = status;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    spdlog::error!("Channels became disconnected!");
                    self.show_error_window = true;
                    break;
                }
            }
        }
    }

    /// Write the current Config to a file
    fn write_config(&mut self, path: &Path) {
        // Never save stale energies over what the user typed
        if let Err(e) = self.config.set_energies_from_str(&self.energies_text) {
            self.show_error_window = true;
            spdlog::error!("Config not written to {}: {e}", path.display());
            return;
        }
        if let Err(e) = self.config.write_config_file(path) {
            self.show_error_window = true;
            spdlog::error!("Error writing config to file {}: {}", path.display(), e);
        }
    }

    /// Read the Config from a file
    fn read_config(&mut self, path: &Path) {
        match Config::read_config_file(path) {
            Ok(conf) => {
                self.energies_text = conf.energies_to_string();
                self.config = conf;
            }
            Err(e) => spdlog::error!("{}", e),
        }
    }

    /// Write the yields of the last sweep to the configured output file
    fn export_yields(&mut self) {
        if let Some(sweep) = &self.sweep {
            if let Err(e) = sweep.write_yaml(&self.config.output_path) {
                self.show_error_window = true;
                spdlog::error!("{e}");
            }
        }
    }
}

impl eframe::App for YieldApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        render_error_dialog(&mut self.show_error_window, ctx);
        eframe::egui::TopBottomPanel::top("ConfigPanel").show(ctx, |ui| {
            //Menus
            ui.menu_button("File", |ui| {
                if ui.button("Open...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("YAML file", &["yaml", "yml"])
                        .pick_file()
                    {
                        self.read_config(&path);
                    }
                }
                if ui.button("Save...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("YAML file", &["yaml", "yml"])
                        .save_file()
                    {
                        self.write_config(&path);
                    }
                }
                if ui
                    .add_enabled(
                        self.sweep.is_some(),
                        eframe::egui::Button::new("Export Yields"),
                    )
                    .clicked()
                {
                    self.export_yields();
                }
            });

            //Config
            ui.separator();
            ui.label(
                RichText::new("Configuration")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            eframe::egui::Grid::new("ConfigGrid").show(ui, |ui| {
                ui.label(format!(
                    "Runs directory: {}",
                    self.config.runs_path.display()
                ));
                if ui.button("Open...").clicked() {
                    if let Some(path) = FileDialog::new().pick_folder() {
                        self.config.runs_path = path;
                    }
                }
                ui.end_row();

                ui.label("File pattern:");
                ui.text_edit_singleline(&mut self.config.file_pattern);
                ui.end_row();

                ui.label("Energies (GeV):");
                ui.text_edit_singleline(&mut self.energies_text);
                ui.end_row();

                ui.label(format!(
                    "Output file: {}",
                    self.config.output_path.display()
                ));
                if ui.button("Open...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("YAML file", &["yaml", "yml"])
                        .save_file()
                    {
                        self.config.output_path = path;
                    }
                }
                ui.end_row();

                ui.label("Number of Workers");
                ui.add(
                    DragValue::new(&mut self.config.n_threads)
                        .speed(1)
                        .range(std::ops::RangeInclusive::new(1, 10)),
                );
                ui.end_row();
            });

            //Controls
            // You can only click run if there isn't already someone working
            if ui
                .add_enabled(self.workers.is_empty(), eframe::egui::Button::new("Run"))
                .clicked()
            {
                spdlog::info!("Starting sweep...");
                self.start_workers();
            } else if !self.workers.is_empty() && !self.are_any_workers_alive() {
                self.stop_workers();
            }

            //Progress Bars
            ui.separator();
            ui.label(
                RichText::new("Progress Per Worker")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            for status in self.worker_statuses.iter() {
                ui.add(
                    ProgressBar::new(status.progress)
                        .text(format!(
                            "Worker {} : run {} - {}%",
                            status.worker_id,
                            status.run_label,
                            (status.progress * 100.0) as i32
                        ))
                        .fill(Color32::BLUE),
                );
            }
        });

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(
                RichText::new("Kaon and Pion Yields per Proton per GeV")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            yield_plot(ui, &self.series);
        });

        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }
}
