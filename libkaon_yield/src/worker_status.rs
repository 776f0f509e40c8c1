/// Progress message sent from a sweep worker to whoever is watching (CLI or UI).
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub run_label: String,
    pub worker_id: usize,
}

impl WorkerStatus {
    pub fn new(progress: f32, run_label: &str, worker_id: usize) -> Self {
        Self {
            progress,
            run_label: run_label.to_string(),
            worker_id,
        }
    }
}
