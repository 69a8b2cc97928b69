/// Parsing is CYAN, a worker that skipped a file turns RED, and a finished
/// worker is GREEN
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BarColor {
    #[default]
    CYAN,
    RED,
    GREEN,
}

/// Progress report from a parsing worker
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub files_done: usize,
    pub worker_id: usize,
    pub color: BarColor,
}

impl WorkerStatus {
    pub fn new(progress: f32, files_done: usize, worker_id: usize, color: BarColor) -> Self {
        Self {
            progress,
            files_done,
            worker_id,
            color,
        }
    }
}
