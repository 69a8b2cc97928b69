use std::path::PathBuf;
use std::sync::mpsc::Sender;

use super::collection::RecordCollection;
use super::config::Config;
use super::error::ProcessorError;
use super::grouping::group_channels;
use super::imt::validate_imt_list;
use super::reader::read_data;
use super::summary::{summarize, write_summary};
use super::worker_status::{BarColor, WorkerStatus};

/// Outcome of a batch
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub collections: Vec<RecordCollection>,
    pub files_parsed: usize,
    pub files_skipped: usize,
}

/// Files parsed by one worker, tagged with their position in the input list
#[derive(Debug, Default)]
pub struct WorkerOutput {
    pub parsed: Vec<(usize, RecordCollection)>,
    pub skipped: usize,
}

/// Parse a subset of the input files.
///
/// Each file is tagged with its input index so that results can be put back
/// in input order. Unreadable files are logged and skipped unless the config
/// asks for a strict batch.
pub fn process_subset(
    config: &Config,
    tx: &Sender<WorkerStatus>,
    worker_id: usize,
    subset: Vec<(usize, PathBuf)>,
) -> Result<WorkerOutput, ProcessorError> {
    let mut output = WorkerOutput::default();
    let total = subset.len();
    let mut color = BarColor::CYAN;
    tx.send(WorkerStatus::new(0.0, 0, worker_id, color.clone()))?;

    for (done, (idx, path)) in subset.into_iter().enumerate() {
        match read_data(&path) {
            Ok(collection) => output.parsed.push((idx, collection)),
            Err(e) => {
                if !config.skip_bad_files {
                    return Err(ProcessorError::ReaderError(e));
                }
                log::warn!("{e}\nSkipping {}.", path.to_string_lossy());
                output.skipped += 1;
                color = BarColor::RED;
            }
        }
        tx.send(WorkerStatus::new(
            (done + 1) as f32 / total as f32,
            done + 1,
            worker_id,
            color.clone(),
        ))?;
    }

    if color == BarColor::CYAN {
        color = BarColor::GREEN;
    }
    tx.send(WorkerStatus::new(1.0, total, worker_id, color))?;
    Ok(output)
}

/// Divide the input files round-robin among the workers.
///
/// Never creates more subsets than there are files.
pub fn create_subsets(files: &[PathBuf], n_threads: usize) -> Vec<Vec<(usize, PathBuf)>> {
    let n_subsets = n_threads.max(1).min(files.len());
    let mut subsets: Vec<Vec<(usize, PathBuf)>> = vec![Vec::new(); n_subsets];

    for (idx, file) in files.iter().enumerate() {
        subsets[idx % n_subsets].push((idx, file.clone()))
    }

    subsets
}

/// The main loop of the strong motion processor.
///
/// Parses every input file across worker threads, restores input order,
/// consolidates the records, and writes the summary if one was requested.
pub fn process(config: Config, tx: Sender<WorkerStatus>) -> Result<ProcessReport, ProcessorError> {
    config.validate()?;
    let files = config.collect_input_files()?;
    let total_size: u64 = files
        .iter()
        .filter_map(|f| f.metadata().ok())
        .map(|m| m.len())
        .sum();
    log::info!(
        "Found {} input files with total size: {}",
        files.len(),
        human_bytes::human_bytes(total_size as f64)
    );

    let (imts, _) = validate_imt_list(config.imts.as_slice());

    let subsets = create_subsets(&files, config.n_threads as usize);
    let mut handles = Vec::with_capacity(subsets.len());
    for (worker_id, subset) in subsets.into_iter().enumerate() {
        let conf = config.clone();
        let worker_tx = tx.clone();
        handles.push(std::thread::spawn(move || {
            process_subset(&conf, &worker_tx, worker_id, subset)
        }));
    }

    let mut report = ProcessReport::default();
    let mut parsed: Vec<(usize, RecordCollection)> = Vec::with_capacity(files.len());
    for (worker_id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(result) => {
                let mut output = result?;
                report.files_skipped += output.skipped;
                parsed.append(&mut output.parsed);
            }
            Err(_) => return Err(ProcessorError::WorkerPanicked(worker_id)),
        }
    }
    parsed.sort_by_key(|(idx, _)| *idx);
    report.files_parsed = parsed.len();
    log::info!(
        "Parsed {} files, skipped {}.",
        report.files_parsed,
        report.files_skipped
    );

    log::info!("Grouping channels...");
    report.collections = group_channels(parsed.into_iter().map(|(_, c)| c).collect());
    log::info!(
        "Consolidated into {} station collections.",
        report.collections.len()
    );

    if let Some(summary_path) = config.summary_path.as_ref() {
        let summaries = summarize(&report.collections, &imts);
        write_summary(summary_path, &summaries)?;
        log::info!("Wrote summary to {}", summary_path.to_string_lossy());
    }

    Ok(report)
}
