//! # strongmotion_cli
//!
//! Part of the strongmotion crate family.
//!
//! Command line application to parse and consolidate strong motion data.
//!
//! ## Use
//!
//! Make a template configuration file, edit it, then run with it
//!
//! ```bash
//! strongmotion_cli -p config.yml new
//! strongmotion_cli -p config.yml
//! ```
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use libstrongmotion::config::Config;
use libstrongmotion::process::process;
use libstrongmotion::worker_status::{BarColor, WorkerStatus};

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn bar_style(color: &BarColor) -> ProgressStyle {
    let template = match color {
        BarColor::CYAN => "Worker {prefix} {bar:40.cyan/blue} {pos:>3}%",
        BarColor::RED => "Worker {prefix} {bar:40.red/blue} {pos:>3}%",
        BarColor::GREEN => "Worker {prefix} {bar:40.green/blue} {pos:>3}%",
    };
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn main() {
    // Create a cli
    let matches = Command::new("strongmotion_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );

        make_template_config(&config_path);
        log::info!("Done.");
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    for path in config.input_paths.iter() {
        log::info!("Input Path: {}", path.to_string_lossy());
    }
    if let Some(path) = config.summary_path.as_ref() {
        log::info!("Summary Path: {}", path.to_string_lossy());
    }
    log::info!("IMTs: {}", config.imts.join(", "));
    log::info!("Number of Workers: {}", config.n_threads);

    // Spawn the task!
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let handle = std::thread::spawn(move || process(config, tx));

    // One bar per worker, created as workers report in
    let mut bars: Vec<ProgressBar> = Vec::new();
    for status in rx.iter() {
        while bars.len() <= status.worker_id {
            let bar = pb_manager.add(ProgressBar::new(100));
            bar.set_prefix(format!("{}", bars.len()));
            bar.set_style(bar_style(&BarColor::CYAN));
            bars.push(bar);
        }
        let bar = &bars[status.worker_id];
        bar.set_style(bar_style(&status.color));
        bar.set_position((status.progress * 100.0) as u64);
    }

    // The channel closes once processing is done
    match handle.join() {
        Ok(result) => match result {
            Ok(report) => {
                log::info!(
                    "Successfully processed {} files into {} station collections!",
                    report.files_parsed,
                    report.collections.len()
                );
                if report.files_skipped > 0 {
                    log::warn!("{} files were skipped.", report.files_skipped);
                }
            }
            Err(e) => log::error!("Processing failed with error: {e}"),
        },
        Err(_) => log::error!("Failed to join processing task!"),
    }

    for bar in bars.iter() {
        bar.finish();
    }

    log::info!("Done.");
}
