use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use libstrongmotion::collection::RecordCollection;
use libstrongmotion::config::Config;
use libstrongmotion::error::FormatError;
use libstrongmotion::grouping::{group_channels_with_warnings, GroupWarning};
use libstrongmotion::knet::{is_knet, parse_knet, read_knet};
use libstrongmotion::process::process;
use libstrongmotion::reader::read_data;
use libstrongmotion::record::Channel;
use libstrongmotion::summary::CollectionSummary;
use libstrongmotion::worker_status::WorkerStatus;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn fixture(name: &str) -> PathBuf {
    data_dir().join(name)
}

fn read(name: &str) -> RecordCollection {
    read_data(&fixture(name)).unwrap()
}

fn total_records(collections: &[RecordCollection]) -> usize {
    collections.iter().map(|c| c.len()).sum()
}

#[test]
fn test_fixture_is_knet() {
    assert!(is_knet(&fixture("MYG0041103111446.NS")));
    assert!(!is_knet(&data_dir()));
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse_knet(&fixture("MYG0041103111446.UD")).unwrap();
    let second = parse_knet(&fixture("MYG0041103111446.UD")).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.channel, Channel::Z);
    assert_eq!(first.sample_count, 30);
    assert_eq!(first.npts(), 30);
}

#[test]
fn test_parsed_data_has_no_mean_or_slope() {
    let record = parse_knet(&fixture("MYG0041103111446.NS")).unwrap();
    let n = record.npts() as f64;
    let mean = record.data.sum() / n;
    assert!(mean.abs() < 1e-9);

    let mean_x = (n - 1.0) / 2.0;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in record.data.iter().enumerate() {
        sxy += (i as f64 - mean_x) * (y - mean);
        sxx += (i as f64 - mean_x).powi(2);
    }
    assert!((sxy / sxx).abs() < 1e-9);
}

#[test]
fn test_calibration_scales_samples() {
    let text = fs::read_to_string(fixture("MYG0041103111446.NS")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let unit_path = dir.path().join("unit.NS");
    let scaled_path = dir.path().join("scaled.NS");
    fs::write(&unit_path, text.replace("3920(gal)/6182761", "1(gal)/1")).unwrap();
    fs::write(&scaled_path, text.replace("3920(gal)/6182761", "980.0(gal)/800")).unwrap();

    let unit = parse_knet(&unit_path).unwrap();
    let scaled = parse_knet(&scaled_path).unwrap();
    let factor = 980.0 / 800.0;
    assert_eq!(unit.npts(), scaled.npts());
    for (u, s) in unit.data.iter().zip(scaled.data.iter()) {
        assert!((u * factor - s).abs() <= 1e-9 * (1.0 + s.abs()));
    }
}

#[test]
fn test_short_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.NS");
    let text = fs::read_to_string(fixture("MYG0041103111446.NS")).unwrap();
    let head: Vec<&str> = text.lines().take(10).collect();
    fs::write(&path, head.join("\n")).unwrap();
    assert!(!is_knet(&path));
    assert!(matches!(
        read_knet(&path),
        Err(FormatError::ShortHeader { found: 10, .. })
    ));
}

#[test]
fn test_three_files_group_into_one() {
    let input = vec![
        read("MYG0041103111446.NS"),
        read("MYG0041103111446.EW"),
        read("MYG0041103111446.UD"),
    ];
    let (out, warnings) = group_channels_with_warnings(input);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 3);
    let mut channels = out[0].channels();
    channels.sort();
    assert_eq!(channels, vec![Channel::H1, Channel::H2, Channel::Z]);
    assert!(warnings.is_empty());
}

#[test]
fn test_duplicate_files_collapse() {
    let input = vec![read("MYG0041103111446.EW"), read("MYG0041103111446.EW")];
    let (out, warnings) = group_channels_with_warnings(input);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].channels(), vec![Channel::H2]);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_permutations_keep_counts() {
    let names = [
        "MYG0041103111446.NS",
        "MYG0041103111446.EW",
        "MYG0041103111446.NS",
        "MYG0041103111446.UD",
        "IWT0101103111446.NS",
    ];
    let orders: [[usize; 5]; 3] = [[0, 1, 2, 3, 4], [4, 3, 2, 1, 0], [2, 4, 0, 3, 1]];
    for order in orders.iter() {
        let input: Vec<RecordCollection> = order.iter().map(|&i| read(names[i])).collect();
        let (out, warnings) = group_channels_with_warnings(input);
        assert_eq!(total_records(&out), 4);
        assert_eq!(out.len(), 2);
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            GroupWarning::SingleChannel { id, .. } => assert_eq!(id, "KNET.IWT010.--.H1"),
        }
        let grouped = out.iter().find(|c| c.len() == 3).unwrap();
        assert!(grouped.iter().all(|r| r.station == "MYG004"));
    }
}

#[test]
fn test_process_directory() {
    let dir = tempfile::tempdir().unwrap();
    let summary_path = dir.path().join("summary.yml");
    let config = Config {
        input_paths: vec![data_dir()],
        summary_path: Some(summary_path.clone()),
        imts: vec![String::from("PGA"), String::from("bogus")],
        n_threads: 2,
        ..Default::default()
    };
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    let report = process(config, tx).unwrap();
    let statuses: Vec<WorkerStatus> = rx.try_iter().collect();
    assert!(!statuses.is_empty());

    assert_eq!(report.files_parsed, 4);
    assert_eq!(report.files_skipped, 0);
    assert_eq!(report.collections.len(), 2);

    let text = fs::read_to_string(&summary_path).unwrap();
    let summaries: Vec<CollectionSummary> = serde_yaml::from_str(&text).unwrap();
    assert_eq!(summaries.len(), 2);
    let myg = summaries.iter().find(|s| s.station == "MYG004").unwrap();
    assert_eq!(myg.channels.len(), 3);
    assert_eq!(myg.imts, vec![String::from("PGA")]);
    assert_eq!(myg.source_format, "KNET");
}

#[test]
fn test_process_skips_unknown_files() {
    let dir = tempfile::tempdir().unwrap();
    let junk = dir.path().join("notes.txt");
    fs::write(&junk, "nothing to see here\n").unwrap();
    let config = Config {
        input_paths: vec![fixture("MYG0041103111446.NS"), junk.clone()],
        ..Default::default()
    };
    let (tx, _rx) = mpsc::channel::<WorkerStatus>();
    let report = process(config, tx).unwrap();
    assert_eq!(report.files_parsed, 1);
    assert_eq!(report.files_skipped, 1);

    let strict = Config {
        input_paths: vec![fixture("MYG0041103111446.NS"), junk],
        skip_bad_files: false,
        ..Default::default()
    };
    let (tx, _rx) = mpsc::channel::<WorkerStatus>();
    assert!(process(strict, tx).is_err());
}
