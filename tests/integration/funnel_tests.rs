//! End-to-end funnel behavior: which stage splits which difference.

use dupescan::duplicates::{DuplicateFinder, DuplicateReport};
use dupescan::report::Reporter;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MIB: usize = 1024 * 1024;

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn run_scan(root: &Path) -> (DuplicateReport, String) {
    let finder = DuplicateFinder::new();
    let mut reporter = Reporter::new(Vec::new());
    let report = finder.run(&[root.to_path_buf()], &mut reporter).unwrap();
    (report, String::from_utf8(reporter.into_inner()).unwrap())
}

fn same_lines(output: &str) -> Vec<&str> {
    output.lines().filter(|l| l.starts_with("same ")).collect()
}

#[test]
fn empty_tree_reports_zero_files() {
    let dir = TempDir::new().unwrap();
    let (report, output) = run_scan(dir.path());

    assert_eq!(report.summary.files_found, 0);
    assert!(output.contains("files found: 0"));
    assert!(same_lines(&output).is_empty());
}

#[test]
fn small_identical_files_survive_all_fallback_stages() {
    // All files are below every buffer size, so each stage is the
    // whole-file sequential fallback; the duplicates must still come out
    // as a single stage-4 group.
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a", b"aaaaaaaa");
    let b = write_file(&dir, "b", b"aaaaaaaa");
    let c = write_file(&dir, "c", b"aaaaaaaa");
    write_file(&dir, "d", b"bbbbbbbb");

    let (report, output) = run_scan(dir.path());

    assert_eq!(report.summary.files_found, 4);
    assert_eq!(report.summary.files_with_unique_size, 0);
    assert_eq!(report.summary.files_to_scan, 4);

    let lines = same_lines(&output);
    assert_eq!(lines.len(), 1);
    for path in [&a, &b, &c] {
        assert!(lines[0].contains(path.to_str().unwrap()));
    }

    assert!(output.contains("Eliminating by 4KiB corners: 4 files"));
    assert!(output.contains("Eliminating by 64KiB corners: 3 files"));
    assert!(output.contains("Eliminating by 64KiB middle: 3 files"));
    assert!(output.contains("Eliminating by whole read: 3 files"));
}

#[test]
fn first_byte_difference_split_by_first_corners_stage() {
    let dir = TempDir::new().unwrap();
    let mut content = vec![0x5Au8; MIB];
    write_file(&dir, "a", &content);
    content[0] ^= 0xFF;
    write_file(&dir, "b", &content);

    let (report, output) = run_scan(dir.path());

    assert!(report.groups.is_empty());
    assert!(same_lines(&output).is_empty());
    assert!(output.contains("Eliminating by 4KiB corners: 2 files"));
    // The funnel drains at stage 1; later stages never run.
    assert!(!output.contains("Eliminating by 64KiB corners"));
}

#[test]
fn midfile_difference_split_by_middle_stage() {
    // Byte 500_000 sits outside both 64 KiB corners but inside the
    // 64 KiB middle window of a 1 MiB file.
    let dir = TempDir::new().unwrap();
    let mut content = vec![0x5Au8; MIB];
    write_file(&dir, "a", &content);
    content[500_000] ^= 0xFF;
    write_file(&dir, "b", &content);

    let (report, output) = run_scan(dir.path());

    assert!(report.groups.is_empty());
    assert!(same_lines(&output).is_empty());
    assert!(output.contains("Eliminating by 4KiB corners: 2 files"));
    assert!(output.contains("Eliminating by 64KiB corners: 2 files"));
    assert!(output.contains("Eliminating by 64KiB middle: 2 files"));
    assert!(!output.contains("Eliminating by whole read"));
}

#[test]
fn difference_invisible_to_sampling_split_by_whole_read() {
    // Byte 300_000 is outside the corners and outside the middle window;
    // only the whole-file stage can see it.
    let dir = TempDir::new().unwrap();
    let mut content = vec![0x5Au8; MIB];
    write_file(&dir, "a", &content);
    content[300_000] ^= 0xFF;
    write_file(&dir, "b", &content);

    let (report, output) = run_scan(dir.path());

    assert!(report.groups.is_empty());
    assert!(same_lines(&output).is_empty());
    assert!(output.contains("Eliminating by whole read: 2 files"));
}

#[test]
fn identical_large_files_confirmed_by_whole_read() {
    let dir = TempDir::new().unwrap();
    let content = vec![0x5Au8; MIB];
    let a = write_file(&dir, "a", &content);
    let b = write_file(&dir, "b", &content);

    let (report, output) = run_scan(dir.path());

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![a, b]);
    assert_eq!(report.groups[0].size, MIB as u64);
    assert!(output.contains("Eliminating by whole read: 2 files"));
}

#[test]
fn survivor_counts_never_increase() {
    let dir = TempDir::new().unwrap();
    let content = vec![0x11u8; 200_000];
    write_file(&dir, "a", &content);
    write_file(&dir, "b", &content);
    let mut other = content.clone();
    other[100_000] ^= 0xFF;
    write_file(&dir, "c", &other);

    let (_, output) = run_scan(dir.path());

    let counts: Vec<usize> = output
        .lines()
        .filter(|l| l.starts_with("Eliminating by "))
        .map(|l| {
            l.rsplit_once(": ")
                .unwrap()
                .1
                .trim_end_matches(" files")
                .parse()
                .unwrap()
        })
        .collect();

    assert!(!counts.is_empty());
    assert!(counts.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn empty_files_form_a_duplicate_group() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a", b"");
    let b = write_file(&dir, "b", b"");

    let (report, _) = run_scan(dir.path());

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].size, 0);
    assert_eq!(report.groups[0].paths, vec![a, b]);
}
