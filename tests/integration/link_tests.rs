//! Alias (hardlink) coalescing behavior across the whole pipeline.

#![cfg(unix)]

use dupescan::duplicates::{DuplicateFinder, DuplicateReport};
use dupescan::report::Reporter;
use std::fs::{hard_link, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

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

#[test]
fn hardlink_pair_expanded_with_content_duplicate() {
    // x and y share an inode; z has identical content on its own inode;
    // w shares the size but not the content.
    let dir = TempDir::new().unwrap();
    let x = write_file(&dir, "x", b"linked bytes");
    let y = dir.path().join("y");
    hard_link(&x, &y).unwrap();
    let z = write_file(&dir, "z", b"linked bytes");
    write_file(&dir, "w", b"another size"); // same length, distinct bytes

    let (report, output) = run_scan(dir.path());

    // Only one of x/y was hashed.
    assert_eq!(report.summary.files_found, 4);
    assert_eq!(report.summary.files_to_scan, 3);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![x, y, z]);

    let same_lines: Vec<&str> = output.lines().filter(|l| l.starts_with("same ")).collect();
    assert_eq!(same_lines.len(), 1);
    assert!(!same_lines[0].contains("/w"));
}

#[test]
fn alias_group_reported_even_when_funnel_finds_nothing() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a", b"solitary inode");
    let b = dir.path().join("b");
    hard_link(&a, &b).unwrap();
    write_file(&dir, "c", b"something else!"); // different size

    let (report, _) = run_scan(dir.path());

    // The alias pair's representative had no same-size rival, so the
    // funnel never confirmed anything; the pair is still proven same by
    // the OS and must be reported.
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![a, b]);
}

#[test]
fn added_hardlink_only_extends_the_alias_portion() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a", b"stable content");
    let b = write_file(&dir, "b", b"stable content");

    let (before, _) = run_scan(dir.path());
    assert_eq!(before.groups.len(), 1);
    assert_eq!(before.groups[0].paths, vec![a.clone(), b.clone()]);

    // A new hardlink to `a` adds a path to a's alias set but must not
    // change which content groups exist.
    let link = dir.path().join("a_link");
    hard_link(&a, &link).unwrap();

    let (after, _) = run_scan(dir.path());
    assert_eq!(after.groups.len(), 1);
    assert_eq!(after.groups[0].paths, vec![a, link, b]);
}

#[test]
fn two_alias_groups_same_content_merge_via_representatives() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a", b"mirrored");
    let a2 = dir.path().join("a2");
    hard_link(&a, &a2).unwrap();
    let b = write_file(&dir, "b", b"mirrored");
    let b2 = dir.path().join("b2");
    hard_link(&b, &b2).unwrap();

    let (report, _) = run_scan(dir.path());

    // Two inodes, identical bytes: one group holding all four paths.
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].paths, vec![a, a2, b, b2]);
}
