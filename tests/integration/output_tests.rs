//! The stable stdout contract: literal output equality and determinism.

use dupescan::duplicates::DuplicateFinder;
use dupescan::report::Reporter;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn scan_output(roots: &[PathBuf]) -> String {
    let finder = DuplicateFinder::new();
    let mut reporter = Reporter::new(Vec::new());
    finder.run(roots, &mut reporter).unwrap();
    String::from_utf8(reporter.into_inner()).unwrap()
}

#[test]
fn literal_output_for_simple_tree() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a", b"aaaaaaaa");
    let b = write_file(dir.path(), "b", b"aaaaaaaa");
    write_file(dir.path(), "d", b"bbbbbbbb");
    write_file(dir.path(), "unique", b"odd one out");

    let output = scan_output(&[dir.path().to_path_buf()]);

    let expected = format!(
        "files found: 4\n\
         files with unique size: 1\n\
         files to scan: 3\n\
         Eliminating by 4KiB corners: 3 files\n\
         Eliminating by 64KiB corners: 2 files\n\
         Eliminating by 64KiB middle: 2 files\n\
         Eliminating by whole read: 2 files\n\
         same {} {}\n",
        a.display(),
        b.display()
    );
    assert_eq!(output, expected);
}

#[test]
fn runs_are_idempotent() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "x1", b"first group");
    write_file(dir.path(), "x2", b"first group");
    write_file(dir.path(), "y1", b"second group!!");
    write_file(dir.path(), "y2", b"second group!!");
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    write_file(&sub, "x3", b"first group");

    let roots = vec![dir.path().to_path_buf()];
    let first = scan_output(&roots);
    let second = scan_output(&roots);

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn groups_emitted_smallest_size_first() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "large1", &[9u8; 9000]);
    write_file(dir.path(), "large2", &[9u8; 9000]);
    write_file(dir.path(), "tiny1", b"abc");
    write_file(dir.path(), "tiny2", b"abc");

    let output = scan_output(&[dir.path().to_path_buf()]);

    let same_lines: Vec<&str> = output.lines().filter(|l| l.starts_with("same ")).collect();
    assert_eq!(same_lines.len(), 2);
    assert!(same_lines[0].contains("tiny1"));
    assert!(same_lines[1].contains("large1"));
}

#[test]
fn duplicates_found_across_roots() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let a = write_file(dir_a.path(), "orig", b"cross-root bytes");
    let b = write_file(dir_b.path(), "copy", b"cross-root bytes");

    let output = scan_output(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()]);

    let same_lines: Vec<&str> = output.lines().filter(|l| l.starts_with("same ")).collect();
    assert_eq!(same_lines.len(), 1);
    assert!(same_lines[0].contains(a.to_str().unwrap()));
    assert!(same_lines[0].contains(b.to_str().unwrap()));
}

#[test]
fn nonexistent_root_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a", b"pair!");
    write_file(dir.path(), "b", b"pair!");

    let output = scan_output(&[
        dir.path().to_path_buf(),
        PathBuf::from("/nonexistent/path/12345"),
    ]);

    assert!(output.contains("files found: 2"));
    assert_eq!(
        output.lines().filter(|l| l.starts_with("same ")).count(),
        1
    );
}
