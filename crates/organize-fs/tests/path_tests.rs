use organize_fs::{find_unused_filename, path::split_name, same_file};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name).unwrap();
    }
}

#[rstest]
#[case(&[], "report.pdf")]
#[case(&["report.pdf"], "report (1).pdf")]
#[case(&["report.pdf", "report (1).pdf"], "report (2).pdf")]
#[case(&["report.pdf", "report (1).pdf", "report (2).pdf", "report (3).pdf"], "report (4).pdf")]
// A gap in the sequence is reused
#[case(&["report.pdf", "report (2).pdf"], "report (1).pdf")]
fn test_unused_filename_on_disk(#[case] existing: &[&str], #[case] expected: &str) {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), existing);

    let result = find_unused_filename(&temp.path().join("report.pdf"), Path::exists);
    assert_eq!(result, temp.path().join(expected));
}

#[test]
fn test_unused_filename_is_repeatable() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), &["a.txt", "a (1).txt"]);

    let desired = temp.path().join("a.txt");
    let first = find_unused_filename(&desired, Path::exists);
    let second = find_unused_filename(&desired, Path::exists);
    assert_eq!(first, second);
}

#[test]
fn test_unused_filename_keeps_unicode_stem() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), &["Cálculo.pdf"]);

    let result = find_unused_filename(&temp.path().join("Cálculo.pdf"), Path::exists);
    assert_eq!(result.file_name().unwrap(), "Cálculo (1).pdf");
}

#[rstest]
#[case("photo.JPG", "photo", ".JPG")]
#[case("archive.tar.gz", "archive.tar", ".gz")]
#[case("README", "README", "")]
#[case(".hidden", ".hidden", "")]
fn test_split_name(#[case] name: &str, #[case] stem: &str, #[case] suffix: &str) {
    let (s, x) = split_name(&PathBuf::from(name));
    assert_eq!(s, stem);
    assert_eq!(x, suffix);
}

#[test]
fn test_same_file_identity() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), &["one.txt", "two.txt"]);

    let one = temp.path().join("one.txt");
    assert!(same_file(&one, &one));
    assert!(same_file(&one, &temp.path().join(".").join("one.txt")));
    assert!(!same_file(&one, &temp.path().join("two.txt")));
    assert!(!same_file(&one, &temp.path().join("missing.txt")));
}
