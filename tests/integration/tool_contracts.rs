use codeaudit::tools::suggest_fix::PLACEHOLDER_TIMESTAMP;
use codeaudit::tools::{FileReader, FixRecorder};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn read_returns_header_then_exact_content() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("app.py"), "print('hi')\n\n").unwrap();
    let reader = FileReader::new(temp.path());
    assert_eq!(reader.read("app.py").to_string(), "File: app.py\n\nprint('hi')\n\n");
}

#[test]
fn read_of_missing_file_is_text_not_error() {
    let temp = TempDir::new().unwrap();
    let reader = FileReader::new(temp.path());
    assert_eq!(
        reader.read("nope.py").to_string(),
        "Error: File 'nope.py' not found."
    );
}

#[test]
fn read_of_directory_reports_io_error() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("pkg")).unwrap();
    let text = FileReader::new(temp.path()).read("pkg").to_string();
    assert!(text.starts_with("Error reading file 'pkg': "), "{text}");
}

#[test]
fn second_suggestion_overwrites_first() {
    let temp = TempDir::new().unwrap();
    let recorder = FixRecorder::new(temp.path().join("out"));
    recorder.suggest("src/app.py", "first()");
    let text = recorder.suggest("src/app.py", "second()");

    let path = temp.path().join("out").join("app_fix.txt");
    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("second()"));
    assert!(!saved.contains("first()"));
    assert!(saved.contains(PLACEHOLDER_TIMESTAMP));
    assert_eq!(
        text,
        format!("{}\n✓ Fix suggestion saved to: {}", saved, path.display())
    );
}

proptest! {
    #[test]
    fn reading_never_panics(path in "[a-zA-Z0-9_./-]{0,24}") {
        let temp = TempDir::new().unwrap();
        let text = FileReader::new(temp.path()).read(&path).to_string();
        prop_assert!(!text.is_empty());
    }
}
