use std::fs::File;
use std::io::Write;

use reactor_config::load_trace_csv;
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    (dir, path)
}

#[rstest]
fn loads_readings_in_order() {
    let (_dir, path) = write_csv("raw\n512\n 517\n-3\n");
    let readings = load_trace_csv(&path).unwrap();
    assert_eq!(readings, vec![512, 517, -3]);
}

#[rstest]
fn header_only_trace_is_empty() {
    let (_dir, path) = write_csv("raw\n");
    assert_eq!(load_trace_csv(&path).unwrap(), Vec::<i32>::new());
}

#[rstest]
#[case("value\n1\n", "must have header 'raw'")]
#[case("raw,extra\n1,2\n", "must have header 'raw'")]
#[case("raw\nabc\n", "invalid CSV row 2")]
fn rejects_malformed_traces(#[case] body: &str, #[case] needle: &str) {
    let (_dir, path) = write_csv(body);
    let err = load_trace_csv(&path).expect_err("malformed trace");
    let msg = format!("{err}");
    assert!(msg.contains(needle), "expected '{needle}' in '{msg}'");
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = load_trace_csv(&path).expect_err("missing file");
    assert!(format!("{err}").contains("open trace CSV"));
}
