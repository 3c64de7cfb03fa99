use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{Rgba, RgbaImage};

fn run(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_design-compare"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn solid(dir: &Path, name: &str, size: u32, color: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(size, size, Rgba(color)).save(&path).unwrap();
    path
}

#[test]
fn prints_metrics_and_writes_diff() {
    let dir = tempfile::tempdir().unwrap();
    let red = solid(dir.path(), "red.png", 10, [255, 0, 0, 255]);
    let blue = solid(dir.path(), "blue.png", 10, [0, 0, 255, 255]);
    let output = dir.path().join("diff.png");

    let out = run(&[red.as_path(), blue.as_path(), output.as_path()]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout.contains("Total pixels:      100"), "{stdout}");
    assert!(stdout.contains("Different pixels:  100"), "{stdout}");
    assert!(stdout.contains("100.00%"), "{stdout}");
    assert!(output.exists());
}

#[test]
fn identical_images_without_output_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let red = solid(dir.path(), "red.png", 4, [255, 0, 0, 255]);

    let out = run(&[red.as_path(), red.as_path()]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert_eq!(out.status.code(), Some(0));
    assert!(stdout.contains("0.00%"), "{stdout}");
    assert!(stdout.contains("not written"), "{stdout}");
    assert!(!stdout.contains("diffImageEncodedBytes"), "{stdout}");
}

#[test]
fn dimension_mismatch_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let small = solid(dir.path(), "small.png", 10, [0, 0, 0, 255]);
    let large = solid(dir.path(), "large.png", 20, [0, 0, 0, 255]);

    let out = run(&[small.as_path(), large.as_path()]);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr.contains("DimensionMismatch"), "{stderr}");
    assert!(stderr.contains("10x10") && stderr.contains("20x20"), "{stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_input_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let red = solid(dir.path(), "red.png", 4, [255, 0, 0, 255]);
    let missing = Path::new("/non/existent/file.png");

    let out = run(&[missing, red.as_path()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("NotFound"));
}

#[test]
fn json_output_has_inline_diff() {
    let dir = tempfile::tempdir().unwrap();
    let red = solid(dir.path(), "red.png", 4, [255, 0, 0, 255]);

    let out = Command::new(env!("CARGO_BIN_EXE_design-compare"))
        .arg(&red)
        .arg(&red)
        .arg("--json")
        .output()
        .unwrap();

    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["totalPixels"], 16);
    assert!(json["diffImageEncodedBytes"].is_string());
    assert!(json.get("diffImagePath").is_none());
}

#[test]
fn missing_positional_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let red = solid(dir.path(), "red.png", 4, [255, 0, 0, 255]);

    let out = run(&[red.as_path()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!out.stderr.is_empty());
    assert!(out.stdout.is_empty());
}

#[test]
fn unparsable_threshold_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let red = solid(dir.path(), "red.png", 4, [255, 0, 0, 255]);

    let out = Command::new(env!("CARGO_BIN_EXE_design-compare"))
        .arg(&red)
        .arg(&red)
        .args(["--threshold", "abc"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("abc"));
}

#[test]
fn help_exits_with_zero() {
    let out = Command::new(env!("CARGO_BIN_EXE_design-compare"))
        .arg("--help")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("IMPLEMENTATION"));
}
