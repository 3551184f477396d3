use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;

#[test]
fn trace_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("trace.csv");
    let png_path = dir.path().join("trace.png");

    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "t_s,s_ft,v_mph,a_g,rpm,gear").expect("header");
    for i in 1..=200 {
        let t = i as f64 * 0.01;
        let gear = if t < 1.2 { 1 } else { 2 };
        let v = 30.0 * t;
        writeln!(
            file,
            "{t:.3},{:.3},{v:.3},1.2000,{:.0},{gear}",
            0.5 * 44.0 * t * t,
            4000.0 + 1500.0 * (t % 1.2),
        )
        .expect("row");
    }

    Command::cargo_bin("trace_plot")
        .expect("trace_plot bin")
        .args([
            "--input",
            csv_path.to_str().expect("utf-8"),
            "--output",
            png_path.to_str().expect("utf-8"),
            "--metric",
            "rpm",
            "--width",
            "400",
            "--height",
            "300",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn trace_plot_rejects_csv_without_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("bad.csv");
    fs::write(&csv_path, "time,speed\n0.1,3\n0.2,6\n").expect("write");

    Command::cargo_bin("trace_plot")
        .expect("trace_plot bin")
        .args(["--input", csv_path.to_str().expect("utf-8")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing 't_s' column"));
}
