#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn plg() -> Command {
    cargo_bin_cmd!("patrologger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_patrologger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init_db(db_path: &str) {
    plg()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Drive one complete shift for operator "ada" on 2026-03-09:
/// flight 08:00 → 09:00, a Perimeter round 08:01 → 08:15 with a 3-minute
/// battery swap at 08:05, and a justified Parking round. The round's
/// active duration is 11 minutes.
pub fn run_full_shift(db_path: &str) {
    init_db(db_path);

    let steps: &[&[&str]] = &[
        &["flight", "start", "--operator", "ada", "--at", "2026-03-09 08:00:00"],
        &["round", "start", "--operator", "ada", "--area", "P", "--at", "2026-03-09 08:01:00"],
        &["pause", "start", "--operator", "ada", "--reason", "battery", "--at", "2026-03-09 08:05:00"],
        &["pause", "end", "--operator", "ada", "--at", "2026-03-09 08:08:00"],
        &["round", "end", "--operator", "ada", "--at", "2026-03-09 08:15:00"],
        &["justify", "--operator", "ada", "--area", "K", "--reason", "high wind over parking", "--at", "2026-03-09 08:20:00"],
        &["flight", "end", "--operator", "ada", "--at", "2026-03-09 09:00:00"],
    ];

    for step in steps {
        let mut args = vec!["--db", db_path];
        args.extend_from_slice(step);
        plg().args(&args).assert().success();
    }
}
