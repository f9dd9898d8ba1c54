#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{Local, TimeZone};
use rattendance::core::{ManualClock, SessionStateMachine};
use rattendance::models::Timestamp;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("rattendance")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a fresh test DB through the CLI
pub fn init_test_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// Fixed local instant on a plain working day.
pub fn at(h: u32, m: u32, s: u32) -> Timestamp {
    Local
        .with_ymd_and_hms(2025, 6, 2, h, m, s)
        .single()
        .expect("unambiguous local time")
}

/// Same as [`at`] on an arbitrary day.
pub fn on(y: i32, mo: u32, d: u32, h: u32, m: u32) -> Timestamp {
    Local
        .with_ymd_and_hms(y, mo, d, h, m, 0)
        .single()
        .expect("unambiguous local time")
}

/// A machine driven by a manual clock starting at `start`; the returned
/// clock is shared with the machine.
pub fn machine_at(start: Timestamp) -> (ManualClock, SessionStateMachine<ManualClock>) {
    let clock = ManualClock::new(start);
    let machine = SessionStateMachine::new(clock.clone());
    (clock, machine)
}
