use predicates::str::contains;

mod common;
use common::{init_db, plg, run_full_shift, setup_test_db};

#[test]
fn test_full_shift_produces_11_minute_round() {
    let db_path = setup_test_db("full_shift");
    run_full_shift(&db_path);

    plg()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("00:11:00"))
        .stdout(contains("closed"))
        .stdout(contains("justified"));
}

#[test]
fn test_flight_start_while_open_is_rejected() {
    let db_path = setup_test_db("double_flight_start");
    init_db(&db_path);

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 08:00:00",
        ])
        .assert()
        .success();

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 08:30:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Illegal transition"));
}

#[test]
fn test_round_end_without_open_round_is_rejected() {
    let db_path = setup_test_db("round_end_no_round");
    init_db(&db_path);

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 08:00:00",
        ])
        .assert()
        .success();

    plg()
        .args([
            "--db", &db_path, "round", "end", "--operator", "ada",
            "--at", "2026-03-09 08:10:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Illegal transition"));

    // The failed apply must leave state unchanged: the flight is still
    // open and a round can start normally.
    plg()
        .args([
            "--db", &db_path, "round", "start", "--operator", "ada",
            "--area", "P", "--at", "2026-03-09 08:11:00",
        ])
        .assert()
        .success();
}

#[test]
fn test_flight_end_auto_closes_dangling_round() {
    let db_path = setup_test_db("auto_close");
    init_db(&db_path);

    for step in [
        vec!["flight", "start", "--operator", "ada", "--at", "2026-03-09 08:00:00"],
        vec!["round", "start", "--operator", "ada", "--area", "S3", "--at", "2026-03-09 08:05:00"],
    ] {
        let mut args = vec!["--db", db_path.as_str()];
        args.extend(step);
        plg().args(&args).assert().success();
    }

    plg()
        .args([
            "--db", &db_path, "flight", "end", "--operator", "ada",
            "--at", "2026-03-09 08:45:00",
        ])
        .assert()
        .success()
        .stdout(contains("auto-closed"));

    // The round was closed at the flight's end time and carries the marker.
    plg()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("08:45:00"))
        .stdout(contains("auto-closed"));
}

#[test]
fn test_non_monotonic_timestamp_is_rejected() {
    let db_path = setup_test_db("non_monotonic");
    init_db(&db_path);

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 09:00:00",
        ])
        .assert()
        .success();

    plg()
        .args([
            "--db", &db_path, "round", "start", "--operator", "ada",
            "--area", "P", "--at", "2026-03-09 08:59:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Non-monotonic"));
}

#[test]
fn test_flight_numbering_restarts_each_day() {
    let db_path = setup_test_db("numbering");
    init_db(&db_path);

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 08:00:00",
        ])
        .assert()
        .success()
        .stdout(contains("Flight 01 opened"));

    plg()
        .args([
            "--db", &db_path, "flight", "end", "--operator", "ada",
            "--at", "2026-03-09 09:00:00",
        ])
        .assert()
        .success();

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 10:00:00",
        ])
        .assert()
        .success()
        .stdout(contains("Flight 02 opened"));

    plg()
        .args([
            "--db", &db_path, "flight", "end", "--operator", "ada",
            "--at", "2026-03-09 11:00:00",
        ])
        .assert()
        .success();

    // A new calendar day starts over at 1.
    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-10 08:00:00",
        ])
        .assert()
        .success()
        .stdout(contains("Flight 01 opened"));
}

#[test]
fn test_invalid_area_is_rejected() {
    let db_path = setup_test_db("invalid_area");
    init_db(&db_path);

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 08:00:00",
        ])
        .assert()
        .success();

    plg()
        .args([
            "--db", &db_path, "round", "start", "--operator", "ada",
            "--area", "Z9", "--at", "2026-03-09 08:05:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid patrol area"));
}

#[test]
fn test_pause_start_while_paused_is_rejected() {
    let db_path = setup_test_db("double_pause");
    init_db(&db_path);

    for step in [
        vec!["flight", "start", "--operator", "ada", "--at", "2026-03-09 08:00:00"],
        vec!["pause", "start", "--operator", "ada", "--reason", "battery", "--at", "2026-03-09 08:10:00"],
    ] {
        let mut args = vec!["--db", db_path.as_str()];
        args.extend(step);
        plg().args(&args).assert().success();
    }

    plg()
        .args([
            "--db", &db_path, "pause", "start", "--operator", "ada",
            "--reason", "meal", "--at", "2026-03-09 08:12:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Illegal transition"));
}

#[test]
fn test_justify_twice_for_same_area_is_rejected() {
    let db_path = setup_test_db("double_justify");
    init_db(&db_path);

    for step in [
        vec!["flight", "start", "--operator", "ada", "--at", "2026-03-09 08:00:00"],
        vec!["justify", "--operator", "ada", "--area", "S5", "--reason", "rain", "--at", "2026-03-09 08:05:00"],
    ] {
        let mut args = vec!["--db", db_path.as_str()];
        args.extend(step);
        plg().args(&args).assert().success();
    }

    plg()
        .args([
            "--db", &db_path, "justify", "--operator", "ada", "--area", "S5",
            "--reason", "rain again", "--at", "2026-03-09 08:06:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Illegal transition"));
}

#[test]
fn test_status_reports_open_records() {
    let db_path = setup_test_db("status");
    init_db(&db_path);

    for step in [
        vec!["flight", "start", "--operator", "ada", "--at", "2026-03-09 08:00:00"],
        vec!["round", "start", "--operator", "ada", "--area", "P", "--at", "2026-03-09 08:01:00"],
    ] {
        let mut args = vec!["--db", db_path.as_str()];
        args.extend(step);
        plg().args(&args).assert().success();
    }

    plg()
        .args(["--db", &db_path, "status", "--operator", "ada"])
        .assert()
        .success()
        .stdout(contains("Flight 01"))
        .stdout(contains("Perimeter"));
}

#[test]
fn test_operators_have_independent_sessions() {
    let db_path = setup_test_db("two_operators");
    init_db(&db_path);

    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "ada",
            "--at", "2026-03-09 08:00:00",
        ])
        .assert()
        .success()
        .stdout(contains("Flight 01 opened"));

    // A different operator gets the next number of the same day, and an
    // open flight for ada does not block bob.
    plg()
        .args([
            "--db", &db_path, "flight", "start", "--operator", "bob",
            "--at", "2026-03-09 08:10:00",
        ])
        .assert()
        .success()
        .stdout(contains("Flight 02 opened"));
}
