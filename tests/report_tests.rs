use predicates::str::contains;

mod common;
use common::{init_db, plg, run_full_shift, setup_test_db};

#[test]
fn test_kpi_on_empty_db_is_all_zero() {
    let db_path = setup_test_db("kpi_empty");
    init_db(&db_path);

    let output = plg()
        .args(["--db", &db_path, "report", "kpi", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).expect("utf8 stdout");
    let json_start = text.find('{').expect("json object in output");
    let summary: serde_json::Value =
        serde_json::from_str(text[json_start..].trim()).expect("valid json");

    assert_eq!(summary["total_flights"], 0);
    assert_eq!(summary["total_operation_hours"], 0.0);
    assert_eq!(summary["avg_round_duration_secs"], 0.0);
    assert_eq!(summary["round_count"], 0);
    assert_eq!(summary["justification_count"], 0);
}

#[test]
fn test_kpi_counts_full_shift() {
    let db_path = setup_test_db("kpi_shift");
    run_full_shift(&db_path);

    let output = plg()
        .args(["--db", &db_path, "report", "kpi", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).expect("utf8 stdout");
    let json_start = text.find('{').expect("json object in output");
    let summary: serde_json::Value =
        serde_json::from_str(text[json_start..].trim()).expect("valid json");

    assert_eq!(summary["total_flights"], 1);
    assert_eq!(summary["round_count"], 1);
    assert_eq!(summary["justification_count"], 1);
    // 11-minute round
    assert_eq!(summary["avg_round_duration_secs"], 660.0);
}

#[test]
fn test_heatmap_on_empty_db_has_full_zero_grid() {
    let db_path = setup_test_db("heatmap_empty");
    init_db(&db_path);

    let output = plg()
        .args(["--db", &db_path, "report", "heatmap", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).expect("utf8 stdout");
    let json_start = text.find('{').expect("json object in output");
    let map: serde_json::Value =
        serde_json::from_str(text[json_start..].trim()).expect("valid json");

    let counts = map["counts"].as_array().expect("7 weekday rows");
    assert_eq!(counts.len(), 7);
    for day in counts {
        let hours = day.as_array().expect("24 hour buckets");
        assert_eq!(hours.len(), 24);
        assert!(hours.iter().all(|h| h == 0));
    }
}

#[test]
fn test_heatmap_counts_monday_morning_activity() {
    let db_path = setup_test_db("heatmap_shift");
    // 2026-03-09 is a Monday; the shift has activity in the 08:00 hour.
    run_full_shift(&db_path);

    let output = plg()
        .args(["--db", &db_path, "report", "heatmap", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).expect("utf8 stdout");
    let json_start = text.find('{').expect("json object in output");
    let map: serde_json::Value =
        serde_json::from_str(text[json_start..].trim()).expect("valid json");

    // flight start + round start + pause start, all between 08:00 and 09:00
    assert_eq!(map["counts"][0][8], 3);
}

#[test]
fn test_rollup_is_sorted_and_sparse() {
    let db_path = setup_test_db("rollup");
    init_db(&db_path);

    for (start, end) in [
        ("2026-03-09 08:00:00", "2026-03-09 09:00:00"),
        ("2026-03-12 08:00:00", "2026-03-12 09:00:00"),
    ] {
        plg()
            .args(["--db", &db_path, "flight", "start", "--operator", "ada", "--at", start])
            .assert()
            .success();
        plg()
            .args(["--db", &db_path, "flight", "end", "--operator", "ada", "--at", end])
            .assert()
            .success();
    }

    let output = plg()
        .args(["--db", &db_path, "report", "rollup", "--granularity", "day", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).expect("utf8 stdout");
    let json_start = text.find('[').expect("json array in output");
    let buckets: serde_json::Value =
        serde_json::from_str(text[json_start..].trim()).expect("valid json");

    let buckets = buckets.as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["period"], "2026-03-09");
    assert_eq!(buckets[1]["period"], "2026-03-12");

    // Zero-filled variant synthesizes the two quiet days in between.
    plg()
        .args([
            "--db", &db_path, "report", "rollup", "--granularity", "day", "--zero-fill",
        ])
        .assert()
        .success()
        .stdout(contains("2026-03-10"))
        .stdout(contains("2026-03-11"));
}

#[test]
fn test_efficiency_reports_median_per_operator() {
    let db_path = setup_test_db("efficiency");
    run_full_shift(&db_path);

    plg()
        .args(["--db", &db_path, "report", "efficiency"])
        .assert()
        .success()
        .stdout(contains("ada"))
        .stdout(contains("00:11:00"));
}

#[test]
fn test_variability_groups_by_area() {
    let db_path = setup_test_db("variability");
    run_full_shift(&db_path);

    plg()
        .args(["--db", &db_path, "report", "variability", "--group-by", "area"])
        .assert()
        .success()
        .stdout(contains("Perimeter"));
}
