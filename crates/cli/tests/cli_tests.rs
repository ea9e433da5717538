use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rusqlite::Connection;
use tempfile::tempdir;

fn courtsync() -> Command {
    Command::new(env!("CARGO_BIN_EXE_courtsync"))
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn run_cmd(args: &[&str]) -> Output {
    courtsync().args(args).output().expect("failed to run courtsync")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Federal database seeded from the fixture rows, plus a config pointing at it.
fn database_workspace(dir: &Path) -> PathBuf {
    let conn = Connection::open(dir.join("courts.sqlite")).unwrap();
    conn.execute_batch(
        "CREATE TABLE f_court (
            courtid INTEGER PRIMARY KEY, address1 TEXT, address2 TEXT, city TEXT,
            state TEXT, zipcode TEXT, filingcity TEXT, phone TEXT);
         INSERT INTO f_court (courtid, address1, city, state, zipcode, filingcity, phone) VALUES
            (1, '123 Oak St', 'Springfield', 'IL', '62701', 'Springfield', '217-555-0100'),
            (2, '219 S. Dearborn St.', 'Chicago', 'IL', '60604', 'Chicago', '312-555-0100'),
            (3, '211 S Court St', 'Rockford', 'IL', '61101', 'Rockford', '815-555-0100'),
            (4, '123 Oak St', 'Oak Brook', 'IL', '60523', 'Springfield', '217-555-0101');",
    )
    .unwrap();

    let config = dir.join("db.courtsync.toml");
    std::fs::write(
        &config,
        format!(
            "[sources]\nfederal_db = 'courts.sqlite'\ngov_file = '{}'\n\n[output]\ndated = false\nxlsx = false\n",
            path_str(&fixture("locations_data.json"))
        ),
    )
    .unwrap();
    config
}

fn address_of(db: &Path, court_id: i64) -> (String, Option<String>, String) {
    let conn = Connection::open(db).unwrap();
    conn.query_row(
        "SELECT address1, address2, city FROM f_court WHERE courtid = ?1",
        [court_id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_writes_audit_files() {
    let out = tempdir().unwrap();
    let output = run_cmd(&[
        "run",
        path_str(&fixture("courts.courtsync.toml")),
        "--out",
        path_str(out.path()),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    for name in [
        "Gov_Data_Clean.csv",
        "Fed_Data_Clean.csv",
        "Gov_Federal_Merge_Data.csv",
        "result.csv",
        "update_plan.json",
    ] {
        assert!(out.path().join(name).exists(), "missing {name}");
    }

    let result = std::fs::read_to_string(out.path().join("result.csv")).unwrap();
    assert!(result.contains("Gov (Bankruptcy Court)"));
    assert!(result.contains("100 west main street, federal building, chicago, il, 60604"));

    let plan: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path().join("update_plan.json")).unwrap())
            .unwrap();
    assert_eq!(plan["meta"]["config_name"], "fixture courts");
    assert_eq!(plan["instructions"].as_array().unwrap().len(), 2);
    assert_eq!(plan["instructions"][0]["court_id"], "2");
    assert_eq!(plan["summary"]["not_found"], 1);
}

#[test]
fn run_json_prints_summary() {
    let out = tempdir().unwrap();
    let output = run_cmd(&[
        "run",
        path_str(&fixture("courts.courtsync.toml")),
        "--out",
        path_str(out.path()),
        "--json",
        "--quiet",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["federal_records"], 4);
    assert_eq!(json["summary"]["gov_records_kept"], 4);
    assert_eq!(json["summary"]["mismatches"], 2);
}

#[test]
fn run_strict_exits_5_when_records_need_attention() {
    let out = tempdir().unwrap();
    let output = run_cmd(&[
        "run",
        path_str(&fixture("courts.courtsync.toml")),
        "--out",
        path_str(out.path()),
        "--strict",
    ]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("3 records need attention"));
    // audit files are still written
    assert!(out.path().join("result.csv").exists());
}

#[test]
fn run_uses_dated_output_directory() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("dated.courtsync.toml");
    std::fs::write(
        &config,
        format!(
            "[sources]\nfederal_csv = '{}'\ngov_file = '{}'\n\n[output]\ndirectory = 'audit'\nxlsx = false\ncsv = true\n",
            path_str(&fixture("federal.csv")),
            path_str(&fixture("locations_data.json")),
        ),
    )
    .unwrap();

    let output = run_cmd(&["run", path_str(&config)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(dir.path().join("audit").join(today).join("result.csv").exists());
}

#[test]
fn run_invalid_config_exits_3() {
    let output = run_cmd(&["run", path_str(&fixture("invalid.courtsync.toml"))]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("deduplicate_columns"));
}

#[test]
fn run_missing_source_file_exits_4() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("missing.courtsync.toml");
    std::fs::write(&config, "[sources]\nfederal_csv = 'nope.csv'\ngov_file = 'nope.json'\n").unwrap();

    let output = run_cmd(&["run", path_str(&config), "--out", path_str(dir.path())]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("nope.csv"));
}

#[test]
fn run_without_sources_exits_2_with_hint() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("empty.courtsync.toml");
    std::fs::write(&config, "name = 'empty'\n").unwrap();

    let output = run_cmd(&["run", path_str(&config)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("hint:"));
}

#[test]
fn run_apply_requires_database() {
    let out = tempdir().unwrap();
    let output = run_cmd(&[
        "run",
        path_str(&fixture("courts.courtsync.toml")),
        "--out",
        path_str(out.path()),
        "--apply",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("federal_db"));
}

#[test]
fn run_apply_updates_database() {
    let dir = tempdir().unwrap();
    let config = database_workspace(dir.path());
    let db = dir.path().join("courts.sqlite");

    let output = run_cmd(&["run", path_str(&config), "--apply"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("out/update_plan.json").exists());

    assert_eq!(
        address_of(&db, 2),
        (
            "100 west main street".into(),
            Some("federal building".into()),
            "chicago".into()
        )
    );
    assert_eq!(address_of(&db, 4).2, "springfield");
    // no update for a matching record or one needing manual review
    assert_eq!(address_of(&db, 1).0, "123 Oak St");
    assert_eq!(address_of(&db, 3).0, "211 S Court St");
}

// ---------------------------------------------------------------------------
// apply / validate / fetch
// ---------------------------------------------------------------------------

#[test]
fn apply_plan_from_previous_run() {
    let dir = tempdir().unwrap();
    let config = database_workspace(dir.path());
    let db = dir.path().join("courts.sqlite");

    let output = run_cmd(&["run", path_str(&config)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(address_of(&db, 2).0, "219 S. Dearborn St.");

    let plan = dir.path().join("out/update_plan.json");
    let output = run_cmd(&["apply", path_str(&config), "--plan", path_str(&plan)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(address_of(&db, 2).0, "100 west main street");
}

#[test]
fn apply_failure_rolls_back_and_exits_7() {
    let dir = tempdir().unwrap();
    let config = database_workspace(dir.path());
    let db = dir.path().join("courts.sqlite");

    let output = run_cmd(&["run", path_str(&config)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    Connection::open(&db)
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER lock_oak_brook BEFORE UPDATE ON f_court WHEN old.courtid = 4
             BEGIN SELECT RAISE(ABORT, 'record locked'); END;",
        )
        .unwrap();

    let plan = dir.path().join("out/update_plan.json");
    let output = run_cmd(&["apply", path_str(&config), "--plan", path_str(&plan)]);
    assert_eq!(output.status.code(), Some(7));
    assert!(stderr(&output).contains("rolled back"));
    // courtid 2 comes first in the plan and must not have been kept
    assert_eq!(address_of(&db, 2).0, "219 S. Dearborn St.");
}

#[test]
fn validate_accepts_fixture_config() {
    let output = run_cmd(&["validate", path_str(&fixture("courts.courtsync.toml"))]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("valid: fixture courts"));
}

#[test]
fn validate_rejects_invalid_config() {
    let output = run_cmd(&["validate", path_str(&fixture("invalid.courtsync.toml"))]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn fetch_saves_locations() {
    use httpmock::prelude::*;

    let server = MockServer::start();
    let body = std::fs::read_to_string(fixture("locations_data.json")).unwrap();
    let locations: serde_json::Value = serde_json::from_str(&body).unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/search").query_param_exists("query");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({ "results": { "locations": locations } }));
    });

    let out = tempdir().unwrap();
    let output = run_cmd(&[
        "fetch",
        "--url",
        &server.url("/search"),
        "--out",
        path_str(out.path()),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.path().join("locations_data.json").exists());
    assert!(out.path().join("Gov_location_data.xlsx").exists());
}

#[test]
fn fetch_server_error_exits_6() {
    use httpmock::prelude::*;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(403);
    });

    let out = tempdir().unwrap();
    let output = run_cmd(&[
        "fetch",
        "--url",
        &server.url("/search"),
        "--out",
        path_str(out.path()),
    ]);
    assert_eq!(output.status.code(), Some(6));
    assert!(!out.path().join("locations_data.json").exists());
}
