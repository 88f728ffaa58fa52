use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fleet"))
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Config with two seed drivers and a Diesel price of 10.
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = dir.path().join("data").join("vehicle_data.db");
        let backups = dir.path().join("backups");
        let config = format!(
            r#"[store]
path = "{}"

[backup]
dir = "{}"

[FuelPrices]
diesel = 10

[[seed_drivers]]
name = "A"
plate = "X-1"
vehicle_class = "Truck"
fuel_type = "Diesel"

[[seed_drivers]]
name = "B"
plate = "X 2"
vehicle_class = "Truck"
fuel_type = "Diesel"
"#,
            store.display(),
            backups.display()
        );
        std::fs::write(dir.path().join("config.toml"), config).expect("write config");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store(&self) -> PathBuf {
        self.path().join("data").join("vehicle_data.db")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(bin())
            .args(args)
            .env("FLEET_CONFIG", self.path().join("config.toml"))
            .env_remove("FLEET_STORE")
            .env_remove("FLEET_LOG")
            .env_remove("RUST_LOG")
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .env("XDG_DATA_HOME", self.path().join("xdg-data"))
            .stdin(Stdio::null())
            .output()
            .expect("run fleet")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "fleet {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf8 stdout")
    }

    fn json(&self, args: &[&str]) -> Value {
        serde_json::from_str(&self.run_ok(args)).expect("json stdout")
    }

    fn driver_id(&self, plate: &str) -> i64 {
        let drivers = self.json(&["drivers", "list", "--json"]);
        drivers
            .as_array()
            .expect("array")
            .iter()
            .find(|d| d["plate"] == plate)
            .and_then(|d| d["id"].as_i64())
            .expect("driver present")
    }
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("exit code")
}

#[test]
fn test_seed_drivers_on_first_open() {
    let ws = Workspace::new();

    let drivers = ws.json(&["drivers", "list", "--json"]);

    let plates: Vec<&str> = drivers
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["plate"].as_str().unwrap())
        .collect();
    assert_eq!(plates, ["X-1", "X 2"]);
    assert!(ws.store().exists());
}

#[test]
fn test_records_and_stats_flow() {
    let ws = Workspace::new();
    let a = ws.driver_id("X-1").to_string();

    let first = ws.json(&[
        "records", "add", "--driver", &a, "--date", "2024-01-01", "--fuel-cost", "100", "--km",
        "50", "--json",
    ]);
    assert_eq!(first["plate"], "X-1");
    assert_eq!(first["fuel_type"], "Diesel");
    ws.run_ok(&[
        "records", "add", "--driver", &a, "--date", "2024-01-05", "--fuel-cost", "200", "--km",
        "150",
    ]);

    let records = ws.json(&["records", "list", &a, "--json"]);
    assert_eq!(records[0]["date"], "2024-01-05");
    assert_eq!(records[1]["date"], "2024-01-01");

    let stats = ws.json(&["stats", &a, "--json"]);
    assert_eq!(stats["total_distance"], 100.0);
    assert_eq!(stats["total_cost"], 300.0);
    assert_eq!(stats["avg_consumption"], 3.0);
    assert_eq!(stats["total_liters"], 30.0);

    let ranged = ws.json(&[
        "stats", &a, "--from", "2024-01-05", "--to", "2024-01-31", "--json",
    ]);
    assert_eq!(ranged["total_distance"], 0.0);
    assert_eq!(ranged["total_cost"], 200.0);
}

#[test]
fn test_edit_and_delete_record() {
    let ws = Workspace::new();
    let a = ws.driver_id("X-1").to_string();
    let record = ws.json(&[
        "records", "add", "--driver", &a, "--date", "2024-01-01", "--fuel-cost", "10", "--json",
    ]);
    let id = record["id"].as_i64().unwrap().to_string();

    let edited = ws.json(&["records", "edit", &id, "--service-type", "Oil", "--json"]);
    assert_eq!(edited["service_type"], "Oil");
    assert_eq!(edited["fuel_cost"], 10.0);

    ws.run_ok(&["records", "delete", &id]);
    let missing = ws.run(&["records", "delete", &id]);
    assert_eq!(exit_code(&missing), 3);
}

#[test]
fn test_error_exit_codes() {
    let ws = Workspace::new();
    let a = ws.driver_id("X-1").to_string();

    let unknown_driver = ws.run(&["records", "add", "--driver", "999", "--date", "2024-01-01"]);
    assert_eq!(exit_code(&unknown_driver), 3);
    assert!(String::from_utf8_lossy(&unknown_driver.stderr).contains("drivers list"));

    let bad_date = ws.run(&["records", "add", "--driver", &a, "--date", "01/02/2024"]);
    assert_eq!(exit_code(&bad_date), 4);

    let negative = ws.run(&[
        "records", "add", "--driver", &a, "--date", "2024-01-01", "--fuel-cost=-5",
    ]);
    assert_eq!(exit_code(&negative), 4);

    let empty_edit = ws.run(&["records", "edit", "1"]);
    assert_eq!(exit_code(&empty_edit), 4);
}

#[test]
fn test_apply_drivers_reconciles_and_rejects_duplicates() {
    let ws = Workspace::new();
    let a = ws.driver_id("X-1");
    let file = ws.path().join("drivers.json");

    std::fs::write(
        &file,
        format!(
            r#"[{{"id": {}, "name": "A2", "plate": "X-1", "vehicle_class": "Van", "fuel_type": "Diesel"}},
               {{"name": "C", "plate": "X-3", "vehicle_class": "Truck", "fuel_type": "Solar"}}]"#,
            a
        ),
    )
    .unwrap();
    let drivers = ws.json(&["drivers", "apply", file.to_str().unwrap(), "--json"]);
    let names: Vec<&str> = drivers
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A2", "C"]);

    std::fs::write(
        &file,
        r#"[{"name": "D", "plate": "X-9", "vehicle_class": "Truck", "fuel_type": "Solar"},
            {"name": "E", "plate": "X-9", "vehicle_class": "Truck", "fuel_type": "Solar"}]"#,
    )
    .unwrap();
    let duplicate = ws.run(&["drivers", "apply", file.to_str().unwrap()]);
    assert_eq!(exit_code(&duplicate), 5);
    assert_eq!(ws.json(&["drivers", "list", "--json"]).as_array().unwrap().len(), 2);

    std::fs::write(&file, "not json").unwrap();
    let malformed = ws.run(&["drivers", "apply", file.to_str().unwrap()]);
    assert_eq!(exit_code(&malformed), 4);
}

#[test]
fn test_emptied_driver_set_stays_empty() {
    let ws = Workspace::new();
    let file = ws.path().join("empty.json");
    std::fs::write(&file, "[]").unwrap();

    let applied = ws.json(&["drivers", "apply", file.to_str().unwrap(), "--json"]);
    assert!(applied.as_array().unwrap().is_empty());

    let drivers = ws.json(&["drivers", "list", "--json"]);
    assert_eq!(drivers.as_array().unwrap().len(), 0);
    ws.run_ok(&["check"]);
    assert_eq!(ws.json(&["drivers", "list", "--json"]).as_array().unwrap().len(), 0);
}

#[test]
fn test_backup_and_restore_round_trip() {
    let ws = Workspace::new();
    let snapshot = ws.run_ok(&["-q", "backup", "create"]);
    let snapshot = snapshot.trim().to_string();
    assert!(snapshot.contains("manual"));

    let file = ws.path().join("drivers.json");
    std::fs::write(
        &file,
        r#"[{"name": "Solo", "plate": "S-1", "vehicle_class": "Truck", "fuel_type": "Solar"}]"#,
    )
    .unwrap();
    ws.run_ok(&["drivers", "apply", file.to_str().unwrap()]);
    assert_eq!(ws.json(&["drivers", "list", "--json"]).as_array().unwrap().len(), 1);

    ws.run_ok(&["restore", &snapshot, "--yes"]);

    let conn = rusqlite::Connection::open(ws.store()).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM drivers", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);

    let backups = ws.json(&["backup", "list", "--json"]);
    let categories: Vec<&str> = backups
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["category"].as_str())
        .collect();
    assert!(categories.contains(&"manual"));
    assert!(categories.contains(&"auto_daily"));
    assert!(categories.contains(&"pre_restore_rescue"));
}

#[test]
fn test_restore_rejects_non_store_file() {
    let ws = Workspace::new();
    ws.driver_id("X-1");
    let bogus = ws.path().join("upload.xlsx");
    std::fs::write(&bogus, b"spreadsheet").unwrap();

    let output = ws.run(&["restore", bogus.to_str().unwrap(), "--yes"]);

    assert_eq!(exit_code(&output), 4);
    assert_eq!(ws.json(&["drivers", "list", "--json"]).as_array().unwrap().len(), 2);
}

#[test]
fn test_export_driver_and_all() {
    let ws = Workspace::new();
    let b = ws.driver_id("X 2").to_string();
    ws.run_ok(&[
        "records", "add", "--driver", &b, "--date", "2024-02-01", "--granit", "50", "--keramik",
        "100",
    ]);
    let out = ws.path().join("out");
    let out_str = out.to_str().unwrap();

    ws.run_ok(&["export", "driver", &b, "--output", out_str]);
    let single = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("export_X2_") && n.ends_with(".csv"))
        })
        .expect("driver export file");
    let contents = std::fs::read_to_string(single).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Date,Plate,Kilometer,Fuel Cost,Service Type,Service Cost,Granit (box),Keramik (box),Point"
    );
    assert!(lines.next().unwrap().starts_with("01-02-2024,X 2,"));

    let a = ws.driver_id("X-1").to_string();
    let none = ws.run(&["export", "driver", &a, "--output", out_str]);
    assert_eq!(exit_code(&none), 3);

    ws.run_ok(&["export", "all", "--output", out_str]);
    let all_dir = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.is_dir())
        .expect("all-drivers directory");
    assert!(all_dir
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("export_all_drivers_")));
    assert!(all_dir.join("B.csv").exists());
}

#[test]
fn test_check_reports_ok() {
    let ws = Workspace::new();

    let stdout = ws.run_ok(&["check"]);

    assert!(stdout.contains("Integrity check: OK"));
}
