use std::path::Path;

use fleet_core::backup::BackupCategory;
use fleet_core::storage::{DriverDraft, FuelRecordPatch, LedgerStore, NewFuelRecord};
use fleet_core::{
    BackupManager, CsvDirectoryWriter, ExportComposer, FleetError, FleetLedger, PriceTable,
    SqliteStore, TomlPriceFile,
};
use tempfile::TempDir;

fn open_ledger(dir: &Path, prices: PriceTable) -> FleetLedger<SqliteStore, PriceTable> {
    let store_path = dir.join("vehicle_data.db");
    let store = SqliteStore::open(&store_path).expect("open should succeed");
    let backups = BackupManager::new(&store_path, BackupManager::default_dir_for(&store_path))
        .expect("backup dir should be created");
    FleetLedger::new(store, backups, prices, ExportComposer::default())
}

fn driver_a(ledger: &FleetLedger<SqliteStore, PriceTable>) -> i64 {
    let drivers = ledger
        .reconcile_drivers(&[DriverDraft::new("A", "X-1", "Truck", "Diesel")])
        .expect("reconcile should succeed");
    drivers[0].id
}

#[test]
fn test_stats_scenario() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new().with_price("Diesel", 10.0));
    let a = driver_a(&ledger);

    ledger
        .add_record(
            &NewFuelRecord::new(a, "2024-01-01", "X-1", "Diesel")
                .fuel_cost(100.0)
                .kilometer(50.0),
        )
        .unwrap();
    ledger
        .add_record(
            &NewFuelRecord::new(a, "2024-01-05", "X-1", "Diesel")
                .fuel_cost(200.0)
                .kilometer(150.0),
        )
        .unwrap();

    let stats = ledger.stats(a, None).unwrap();

    assert_eq!(stats.total_distance, 100.0);
    assert_eq!(stats.total_cost, 300.0);
    assert_eq!(stats.avg_consumption, 3.0);
    assert_eq!(stats.total_liters, 30.0);
}

#[test]
fn test_stats_read_prices_fresh_from_file() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("vehicle_data.db");
    let config = dir.path().join("config.toml");
    let store = SqliteStore::open(&store_path).unwrap();
    let backups = BackupManager::new(&store_path, dir.path().join("backups")).unwrap();
    let ledger = FleetLedger::new(
        store,
        backups,
        TomlPriceFile::new(&config),
        ExportComposer::default(),
    );
    let a = ledger
        .reconcile_drivers(&[DriverDraft::new("A", "X-1", "Truck", "Solar")])
        .unwrap()[0]
        .id;
    ledger
        .add_record(&NewFuelRecord::new(a, "2024-01-01", "X-1", "Solar").fuel_cost(100.0))
        .unwrap();

    assert_eq!(ledger.stats(a, None).unwrap().total_liters, 0.0);

    std::fs::write(&config, "[FuelPrices]\nsolar = 4\n").unwrap();
    assert_eq!(ledger.stats(a, None).unwrap().total_liters, 25.0);
}

#[test]
fn test_mutations_take_one_daily_backup() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    let a = driver_a(&ledger);

    let record = ledger
        .add_record(&NewFuelRecord::new(a, "2024-01-01", "X-1", "Diesel"))
        .unwrap();
    ledger
        .update_record(
            record.id,
            &FuelRecordPatch {
                fuel_cost: Some(5.0),
                ..FuelRecordPatch::default()
            },
        )
        .unwrap();

    let backups = ledger.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].category, Some(BackupCategory::AutoDaily));
}

#[test]
fn test_failed_daily_backup_is_reported_after_commit() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    std::fs::remove_dir_all(ledger.backups().backup_dir()).unwrap();

    let result = ledger.reconcile_drivers(&[DriverDraft::new("A", "X-1", "Truck", "Diesel")]);

    match result {
        Err(FleetError::Storage(message)) => assert!(message.contains("automatic backup")),
        other => panic!("expected a storage error, got {:?}", other),
    }
    let drivers = ledger.drivers().unwrap();
    assert_eq!(drivers.len(), 1);

    let added = ledger.add_record(&NewFuelRecord::new(drivers[0].id, "2024-01-01", "X-1", "Diesel"));
    assert!(matches!(added, Err(FleetError::Storage(_))));
    assert_eq!(ledger.records(drivers[0].id, None).unwrap().len(), 1);
}

#[test]
fn test_update_and_delete_missing_record_are_not_found() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    let patch = FuelRecordPatch {
        kilometer: Some(1.0),
        ..FuelRecordPatch::default()
    };

    assert!(matches!(
        ledger.update_record(77, &patch),
        Err(FleetError::NotFound(_))
    ));
    assert!(matches!(ledger.delete_record(77), Err(FleetError::NotFound(_))));
    assert!(ledger.list_backups().unwrap().is_empty());
}

#[test]
fn test_update_returns_stored_record() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    let a = driver_a(&ledger);
    let record = ledger
        .add_record(&NewFuelRecord::new(a, "2024-01-01", "X-1", "Diesel").fuel_cost(10.0))
        .unwrap();

    let updated = ledger
        .update_record(
            record.id,
            &FuelRecordPatch {
                date: Some("2024-01-02".to_string()),
                ..FuelRecordPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.date, "2024-01-02");
    assert_eq!(updated.fuel_cost, 10.0);
}

#[test]
fn test_manual_backups_are_distinct() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());

    let first = ledger.manual_backup().unwrap();
    let second = ledger.manual_backup().unwrap();

    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
}

#[test]
fn test_restore_with_wrong_extension_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    driver_a(&ledger);
    let before = std::fs::read(ledger.backups().store_path()).unwrap();
    let bogus = dir.path().join("upload.xlsx");
    std::fs::write(&bogus, b"not a store").unwrap();

    let result = ledger.restore(&bogus);

    assert!(matches!(result, Err(FleetError::InvalidBackup(_))));
    assert_eq!(std::fs::read(ledger.backups().store_path()).unwrap(), before);
    assert_eq!(ledger.drivers().unwrap().len(), 1);
}

#[test]
fn test_restore_brings_back_earlier_state() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    let a = driver_a(&ledger);
    let snapshot = ledger.manual_backup().unwrap();

    ledger
        .reconcile_drivers(&[
            DriverDraft::new("A", "X-1", "Truck", "Diesel").with_id(a),
            DriverDraft::new("B", "X-2", "Truck", "Diesel"),
        ])
        .unwrap();
    assert_eq!(ledger.drivers().unwrap().len(), 2);

    let rescue = ledger.restore(&snapshot).unwrap();

    assert_eq!(ledger.drivers().unwrap().len(), 1);
    assert!(rescue.exists());
    let categories: Vec<_> = ledger
        .list_backups()
        .unwrap()
        .into_iter()
        .filter_map(|b| b.category)
        .collect();
    assert!(categories.contains(&BackupCategory::PreRestoreRescue));
}

#[test]
fn test_export_all_skips_drivers_without_records() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    let drivers = ledger
        .reconcile_drivers(&[
            DriverDraft::new("Budi Santoso", "X-1", "Truck", "Solar"),
            DriverDraft::new("Empty", "X-2", "Truck", "Solar"),
        ])
        .unwrap();
    ledger
        .add_record(
            &NewFuelRecord::new(drivers[0].id, "2024-02-01", "X-1", "Solar").loads(50.0, 100.0),
        )
        .unwrap();

    let sheets = ledger.export_all(None).unwrap();

    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].label, "BudiSantoso");
    assert_eq!(sheets[0].rows[0].date, "01-02-2024");
    assert_eq!(sheets[0].rows[0].point, 1.0);

    let mut writer = CsvDirectoryWriter::new(dir.path().join("export")).unwrap();
    for sheet in &sheets {
        sheet.write_to(&mut writer).unwrap();
    }
    assert_eq!(writer.written().len(), 1);
    assert!(dir.path().join("export").join("BudiSantoso.csv").exists());
}

#[test]
fn test_export_driver_without_records_is_not_found() {
    let dir = TempDir::new().unwrap();
    let ledger = open_ledger(dir.path(), PriceTable::new());
    let a = driver_a(&ledger);

    assert!(matches!(
        ledger.export_driver(a, None),
        Err(FleetError::NotFound(_))
    ));
    assert!(ledger.store().list_drivers().unwrap().len() == 1);
}
