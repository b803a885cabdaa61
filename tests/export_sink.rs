use std::fs;
use std::path::PathBuf;

use keyed_core::transmittal::{
    export_table, sanitize_file_name, DelimitedFileSink, ExportError, ExportReceipt,
    PrimaryDescriptor, SecondaryDescriptor, TableLayout, TableSink, TransmittalBuilder,
    TransmittalConfig, TransmittalTable,
};
use keyed_core::types::SecondaryId;
use tempfile::tempdir;

fn make_table(current_label: &str) -> TransmittalTable {
    let primaries = vec![
        PrimaryDescriptor::new("A101", ["A101", "Wall Plan"], Some(SecondaryId::new(2))),
        PrimaryDescriptor::new("A102", ["A102", "Roof, North"], None),
    ];
    let secondaries = vec![SecondaryDescriptor::new(1, "A"), SecondaryDescriptor::new(2, "B")];

    let mut config = TransmittalConfig::v0();
    config.current_label = current_label.to_string();
    TransmittalBuilder::new(config)
        .build(&primaries, &secondaries, |key: &str, id: SecondaryId| {
            (key == "A101" && id.get() == 1).then(|| "A".to_string())
        })
        .unwrap()
}

fn read_grid(path: &std::path::Path, delimiter: u8) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_export_writes_header_and_rows() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    let table = make_table("Current");

    let mut sink = DelimitedFileSink::new(&target);
    let receipt = export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap();

    assert_eq!(read_grid(&target, b'\t'), table.to_matrix());
    assert_eq!(receipt.path, target);
    assert_eq!(receipt.rows, 2);
    assert_eq!(receipt.columns, 5);
    assert_eq!(receipt.table_version, table.version());
    assert_eq!(receipt.layout, table.column_layout(&TransmittalConfig::v0()));
    assert_eq!(receipt.layout.header_height, 150);
    assert_eq!(receipt.layout.columns.len(), receipt.columns);

    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "temp file must be renamed away");
}

#[test]
fn test_export_overwrites_existing_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    let mut sink = DelimitedFileSink::new(&target);

    export_table(&mut sink, &make_table("Current"), &TransmittalConfig::v0()).unwrap();
    let second = make_table("Now");
    export_table(&mut sink, &second, &TransmittalConfig::v0()).unwrap();

    let grid = read_grid(&target, b'\t');
    assert_eq!(grid[0][2], "Now");
    assert_eq!(grid, second.to_matrix());
}

#[test]
fn test_comma_delimiter_quotes_embedded_commas() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.csv");
    let table = make_table("Current");

    let mut sink = DelimitedFileSink::new(&target).delimiter(b',');
    export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap();

    let raw = fs::read_to_string(&target).unwrap();
    assert!(raw.contains("\"Roof, North\""));
    assert_eq!(read_grid(&target, b','), table.to_matrix());
}

#[test]
fn test_receipt_sidecar() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    let table = make_table("Current");

    let mut sink = DelimitedFileSink::new(&target).with_receipt(true);
    let receipt = export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap();

    assert_eq!(sink.receipt_path(), dir.path().join("Doctrans.receipt.json"));
    let f = fs::File::open(sink.receipt_path()).unwrap();
    let stored: ExportReceipt = serde_json::from_reader(f).unwrap();
    assert_eq!(stored, receipt);
}

#[test]
fn test_failed_receipt_staging_leaves_target_untouched() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    fs::write(&target, "previous issue\n").unwrap();
    // a directory squatting on the receipt's temp name makes staging fail
    fs::create_dir(dir.path().join(".Doctrans.receipt.json.tmp")).unwrap();
    let table = make_table("Current");

    let mut sink = DelimitedFileSink::new(&target).with_receipt(true);
    let err = export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));

    assert_eq!(fs::read_to_string(&target).unwrap(), "previous issue\n");
    assert!(!dir.path().join(".Doctrans.tsv.tmp").exists());
    assert!(!sink.receipt_path().exists());
}

#[test]
fn test_unwritable_receipt_is_locked_before_writing() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    let table = make_table("Current");

    let mut sink = DelimitedFileSink::new(&target).with_receipt(true);
    fs::create_dir(sink.receipt_path()).unwrap();

    let err = export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap_err();
    assert!(matches!(err, ExportError::Locked(ref p) if p == &sink.receipt_path()));
    assert!(!target.exists());
}

#[test]
fn test_receipt_rename_failure_names_persisted_grid() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    let table = make_table("Current");
    let config = TransmittalConfig::v0();

    let mut sink = DelimitedFileSink::new(&target).with_receipt(true);
    fs::create_dir(sink.receipt_path()).unwrap();

    // skip the access check so the receipt fails only at its final rename
    let err = sink.write(&table, &table.column_layout(&config)).unwrap_err();
    assert!(matches!(err, ExportError::ReceiptNotPersisted { ref grid, .. } if grid == &target));

    assert_eq!(read_grid(&target, b'\t'), table.to_matrix());
    assert!(!dir.path().join(".Doctrans.receipt.json.tmp").exists());
}

#[test]
fn test_missing_directory_reported_before_writing() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("absent").join("Doctrans.tsv");
    let table = make_table("Current");

    let mut sink = DelimitedFileSink::new(&target);
    let err = export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap_err();
    assert!(matches!(err, ExportError::MissingDirectory(ref p) if p == &dir.path().join("absent")));

    // the table survives the failure; retry elsewhere without rebuilding
    let mut retry = DelimitedFileSink::new(dir.path().join("Doctrans.tsv"));
    export_table(&mut retry, &table, &TransmittalConfig::v0()).unwrap();
}

#[test]
fn test_unwritable_target_is_locked() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Doctrans.tsv");
    fs::create_dir(&target).unwrap();

    let sink = DelimitedFileSink::new(&target);
    assert!(matches!(sink.check_access(), Err(ExportError::Locked(ref p)) if p == &target));
}

struct RefusingSink {
    writes: usize,
}

impl TableSink for RefusingSink {
    fn check_access(&self) -> Result<(), ExportError> {
        Err(ExportError::Locked(PathBuf::from("held-open.xlsx")))
    }

    fn write(
        &mut self,
        _table: &TransmittalTable,
        _layout: &TableLayout,
    ) -> Result<ExportReceipt, ExportError> {
        self.writes += 1;
        unreachable!("write must not run after a failed access check")
    }
}

#[test]
fn test_access_check_runs_before_write() {
    let table = make_table("Current");
    let mut sink = RefusingSink { writes: 0 };

    let err = export_table(&mut sink, &table, &TransmittalConfig::v0()).unwrap_err();
    assert!(matches!(err, ExportError::Locked(_)));
    assert_eq!(sink.writes, 0);
}

#[test]
fn test_sanitize_file_name() {
    assert_eq!(sanitize_file_name("A101 (B) - Plan: Level 1/2?", None), "A101 (B) - Plan Level 12");
    assert_eq!(sanitize_file_name("a<b>c|d\"e^f*g\\h", Some('_')), "a_b_c_d_e_f_g_h");
    assert_eq!(sanitize_file_name("plain.tsv", None), "plain.tsv");
}

#[test]
fn test_in_directory_sanitizes_name() {
    let dir = tempdir().unwrap();
    let sink = DelimitedFileSink::in_directory(dir.path(), "Doc/trans?.tsv");
    assert_eq!(sink.path(), dir.path().join("Doctrans.tsv"));
}
