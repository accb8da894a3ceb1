use rowlog::dataset::Dataset;
use rowlog::models::LogRow;
use rowlog::Error;
use std::fs;
use tempfile::tempdir;

fn row(filename: &str, delta: u32, position: Option<(f64, f64)>) -> LogRow {
    LogRow {
        filename: filename.to_string(),
        start_time: 1_700_000_000,
        delta,
        distance: 0.1 * delta as f32,
        strokerate: 26,
        heartrate: 155,
        longitude: position.map(|p| p.0),
        latitude: position.map(|p| p.1),
    }
}

#[test]
fn test_missing_dataset_is_empty() {
    let dir = tempdir().unwrap();
    let dataset = Dataset::load(dir.path().join("none.csv")).unwrap();
    assert!(dataset.is_empty());
}

#[test]
fn test_save_then_load_preserves_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("training_logs.csv");
    let rows = vec![
        row("a.pb", 300, None),
        row("a.pb", 333, Some((139.6917, 35.6895))),
        row("b.pb", 7, Some((0.0, 0.0))),
    ];

    Dataset::from_rows(rows.clone()).save(&path).unwrap();
    let loaded = Dataset::load(&path).unwrap();

    assert_eq!(loaded.rows(), rows.as_slice());
    assert!(!dir.path().join("nested").join("training_logs.csv.partial").exists());
}

#[test]
fn test_empty_dataset_saves_header_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("training_logs.csv");

    Dataset::new().save(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "filename,startTime,delta,distance,strokerate,heartrate,longitude,latitude\n"
    );
    assert!(Dataset::load(&path).unwrap().is_empty());
}

#[test]
fn test_save_overwrites_in_full() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("training_logs.csv");

    Dataset::from_rows(vec![row("a.pb", 1, None), row("a.pb", 2, None)])
        .save(&path)
        .unwrap();
    Dataset::from_rows(vec![row("b.pb", 1, None)]).save(&path).unwrap();

    let loaded = Dataset::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.rows()[0].filename, "b.pb");
}

#[test]
fn test_merge_with_existing_internal_duplicates() {
    let mut dataset = Dataset::from_rows(vec![
        row("a.pb", 1, None),
        row("a.pb", 1, None),
        row("a.pb", 2, None),
    ]);
    let stats = dataset.merge(vec![row("a.pb", 2, None), row("a.pb", 3, None)]);

    assert_eq!(dataset.len(), 3);
    assert_eq!(stats.existing_rows, 2);
    assert_eq!(stats.duplicate_rows, 1);
    assert_eq!(stats.total_rows, 3);
}

#[test]
fn test_null_and_zero_coordinates_are_distinct_rows() {
    let mut dataset = Dataset::from_rows(vec![row("a.pb", 1, None)]);
    dataset.merge(vec![row("a.pb", 1, Some((0.0, 0.0)))]);
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_unexpected_header_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("training_logs.csv");
    fs::write(&path, "filename,startTime\nx.pb,1\n").unwrap();

    let err = Dataset::load(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidDataset(_)));
}

#[test]
fn test_malformed_row_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("training_logs.csv");
    fs::write(
        &path,
        "filename,startTime,delta,distance,strokerate,heartrate,longitude,latitude\n\
         a.pb,soon,1,1.0,20,120,,\n",
    )
    .unwrap();

    assert!(matches!(Dataset::load(&path), Err(Error::Csv(_))));
}
