use std::fs;
use tempfile::TempDir;
use website_builder::config::BuilderConfig;
use website_builder::error::BuilderError;
use website_builder::store::FileStore;

fn open(temp: &TempDir) -> FileStore {
    FileStore::open(temp.path(), &BuilderConfig::default()).unwrap()
}

#[test]
fn test_two_write_scenario() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);

    store.write("a.txt", "v1", true).unwrap();
    store.write("a.txt", "v2", true).unwrap();

    let contents: Vec<&str> = store
        .get_versions("a.txt")
        .iter()
        .map(|r| r.content.as_str())
        .collect();
    assert_eq!(contents, vec!["v1", "v2"]);
    assert_eq!(store.list_backups(Some("a.txt")).unwrap().len(), 1);
    assert_eq!(store.read("a.txt").unwrap(), "v2");
}

#[test]
fn test_pipeline_filenames_under_output() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);

    for (name, body) in [
        ("output/index.html", "<h1>"),
        ("output/style.css", "h1{}"),
        ("output/script.js", ";"),
    ] {
        let path = store.write(name, body, true).unwrap();
        assert!(path.starts_with(temp.path()));
        assert_eq!(store.read(name).unwrap(), body);
    }
    assert_eq!(store.history().len(), 3);
}

#[test]
fn test_history_document_format() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);
    store.write("index.html", "<p>hi</p>", true).unwrap();

    let raw = fs::read_to_string(temp.path().join("versions/version_history.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &doc["index.html"][0];
    assert_eq!(record["content"], "<p>hi</p>");

    let timestamp = record["timestamp"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
}

#[test]
fn test_backup_is_noop_for_missing_file() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    assert!(store.backup("missing.txt").unwrap().is_none());
}

#[test]
fn test_backup_copy_matches_source() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);
    store.write("style.css", "a { }", true).unwrap();

    let backup = store.backup("style.css").unwrap().unwrap();

    assert!(backup.starts_with(temp.path().join("backups")));
    let name = backup.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("style.css.") && name.ends_with(".bak"));
    assert_eq!(fs::read(&backup).unwrap(), b"a { }");
}

#[test]
fn test_restore_version_bounds() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);
    store.write("a.txt", "v1", true).unwrap();
    store.write("a.txt", "v2", true).unwrap();

    store.restore_version("a.txt", 0).unwrap();
    assert_eq!(store.read("a.txt").unwrap(), "v1");

    let err = store.restore_version("a.txt", 2).unwrap_err();
    assert!(err.is_range());
    assert_eq!(store.read("a.txt").unwrap(), "v1");

    assert!(matches!(
        store.restore_version("never-written.txt", 0),
        Err(BuilderError::NoHistory(_))
    ));
}

#[test]
fn test_reopen_is_idempotent() {
    let temp = TempDir::new().unwrap();
    {
        let mut store = open(&temp);
        store.write("a.txt", "v1", true).unwrap();
    }
    let mut store = open(&temp);
    store.write("a.txt", "v2", true).unwrap();
    assert_eq!(store.get_versions("a.txt").len(), 2);
}

#[test]
fn test_current_dir_prefix_shares_history_and_backups() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);

    store.write("./css/style.css", "a{}", true).unwrap();
    store.write("css/style.css", "b{}", true).unwrap();

    assert_eq!(store.get_versions("./css/style.css").len(), 2);
    assert_eq!(store.list_backups(Some("./css/style.css")).unwrap().len(), 1);
    assert_eq!(store.read("./css/style.css").unwrap(), "b{}");
}
