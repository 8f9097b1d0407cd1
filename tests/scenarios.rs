use std::sync::Arc;

use anotherpad::{
    Config, FileStore, FolderFilter, FolderStore, KeyValueStore, ManualClock, Note, NotePatch,
    NoteStore, SequentialIds, StoreContext, DEFAULT_FOLDER_COLOR,
};
use chrono::{Duration, TimeZone, Utc};
use tempfile::tempdir;

fn context(dir: &std::path::Path, clock: Arc<ManualClock>) -> StoreContext {
    let storage = FileStore::open(dir, None).unwrap();
    StoreContext::new(Arc::new(storage))
        .with_clock(clock)
        .with_ids(Arc::new(SequentialIds::new("rec")))
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 9, 30, 0).unwrap(),
    ))
}

#[test]
fn folder_filter_scenario() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), clock());
    let mut folders = FolderStore::open(ctx.clone());
    let mut notes = NoteStore::open(ctx);

    let work = folders.create_folder("Work", None);
    assert_eq!(work.color.as_deref(), Some(DEFAULT_FOLDER_COLOR));

    let loose = notes.create_note(Some("Loose"), None, None);
    let n = notes.create_note(Some("Plan"), None, Some(work.id.as_str()));

    notes.update_filters(|f| f.folder_id = FolderFilter::Only(work.id.clone()));
    let ids: Vec<_> = notes.filtered_notes().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![n.id.clone()]);

    notes.update_filters(|f| f.folder_id = FolderFilter::All);
    let mut ids: Vec<_> = notes.filtered_notes().into_iter().map(|n| n.id).collect();
    ids.sort();
    let mut expected = vec![loose.id, n.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn deleting_folder_leaves_dangling_note_reference() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), clock());
    let mut folders = FolderStore::open(ctx.clone());
    let mut notes = NoteStore::open(ctx);

    let folder = folders.create_folder("Archive", Some("#999999"));
    folders.select_folder(Some(folder.id.as_str()));
    let note = notes.create_note(None, None, Some(folder.id.as_str()));

    folders.delete_folder(&folder.id).unwrap();
    assert_eq!(folders.current_folder(), None);
    assert_eq!(folders.current_folder_id(), None);
    assert_eq!(
        notes.get_note(&note.id).unwrap().folder_id.as_deref(),
        Some(folder.id.as_str())
    );
}

#[test]
fn state_survives_reopen_on_disk() {
    let dir = tempdir().unwrap();
    let clock = clock();

    let (saved_notes, saved_folders, saved_filters) = {
        let ctx = context(dir.path(), clock.clone());
        let mut folders = FolderStore::open(ctx.clone());
        let mut notes = NoteStore::open(ctx);

        let home = folders.create_folder("Home", None);
        let a = notes.create_note(Some("A"), Some("first"), Some(home.id.as_str()));
        clock.advance(Duration::milliseconds(1500));
        notes.create_note(Some("B"), None, None);
        notes.update_note(
            &a.id,
            NotePatch {
                tags: Some(vec!["x".into(), "y".into()]),
                ..Default::default()
            },
        );
        notes.toggle_pin(&a.id);
        notes.update_filters(|f| f.search = "first".into());

        (
            notes.notes().to_vec(),
            folders.folders().to_vec(),
            notes.filters().clone(),
        )
    };

    let ctx = context(dir.path(), clock);
    let notes = NoteStore::open(ctx.clone());
    let folders = FolderStore::open(ctx);

    assert_eq!(notes.notes(), saved_notes.as_slice());
    assert_eq!(folders.folders(), saved_folders.as_slice());
    assert_eq!(notes.filters(), &saved_filters);
    assert_eq!(notes.filtered_notes().len(), 1);
}

#[test]
fn stored_layout_uses_iso_timestamps_and_camel_case() {
    let dir = tempdir().unwrap();
    let storage = Arc::new(FileStore::open(dir.path(), None).unwrap());
    let ctx = StoreContext::new(storage.clone()).with_clock(clock());
    let mut notes = NoteStore::open(ctx);
    notes.create_note(Some("Layout"), None, None);

    let blob = storage.get("anotherpad-notes").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let record = &value[0];
    assert_eq!(record["title"], "Layout");
    assert_eq!(record["createdAt"], "2024-09-01T09:30:00Z");
    assert_eq!(record["isPinned"], false);
    assert!(record.get("folderId").is_none());

    let parsed: Vec<Note> = serde_json::from_str(&blob).unwrap();
    assert_eq!(parsed, notes.notes());
}

#[test]
fn config_keys_route_blobs() {
    let dir = tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        notes_key: "work-notes".to_string(),
        folders_key: "work-folders".to_string(),
        filters_key: "work-filters".to_string(),
        default_folder_color: "#123456".to_string(),
        storage_quota_bytes: None,
    };
    let storage = Arc::new(FileStore::open(&config.data_dir, None).unwrap());
    let ctx = StoreContext::from_config(&config, storage.clone());

    let mut folders = FolderStore::open(ctx.clone());
    let mut notes = NoteStore::open(ctx);
    let folder = folders.create_folder("F", None);
    notes.create_note(None, None, None);

    assert_eq!(folder.color.as_deref(), Some("#123456"));
    assert!(storage.get("work-notes").unwrap().is_some());
    assert!(storage.get("work-folders").unwrap().is_some());
    assert!(storage.get("anotherpad-notes").unwrap().is_none());
}
