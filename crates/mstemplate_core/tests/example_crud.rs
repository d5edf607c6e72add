use chrono::{DateTime, TimeZone, Timelike, Utc};
use mstemplate_core::db::migrations::latest_version;
use mstemplate_core::db::open_db_in_memory;
use mstemplate_core::{
    DataServiceError, Example, ExampleDataService, ExamplePatch, SqliteExampleDataService,
    Transactional,
};
use rusqlite::Connection;

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
}

#[test]
fn create_assigns_id_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();

    let created = store
        .create(&Example::new("first", true, created_at()))
        .unwrap();
    assert!(created.id > 0);

    let loaded = store.find_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "first");
    assert!(loaded.useful);
    assert_eq!(loaded.created_at, created_at());
    assert!(loaded.is_active());
}

#[test]
fn update_replaces_mutable_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let mut example = store
        .create(&Example::new("draft", false, created_at()))
        .unwrap();

    example.name = "final".to_string();
    example.useful = true;
    example.created_at = Utc::now();
    let updated = store.update(&example).unwrap();

    assert_eq!(updated.name, "final");
    assert!(updated.useful);
    assert_eq!(updated.created_at, created_at());
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();

    let mut missing = Example::new("missing", false, created_at());
    missing.id = 42;
    let err = store.update(&missing).unwrap_err();
    assert!(matches!(err, DataServiceError::NotFound(42)));
}

#[test]
fn update_properties_touches_only_patched_columns() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let example = store
        .create(&Example::new("keep-name", false, created_at()))
        .unwrap();

    store
        .update_properties(
            example.id,
            &ExamplePatch {
                name: None,
                useful: Some(true),
            },
        )
        .unwrap();

    let loaded = store.find_by_id(example.id).unwrap().unwrap();
    assert_eq!(loaded.name, "keep-name");
    assert!(loaded.useful);
    assert_eq!(loaded.created_at, created_at());
}

#[test]
fn logical_deletion_hides_from_actives_but_keeps_record() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let kept = store
        .create(&Example::new("kept", false, created_at()))
        .unwrap();
    let retired = store
        .create(&Example::new("retired", false, created_at()))
        .unwrap();

    let deactivated_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    store.logical_deletion(retired.id, deactivated_at).unwrap();

    let actives = store.find_actives().unwrap();
    assert_eq!(actives.len(), 1);
    assert_eq!(actives[0].id, kept.id);

    let all = store.find_all().unwrap();
    assert_eq!(all.len(), 2);
    let loaded = store.find_by_id(retired.id).unwrap().unwrap();
    assert_eq!(loaded.deactivated_at, Some(deactivated_at));
    assert!(store.find_by_name("retired").unwrap().is_none());
}

#[test]
fn deactivated_name_can_be_reused() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let old = store
        .create(&Example::new("reused", false, created_at()))
        .unwrap();
    store.logical_deletion(old.id, Utc::now()).unwrap();

    let fresh = store
        .create(&Example::new("reused", true, created_at()))
        .unwrap();
    assert_ne!(fresh.id, old.id);
    assert_eq!(store.find_by_name("reused").unwrap().unwrap().id, fresh.id);
}

#[test]
fn active_name_collision_is_rejected_by_unique_index() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    store
        .create(&Example::new("unique", false, created_at()))
        .unwrap();

    let err = store
        .create(&Example::new("unique", true, created_at()))
        .unwrap_err();
    assert!(matches!(err, DataServiceError::Db(_)));
}

#[test]
fn delete_removes_row_and_rejects_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let example = store
        .create(&Example::new("gone", false, created_at()))
        .unwrap();

    store.delete(example.id).unwrap();
    assert!(store.find_by_id(example.id).unwrap().is_none());

    let err = store.delete(example.id).unwrap_err();
    assert!(matches!(err, DataServiceError::NotFound(id) if id == example.id));
}

#[test]
fn find_all_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    for name in ["c", "a", "b"] {
        store
            .create(&Example::new(name, false, created_at()))
            .unwrap();
    }

    let names = store
        .find_all()
        .unwrap()
        .into_iter()
        .map(|example| example.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["c", "a", "b"]);
}

#[test]
fn blank_name_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();

    let err = store
        .create(&Example::new(" ", false, created_at()))
        .unwrap_err();
    assert!(matches!(err, DataServiceError::Validation(_)));
    assert!(store.find_all().unwrap().is_empty());
}

#[test]
fn rollback_discards_writes_inside_transaction() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();

    store.begin().unwrap();
    store
        .create(&Example::new("temporary", false, created_at()))
        .unwrap();
    store.rollback().unwrap();
    assert!(store.find_all().unwrap().is_empty());

    store.begin().unwrap();
    store
        .create(&Example::new("durable", false, created_at()))
        .unwrap();
    store.commit().unwrap();
    assert_eq!(store.find_all().unwrap().len(), 1);
}

#[test]
fn data_service_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteExampleDataService::try_new(&conn);
    match result {
        Err(DataServiceError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn data_service_rejects_connection_without_examples_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteExampleDataService::try_new(&conn);
    assert!(matches!(
        result,
        Err(DataServiceError::MissingRequiredTable("examples"))
    ));
}

#[test]
fn data_service_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE examples (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            useful INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteExampleDataService::try_new(&conn);
    assert!(matches!(
        result,
        Err(DataServiceError::MissingRequiredColumn {
            table: "examples",
            column: "deactivated_at"
        })
    ));
}

#[test]
fn timestamps_are_stored_with_millisecond_precision() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let precise = created_at().with_nanosecond(123_456_789).unwrap();
    let millis = Utc.timestamp_millis_opt(precise.timestamp_millis()).unwrap();

    let created = store.create(&Example::new("precise", true, precise)).unwrap();
    assert_eq!(created.created_at, millis);

    store.logical_deletion(created.id, precise).unwrap();
    let loaded = store.find_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.created_at, millis);
    assert_eq!(loaded.deactivated_at, Some(millis));
}

#[test]
fn inactive_record_keeps_its_name_after_reuse() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteExampleDataService::try_new(&conn).unwrap();
    let mut retired = store
        .create(&Example::new("alpha", false, created_at()))
        .unwrap();
    store.logical_deletion(retired.id, created_at()).unwrap();
    store
        .create(&Example::new("alpha", false, created_at()))
        .unwrap();

    retired.useful = true;
    let updated = store.update(&retired).unwrap();
    assert_eq!(updated.name, "alpha");
    assert!(updated.useful);
}
