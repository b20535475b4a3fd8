use memopad::db::*;
use tempfile::TempDir;

fn test_db() -> (TempDir, MemoDB) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = MemoDB::open(tmp.path().join("memos.db")).expect("open store");
    (tmp, db)
}

fn memo(title: &str, body: &str, tag: &str) -> MemoInput {
    MemoInput::new(title, body, tag).created_at("2024-06-10 12:30:00")
}

#[test]
fn inserted_memo_reads_back_equal() {
    let (_tmp, db) = test_db();
    let input = memo("Groceries", "milk, eggs", "home");
    let id = db.insert(&input).unwrap();

    let expected = input.normalized().unwrap();
    let got = db.get(id).unwrap().expect("memo present");
    assert_eq!(got.id, id);
    assert_eq!(got.created_at, expected.created_at);
    assert_eq!(got.title, expected.title);
    assert_eq!(got.body, expected.body);
    assert_eq!(got.tag, expected.tag);
}

#[test]
fn blank_fields_get_placeholders() {
    let (_tmp, db) = test_db();
    let id = db.insert(&MemoInput::new("", "  ", "")).unwrap();
    let got = db.get(id).unwrap().unwrap();
    assert_eq!(got.title, NO_TITLE);
    assert_eq!(got.body, NO_BODY);
    assert_eq!(got.tag, NO_TAG);
    assert!(!got.created_at.is_empty());
}

#[test]
fn initialize_keeps_existing_rows() {
    let (_tmp, db) = test_db();
    db.insert(&memo("keep me", "b", "t")).unwrap();
    db.initialize().unwrap();
    db.initialize().unwrap();
    assert_eq!(db.count(), 1);
}

#[test]
fn delete_removes_exactly_one() {
    let (_tmp, db) = test_db();
    let a = db.insert(&memo("a", "b", "t")).unwrap();
    let b = db.insert(&memo("b", "b", "t")).unwrap();
    assert_eq!(db.count(), 2);

    assert!(db.delete(a).unwrap());
    assert!(db.get(a).unwrap().is_none());
    assert!(db.get(b).unwrap().is_some());
    assert_eq!(db.count(), 1);

    assert!(!db.delete(a).unwrap(), "second delete is a no-op");
    assert!(!db.delete(0).unwrap());
    assert_eq!(db.count(), 1);
}

#[test]
fn groceries_scenario() {
    let (_tmp, db) = test_db();
    let id = db.insert(&MemoInput::new("Groceries", "milk, eggs", "home")).unwrap();
    assert_eq!(id, 1);
    assert_eq!(db.count(), 1);

    assert!(db.update_tag(1, "errand").unwrap());
    assert_eq!(db.get(1).unwrap().unwrap().tag, "#errand");

    assert_eq!(db.delete_all().unwrap(), 1);
    assert_eq!(db.count(), 0);

    let next = db.insert(&MemoInput::new("Again", "b", "t")).unwrap();
    assert!(next > 1, "id sequencing must not reset, got {next}");
}

#[test]
fn ids_not_reused_after_deleting_newest() {
    let (_tmp, db) = test_db();
    db.insert(&memo("a", "b", "t")).unwrap();
    let last = db.insert(&memo("b", "b", "t")).unwrap();
    db.delete(last).unwrap();
    let next = db.insert(&memo("c", "b", "t")).unwrap();
    assert!(next > last);
}

#[test]
fn last_n_newest_first() {
    let (_tmp, db) = test_db();
    for i in 1..=3 {
        db.insert(&memo(&format!("memo {i}"), "b", "t")).unwrap();
    }
    let last = db.last_n(DEFAULT_LAST_N).unwrap();
    assert_eq!(last.len(), 3);
    let titles: Vec<_> = last.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["memo 3", "memo 2", "memo 1"]);
}

#[test]
fn last_n_caps_at_n() {
    let (_tmp, db) = test_db();
    for i in 0..8 {
        db.insert(&memo(&format!("m{i}"), "b", "t")).unwrap();
    }
    let last = db.last_n(5).unwrap();
    assert_eq!(last.len(), 5);
    assert_eq!(last[0].title, "m7");
    assert!(db.last_n(0).unwrap().is_empty());
}

#[test]
fn empty_store_views() {
    let (_tmp, db) = test_db();
    assert!(db.recent().unwrap().is_none());
    assert!(db.last_n(5).unwrap().is_empty());
    assert!(db.list_all().unwrap().is_empty());
    assert_eq!(db.count(), 0);
}

#[test]
fn recent_and_all_ordering() {
    let (_tmp, db) = test_db();
    let first = db.insert(&memo("first", "b", "t")).unwrap();
    let second = db.insert(&memo("second", "b", "t")).unwrap();
    assert_eq!(db.recent().unwrap().unwrap().id, second);
    let all: Vec<_> = db.list_all().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(all, vec![first, second]);
}

#[test]
fn update_each_field() {
    let (_tmp, db) = test_db();
    let id = db.insert(&memo("title", "body", "tag")).unwrap();

    assert!(db.update_title(id, "New title").unwrap());
    assert!(db.update_body(id, "line one\nline two").unwrap());
    assert!(db.update_tag(id, "#work").unwrap());

    let got = db.get(id).unwrap().unwrap();
    assert_eq!(got.title, "New title");
    assert_eq!(got.body, "line one\nline two");
    assert_eq!(got.tag, "#work");
    assert_ne!(got.created_at, "2024-06-10 12:30:00", "edit resets the timestamp");
}

#[test]
fn update_out_of_range_is_noop() {
    let (_tmp, db) = test_db();
    let id = db.insert(&memo("title", "body", "tag")).unwrap();
    assert!(!db.update_title(0, "x").unwrap());
    assert!(!db.update_body(-1, "x").unwrap());
    assert!(!db.update_tag(id + 10, "x").unwrap());
    assert_eq!(db.count(), 1);
    assert_eq!(db.get(id).unwrap().unwrap().title, "title");
}

#[test]
fn update_survivor_after_earlier_delete() {
    let (_tmp, db) = test_db();
    let a = db.insert(&memo("a", "b", "t")).unwrap();
    db.insert(&memo("b", "b", "t")).unwrap();
    let c = db.insert(&memo("c", "b", "t")).unwrap();
    db.delete(a).unwrap();
    // c's id is above the row count now but the row exists
    assert!(db.update_title(c, "still here").unwrap());
}

#[test]
fn insert_rejects_malformed_timestamp() {
    let (_tmp, db) = test_db();
    let err = db.insert(&MemoInput::new("t", "b", "x").created_at("10/06/2024")).unwrap_err();
    assert_eq!(err.kind(), memopad::error::ErrorKind::ValidationFailed);
    assert_eq!(db.count(), 0);
}

#[test]
fn operations_on_missing_store_are_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let db = MemoDB::new(tmp.path().join("gone.db"));
    for err in [
        db.insert(&memo("t", "b", "x")).unwrap_err(),
        db.get(1).unwrap_err(),
        db.list_all().unwrap_err(),
        db.delete_all().unwrap_err(),
    ] {
        assert!(err.is_unavailable(), "{err}");
    }
    assert_eq!(db.count(), 0);
}

#[test]
fn garbage_file_is_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("memos.db");
    std::fs::write(&path, b"this is definitely not an sqlite file, just some text").unwrap();
    let db = MemoDB::new(&path);
    assert!(db.list_all().unwrap_err().is_unavailable());
    assert_eq!(db.count(), 0);
}

#[test]
fn memos_serialize_for_export() {
    let (_tmp, db) = test_db();
    db.insert(&memo("Export me", "body", "io")).unwrap();
    let json = serde_json::to_value(db.list_all().unwrap()).unwrap();
    assert_eq!(json[0]["title"], "Export me");
    assert_eq!(json[0]["tag"], "#io");
    assert_eq!(json[0]["id"], 1);
}
