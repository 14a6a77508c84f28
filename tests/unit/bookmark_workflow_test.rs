//! Unit tests for the BookmarkWorkflow: duplicate detection, grouping,
//! owner isolation and signed-out behavior.

use page_bookmarks::database::Database;
use page_bookmarks::managers::bookmark_store::BookmarkStoreTrait;
use page_bookmarks::managers::bookmark_workflow::BookmarkWorkflow;
use page_bookmarks::types::bookmark::{BookmarkDraft, DuplicateKind, UNCATEGORIZED_LABEL};
use page_bookmarks::types::errors::BookmarkError;
use page_bookmarks::types::settings::TableSettings;
use rstest::rstest;

const A: Option<i64> = Some(1);
const B: Option<i64> = Some(2);

fn setup() -> Database {
    Database::open_in_memory(&TableSettings::default()).expect("Failed to open in-memory database")
}

fn names(bookmarks: &[page_bookmarks::types::bookmark::Bookmark]) -> Vec<&str> {
    bookmarks.iter().map(|b| b.name.as_str()).collect()
}

#[rstest]
#[case::name_only("X", "u9", DuplicateKind::NameOnly)]
#[case::url_only("Z", "u1", DuplicateKind::UrlOnly)]
#[case::name_and_url("X", "u1", DuplicateKind::NameAndUrl)]
fn test_save_rejects_duplicates(#[case] name: &str, #[case] url: &str, #[case] expected: DuplicateKind) {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);
    wf.save(A, "X", "u1", None).unwrap();

    let before = wf.store().list_bookmarks(1).unwrap();
    let err = wf.save(A, name, url, None).unwrap_err();

    assert_eq!(err, BookmarkError::Duplicate(expected));
    assert_eq!(err.duplicate_kind(), Some(expected));
    assert_eq!(wf.store().list_bookmarks(1).unwrap(), before);
}

#[test]
fn test_save_new_bookmark_gets_fresh_id_and_is_listed() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let first = wf.save(A, "X", "u1", None).unwrap().unwrap();
    let saved = wf.save(A, "New", "u3", None).unwrap().expect("owner present");

    assert_ne!(saved.id, first.id);
    assert_eq!(saved.name, "New");
    assert_eq!(saved.url, "u3");
    assert_eq!(saved.user_id, 1);

    let listed = wf.store().list_bookmarks(1).unwrap();
    assert!(listed.iter().any(|b| b.bookmark == saved));
}

#[test]
fn test_duplicates_are_per_owner() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    wf.save(A, "X", "u1", None).unwrap();
    let other = wf.save(B, "X", "u1", None).unwrap();
    assert!(other.is_some(), "another owner may save the same name and url");
}

#[test]
fn test_save_accepts_empty_name() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let saved = wf.save(A, "", "https://panel.test/", None).unwrap().unwrap();
    assert_eq!(saved.name, "");

    // A second unnamed bookmark collides on the empty name
    let err = wf.save(A, "", "https://panel.test/other", None).unwrap_err();
    assert_eq!(err, BookmarkError::Duplicate(DuplicateKind::NameOnly));
}

#[test]
fn test_save_into_folder() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let work = wf.create_folder(A, "Work").unwrap().unwrap();
    let saved = wf.save(A, "Orders", "https://panel.test/orders", Some(&work.id)).unwrap().unwrap();
    assert_eq!(saved.folder_id.as_deref(), Some(work.id.as_str()));
}

#[test]
fn test_save_into_another_users_folder_fails_without_writing() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let bobs = wf.create_folder(B, "Bob's").unwrap().unwrap();
    let err = wf.save(A, "Orders", "https://panel.test/orders", Some(&bobs.id)).unwrap_err();
    assert!(matches!(err, BookmarkError::FolderNotFound(_)));
    assert!(wf.group_by_folder(A).unwrap().is_empty());
}

#[test]
fn test_save_draft_defaults_url_to_current_page() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let draft = BookmarkDraft {
        name: Some("Orders".to_string()),
        url: None,
        folder_id: Some(String::new()),
    };
    let saved = wf
        .save_draft(A, draft, "https://panel.test/orders")
        .unwrap()
        .unwrap();
    assert_eq!(saved.url, "https://panel.test/orders");
    assert_eq!(saved.folder_id, None);

    let again = BookmarkDraft { name: Some("Orders (copy)".to_string()), ..Default::default() };
    let err = wf.save_draft(A, again, "https://panel.test/orders").unwrap_err();
    assert_eq!(err, BookmarkError::Duplicate(DuplicateKind::UrlOnly));
}

#[test]
fn test_grouping_example() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let work = wf.create_folder(A, "Work").unwrap().unwrap();
    wf.save(A, "Y", "u2", Some(&work.id)).unwrap();
    wf.save(A, "X", "u1", None).unwrap();

    let groups = wf.group_by_folder(A).unwrap();
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![UNCATEGORIZED_LABEL, "Work"]);
    assert_eq!(names(&groups[UNCATEGORIZED_LABEL]), vec!["X"]);
    assert_eq!(names(&groups["Work"]), vec!["Y"]);
}

#[test]
fn test_group_order_follows_first_bookmark_by_name() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let reports = wf.create_folder(A, "Reports").unwrap().unwrap();
    let admin = wf.create_folder(A, "Admin").unwrap().unwrap();
    wf.save(A, "b-sales", "https://panel.test/sales", Some(&reports.id)).unwrap();
    wf.save(A, "c-users", "https://panel.test/users", Some(&admin.id)).unwrap();
    wf.save(A, "a-home", "https://panel.test/", None).unwrap();
    wf.save(A, "d-churn", "https://panel.test/churn", Some(&reports.id)).unwrap();

    let groups = wf.group_by_folder(A).unwrap();
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![UNCATEGORIZED_LABEL, "Reports", "Admin"]);
    assert_eq!(names(&groups["Reports"]), vec!["b-sales", "d-churn"]);
}

#[test]
fn test_grouping_is_idempotent() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let work = wf.create_folder(A, "Work").unwrap().unwrap();
    wf.save(A, "one", "https://1.test", Some(&work.id)).unwrap();
    wf.save(A, "two", "https://2.test", None).unwrap();
    wf.save(A, "three", "https://3.test", Some(&work.id)).unwrap();

    let first = wf.group_by_folder(A).unwrap();
    let second = wf.group_by_folder(A).unwrap();
    assert_eq!(first, second);
    assert!(first.keys().eq(second.keys()));
}

#[test]
fn test_folders_sharing_a_name_share_a_group() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let first = wf.create_folder(A, "Work").unwrap().unwrap();
    let second = wf.create_folder(A, "Work").unwrap().unwrap();
    wf.save(A, "one", "https://1.test", Some(&first.id)).unwrap();
    wf.save(A, "two", "https://2.test", Some(&second.id)).unwrap();

    let groups = wf.group_by_folder(A).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups["Work"]), vec!["one", "two"]);
}

#[test]
fn test_owners_are_isolated() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    wf.save(A, "mine", "https://a.test", None).unwrap();

    assert!(wf.group_by_folder(B).unwrap().is_empty());
    assert!(wf.store().list_bookmarks(2).unwrap().is_empty());
}

#[test]
fn test_delete_foreign_bookmark_is_a_no_op() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let bobs = wf.save(B, "theirs", "https://b.test", None).unwrap().unwrap();

    assert!(!wf.delete_bookmark(A, &bobs.id).unwrap());
    assert_eq!(names(&wf.group_by_folder(B).unwrap()[UNCATEGORIZED_LABEL]), vec!["theirs"]);

    assert!(wf.delete_bookmark(B, &bobs.id).unwrap());
    assert!(wf.group_by_folder(B).unwrap().is_empty());
}

#[test]
fn test_signed_out_user_gets_empty_results_and_no_writes() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let mine = wf.save(A, "mine", "https://a.test", None).unwrap().unwrap();

    assert!(wf.group_by_folder(None).unwrap().is_empty());
    assert!(wf.available_folders(None).unwrap().is_empty());
    assert_eq!(wf.save(None, "x", "https://x.test", None).unwrap(), None);
    assert_eq!(wf.create_folder(None, "Work").unwrap(), None);
    assert!(!wf.delete_bookmark(None, &mine.id).unwrap());

    assert_eq!(wf.store().bookmarks_count(1).unwrap(), 1);
    assert_eq!(wf.store().bookmark_folders_count(1).unwrap(), 0);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
fn test_create_folder_requires_a_name(#[case] name: &str) {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);
    let err = wf.create_folder(A, name).unwrap_err();
    assert!(matches!(err, BookmarkError::InvalidName(_)));
}

#[test]
fn test_create_folder_name_length_limit() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let at_limit = "é".repeat(255);
    assert!(wf.create_folder(A, &at_limit).unwrap().is_some());

    let too_long = "a".repeat(256);
    let err = wf.create_folder(A, &too_long).unwrap_err();
    assert!(matches!(err, BookmarkError::InvalidName(_)));
}

#[test]
fn test_available_folders_maps_id_to_name() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let work = wf.create_folder(A, "Work").unwrap().unwrap();
    let home = wf.create_folder(A, "Home").unwrap().unwrap();
    wf.create_folder(B, "Elsewhere").unwrap();

    let folders = wf.available_folders(A).unwrap();
    assert_eq!(folders.len(), 2);
    assert_eq!(folders[&work.id], "Work");
    assert_eq!(folders[&home.id], "Home");
    let labels: Vec<&str> = folders.values().map(String::as_str).collect();
    assert_eq!(labels, vec!["Home", "Work"]);
}

#[test]
fn test_delete_folder_regroups_bookmarks_as_uncategorized() {
    let db = setup();
    let mut wf = BookmarkWorkflow::new(&db);

    let work = wf.create_folder(A, "Work").unwrap().unwrap();
    wf.save(A, "orders", "https://panel.test/orders", Some(&work.id)).unwrap();

    assert!(!wf.delete_folder(B, &work.id).unwrap());
    assert!(wf.delete_folder(A, &work.id).unwrap());

    let groups = wf.group_by_folder(A).unwrap();
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![UNCATEGORIZED_LABEL]);
}

#[test]
fn test_workflow_honors_custom_table_names() {
    let tables = TableSettings {
        bookmarks: "pb_bookmarks".to_string(),
        bookmark_folders: "pb_bookmark_folders".to_string(),
    };
    let db = Database::open_in_memory(&tables).unwrap();
    let mut wf = BookmarkWorkflow::new(&db);

    let work = wf.create_folder(A, "Work").unwrap().unwrap();
    wf.save(A, "orders", "https://panel.test/orders", Some(&work.id)).unwrap();
    assert_eq!(
        wf.save(A, "orders", "https://panel.test/x", None).unwrap_err(),
        BookmarkError::Duplicate(DuplicateKind::NameOnly)
    );

    let count: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM pb_bookmarks", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
