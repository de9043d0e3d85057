use memo_core::db::{open_db, open_db_in_memory};
use memo_core::{
    Category, MemoDraft, MemoPatch, PersistencePort, PortOperation, RepoError,
    SqliteMemoRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_assigns_identity_and_fetch_all_returns_it() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();

    let draft = MemoDraft::new("회의 준비", "# 안건", Category::Work).with_tags(["회의", "팀"]);
    let created = repo.create(&draft).unwrap();
    assert_eq!(created.title, "회의 준비");
    assert_eq!(created.created_at, created.updated_at);

    let all = repo.fetch_all().unwrap();
    assert_eq!(all, vec![created]);
}

#[test]
fn tags_keep_insertion_order_through_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();

    let draft = MemoDraft::new("t", "c", Category::Study).with_tags(["z", "a", "m", "a"]);
    let created = repo.create(&draft).unwrap();

    let fetched = repo.fetch_all().unwrap();
    assert_eq!(fetched[0].id, created.id);
    assert_eq!(fetched[0].tags, vec!["z", "a", "m"]);
}

#[test]
fn update_applies_only_provided_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    let created = repo
        .create(&MemoDraft::new("주말 계획", "영화", Category::Personal).with_tags(["주말"]))
        .unwrap();

    let updated = repo
        .update(created.id, &MemoPatch::default().category(Category::Work))
        .unwrap();
    assert_eq!(updated.title, "주말 계획");
    assert_eq!(updated.category, Category::Work);
    assert_eq!(updated.tags, vec!["주말"]);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let retagged = repo
        .update(created.id, &MemoPatch::default().tags(["영화"]))
        .unwrap();
    assert_eq!(retagged.tags, vec!["영화"]);
    assert_eq!(repo.fetch_all().unwrap()[0].tags, vec!["영화"]);
}

#[test]
fn update_and_delete_of_unknown_id_fail() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    let missing = Uuid::new_v4();

    let err = repo
        .update(missing, &MemoPatch::default().title("x"))
        .unwrap_err();
    assert_eq!(err.operation, PortOperation::Update);

    let err = repo.delete(missing).unwrap_err();
    assert_eq!(err.operation, PortOperation::Delete);
}

#[test]
fn delete_cascades_tag_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let created = {
        let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
        let created = repo
            .create(&MemoDraft::new("t", "c", Category::Idea).with_tags(["a", "b"]))
            .unwrap();
        repo.delete(created.id).unwrap();
        created
    };

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memo_tags WHERE memo_uuid = ?1;",
            [created.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn clear_all_removes_every_memo() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    for idx in 0..3 {
        repo.create(&MemoDraft::new(format!("memo {idx}"), "c", Category::Other))
            .unwrap();
    }

    repo.clear_all().unwrap();
    assert!(repo.fetch_all().unwrap().is_empty());
}

#[test]
fn fetch_all_keeps_insertion_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    let ids: Vec<_> = (0..5)
        .map(|idx| {
            repo.create(&MemoDraft::new(format!("memo {idx}"), "c", Category::Work))
                .unwrap()
                .id
        })
        .collect();

    let fetched: Vec<_> = repo.fetch_all().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(fetched, ids);
}

#[test]
fn memos_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memos.sqlite3");

    let created = {
        let mut conn = open_db(&path).unwrap();
        let mut repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
        repo.create(&MemoDraft::new("t", "c", Category::Study))
            .unwrap()
    };

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.fetch_all().unwrap(), vec![created]);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteMemoRepository::try_new(&mut conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("memos")));
}
