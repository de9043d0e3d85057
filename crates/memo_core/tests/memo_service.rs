use memo_core::db::open_db_in_memory;
use memo_core::{
    Category, CategoryFilter, InMemoryPersistence, Memo, MemoDraft, MemoError, MemoPatch,
    MemoService, PersistencePort, PortOperation, SqliteMemoRepository,
};

/// Two-memo board: a work memo without tags and a personal memo tagged 주말.
fn seeded_board() -> (MemoService<InMemoryPersistence>, Memo, Memo) {
    let mut service = MemoService::new(InMemoryPersistence::new());
    let work = service
        .create_memo(MemoDraft::new("회의 준비", "내일 팀 미팅 안건", Category::Work))
        .unwrap();
    let personal = service
        .create_memo(
            MemoDraft::new("주말 계획", "친구들과 영화", Category::Personal).with_tags(["주말"]),
        )
        .unwrap();
    (service, work, personal)
}

fn visible_titles(service: &MemoService<InMemoryPersistence>) -> Vec<String> {
    service
        .view()
        .visible
        .iter()
        .map(|memo| memo.title.clone())
        .collect()
}

fn assert_counts_consistent(service: &MemoService<InMemoryPersistence>) {
    let view = service.view();
    let sum: usize = view.category_counts.iter().map(|(_, count)| count).sum();
    assert_eq!(sum, view.total_count);
    for category in Category::ALL {
        let expected = service
            .store()
            .memos()
            .iter()
            .filter(|memo| memo.category == category)
            .count();
        assert_eq!(view.category_counts.get(category), expected);
    }
}

#[test]
fn category_filter_narrows_visible_but_not_counts() {
    let (mut service, _, _) = seeded_board();

    let view = service.set_category_filter(CategoryFilter::Only(Category::Work));
    assert_eq!(view.visible_count, 1);
    assert_eq!(view.total_count, 2);
    assert_eq!(view.category_counts.get(Category::Work), 1);
    assert_eq!(view.category_counts.get(Category::Personal), 1);
    assert_eq!(view.category_counts.get(Category::Study), 0);
    assert_eq!(view.category_counts.get(Category::Idea), 0);
    assert_eq!(view.category_counts.get(Category::Other), 0);
    assert_eq!(visible_titles(&service), vec!["회의 준비"]);
}

#[test]
fn plain_search_finds_memo_by_title() {
    let (mut service, _, _) = seeded_board();

    let view = service.set_search("주말");
    assert_eq!(view.visible_count, 1);
    assert_eq!(visible_titles(&service), vec!["주말 계획"]);
}

#[test]
fn tag_marker_and_plain_search_agree_when_term_is_only_a_tag() {
    let (mut service, _, _) = seeded_board();

    service.set_search("#주말");
    let tagged = visible_titles(&service);
    service.set_search("주말");
    let plain = visible_titles(&service);

    assert_eq!(tagged, vec!["주말 계획"]);
    assert_eq!(tagged, plain);
}

#[test]
fn tag_marker_ignores_title_and_content_matches() {
    let (mut service, _, _) = seeded_board();
    service
        .create_memo(MemoDraft::new("주말 장보기", "마트", Category::Other))
        .unwrap();

    service.set_search("주말");
    assert_eq!(service.view().visible_count, 2);

    service.set_search("#주말");
    assert_eq!(visible_titles(&service), vec!["주말 계획"]);
}

#[test]
fn delete_updates_counts() {
    let (mut service, work, _) = seeded_board();

    service.delete_memo(work.id).unwrap();
    let view = service.view();
    assert_eq!(view.category_counts.get(Category::Work), 0);
    assert_eq!(view.category_counts.get(Category::Personal), 1);
    assert_eq!(view.total_count, 1);
    assert_counts_consistent(&service);
}

#[test]
fn category_change_moves_count_between_buckets() {
    let (mut service, work, personal) = seeded_board();
    service.delete_memo(work.id).unwrap();

    let updated = service
        .update_memo(personal.id, MemoPatch::default().category(Category::Work))
        .unwrap();
    assert_eq!(updated.category, Category::Work);
    assert!(updated.updated_at > personal.updated_at);

    let view = service.view();
    assert_eq!(view.category_counts.get(Category::Work), 1);
    assert_eq!(view.category_counts.get(Category::Personal), 0);
    assert_eq!(view.total_count, 1);
    assert_counts_consistent(&service);
}

#[test]
fn failed_delete_keeps_store_and_view() {
    let (mut service, work, _) = seeded_board();
    let store_before = service.store().clone();
    let view_before = service.view().clone();

    service.port_mut().fail_on(PortOperation::Delete);
    let err = service.delete_memo(work.id).unwrap_err();

    match err {
        MemoError::Persistence(failure) => assert_eq!(failure.operation, PortOperation::Delete),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.store(), &store_before);
    assert_eq!(service.view(), &view_before);
    assert_eq!(service.view().total_count, 2);
}

#[test]
fn failed_create_and_update_leave_everything_unchanged() {
    let (mut service, work, _) = seeded_board();
    service.set_search("회의");
    let store_before = service.store().clone();
    let view_before = service.view().clone();

    service.port_mut().fail_on(PortOperation::Create);
    service.port_mut().fail_on(PortOperation::Update);

    let err = service
        .create_memo(MemoDraft::new("회의록", "정리", Category::Work))
        .unwrap_err();
    assert!(matches!(err, MemoError::Persistence(_)));

    let err = service
        .update_memo(work.id, MemoPatch::default().title("바뀐 제목"))
        .unwrap_err();
    assert!(matches!(err, MemoError::Persistence(_)));

    assert_eq!(service.store(), &store_before);
    assert_eq!(service.view(), &view_before);
    assert_eq!(service.port().memos().len(), 2);
}

#[test]
fn failed_clear_all_keeps_collection() {
    let (mut service, _, _) = seeded_board();
    service.port_mut().fail_on(PortOperation::ClearAll);

    assert!(service.clear_all().is_err());
    assert_eq!(service.view().total_count, 2);

    service.port_mut().recover(PortOperation::ClearAll);
    service.clear_all().unwrap();
    assert_eq!(service.view().total_count, 0);
    assert_eq!(service.view().category_counts.total(), 0);
}

#[test]
fn reset_is_idempotent_and_shows_everything() {
    let (mut service, _, _) = seeded_board();
    service.set_category_filter(CategoryFilter::Only(Category::Study));
    service.set_search("없는 검색어");
    assert_eq!(service.view().visible_count, 0);
    assert!(service.filter().is_active());

    let once = service.reset_filters().clone();
    let twice = service.reset_filters().clone();
    assert_eq!(once, twice);
    assert_eq!(once.visible_count, once.total_count);
    assert!(!service.filter().is_active());
}

#[test]
fn active_filters_survive_mutations() {
    let (mut service, _, _) = seeded_board();
    service.set_category_filter(CategoryFilter::Only(Category::Work));

    service
        .create_memo(MemoDraft::new("프로젝트 계획", "일정", Category::Work))
        .unwrap();
    service
        .create_memo(MemoDraft::new("독서 목록", "책", Category::Personal))
        .unwrap();

    assert_eq!(
        visible_titles(&service),
        vec!["프로젝트 계획", "회의 준비"]
    );
    assert_eq!(service.view().total_count, 4);
    assert_counts_consistent(&service);
}

#[test]
fn unknown_id_is_reported_for_update_and_delete() {
    let (mut service, work, _) = seeded_board();
    service.delete_memo(work.id).unwrap();

    assert_eq!(
        service.delete_memo(work.id).unwrap_err(),
        MemoError::NotFound(work.id)
    );
    assert_eq!(
        service
            .update_memo(work.id, MemoPatch::default().title("x"))
            .unwrap_err(),
        MemoError::NotFound(work.id)
    );
}

#[test]
fn load_replaces_collection_from_port() {
    let (service, _, _) = seeded_board();
    let port = service.into_port();

    let mut reloaded = MemoService::new(port);
    assert_eq!(reloaded.view().total_count, 0);
    assert_eq!(reloaded.load().unwrap(), 2);
    assert_eq!(reloaded.view().total_count, 2);
    assert_eq!(
        reloaded.view().visible[0].title,
        "주말 계획",
        "newest memo comes first"
    );
}

#[test]
fn get_memo_reads_confirmed_state() {
    let (mut service, work, _) = seeded_board();
    assert_eq!(service.get_memo(work.id), Some(&work));

    service.port_mut().fail_on(PortOperation::Update);
    let _ = service.update_memo(work.id, MemoPatch::default().title("미반영"));
    assert_eq!(service.get_memo(work.id).unwrap().title, "회의 준비");
}

#[test]
fn sqlite_backed_service_round_trips_through_reload() {
    let mut conn = open_db_in_memory().unwrap();
    let created_id = {
        let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
        let mut service = MemoService::new(repo);
        service.load().unwrap();
        let draft = MemoDraft::new("React 프로젝트", "시작", Category::Work).with_tags(["react"]);
        let memo = service.create_memo(draft).unwrap();
        service
            .update_memo(memo.id, MemoPatch::default().tags(["react", "javascript"]))
            .unwrap();
        memo.id
    };

    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.fetch_all().unwrap().len(), 1);

    let mut service = MemoService::new(repo);
    service.load().unwrap();
    service.set_search("#script");
    assert_eq!(service.view().visible_count, 1);
    assert_eq!(service.view().visible[0].id, created_id);
    assert_eq!(
        service.view().visible[0].tags,
        vec!["react".to_string(), "javascript".to_string()]
    );
}
