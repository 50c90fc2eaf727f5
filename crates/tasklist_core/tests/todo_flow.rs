use tasklist_core::{
    open_in_memory_service, FilterMode, SqliteSlotRepository, TitleValidationError, TodoService,
    DEFAULT_STORAGE_KEY,
};

fn service() -> TodoService<SqliteSlotRepository> {
    open_in_memory_service(DEFAULT_STORAGE_KEY).unwrap()
}

#[test]
fn buy_milk_scenario() {
    let mut service = service();

    service.add_task("Buy milk").unwrap();
    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.tasks()[0].title, "Buy milk");
    assert!(!service.tasks()[0].completed);

    service.toggle_completed(0);
    assert!(service.tasks()[0].completed);

    service.set_filter(FilterMode::Pending);
    assert!(service.visible_tasks().is_empty());

    assert_eq!(service.clear_completed(), 1);
    assert!(service.tasks().is_empty());
    assert_eq!(service.bridge().load().unwrap(), Some(Vec::new()));
}

#[test]
fn invalid_titles_never_change_the_store() {
    let mut service = service();
    service.add_task("keep").unwrap();

    let cases = [
        ("", TitleValidationError::Empty),
        (" ", TitleValidationError::SurroundingWhitespace),
        (" x", TitleValidationError::SurroundingWhitespace),
        ("x ", TitleValidationError::SurroundingWhitespace),
        ("a\nb", TitleValidationError::LineBreak),
    ];
    for (candidate, expected) in cases {
        assert_eq!(service.add_task(candidate), Err(expected), "{candidate:?}");
    }
    assert_eq!(service.tasks().len(), 1);
}

#[test]
fn valid_titles_grow_the_store_by_one() {
    let mut service = service();
    for (count, title) in ["a", "two words", "tabs\tinside", "ünïcödé"].iter().enumerate() {
        service.add_task(title).unwrap();
        assert_eq!(service.tasks().len(), count + 1);
        let added = service.tasks().last().unwrap();
        assert_eq!(added.title, *title);
        assert!(!added.completed);
        assert!(!added.editing);
    }
}

#[test]
fn visible_tasks_match_each_filter_mode() {
    let mut service = service();
    for title in ["a", "b", "c", "d", "e"] {
        service.add_task(title).unwrap();
    }
    service.toggle_completed(0);
    service.toggle_completed(3);

    service.set_filter(FilterMode::All);
    assert_eq!(service.visible_tasks().len(), 5);

    service.set_filter(FilterMode::Pending);
    let pending = service.visible_tasks();
    assert_eq!(pending.len(), 3);
    assert!(pending.iter().all(|task| !task.completed));

    service.set_filter(FilterMode::Completed);
    let completed: Vec<_> = service
        .visible_tasks()
        .iter()
        .map(|task| task.title.clone())
        .collect();
    assert_eq!(completed, vec!["a", "d"]);
}

#[test]
fn editing_moves_between_tasks_exclusively() {
    let mut service = service();
    for title in ["a", "b", "c"] {
        service.add_task(title).unwrap();
    }

    service.begin_edit(0);
    service.begin_edit(2);
    let editing: Vec<_> = service.tasks().iter().map(|task| task.editing).collect();
    assert_eq!(editing, vec![false, false, true]);

    service.commit_edit(2, "  c renamed ");
    assert_eq!(service.tasks()[2].title, "c renamed");
    assert!(service.tasks().iter().all(|task| !task.editing));
}

#[test]
fn positions_from_a_filtered_view_address_the_right_task() {
    let mut service = service();
    for title in ["a", "b", "c"] {
        service.add_task(title).unwrap();
    }
    service.toggle_completed(0);
    service.set_filter(FilterMode::Pending);

    let target = service
        .visible_entries()
        .iter()
        .find(|entry| entry.task.title == "c")
        .map(|entry| entry.position)
        .unwrap();
    service.delete_task(target);

    let titles: Vec<_> = service.tasks().iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[test]
fn subscribers_observe_changes_in_order() {
    use std::sync::{Arc, Mutex};

    let mut service = service();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    service.subscribe(move |tasks| {
        sink.lock()
            .unwrap()
            .push(tasks.iter().filter(|task| task.completed).count());
    });

    service.add_task("a").unwrap();
    service.toggle_completed(0);
    service.set_filter(FilterMode::Completed);
    service.clear_completed();

    assert_eq!(*log.lock().unwrap(), vec![0, 1, 0]);
}
