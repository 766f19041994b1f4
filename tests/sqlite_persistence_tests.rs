#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use workday_cpm::{
    AutoScheduler, Dependency, DependencyType, Project, ProjectMetadata, ProjectStore,
    SqliteProjectStore, Task,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_project() -> Project {
    let mut project = Project::new(ProjectMetadata::new("SQLite Project", d(2026, 1, 5)));
    project.upsert_task(Task::new(10, "Design", 5));
    project.upsert_task(Task::new(2, "Build", 10).with_code("B"));
    project.upsert_task(Task::new(7, "Review", 0));
    project.push_dependency(Dependency::new(2, 10));
    project.push_dependency(Dependency::typed(7, 2, DependencyType::StartToFinish, 3));
    project
}

#[test]
fn empty_store_has_no_project() {
    let store = SqliteProjectStore::in_memory().unwrap();
    assert!(store.load_project().unwrap().is_none());
}

#[test]
fn sqlite_store_round_trip_project() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteProjectStore::new(file.path()).unwrap();

    let mut project = sample_project();
    AutoScheduler::default().run(&mut project).unwrap();
    store.save_project(&project).unwrap();

    // A fresh connection sees the committed data, task order included.
    let reopened = SqliteProjectStore::new(file.path()).unwrap();
    let loaded = reopened.load_project().unwrap().unwrap();
    assert_eq!(loaded, project);
    assert_eq!(
        loaded.tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![10, 2, 7]
    );
}

#[test]
fn saving_replaces_previous_project() {
    let store = SqliteProjectStore::in_memory().unwrap();
    store.save_project(&sample_project()).unwrap();

    let mut smaller = Project::starting(d(2026, 2, 2));
    smaller.upsert_task(Task::new(1, "Only", 1));
    store.save_project(&smaller).unwrap();

    let loaded = store.load_project().unwrap().unwrap();
    assert_eq!(loaded, smaller);
    assert!(loaded.dependencies.is_empty());
}

#[test]
fn run_with_store_persists_computed_fields() {
    let store = SqliteProjectStore::in_memory().unwrap();
    store.save_project(&sample_project()).unwrap();

    let report = AutoScheduler::default().run_with_store(&store).unwrap();
    let loaded = store.load_project().unwrap().unwrap();

    for detail in &report.tasks {
        let task = loaded.task(detail.task_id).unwrap();
        assert_eq!(task.earliest_start, Some(detail.earliest_start));
        assert_eq!(task.latest_finish, Some(detail.latest_finish));
        assert_eq!(task.is_critical, Some(detail.is_critical));
    }
}
