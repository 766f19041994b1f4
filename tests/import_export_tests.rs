use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;
use workday_cpm::persistence::{
    JsonProjectFile, load_project_from_csv, load_project_from_json, save_project_to_csv,
    save_project_to_json,
};
use workday_cpm::{
    AutoScheduler, Dependency, DependencyType, PersistenceError, Project, ProjectMetadata,
    ProjectStore, Task,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_project() -> Project {
    let mut metadata = ProjectMetadata::new("Warehouse, phase 2", d(2026, 1, 5));
    metadata.project_description = "Fit-out and commissioning".into();
    let mut project = Project::new(metadata);
    project.upsert_task(Task::new(1, "Design", 3).with_code("D-1"));
    project.upsert_task(Task::new(2, "Build", 5));
    project.upsert_task(Task::new(3, "Inspect", 0));
    project.upsert_task(Task::new(4, "Handover", 1));
    project.push_dependency(Dependency::new(2, 1));
    project.push_dependency(Dependency::typed(3, 2, DependencyType::FinishToFinish, 1));
    project.push_dependency(Dependency::typed(4, 1, DependencyType::StartToStart, -2));
    project.push_dependency(Dependency::new(4, 3));
    AutoScheduler::default().run(&mut project).unwrap();
    project
}

#[test]
fn json_round_trip_keeps_everything() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("project.json");
    let project = sample_project();

    save_project_to_json(&project, &path).unwrap();
    let loaded = load_project_from_json(&path).unwrap();
    assert_eq!(loaded, project);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"type\": \"FF\""));
}

#[test]
fn json_without_computed_fields_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("minimal.json");
    fs::write(
        &path,
        r#"{
            "metadata": {"project_name": "Minimal", "project_start_date": "2026-01-01"},
            "tasks": [
                {"id": 1, "name": "A", "duration_days": 2},
                {"id": 2, "name": "B", "duration_days": 3}
            ],
            "dependencies": [{"successor_id": 2, "predecessor_id": 1}]
        }"#,
    )
    .unwrap();

    let mut project = load_project_from_json(&path).unwrap();
    assert_eq!(project.dependencies, vec![Dependency::new(2, 1)]);
    assert!(project.task(1).unwrap().earliest_start.is_none());

    let report = AutoScheduler::default().run(&mut project).unwrap();
    assert_eq!(report.project_end, d(2026, 1, 7));
}

#[test]
fn csv_round_trip_keeps_metadata_edges_and_dates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("project.csv");
    let project = sample_project();

    save_project_to_csv(&project, &path).unwrap();
    let loaded = load_project_from_csv(&path).unwrap();

    assert_eq!(loaded.metadata, project.metadata);
    assert_eq!(loaded.tasks, project.tasks);
    // Edges come back grouped by successor, in task order.
    assert_eq!(
        loaded.dependencies,
        vec![
            Dependency::new(2, 1),
            Dependency::typed(3, 2, DependencyType::FinishToFinish, 1),
            Dependency::typed(4, 1, DependencyType::StartToStart, -2),
            Dependency::new(4, 3),
        ]
    );

    let raw = fs::read_to_string(&path).unwrap();
    let mut lines = raw.lines();
    assert!(lines.next().unwrap().starts_with("#project,\"Warehouse, phase 2\",2026-01-05"));
    assert!(lines.next().unwrap().starts_with("id,name,code,duration_days,predecessors"));
    assert!(raw.contains("\"1SS-2,3\""));
}

#[test]
fn csv_without_computed_columns_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hand.csv");
    fs::write(
        &path,
        "#project,Hand written,2026-01-01,\n\
         id,name,code,duration_days,predecessors,earliest_start,earliest_finish,latest_start,latest_finish,float_days,is_critical\n\
         1,A,,2,,,,,,,\n\
         2,B,,3,1FS,,,,,,\n",
    )
    .unwrap();

    let mut project = load_project_from_csv(&path).unwrap();
    assert_eq!(project.metadata.project_name, "Hand written");
    assert_eq!(project.dependencies, vec![Dependency::new(2, 1)]);

    let report = AutoScheduler::default().run(&mut project).unwrap();
    assert_eq!(report.critical_path, vec![1, 2]);
}

#[test]
fn csv_with_bad_predecessor_is_invalid_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(
        &path,
        "#project,Bad,2026-01-01,\n\
         id,name,code,duration_days,predecessors,earliest_start,earliest_finish,latest_start,latest_finish,float_days,is_critical\n\
         1,A,,2,1XX,,,,,,\n",
    )
    .unwrap();

    let err = load_project_from_csv(&path).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}

#[test]
fn csv_without_metadata_row_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("headerless.csv");
    fs::write(&path, "id,name\n1,A\n").unwrap();
    assert!(matches!(
        load_project_from_csv(&path),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn saving_invalid_project_fails() {
    let dir = tempdir().unwrap();
    let mut project = sample_project();
    project.tasks.push(Task::new(1, "Duplicate", 1));

    let err = save_project_to_json(&project, dir.path().join("dup.json")).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert!(!dir.path().join("dup.json").exists());
}

#[test]
fn json_project_file_store_round_trip() {
    let dir = tempdir().unwrap();
    let store = JsonProjectFile::new(dir.path().join("store.json"));
    assert!(store.load_project().unwrap().is_none());

    let project = sample_project();
    store.save_project(&project).unwrap();
    assert_eq!(store.load_project().unwrap(), Some(project));
}
