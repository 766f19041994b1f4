use super::{PersistenceError, PersistenceResult, ProjectStore};
use crate::dependency::{self, Dependency};
use crate::metadata::ProjectMetadata;
use crate::project::Project;
use crate::task::Task;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

const METADATA_TAG: &str = "#project";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn save_project_to_json<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    super::validate_project(project)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, project)?;
    Ok(())
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let project: Project = serde_json::from_reader(file)?;
    super::validate_project(&project)?;
    Ok(project)
}

/// A JSON snapshot on disk used as a [`ProjectStore`].
#[derive(Debug, Clone)]
pub struct JsonProjectFile {
    path: PathBuf,
}

impl JsonProjectFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStore for JsonProjectFile {
    fn save_project(&self, project: &Project) -> PersistenceResult<()> {
        save_project_to_json(project, &self.path)
    }

    fn load_project(&self) -> PersistenceResult<Option<Project>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_project_from_json(&self.path).map(Some)
    }
}

#[derive(Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    name: String,
    code: String,
    duration_days: i64,
    predecessors: String,
    earliest_start: String,
    earliest_finish: String,
    latest_start: String,
    latest_finish: String,
    float_days: String,
    is_critical: String,
}

impl TaskCsvRecord {
    fn from_task(task: &Task, dependencies: &[Dependency]) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            code: task.code.clone(),
            duration_days: task.duration_days,
            predecessors: dependency::format_predecessor_list(task.id, dependencies),
            earliest_start: format_date(task.earliest_start),
            earliest_finish: format_date(task.earliest_finish),
            latest_start: format_date(task.latest_start),
            latest_finish: format_date(task.latest_finish),
            float_days: format_option(task.float_days),
            is_critical: format_option(task.is_critical),
        }
    }

    fn into_task(self) -> PersistenceResult<(Task, Vec<Dependency>)> {
        let dependencies = dependency::parse_predecessor_list(self.id, &self.predecessors)?;
        let mut task = Task::new(self.id, self.name, self.duration_days).with_code(self.code);
        task.earliest_start = parse_date(&self.earliest_start)?;
        task.earliest_finish = parse_date(&self.earliest_finish)?;
        task.latest_start = parse_date(&self.latest_start)?;
        task.latest_finish = parse_date(&self.latest_finish)?;
        task.float_days = parse_i64(&self.float_days)?;
        task.is_critical = parse_bool(&self.is_critical)?;
        Ok((task, dependencies))
    }
}

/// Write the project as CSV: a `#project` metadata row, a header row, then
/// one row per task with its incoming edges in predecessor notation.
///
/// Edges whose successor is not a task in the project have no row to live on
/// and are not written.
pub fn save_project_to_csv<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    super::validate_project(project)?;
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    let start = project.start_date().format(DATE_FORMAT).to_string();
    writer.write_record([
        METADATA_TAG,
        project.metadata.project_name.as_str(),
        start.as_str(),
        project.metadata.project_description.as_str(),
    ])?;
    writer.write_record([
        "id",
        "name",
        "code",
        "duration_days",
        "predecessors",
        "earliest_start",
        "earliest_finish",
        "latest_start",
        "latest_finish",
        "float_days",
        "is_critical",
    ])?;
    for task in &project.tasks {
        writer.serialize(TaskCsvRecord::from_task(task, &project.dependencies))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_project_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut records = reader.records();

    let metadata_row = records
        .next()
        .ok_or_else(|| PersistenceError::InvalidData("CSV file is empty".into()))??;
    let metadata = parse_metadata(&metadata_row)?;

    let header = records
        .next()
        .ok_or_else(|| PersistenceError::InvalidData("CSV file has no header row".into()))??;

    let mut project = Project::new(metadata);
    for record in records {
        let record: TaskCsvRecord = record?.deserialize(Some(&header))?;
        let (task, dependencies) = record.into_task()?;
        project.tasks.push(task);
        project.dependencies.extend(dependencies);
    }

    super::validate_project(&project)?;
    Ok(project)
}

fn parse_metadata(row: &StringRecord) -> PersistenceResult<ProjectMetadata> {
    if row.get(0) != Some(METADATA_TAG) {
        return Err(PersistenceError::InvalidData(format!(
            "expected '{METADATA_TAG}' metadata row"
        )));
    }
    let start = row
        .get(2)
        .ok_or_else(|| PersistenceError::InvalidData("metadata row has no start date".into()))?;
    let project_start_date = parse_date(start)?
        .ok_or_else(|| PersistenceError::InvalidData("metadata row has no start date".into()))?;

    let mut metadata = ProjectMetadata::new(row.get(1).unwrap_or_default(), project_start_date);
    metadata.project_description = row.get(3).unwrap_or_default().to_string();
    Ok(metadata)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_option<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}
