use super::{PersistenceResult, ProjectStore};
use crate::dependency::{Dependency, DependencyType};
use crate::metadata::ProjectMetadata;
use crate::project::Project;
use crate::task::Task;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;

/// Stores one project in a SQLite database.
///
/// Tasks are kept as JSON rows so computed fields survive a round trip;
/// dependencies get their own table so they can be queried directly.
pub struct SqliteProjectStore {
    connection: Mutex<Connection>,
}

impl SqliteProjectStore {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS project_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                metadata_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                position INTEGER PRIMARY KEY,
                id INTEGER NOT NULL UNIQUE,
                task_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS dependencies (
                position INTEGER PRIMARY KEY,
                successor_id INTEGER NOT NULL,
                predecessor_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                lag_days INTEGER NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_metadata(tx: &Transaction, metadata: &ProjectMetadata) -> PersistenceResult<()> {
        let json = serde_json::to_string(metadata)?;
        tx.execute("DELETE FROM project_metadata", [])?;
        tx.execute(
            "INSERT INTO project_metadata (id, metadata_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_tasks(tx: &Transaction, tasks: &[Task]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        let mut stmt = tx.prepare("INSERT INTO tasks (position, id, task_json) VALUES (?1, ?2, ?3)")?;
        for (position, task) in tasks.iter().enumerate() {
            let json = serde_json::to_string(task)?;
            stmt.execute(params![position as i64, task.id, json])?;
        }
        Ok(())
    }

    fn save_dependencies(tx: &Transaction, dependencies: &[Dependency]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM dependencies", [])?;
        let mut stmt = tx.prepare(
            "INSERT INTO dependencies (position, successor_id, predecessor_id, kind, lag_days)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (position, dep) in dependencies.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                dep.successor_id,
                dep.predecessor_id,
                dep.kind.as_str(),
                dep.lag_days
            ])?;
        }
        Ok(())
    }

    fn load_dependencies(conn: &Connection) -> PersistenceResult<Vec<Dependency>> {
        let mut stmt = conn.prepare(
            "SELECT successor_id, predecessor_id, kind, lag_days
             FROM dependencies ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut dependencies = Vec::new();
        for row in rows {
            let (successor_id, predecessor_id, kind, lag_days) = row?;
            let kind: DependencyType = kind.parse()?;
            dependencies.push(Dependency::typed(successor_id, predecessor_id, kind, lag_days));
        }
        Ok(dependencies)
    }
}

impl ProjectStore for SqliteProjectStore {
    fn save_project(&self, project: &Project) -> PersistenceResult<()> {
        super::validate_project(project)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        Self::save_metadata(&tx, &project.metadata)?;
        Self::save_tasks(&tx, &project.tasks)?;
        Self::save_dependencies(&tx, &project.dependencies)?;
        tx.commit()?;
        Ok(())
    }

    fn load_project(&self) -> PersistenceResult<Option<Project>> {
        let conn = self.connection.lock();

        let metadata_json: Option<String> = conn
            .query_row(
                "SELECT metadata_json FROM project_metadata WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let Some(metadata_json) = metadata_json else {
            return Ok(None);
        };
        let metadata: ProjectMetadata = serde_json::from_str(&metadata_json)?;

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tasks = Vec::new();
        for json in rows {
            let task: Task = serde_json::from_str(&json?)?;
            tasks.push(task);
        }

        let project = Project {
            metadata,
            tasks,
            dependencies: Self::load_dependencies(&conn)?,
        };
        super::validate_project(&project)?;
        Ok(Some(project))
    }
}
