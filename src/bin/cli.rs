use std::io::{self, Write};

use chrono::NaiveDate;
use polars::prelude::*;
use tracing_subscriber::EnvFilter;
use workday_cpm::dependency::{format_predecessor_list, parse_predecessor, parse_predecessor_list};
use workday_cpm::persistence::{
    load_project_from_csv, load_project_from_json, save_project_to_csv, save_project_to_json,
};
use workday_cpm::{AutoScheduler, Project, ReferencePolicy, SchedulerConfig, Task, WorkCalendar};

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, s) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(s);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(s.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

/// Input columns plus whatever the last `compute` wrote onto each task.
fn project_frame(project: &Project) -> PolarsResult<DataFrame> {
    let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    let tasks = &project.tasks;

    let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let durations: Vec<i64> = tasks.iter().map(|t| t.duration_days).collect();
    let preds: Vec<String> = tasks
        .iter()
        .map(|t| format_predecessor_list(t.id, &project.dependencies))
        .collect();
    let es: Vec<String> = tasks.iter().map(|t| fmt_date(t.earliest_start)).collect();
    let ef: Vec<String> = tasks.iter().map(|t| fmt_date(t.earliest_finish)).collect();
    let ls: Vec<String> = tasks.iter().map(|t| fmt_date(t.latest_start)).collect();
    let lf: Vec<String> = tasks.iter().map(|t| fmt_date(t.latest_finish)).collect();
    let float: Vec<Option<i64>> = tasks.iter().map(|t| t.float_days).collect();
    let critical: Vec<String> = tasks
        .iter()
        .map(|t| t.is_critical.map(|c| c.to_string()).unwrap_or_default())
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
        Series::new(PlSmallStr::from_static("predecessors"), preds).into_column(),
        Series::new(PlSmallStr::from_static("earliest_start"), es).into_column(),
        Series::new(PlSmallStr::from_static("earliest_finish"), ef).into_column(),
        Series::new(PlSmallStr::from_static("latest_start"), ls).into_column(),
        Series::new(PlSmallStr::from_static("latest_finish"), lf).into_column(),
        Series::new(PlSmallStr::from_static("float_days"), float).into_column(),
        Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
    ])
}

fn print_project(project: &Project) {
    match project_frame(project) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Render error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show tasks\n  add <id> <name> <duration_days> [preds]\n                                     Upsert a task (preds like 1,2SS+1,3FF-2)\n  new [name] [duration_days]         Append a task with the next free id\n  rm <id>                            Remove a task and its edges\n  dep <successor> <pred>             Add one edge (e.g. dep 4 2FS+1), rejected if it closes a cycle\n  holiday <YYYY-MM-DD>...            Add holidays to the calendar\n  start <YYYY-MM-DD>                 Set the project start date\n  compute                            Run forward/backward passes and critical path\n  save json|csv <path>               Write the project\n  load json|csv <path>               Replace the project from a file\n  quit|exit                          Exit"
    );
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn load_config() -> Option<SchedulerConfig> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next()?;
            match SchedulerConfig::from_json_file(&path) {
                Ok(config) => return Some(config),
                Err(e) => {
                    eprintln!("Config error ({}): {}", path, e);
                    return None;
                }
            }
        }
    }
    None
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = load_config().unwrap_or_default();
    let mut calendar: WorkCalendar = config.calendar();
    let policy: ReferencePolicy = config.reference_policy;
    let mut project = Project::default();

    println!("Workday CPM (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let scheduler = AutoScheduler::new(calendar.clone()).with_reference_policy(policy);

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_project(&project),
            "add" => {
                let (Some(id_s), Some(name), Some(dur_s)) = (parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: add <id> <name> <duration_days> [preds]");
                    continue;
                };
                let id: i32 = match id_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid id"); continue; } };
                let duration_days: i64 = match dur_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid duration_days"); continue; } };
                let deps = match parse_predecessor_list(id, parts.next().unwrap_or("")) {
                    Ok(deps) => deps,
                    Err(e) => { println!("Error: {}", e); continue; }
                };
                project.upsert_task(Task::new(id, name, duration_days));
                let mut added = 0;
                for dep in deps {
                    match scheduler.try_add_dependency(&mut project, dep) {
                        Ok(()) => added += 1,
                        Err(e) => println!("Error: {}", e),
                    }
                }
                println!("Task {} upserted ({} predecessor(s) added).", id, added);
            }
            "new" => {
                let id = project.next_task_id();
                let name = parts.next().unwrap_or("");
                let duration_days: i64 = match parts.next().unwrap_or("1").parse() { Ok(v) => v, Err(_) => { println!("Invalid duration_days"); continue; } };
                project.upsert_task(Task::new(id, name, duration_days));
                println!("Added task id={}", id);
            }
            "rm" => match parts.next().and_then(|s| s.parse::<i32>().ok()) {
                Some(id) if project.remove_task(id) => println!("Task {} and its dependencies removed.", id),
                Some(id) => println!("No task {}", id),
                None => println!("Usage: rm <id>"),
            },
            "dep" => {
                let (Some(succ_s), Some(token)) = (parts.next(), parts.next()) else {
                    println!("Usage: dep <successor> <pred>");
                    continue;
                };
                let successor_id: i32 = match succ_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid id"); continue; } };
                let dependency = match parse_predecessor(successor_id, token) {
                    Ok(dep) => dep,
                    Err(e) => { println!("Error: {}", e); continue; }
                };
                match scheduler.try_add_dependency(&mut project, dependency) {
                    Ok(()) => println!("Dependency added."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "holiday" => {
                let dates: Option<Vec<NaiveDate>> = parts.map(parse_date).collect();
                match dates {
                    Some(dates) if !dates.is_empty() => {
                        calendar.add_holidays(&dates);
                        println!("{} holiday(s) added ({} total).", dates.len(), calendar.holiday_count());
                    }
                    _ => println!("Usage: holiday <YYYY-MM-DD> [YYYY-MM-DD ...]"),
                }
            }
            "start" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    project.metadata.project_start_date = date;
                    println!("Project start set to {}.", date);
                }
                None => println!("Usage: start <YYYY-MM-DD>"),
            },
            "compute" => match scheduler.run(&mut project) {
                Ok(report) => {
                    println!("Computed ({})", report.to_cli_summary());
                    print_project(&project);
                }
                Err(e) => println!("Compute error: {}", e),
            },
            "save" | "load" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: {} json|csv <path>", cmd);
                    continue;
                };
                let result = match (cmd, format) {
                    ("save", "json") => save_project_to_json(&project, path).map(|_| None),
                    ("save", "csv") => save_project_to_csv(&project, path).map(|_| None),
                    ("load", "json") => load_project_from_json(path).map(Some),
                    ("load", "csv") => load_project_from_csv(path).map(Some),
                    _ => {
                        println!("Unknown format '{}' (json|csv)", format);
                        continue;
                    }
                };
                match result {
                    Ok(Some(loaded)) => {
                        project = loaded;
                        println!("Loaded {} task(s) from {}.", project.tasks.len(), path);
                    }
                    Ok(None) => println!("Saved to {}.", path),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
