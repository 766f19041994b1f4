use chrono::NaiveDate;
use workday_cpm::calculations::{BackwardPass, CriticalPathExtractor, ForwardPass};
use workday_cpm::graph::{DependencyGraph, topological_sort};
use workday_cpm::{Dependency, DependencyType, ReferencePolicy, WorkCalendar};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 1(2d) -> {2(3d), 3(1d)} -> 4(2d)
fn diamond() -> DependencyGraph {
    let deps = vec![
        Dependency::new(2, 1),
        Dependency::new(3, 1),
        Dependency::new(4, 2),
        Dependency::new(4, 3),
    ];
    DependencyGraph::build(&[1, 2, 3, 4], &deps, ReferencePolicy::Drop).unwrap()
}

#[test]
fn forward_pass_computes_early_dates_across_dag() {
    let graph = diamond();
    let order = topological_sort(&graph).unwrap();
    let spans = [1, 2, 0, 1];
    let cal = WorkCalendar::new();

    // Monday 2025-01-06
    let early = ForwardPass::new(&graph, &spans, &cal).execute(&order, d(2025, 1, 6));

    assert_eq!(early[0], (d(2025, 1, 6), d(2025, 1, 7)));
    assert_eq!(early[1], (d(2025, 1, 8), d(2025, 1, 10)));
    assert_eq!(early[2], (d(2025, 1, 8), d(2025, 1, 8)));
    // Friday finish of task 2 pushes task 4 over the weekend.
    assert_eq!(early[3], (d(2025, 1, 13), d(2025, 1, 14)));
}

#[test]
fn backward_pass_anchors_on_project_end() {
    let graph = diamond();
    let order = topological_sort(&graph).unwrap();
    let spans = [1, 2, 0, 1];
    let cal = WorkCalendar::new();

    let late = BackwardPass::new(&graph, &spans, &cal).execute(&order, d(2025, 1, 14));

    assert_eq!(late[3], (d(2025, 1, 13), d(2025, 1, 14)));
    assert_eq!(late[1], (d(2025, 1, 8), d(2025, 1, 10)));
    assert_eq!(late[2], (d(2025, 1, 10), d(2025, 1, 10)));
    assert_eq!(late[0], (d(2025, 1, 6), d(2025, 1, 7)));
}

#[test]
fn critical_path_is_zero_float_chain() {
    let graph = diamond();
    let order = topological_sort(&graph).unwrap();
    let spans = [1, 2, 0, 1];
    let cal = WorkCalendar::new();
    let start = d(2025, 1, 6);
    let end = d(2025, 1, 14);

    let early = ForwardPass::new(&graph, &spans, &cal).execute(&order, start);
    let late = BackwardPass::new(&graph, &spans, &cal).execute(&order, end);
    let analysis =
        CriticalPathExtractor::new(&graph, &cal).execute(&order, &early, &late, start, end);

    assert_eq!(analysis.float_days, vec![0, 0, 2, 0]);
    assert_eq!(analysis.is_critical, vec![true, true, false, true]);
    let path: Vec<i32> = analysis
        .critical_path
        .iter()
        .map(|&node| graph.task_id(node))
        .collect();
    assert_eq!(path, vec![1, 2, 4]);
    assert_eq!(analysis.project_duration, 6);
}

#[test]
fn negative_lag_never_starts_before_project() {
    let deps = vec![Dependency::typed(2, 1, DependencyType::StartToStart, -5)];
    let graph = DependencyGraph::build(&[1, 2], &deps, ReferencePolicy::Drop).unwrap();
    let order = topological_sort(&graph).unwrap();
    let cal = WorkCalendar::new();

    let early = ForwardPass::new(&graph, &[0, 0], &cal).execute(&order, d(2026, 1, 5));
    assert_eq!(early[1].0, d(2026, 1, 5));
}

#[test]
fn forward_and_backward_tables_invert_each_other() {
    let cal = WorkCalendar::new();
    let pred_start = d(2026, 1, 5);
    let pred_finish = d(2026, 1, 7);
    let pred_span = 2;

    for kind in DependencyType::ALL {
        for lag in [-2i64, 0, 1, 4] {
            let succ_start = kind.forward(&cal, pred_start, pred_finish, lag);
            let latest_finish = kind.backward(&cal, succ_start, lag, pred_span);
            assert_eq!(latest_finish, pred_finish, "{kind}{lag:+}");
        }
    }
}
