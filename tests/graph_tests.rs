use petgraph::algo::is_cyclic_directed;
use workday_cpm::graph::{CycleChecker, DependencyGraph, topological_sort};
use workday_cpm::{Dependency, DependencyType, ReferencePolicy, SchedulingError};

fn ordered_ids(graph: &DependencyGraph) -> Vec<i32> {
    topological_sort(graph)
        .unwrap()
        .into_iter()
        .map(|node| graph.task_id(node))
        .collect()
}

#[test]
fn builds_predecessor_successor_and_in_degree_maps() {
    // 1 -> {2, 3} -> 4
    let deps = vec![
        Dependency::new(2, 1),
        Dependency::typed(3, 1, DependencyType::StartToStart, 2),
        Dependency::new(4, 2),
        Dependency::typed(4, 3, DependencyType::FinishToFinish, -1),
    ];
    let graph = DependencyGraph::build(&[1, 2, 3, 4], &deps, ReferencePolicy::Drop).unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);

    let preds = graph.predecessor_map();
    assert_eq!(
        preds[&4],
        vec![
            (2, 0, DependencyType::FinishToStart),
            (3, -1, DependencyType::FinishToFinish)
        ]
    );
    assert!(!preds.contains_key(&1));

    let succs = graph.successor_map();
    assert_eq!(
        succs[&1],
        vec![
            (2, 0, DependencyType::FinishToStart),
            (3, 2, DependencyType::StartToStart)
        ]
    );

    let in_degree = graph.in_degree_map();
    assert_eq!(in_degree[&1], 0);
    assert_eq!(in_degree[&2], 1);
    assert_eq!(in_degree[&4], 2);
}

#[test]
fn duplicate_edges_are_each_counted() {
    let deps = vec![Dependency::new(2, 1), Dependency::new(2, 1)];
    let graph = DependencyGraph::build(&[1, 2], &deps, ReferencePolicy::Drop).unwrap();
    assert_eq!(graph.in_degree_map()[&2], 2);
    assert_eq!(ordered_ids(&graph), vec![1, 2]);
}

#[test]
fn unknown_references_are_dropped_by_default() {
    let deps = vec![Dependency::new(2, 1), Dependency::new(2, 99), Dependency::new(42, 1)];
    let graph = DependencyGraph::build(&[1, 2], &deps, ReferencePolicy::Drop).unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.dropped(), &[Dependency::new(2, 99), Dependency::new(42, 1)]);
    assert_eq!(graph.in_degree_map()[&2], 1);
}

#[test]
fn unknown_references_fail_under_reject_policy() {
    let deps = vec![Dependency::new(2, 1), Dependency::new(2, 99)];
    let err = DependencyGraph::build(&[1, 2], &deps, ReferencePolicy::Reject).unwrap_err();
    assert_eq!(
        err,
        SchedulingError::InvalidTaskReference {
            successor_id: 2,
            predecessor_id: 99,
            missing_id: 99,
        }
    );
}

#[test]
fn kahn_order_follows_input_order_for_ties() {
    // 1 -> {2, 3} -> 4, with 5 independent
    let deps = vec![
        Dependency::new(3, 1),
        Dependency::new(2, 1),
        Dependency::new(4, 2),
        Dependency::new(4, 3),
    ];
    let graph = DependencyGraph::build(&[1, 2, 3, 4, 5], &deps, ReferencePolicy::Drop).unwrap();
    // 1 and 5 are seeded in input order; 3 becomes ready before 2 (edge order).
    assert_eq!(ordered_ids(&graph), vec![1, 5, 3, 2, 4]);
}

#[test]
fn every_edge_points_forward_in_topological_order() {
    let deps: Vec<_> = (2..40)
        .flat_map(|id| [Dependency::new(id, id / 2), Dependency::new(id, id - 1)])
        .collect();
    let ids: Vec<i32> = (1..40).rev().collect();
    let graph = DependencyGraph::build(&ids, &deps, ReferencePolicy::Drop).unwrap();
    let order = ordered_ids(&graph);

    let position = |id: i32| order.iter().position(|&x| x == id).unwrap();
    for dep in &deps {
        assert!(position(dep.predecessor_id) < position(dep.successor_id));
    }
}

#[test]
fn cycle_fails_the_sort_without_partial_order() {
    // A -> B -> C -> A
    let deps = vec![Dependency::new(2, 1), Dependency::new(3, 2), Dependency::new(1, 3)];
    let graph = DependencyGraph::build(&[1, 2, 3, 4], &deps, ReferencePolicy::Drop).unwrap();
    assert!(is_cyclic_directed(&graph.graph));

    match topological_sort(&graph) {
        Err(SchedulingError::CircularDependency { unresolved }) => {
            assert_eq!(unresolved, vec![1, 2, 3]);
        }
        other => panic!("expected circular dependency, got {other:?}"),
    }
}

#[test]
fn cycle_checker_rejects_closing_edge() {
    // A -> B -> C, then propose C -> A
    let deps = vec![Dependency::new(2, 1), Dependency::new(3, 2)];
    let checker = CycleChecker::new(&deps);

    assert!(checker.would_create_cycle(&Dependency::new(1, 3)));
    assert_eq!(
        checker.check(&Dependency::new(1, 3)),
        Err(SchedulingError::CycleWouldBeCreated {
            successor_id: 1,
            predecessor_id: 3,
        })
    );
    // A shortcut edge A -> C keeps the graph acyclic.
    assert!(checker.check(&Dependency::new(3, 1)).is_ok());
    // Edges to tasks the checker has never seen are fine.
    assert!(!checker.would_create_cycle(&Dependency::new(7, 3)));
}

#[test]
fn cycle_checker_agrees_with_petgraph() {
    let base = vec![
        Dependency::new(2, 1),
        Dependency::new(3, 1),
        Dependency::new(4, 2),
        Dependency::new(4, 3),
        Dependency::new(5, 4),
    ];
    let ids = [1, 2, 3, 4, 5];
    for succ in ids {
        for pred in ids {
            let proposed = Dependency::new(succ, pred);
            let mut all = base.clone();
            all.push(proposed);
            let graph = DependencyGraph::build(&ids, &all, ReferencePolicy::Drop).unwrap();
            assert_eq!(
                CycleChecker::new(&base).would_create_cycle(&proposed),
                is_cyclic_directed(&graph.graph),
                "{succ} <- {pred}"
            );
        }
    }
}
