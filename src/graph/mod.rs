pub mod builder;
pub mod cycle_check;
pub mod topo_sort;

pub use builder::{Adjacent, DependencyGraph, Link};
pub use cycle_check::CycleChecker;
pub use topo_sort::topological_sort;
