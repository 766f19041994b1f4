pub mod backward_pass;
pub mod critical_path;
pub mod forward_pass;

pub use backward_pass::BackwardPass;
pub use critical_path::{CriticalPathAnalysis, CriticalPathExtractor};
pub use forward_pass::ForwardPass;
