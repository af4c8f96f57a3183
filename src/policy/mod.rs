pub mod allow;
pub mod checker;

// Re-export main types
pub use allow::AllowPolicy;
pub use checker::{evaluate_policy, Violation};
