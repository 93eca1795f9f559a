//! # Optimization Optimizer
//!
//! 整合批量優化模組（整備壓縮、成本模型、運送次數搜尋）

pub mod cost_model;
pub mod crashing;
pub mod lot_sizing;

// Re-export 主要類型
pub use cost_model::{CostModel, DecisionPoint, IntegratedCostModel};
pub use crashing::{CrashPlan, SetupCrashing};
pub use lot_sizing::LotSizingOptimizer;
