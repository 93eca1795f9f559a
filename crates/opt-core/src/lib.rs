//! # Optimization Core
//!
//! 供應鏈優化引擎的核心資料模型與類型定義

pub mod config;
pub mod demand;
pub mod params;
pub mod result;

// Re-export 主要類型
pub use config::{LotSizingConfig, StrategyConfig};
pub use demand::{DemandCurve, DemandDistribution};
pub use params::{
    BranchParameters, LotSizingRequest, PricingParameters, SetupActivity, StrategyParameters,
    TransportParameters,
};
pub use result::{
    AlgorithmStep, CostBreakdown, LotSizingResult, OptimizationResult, OptimizationStatus,
    ShipmentCandidate, StrategyKind,
};

/// 優化引擎錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptError {
    #[error("求根區間端點同號: f({a}) = {fa}, f({b}) = {fb}")]
    InvalidBracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("無效的參數: {0}")]
    InvalidParameters(String),

    #[error("無效的請求: {0}")]
    InvalidRequest(String),

    #[error("整備時間目標 {target} 低於可壓縮下限 {floor}")]
    InfeasibleSetupTime { target: f64, floor: f64 },

    #[error("找不到可行解: {0}")]
    InfeasibleOptimization(String),

    #[error("優化逾時（已耗時 {elapsed_ms} 毫秒）")]
    TimedOut { elapsed_ms: u128 },

    #[error("儲存錯誤: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, OptError>;
