//! # Optimization Calculation Engine
//!
//! 數值工具（求根、線搜尋、常態分佈）與三種優化策略

pub mod factory;
pub mod hybrid;
pub mod line_search;
pub mod normal;
pub mod pricing;
pub mod root_finder;
pub mod strategy;
pub mod transport;

// Re-export 主要類型
pub use factory::StrategyFactory;
pub use hybrid::HybridStrategy;
pub use line_search::golden_section_minimize;
pub use normal::{normal_cdf, normal_loss, normal_pdf, upper_quantile};
pub use pricing::{DynamicPricingStrategy, RetrievalDecision};
pub use root_finder::{RootFinder, RootSolution};
pub use strategy::OptimizationStrategy;
pub use transport::{LotCost, TransportLotSizingStrategy};
