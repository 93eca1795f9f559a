//! 優化策略（封閉變體集合）

use opt_core::{OptimizationResult, Result, StrategyConfig, StrategyKind, StrategyParameters};

use crate::{DynamicPricingStrategy, HybridStrategy, TransportLotSizingStrategy};

/// 優化策略
///
/// 只有三種變體，混合策略靜態組合另外兩種，因此以列舉而非 trait object 表示。
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationStrategy {
    DynamicPricing(DynamicPricingStrategy),
    TransportLotSizing(TransportLotSizingStrategy),
    Hybrid(HybridStrategy),
}

impl OptimizationStrategy {
    /// 由已解析的參數建立策略
    pub fn from_parameters(parameters: StrategyParameters, config: StrategyConfig) -> Self {
        match parameters {
            StrategyParameters::Pricing(pricing) => {
                OptimizationStrategy::DynamicPricing(DynamicPricingStrategy::new(pricing, config))
            }
            StrategyParameters::Transport(transport) => OptimizationStrategy::TransportLotSizing(
                TransportLotSizingStrategy::new(transport, config),
            ),
            StrategyParameters::Hybrid { pricing, transport } => {
                OptimizationStrategy::Hybrid(HybridStrategy::new(
                    DynamicPricingStrategy::new(pricing, config.clone()),
                    TransportLotSizingStrategy::new(transport, config),
                ))
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            OptimizationStrategy::DynamicPricing(_) => StrategyKind::DynamicPricing,
            OptimizationStrategy::TransportLotSizing(_) => StrategyKind::TransportLotSizing,
            OptimizationStrategy::Hybrid(_) => StrategyKind::Hybrid,
        }
    }

    /// 執行策略；相同輸入必得相同結果
    pub fn run(&self) -> Result<OptimizationResult> {
        match self {
            OptimizationStrategy::DynamicPricing(strategy) => strategy.run(),
            OptimizationStrategy::TransportLotSizing(strategy) => strategy.run(),
            OptimizationStrategy::Hybrid(strategy) => strategy.run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opt_core::{DemandCurve, PricingParameters, TransportParameters};

    #[test]
    fn test_from_parameters_kind() {
        let transport = TransportParameters::new(1000.0, 5.0, 150.0, 50.0).unwrap();
        let strategy = OptimizationStrategy::from_parameters(
            StrategyParameters::Transport(transport),
            StrategyConfig::default(),
        );

        assert_eq!(strategy.kind(), StrategyKind::TransportLotSizing);
        assert_eq!(strategy.run().unwrap().optimal_shipments, Some(5));
    }

    #[test]
    fn test_run_is_deterministic() {
        let curve = DemandCurve::new(100.0, 1.0, 0.2).unwrap();
        let pricing = PricingParameters::new(1000.0, 30.0, 40.0, curve).unwrap();
        let strategy = OptimizationStrategy::from_parameters(
            StrategyParameters::Pricing(pricing),
            StrategyConfig::default(),
        );

        let first = strategy.run().unwrap();
        let second = strategy.run().unwrap();

        assert_eq!(first.steps, second.steps);
        assert_eq!(first.reorder_point, second.reorder_point);
    }
}
