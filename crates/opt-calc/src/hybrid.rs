//! 混合策略

use opt_core::{OptimizationResult, OptimizationStatus, Result, StrategyKind};

use crate::{DynamicPricingStrategy, TransportLotSizingStrategy};

/// 混合策略：分別執行定價與運輸批量，再逐欄合併
#[derive(Debug, Clone, PartialEq)]
pub struct HybridStrategy {
    pricing: DynamicPricingStrategy,
    transport: TransportLotSizingStrategy,
}

impl HybridStrategy {
    pub fn new(pricing: DynamicPricingStrategy, transport: TransportLotSizingStrategy) -> Self {
        Self { pricing, transport }
    }

    pub fn pricing(&self) -> &DynamicPricingStrategy {
        &self.pricing
    }

    pub fn transport(&self) -> &TransportLotSizingStrategy {
        &self.transport
    }

    /// 執行兩個子策略並合併
    pub fn run(&self) -> Result<OptimizationResult> {
        let start_time = std::time::Instant::now();
        tracing::info!("開始混合策略計算");

        let pricing = self.pricing.run()?;
        let transport = self.transport.run()?;

        let mut result = Self::merge(pricing, transport);
        result.computation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "混合策略完成，狀態 {:?}，耗時 {:?}",
            result.status,
            start_time.elapsed()
        );

        Ok(result)
    }

    /// 合併子結果：定價欄位取自定價策略、運輸欄位取自批量策略
    ///
    /// 建議日期取聯集，定價推算的日期在前；兩者皆收斂才為 OPTIMAL。
    pub fn merge(pricing: OptimizationResult, transport: OptimizationResult) -> OptimizationResult {
        let status = if pricing.is_optimal() && transport.is_optimal() {
            OptimizationStatus::Optimal
        } else {
            OptimizationStatus::Feasible
        };

        let mut recommended_dates = pricing.recommended_dates;
        for date in transport.recommended_dates {
            if !recommended_dates.contains(&date) {
                recommended_dates.push(date);
            }
        }

        OptimizationResult {
            strategy: StrategyKind::Hybrid,
            status,
            optimal_q: pricing.optimal_q,
            reorder_point: pricing.reorder_point,
            safety_stock: pricing.safety_stock,
            forecasted_lead_time: pricing.forecasted_lead_time,
            transport_cost: transport.transport_cost,
            cost_savings: transport.cost_savings,
            optimal_shipments: transport.optimal_shipments,
            setup_time_reduction: transport.setup_time_reduction,
            steps: pricing.steps,
            recommended_dates,
            computation_time_ms: None,
        }
    }
}
