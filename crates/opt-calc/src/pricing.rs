//! 動態定價/庫存聯合控制（alg-ir）

use chrono::{Days, NaiveDate};
use opt_core::{
    AlgorithmStep, OptError, OptimizationResult, OptimizationStatus, PricingParameters, Result,
    StrategyConfig, StrategyKind,
};

use crate::RootFinder;

const INVENTORY_EPSILON: f64 = 1e-9;

/// 單期取出決策
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalDecision {
    /// 取出量 x*
    pub retrieval: f64,

    /// 求根是否收斂（邊界回退視為收斂）
    pub converged: bool,

    /// 是否因無內點解而採用邊界
    pub boundary: bool,
}

/// 動態定價/庫存策略
///
/// 每期在目前庫存 y 下求 x* ∈ [0, y] 使邊際收益等於剩餘庫存的邊際成本，
/// 以該量定價出售，直到庫存歸零或達到期數上限。
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicPricingStrategy {
    params: PricingParameters,
    config: StrategyConfig,
}

impl DynamicPricingStrategy {
    pub fn new(params: PricingParameters, config: StrategyConfig) -> Self {
        Self { params, config }
    }

    pub fn params(&self) -> &PricingParameters {
        &self.params
    }

    /// 執行模擬
    pub fn run(&self) -> Result<OptimizationResult> {
        let start_time = std::time::Instant::now();
        let finder = RootFinder::new(self.config.root_tolerance, self.config.root_max_iterations);

        tracing::info!(
            "開始動態定價模擬：期初庫存 {}，價格區間 [{}, {}]，最多 {} 期",
            self.params.initial_inventory,
            self.params.min_price,
            self.params.max_price,
            self.config.max_periods
        );

        let mut steps = Vec::new();
        let mut all_converged = true;
        let mut inventory = self.params.initial_inventory;

        for period in 0..self.config.max_periods {
            if inventory <= INVENTORY_EPSILON {
                break;
            }

            let decision = self.retrieval_for(inventory, &finder)?;
            all_converged &= decision.converged;

            let retrieval = decision.retrieval;
            let price = self.price_for(retrieval);
            let step = AlgorithmStep {
                period,
                price,
                inventory,
                retrieval,
                demand: self.params.demand.demand_at(price),
                revenue: self.revenue_for(retrieval),
            };
            tracing::debug!(
                "第 {} 期：庫存 {:.4}，取出 {:.4}，售價 {:.4}，收益 {:.4}",
                period,
                step.inventory,
                step.retrieval,
                step.price,
                step.revenue
            );

            steps.push(step);
            inventory = (inventory - retrieval).max(0.0);
        }

        let mut result = OptimizationResult::pending(StrategyKind::DynamicPricing);
        self.summarize(&steps, &mut result);
        result.steps = steps;
        result.status = if all_converged {
            OptimizationStatus::Optimal
        } else {
            OptimizationStatus::Feasible
        };
        result.computation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "動態定價模擬完成，共 {} 期，狀態 {:?}，耗時 {:?}",
            result.steps.len(),
            result.status,
            start_time.elapsed()
        );

        Ok(result)
    }

    /// 求目前庫存 y 下的取出量
    pub fn retrieval_for(&self, inventory: f64, finder: &RootFinder) -> Result<RetrievalDecision> {
        let balance = |x: f64| self.marginal_revenue(x) - self.marginal_cost(inventory - x);

        match finder.solve_detailed(balance, 0.0, inventory) {
            Ok(solution) => Ok(RetrievalDecision {
                retrieval: solution.root.clamp(0.0, inventory),
                converged: solution.converged,
                boundary: false,
            }),
            Err(OptError::InvalidBracket { .. }) => {
                // 無內點解：取單期收益較高的邊界
                let retrieval = if self.revenue_for(inventory) > self.revenue_for(0.0) {
                    inventory
                } else {
                    0.0
                };
                tracing::debug!("庫存 {} 下無內點解，採用邊界取出量 {}", inventory, retrieval);
                Ok(RetrievalDecision {
                    retrieval,
                    converged: true,
                    boundary: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// 取出 x 單位時的售價 clamp((a - x)/b, m, M)
    pub fn price_for(&self, retrieval: f64) -> f64 {
        self.params
            .demand
            .price_for_quantity(retrieval)
            .clamp(self.params.min_price, self.params.max_price)
    }

    /// 單期收益：售價 × 實際售出量
    pub fn revenue_for(&self, retrieval: f64) -> f64 {
        let price = self.price_for(retrieval);
        let sold = retrieval.min(self.params.demand.demand_at(price));
        price * sold
    }

    /// 對取出量的邊際收益
    ///
    /// 價格固定於上限時為 M；價格區間內由需求曲線換算；價格固定於下限後多取出的量賣不掉，為 0。
    pub fn marginal_revenue(&self, retrieval: f64) -> f64 {
        let curve = &self.params.demand;
        let ceiling_quantity = curve.demand_at(self.params.max_price);
        let floor_quantity = curve.demand_at(self.params.min_price);

        if retrieval < ceiling_quantity {
            self.params.max_price
        } else if retrieval < floor_quantity {
            let price = self.price_for(retrieval);
            -curve.marginal_revenue_at(price) / curve.slope()
        } else {
            0.0
        }
    }

    /// 剩餘庫存 r 的保留價格：庫存滿時為 m，耗盡時為 M
    pub fn marginal_cost(&self, remaining: f64) -> f64 {
        let (m, big_m) = (self.params.min_price, self.params.max_price);
        if self.params.initial_inventory <= 0.0 {
            return big_m;
        }
        (big_m - (big_m - m) * remaining / self.params.initial_inventory).clamp(m, big_m)
    }

    fn summarize(&self, steps: &[AlgorithmStep], result: &mut OptimizationResult) {
        let lead_time = self.config.lead_time_periods;
        let count = steps.len() as f64;

        let (mean, std_dev) = if steps.is_empty() {
            (0.0, 0.0)
        } else {
            let mean = steps.iter().map(|s| s.retrieval).sum::<f64>() / count;
            let variance = steps
                .iter()
                .map(|s| (s.retrieval - mean).powi(2))
                .sum::<f64>()
                / count;
            (mean, variance.sqrt())
        };

        let safety_stock = self.config.service_factor * std_dev * lead_time.sqrt();
        let reorder_point = mean * lead_time + safety_stock;

        result.optimal_q = Some(self.params.initial_inventory);
        result.reorder_point = Some(reorder_point);
        result.safety_stock = Some(safety_stock);
        result.forecasted_lead_time = Some(lead_time);

        if let Some(start_date) = self.params.start_date {
            result.recommended_dates = self
                .reorder_date(steps, reorder_point, start_date)
                .into_iter()
                .collect();
        }
    }

    /// 期末庫存首次降到再訂購點以下的日期
    fn reorder_date(
        &self,
        steps: &[AlgorithmStep],
        reorder_point: f64,
        start_date: NaiveDate,
    ) -> Option<NaiveDate> {
        let step = steps
            .iter()
            .find(|s| s.inventory - s.retrieval <= reorder_point)?;
        let offset = u64::from(step.period) * u64::from(self.config.period_length_days);
        start_date.checked_add_days(Days::new(offset))
    }
}
