//! 整合批量優化器（Method1）

use std::time::Instant;

use opt_calc::{golden_section_minimize, RootFinder};
use opt_core::{
    CostBreakdown, LotSizingConfig, LotSizingRequest, LotSizingResult, OptError, Result,
    ShipmentCandidate,
};
use rayon::prelude::*;

use crate::cost_model::{CostModel, DecisionPoint, IntegratedCostModel};
use crate::crashing::{CrashPlan, SetupCrashing};

/// 線搜尋迭代上限
const LINE_SEARCH_MAX_ITERATIONS: u32 = 200;

/// 生產速率須嚴格大於需求
const RATE_MARGIN: f64 = 1e-6;

/// 批量搜尋下限（相對於 D）
const MIN_LOT_FRACTION: f64 = 1e-6;

/// 單一 n 的內層最佳解
#[derive(Debug, Clone)]
struct ShipmentSolution {
    point: DecisionPoint,
    plan_index: usize,
    breakdown: CostBreakdown,
    total_cost: f64,
}

/// 整合批量優化器
///
/// 外層對運送次數 n 做平行搜尋，內層以座標下降同時決定
/// 批量 Q、生產速率 P、整備時間 Ts 與投資槓桿 θ、Av、k1。
pub struct LotSizingOptimizer<C: CostModel = IntegratedCostModel> {
    config: LotSizingConfig,
    cost_model: C,
    finder: RootFinder,
}

impl LotSizingOptimizer {
    /// 創建使用預設成本模型的優化器
    pub fn new(config: LotSizingConfig) -> Self {
        Self {
            config,
            cost_model: IntegratedCostModel,
            finder: RootFinder::default(),
        }
    }
}

impl<C: CostModel> LotSizingOptimizer<C> {
    /// 建構器模式：替換成本模型
    pub fn with_cost_model<M: CostModel>(self, cost_model: M) -> LotSizingOptimizer<M> {
        LotSizingOptimizer {
            config: self.config,
            cost_model,
            finder: self.finder,
        }
    }

    /// 建構器模式：設置求根器
    pub fn with_root_finder(mut self, finder: RootFinder) -> Self {
        self.finder = finder;
        self
    }

    pub fn config(&self) -> &LotSizingConfig {
        &self.config
    }

    /// 主優化入口
    pub fn optimize(&self, request: &LotSizingRequest) -> Result<LotSizingResult> {
        request.validate()?;

        tracing::info!(
            "開始整合批量優化：分店 {}，D = {}，n 搜尋範圍 1..={}",
            request.branch_id,
            request.demand,
            self.config.max_shipments
        );

        let start_time = Instant::now();
        let plans = SetupCrashing::breakpoints(&request.setup_activities);
        tracing::debug!("整備壓縮轉折點: {} 個", plans.len());

        let evaluate = |shipments: u32| -> Result<Option<ShipmentSolution>> {
            if let Some(deadline) = self.config.deadline {
                let elapsed = start_time.elapsed();
                if elapsed >= deadline {
                    return Err(OptError::TimedOut {
                        elapsed_ms: elapsed.as_millis(),
                    });
                }
            }
            self.solve_for_shipments(request, shipments, &plans)
        };

        let range = 1..=self.config.max_shipments;
        let solutions: Vec<Option<ShipmentSolution>> = if self.config.parallel {
            range.into_par_iter().map(&evaluate).collect::<Result<Vec<_>>>()?
        } else {
            range.map(&evaluate).collect::<Result<Vec<_>>>()?
        };

        let candidates: Vec<ShipmentCandidate> = (1..=self.config.max_shipments)
            .zip(&solutions)
            .map(|(shipments, solution)| ShipmentCandidate {
                shipments,
                total_cost: solution.as_ref().map(|s| s.total_cost),
            })
            .collect();

        // 以 (TC, n) 排序取最小，與平行順序無關
        let best = solutions
            .into_iter()
            .flatten()
            .min_by(|a, b| {
                a.total_cost
                    .total_cmp(&b.total_cost)
                    .then(a.point.shipments.cmp(&b.point.shipments))
            })
            .ok_or_else(|| {
                OptError::InfeasibleOptimization(format!(
                    "分店 {} 在 n = 1..={} 內沒有可行解",
                    request.branch_id, self.config.max_shipments
                ))
            })?;

        let elapsed = start_time.elapsed();
        tracing::info!(
            "整合批量優化完成：n = {}，Q = {:.4}，P = {:.4}，TC = {:.4}，耗時 {:?}",
            best.point.shipments,
            best.point.lot_size,
            best.point.production_rate,
            best.total_cost,
            elapsed
        );

        Ok(LotSizingResult {
            branch_id: request.branch_id.clone(),
            shipments: best.point.shipments,
            lot_size: best.point.lot_size,
            production_rate: best.point.production_rate,
            safety_factor: best.point.safety_factor,
            setup_cost: best.point.setup_cost,
            defect_rate: best.point.defect_rate,
            setup_time: best.point.setup_time,
            total_cost: best.total_cost,
            crash_amounts: plans[best.plan_index].crash_amounts.clone(),
            breakdown: best.breakdown,
            candidates,
            computation_time_ms: Some(elapsed.as_millis()),
        })
    }

    /// 固定 n 的內層座標下降；不可行時回傳 None
    fn solve_for_shipments(
        &self,
        request: &LotSizingRequest,
        shipments: u32,
        plans: &[CrashPlan],
    ) -> Result<Option<ShipmentSolution>> {
        let demand = request.demand;
        let rate_lo = request.min_production_rate.max(demand * (1.0 + RATE_MARGIN));
        let rate_hi = request.max_production_rate;
        if rate_lo > rate_hi {
            tracing::debug!("n = {}: 生產速率區間不含大於需求的值", shipments);
            return Ok(None);
        }
        let lot_lo = demand * MIN_LOT_FRACTION;
        let lot_hi = demand;

        let Some(initial_plan) = plans.first() else {
            return Ok(None);
        };
        let mut plan_index = 0;
        let mut point = DecisionPoint {
            shipments,
            lot_size: self.initial_lot_size(request, shipments).clamp(lot_lo, lot_hi),
            production_rate: 0.5 * (rate_lo + rate_hi),
            safety_factor: 0.0,
            setup_cost: request.vendor_setup_cost,
            defect_rate: request.baseline_defect_rate,
            setup_time: initial_plan.setup_time,
            crash_cost: initial_plan.crash_cost,
        };
        let mut previous = self.cost_model.total_cost(request, &point);
        let tolerance = self.config.tolerance;

        for round in 0..self.config.max_rounds {
            self.cost_model.refine_levers(request, &mut point, &self.finder)?;

            // Ts 只需比較轉折點
            let mut best_plan_cost = f64::INFINITY;
            for (index, plan) in plans.iter().enumerate() {
                let trial = DecisionPoint {
                    setup_time: plan.setup_time,
                    crash_cost: plan.crash_cost,
                    ..point
                };
                let cost = self.cost_model.total_cost(request, &trial);
                if cost < best_plan_cost {
                    best_plan_cost = cost;
                    plan_index = index;
                }
            }
            point.setup_time = plans[plan_index].setup_time;
            point.crash_cost = plans[plan_index].crash_cost;

            let current = self.cost_model.total_cost(request, &point);
            let (rate, rate_cost) = golden_section_minimize(
                |p| {
                    self.cost_model.total_cost(
                        request,
                        &DecisionPoint {
                            production_rate: p,
                            ..point
                        },
                    )
                },
                rate_lo,
                rate_hi,
                tolerance,
                LINE_SEARCH_MAX_ITERATIONS,
            );
            if rate_cost <= current {
                point.production_rate = rate;
            }

            let current = self.cost_model.total_cost(request, &point);
            let (lot, lot_cost) = golden_section_minimize(
                |q| {
                    self.cost_model.total_cost(
                        request,
                        &DecisionPoint {
                            lot_size: q,
                            ..point
                        },
                    )
                },
                lot_lo,
                lot_hi,
                tolerance,
                LINE_SEARCH_MAX_ITERATIONS,
            );
            if lot_cost <= current {
                point.lot_size = lot;
            }

            let total = self.cost_model.total_cost(request, &point);
            let improvement = previous - total;
            previous = total;
            if improvement.abs() <= tolerance * total.abs().max(1.0) {
                tracing::trace!("n = {}: 第 {} 輪收斂", shipments, round + 1);
                break;
            }
        }

        self.cost_model.refine_levers(request, &mut point, &self.finder)?;
        let breakdown = self.cost_model.evaluate(request, &point);
        let total_cost = breakdown.total();

        let feasible = point.production_rate >= request.min_production_rate
            && point.production_rate <= request.max_production_rate
            && point.production_rate > demand
            && point.lot_size > 0.0
            && total_cost.is_finite();
        if !feasible {
            tracing::debug!("n = {}: 解不可行，TC = {}", shipments, total_cost);
            return Ok(None);
        }

        tracing::debug!(
            "n = {}: Q = {:.4}，P = {:.4}，TC = {:.4}",
            shipments,
            point.lot_size,
            point.production_rate,
            total_cost
        );

        Ok(Some(ShipmentSolution {
            point,
            plan_index,
            breakdown,
            total_cost,
        }))
    }

    /// 以經濟批量公式估計起始 Q
    fn initial_lot_size(&self, request: &LotSizingRequest, shipments: u32) -> f64 {
        let n = f64::from(shipments);
        let ordering =
            request.vendor_setup_cost / n + request.ordering_cost + request.transport_cost;
        let holding = request.buyer_holding_cost + request.vendor_holding_cost * n;
        if ordering > 0.0 && holding > 0.0 {
            (2.0 * request.demand * ordering / holding).sqrt()
        } else {
            request.demand / n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opt_core::SetupActivity;
    use rstest::rstest;
    use std::time::Duration;

    fn request() -> LotSizingRequest {
        LotSizingRequest::new(
            "BR-001",
            1000.0,
            1500.0,
            3000.0,
            vec![
                SetupActivity::new(10.0, 6.0, 3.0),
                SetupActivity::new(8.0, 5.0, 1.0),
            ],
        )
        .with_setup_costs(400.0, 50.0)
        .with_transport(30.0, 2.0)
        .with_holding_costs(5.0, 4.0)
        .with_backorder(80.0, 7.0)
        .with_production_cost(1000.0, 0.0005)
        .with_quality(50.0, 0.02, 100.0)
        .with_setup_investment(200.0)
    }

    fn config() -> LotSizingConfig {
        LotSizingConfig::default().with_max_shipments(8)
    }

    #[test]
    fn test_feasible_request() {
        let req = request();
        let result = LotSizingOptimizer::new(config()).optimize(&req).unwrap();

        assert!(result.production_rate >= 1500.0 && result.production_rate <= 3000.0);
        assert!(result.lot_size > 0.0);
        assert!(result.safety_factor >= 0.0);
        assert!(result.defect_rate >= 0.0 && result.defect_rate <= 0.02);
        assert!(result.setup_cost >= 0.0 && result.setup_cost <= 400.0);
        assert!(result.setup_time >= 11.0 - 1e-9 && result.setup_time <= 18.0 + 1e-9);
        assert_eq!(result.crash_amounts.len(), 2);
        assert_eq!(result.candidates.len(), 8);
        assert!((result.breakdown.total() - result.total_cost).abs() < 1e-9);
    }

    #[test]
    fn test_selected_cost_is_minimum() {
        let result = LotSizingOptimizer::new(config())
            .optimize(&request())
            .unwrap();

        for candidate in &result.candidates {
            if let Some(cost) = candidate.total_cost {
                assert!(result.total_cost <= cost);
            }
        }
        let selected = result
            .candidates
            .iter()
            .find(|c| c.shipments == result.shipments)
            .unwrap();
        assert_eq!(selected.total_cost, Some(result.total_cost));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let req = request();
        let parallel = LotSizingOptimizer::new(config().with_parallel(true))
            .optimize(&req)
            .unwrap();
        let sequential = LotSizingOptimizer::new(config().with_parallel(false))
            .optimize(&req)
            .unwrap();

        assert_eq!(parallel.shipments, sequential.shipments);
        assert_eq!(parallel.lot_size, sequential.lot_size);
        assert_eq!(parallel.production_rate, sequential.production_rate);
        assert_eq!(parallel.total_cost, sequential.total_cost);
        assert_eq!(parallel.candidates, sequential.candidates);
    }

    #[test]
    fn test_min_rate_above_max_rejected() {
        let mut req = request();
        req.min_production_rate = 3500.0;
        let result = LotSizingOptimizer::new(config()).optimize(&req);

        assert!(matches!(result, Err(OptError::InvalidRequest(_))));
    }

    #[test]
    fn test_empty_activities_rejected() {
        let mut req = request();
        req.setup_activities.clear();
        let result = LotSizingOptimizer::new(config()).optimize(&req);

        assert!(matches!(result, Err(OptError::InvalidRequest(_))));
    }

    #[test]
    fn test_rate_below_demand_is_infeasible() {
        let mut req = request();
        req.min_production_rate = 500.0;
        req.max_production_rate = 900.0;
        let result = LotSizingOptimizer::new(config()).optimize(&req);

        assert!(matches!(result, Err(OptError::InfeasibleOptimization(_))));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_zero_deadline_times_out(#[case] parallel: bool) {
        let optimizer = LotSizingOptimizer::new(
            config()
                .with_parallel(parallel)
                .with_deadline(Duration::ZERO),
        );
        let result = optimizer.optimize(&request());

        assert!(matches!(result, Err(OptError::TimedOut { .. })));
    }

    #[test]
    fn test_custom_root_finder() {
        // 求根迭代上限很低時安全係數退回最佳估計，優化仍完成
        let optimizer =
            LotSizingOptimizer::new(config()).with_root_finder(RootFinder::new(1e-15, 2));
        let result = optimizer.optimize(&request()).unwrap();

        assert!(result.safety_factor >= 0.0);
        assert!(result.production_rate >= 1500.0 && result.production_rate <= 3000.0);
        assert_eq!(optimizer.config().max_shipments, 8);
    }

    #[test]
    fn test_without_investment_levers() {
        let mut req = request();
        req.quality_investment = 0.0;
        req.setup_investment = 0.0;
        let result = LotSizingOptimizer::new(config()).optimize(&req).unwrap();

        assert_eq!(result.defect_rate, 0.02);
        assert_eq!(result.setup_cost, 400.0);
        assert_eq!(result.breakdown.investment, 0.0);
    }

    /// 對多次運送加上懲罰的測試模型
    struct SingleShipmentModel;

    impl CostModel for SingleShipmentModel {
        fn evaluate(&self, request: &LotSizingRequest, point: &DecisionPoint) -> CostBreakdown {
            let mut breakdown = IntegratedCostModel.evaluate(request, point);
            if point.shipments > 1 {
                breakdown.investment += 1e9;
            }
            breakdown
        }

        fn refine_levers(
            &self,
            request: &LotSizingRequest,
            point: &mut DecisionPoint,
            finder: &RootFinder,
        ) -> Result<()> {
            IntegratedCostModel.refine_levers(request, point, finder)
        }
    }

    #[test]
    fn test_swapped_cost_model() {
        let result = LotSizingOptimizer::new(config())
            .with_cost_model(SingleShipmentModel)
            .optimize(&request())
            .unwrap();

        assert_eq!(result.shipments, 1);
    }
}
