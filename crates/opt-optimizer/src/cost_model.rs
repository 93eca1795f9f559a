//! 整合供應商-買方成本模型

use opt_calc::{normal_loss, upper_quantile, RootFinder};
use opt_core::{CostBreakdown, LotSizingRequest, Result};

/// 決策點 (n, Q, P, k1, θ, Av, Ts)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPoint {
    /// 運送次數 n
    pub shipments: u32,
    /// 批量 Q
    pub lot_size: f64,
    /// 生產速率 P
    pub production_rate: f64,
    /// 安全係數 k1
    pub safety_factor: f64,
    /// 有效整備成本 Av
    pub setup_cost: f64,
    /// 有效不良率 θ
    pub defect_rate: f64,
    /// 整備時間 Ts
    pub setup_time: f64,
    /// 達成 Ts 的每次壓縮成本
    pub crash_cost: f64,
}

impl DecisionPoint {
    /// 買方前置時間 L = Ts + tT
    pub fn lead_time(&self, request: &LotSizingRequest) -> f64 {
        (self.setup_time + request.transport_lead_time).max(0.0)
    }
}

/// 可替換的總成本模型
///
/// `evaluate` 給出年成本拆解；`refine_levers` 以一階條件更新 θ、Av、k1。
pub trait CostModel: Send + Sync {
    fn evaluate(&self, request: &LotSizingRequest, point: &DecisionPoint) -> CostBreakdown;

    fn refine_levers(
        &self,
        request: &LotSizingRequest,
        point: &mut DecisionPoint,
        finder: &RootFinder,
    ) -> Result<()>;

    fn total_cost(&self, request: &LotSizingRequest, point: &DecisionPoint) -> f64 {
        self.evaluate(request, point).total()
    }
}

/// 投資型品質改善與整備成本降低的整合模型
///
/// ```text
/// TC = D/(nQ)·(Av + C(Ts)) + D/Q·(A0 + CT)
///    + hb·(Q/2 + k1·σ√L) + hv·(Q/2)·(n(1 - D/P) - 1 + 2D/P)
///    + π·σ√L·ψ(k1)·D/Q + ρ·θ·D·n·Q/2 + D·(ξ1/P + ξ2·P)
///    + B1·ln(θ0/θ) + B2·ln(Av0/Av)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegratedCostModel;

impl IntegratedCostModel {
    fn quality_investment(request: &LotSizingRequest, defect_rate: f64) -> f64 {
        let theta0 = request.baseline_defect_rate;
        if request.quality_investment > 0.0 && defect_rate > 0.0 && defect_rate < theta0 {
            request.quality_investment * (theta0 / defect_rate).ln()
        } else {
            0.0
        }
    }

    fn setup_investment(request: &LotSizingRequest, setup_cost: f64) -> f64 {
        let av0 = request.vendor_setup_cost;
        if request.setup_investment > 0.0 && setup_cost > 0.0 && setup_cost < av0 {
            request.setup_investment * (av0 / setup_cost).ln()
        } else {
            0.0
        }
    }
}

impl CostModel for IntegratedCostModel {
    fn evaluate(&self, request: &LotSizingRequest, point: &DecisionPoint) -> CostBreakdown {
        let d = request.demand;
        let n = f64::from(point.shipments);
        let q = point.lot_size;
        let p = point.production_rate;
        let sigma_l = request.demand_std_dev * point.lead_time(request).sqrt();
        let cycles = d / q;
        let runs = cycles / n;

        CostBreakdown {
            setup: runs * point.setup_cost,
            crashing: runs * point.crash_cost,
            ordering: cycles * request.ordering_cost,
            transport: cycles * request.transport_cost,
            buyer_holding: request.buyer_holding_cost
                * (q / 2.0 + point.safety_factor * sigma_l),
            vendor_holding: request.vendor_holding_cost
                * (q / 2.0)
                * (n * (1.0 - d / p) - 1.0 + 2.0 * d / p),
            backorder: request.backorder_cost * sigma_l * normal_loss(point.safety_factor) * cycles,
            defect: request.defect_cost * point.defect_rate * d * n * q / 2.0,
            production: d * (request.rate_cost_inverse / p + request.rate_cost_linear * p),
            investment: Self::quality_investment(request, point.defect_rate)
                + Self::setup_investment(request, point.setup_cost),
        }
    }

    fn refine_levers(
        &self,
        request: &LotSizingRequest,
        point: &mut DecisionPoint,
        finder: &RootFinder,
    ) -> Result<()> {
        let d = request.demand;
        let nq = f64::from(point.shipments) * point.lot_size;

        // ∂TC/∂θ = ρ·D·nQ/2 - B1/θ = 0
        point.defect_rate = if request.quality_investment > 0.0 && request.defect_cost > 0.0 {
            (2.0 * request.quality_investment / (request.defect_cost * d * nq))
                .min(request.baseline_defect_rate)
        } else {
            request.baseline_defect_rate
        };

        // ∂TC/∂Av = D/(nQ) - B2/Av = 0
        point.setup_cost = if request.setup_investment > 0.0 {
            (request.setup_investment * nq / d).min(request.vendor_setup_cost)
        } else {
            request.vendor_setup_cost
        };

        // 1 - Φ(k1) = hb·Q/(π·D)
        let sigma_l = request.demand_std_dev * point.lead_time(request).sqrt();
        point.safety_factor = if request.backorder_cost > 0.0 && sigma_l > 0.0 {
            let tail = request.buyer_holding_cost * point.lot_size / (request.backorder_cost * d);
            upper_quantile(tail, finder)?
        } else {
            0.0
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opt_core::SetupActivity;

    fn request() -> LotSizingRequest {
        LotSizingRequest::new(
            "BR-001",
            1000.0,
            1500.0,
            3000.0,
            vec![SetupActivity::new(10.0, 6.0, 3.0)],
        )
        .with_setup_costs(400.0, 50.0)
        .with_transport(30.0, 2.0)
        .with_holding_costs(5.0, 4.0)
        .with_backorder(80.0, 7.0)
        .with_production_cost(1000.0, 0.0005)
        .with_quality(50.0, 0.02, 100.0)
        .with_setup_investment(200.0)
    }

    fn point() -> DecisionPoint {
        DecisionPoint {
            shipments: 1,
            lot_size: 200.0,
            production_rate: 2000.0,
            safety_factor: 0.0,
            setup_cost: 400.0,
            defect_rate: 0.02,
            setup_time: 10.0,
            crash_cost: 0.0,
        }
    }

    #[test]
    fn test_vendor_holding_single_shipment() {
        // n = 1 時供應商持有成本為 hv·Q·D/(2P)
        let breakdown = IntegratedCostModel.evaluate(&request(), &point());
        assert!((breakdown.vendor_holding - 4.0 * 200.0 * 1000.0 / (2.0 * 2000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_cost_components() {
        let breakdown = IntegratedCostModel.evaluate(&request(), &point());

        assert!((breakdown.setup - 5.0 * 400.0).abs() < 1e-9);
        assert!((breakdown.ordering - 5.0 * 50.0).abs() < 1e-9);
        assert!((breakdown.transport - 5.0 * 30.0).abs() < 1e-9);
        assert!((breakdown.defect - 50.0 * 0.02 * 1000.0 * 200.0 / 2.0).abs() < 1e-9);
        assert!((breakdown.production - 1000.0 * (0.5 + 1.0)).abs() < 1e-9);
        // 未投資
        assert_eq!(breakdown.investment, 0.0);
    }

    #[test]
    fn test_refine_levers_stationary() {
        let req = request();
        let mut p = point();
        IntegratedCostModel
            .refine_levers(&req, &mut p, &RootFinder::default())
            .unwrap();

        // θ = 2·B1/(ρ·D·nQ) = 200/(50·1000·200)
        assert!((p.defect_rate - 2e-5).abs() < 1e-15);
        // Av = B2·nQ/D = 200·200/1000
        assert!((p.setup_cost - 40.0).abs() < 1e-12);
        // 1 - Φ(k) = 5·200/(80·1000) = 0.0125
        assert!((p.safety_factor - 2.241_403).abs() < 1e-4);
    }

    #[test]
    fn test_refine_levers_lower_cost() {
        let req = request();
        let before = point();
        let mut after = before;
        IntegratedCostModel
            .refine_levers(&req, &mut after, &RootFinder::default())
            .unwrap();

        assert!(
            IntegratedCostModel.total_cost(&req, &after)
                < IntegratedCostModel.total_cost(&req, &before)
        );
    }

    #[test]
    fn test_disabled_levers_keep_baseline() {
        let mut req = request();
        req.quality_investment = 0.0;
        req.setup_investment = 0.0;
        let mut p = point();
        IntegratedCostModel
            .refine_levers(&req, &mut p, &RootFinder::default())
            .unwrap();

        assert_eq!(p.defect_rate, 0.02);
        assert_eq!(p.setup_cost, 400.0);
    }
}
