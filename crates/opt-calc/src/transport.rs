//! 運輸成本批量（supply-chain）

use chrono::{Days, NaiveDate};
use opt_core::{
    OptimizationResult, OptimizationStatus, Result, StrategyConfig, StrategyKind,
    TransportParameters,
};

const DAYS_PER_YEAR: u64 = 365;

/// 批量成本評估
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotCost {
    /// 持有成本 h·Q/2
    pub holding: f64,
    /// 訂購成本 S·D/Q
    pub ordering: f64,
    /// 運輸成本（與距離成正比）
    pub transport: f64,
}

impl LotCost {
    pub fn total(&self) -> f64 {
        self.holding + self.ordering + self.transport
    }
}

/// 運輸批量策略
///
/// 經典 EOQ 取捨：Q* = sqrt(2·D·S/h)。運輸成本按出貨量與距離計費，不影響 Q*。
#[derive(Debug, Clone, PartialEq)]
pub struct TransportLotSizingStrategy {
    params: TransportParameters,
    config: StrategyConfig,
}

impl TransportLotSizingStrategy {
    pub fn new(params: TransportParameters, config: StrategyConfig) -> Self {
        Self { params, config }
    }

    pub fn params(&self) -> &TransportParameters {
        &self.params
    }

    /// 經濟訂購量 Q*
    pub fn economic_order_quantity(&self) -> f64 {
        let p = &self.params;
        (2.0 * p.demand * p.ordering_cost / p.holding_cost).sqrt()
    }

    /// 以批量 Q 評估年成本
    pub fn cost_at(&self, lot_size: f64) -> LotCost {
        let p = &self.params;
        LotCost {
            holding: p.holding_cost * lot_size / 2.0,
            ordering: p.ordering_cost * p.demand / lot_size,
            transport: self.config.transport_rate * p.distance * p.demand,
        }
    }

    /// 執行計算
    pub fn run(&self) -> Result<OptimizationResult> {
        let start_time = std::time::Instant::now();
        let p = &self.params;

        tracing::info!(
            "開始運輸批量計算：需求 {}，持有成本 {}，訂購成本 {}，距離 {}",
            p.demand,
            p.holding_cost,
            p.ordering_cost,
            p.distance
        );

        let lot_size = self.economic_order_quantity();
        let shipments = (p.demand / lot_size).ceil().max(1.0) as u32;

        let optimal = self.cost_at(lot_size);
        // 基準：一次出貨全部需求
        let baseline = self.cost_at(p.demand);

        tracing::debug!(
            "Q* = {:.4}，出貨 {} 次，最適成本 {:.4}，基準成本 {:.4}",
            lot_size,
            shipments,
            optimal.total(),
            baseline.total()
        );

        let mut result = OptimizationResult::pending(StrategyKind::TransportLotSizing);
        result.transport_cost = Some(optimal.transport);
        result.cost_savings = Some(baseline.total() - optimal.total());
        result.optimal_shipments = Some(shipments);
        result.setup_time_reduction = Some((1.0 - lot_size / p.demand).max(0.0));
        if let Some(start_date) = p.start_date {
            result.recommended_dates = Self::shipment_dates(start_date, shipments);
        }
        result.status = OptimizationStatus::Optimal;
        result.computation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("運輸批量計算完成，耗時 {:?}", start_time.elapsed());

        Ok(result)
    }

    /// 全年平均分佈的出貨日期
    ///
    /// 第 k 次出貨在 floor(k·365/n) 天後；同一天的多次出貨只列一次。
    fn shipment_dates(start_date: NaiveDate, shipments: u32) -> Vec<NaiveDate> {
        let n = u64::from(shipments.max(1));
        let mut dates: Vec<NaiveDate> = (0..u64::from(shipments))
            .filter_map(|k| start_date.checked_add_days(Days::new(k * DAYS_PER_YEAR / n)))
            .collect();
        dates.dedup();
        dates
    }
}
