//! 優化引擎配置模型

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 策略預設參數與數值設定
///
/// 呼叫端未覆寫的經濟常數一律取自此表，由呼叫端顯式傳入，不讀取全域狀態。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// 期初庫存 Q₀
    pub initial_inventory: f64,

    /// 價格下限 m
    pub min_price: f64,

    /// 價格上限 M
    pub max_price: f64,

    /// 需求截距 a
    pub demand_intercept: f64,

    /// 需求斜率 b
    pub demand_slope: f64,

    /// 需求波動 delta
    pub demand_fluctuation: f64,

    /// 單位持有成本
    pub holding_cost: f64,

    /// 每次訂購成本
    pub ordering_cost: f64,

    /// 年需求量（運輸批量策略）
    pub annual_demand: f64,

    /// 運輸距離
    pub distance: f64,

    /// 單位運輸費率（每單位貨物每單位距離）
    pub transport_rate: f64,

    /// 定價模擬的最大期數
    pub max_periods: u32,

    /// 補貨提前期（期數）
    pub lead_time_periods: f64,

    /// 安全係數 z
    pub service_factor: f64,

    /// 每期天數（推算建議日期用）
    pub period_length_days: u32,

    /// 求根容差
    pub root_tolerance: f64,

    /// 求根最大迭代次數
    pub root_max_iterations: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            initial_inventory: 1000.0,
            min_price: 30.0,
            max_price: 40.0,
            demand_intercept: 100.0,
            demand_slope: 1.0,
            demand_fluctuation: 0.2,
            holding_cost: 5.0,
            ordering_cost: 150.0,
            annual_demand: 1000.0,
            distance: 100.0,
            transport_rate: 0.01,
            max_periods: 52,
            lead_time_periods: 2.0,
            service_factor: 1.65,
            period_length_days: 7,
            root_tolerance: 1e-9,
            root_max_iterations: 100,
        }
    }
}

impl StrategyConfig {
    /// 建構器模式：設置定價模擬最大期數
    pub fn with_max_periods(mut self, periods: u32) -> Self {
        self.max_periods = periods;
        self
    }

    /// 建構器模式：設置補貨提前期
    pub fn with_lead_time_periods(mut self, periods: f64) -> Self {
        self.lead_time_periods = periods;
        self
    }

    /// 建構器模式：設置安全係數
    pub fn with_service_factor(mut self, z: f64) -> Self {
        self.service_factor = z;
        self
    }

    /// 建構器模式：設置運輸費率
    pub fn with_transport_rate(mut self, rate: f64) -> Self {
        self.transport_rate = rate;
        self
    }

    /// 建構器模式：設置每期天數
    pub fn with_period_length_days(mut self, days: u32) -> Self {
        self.period_length_days = days;
        self
    }

    /// 建構器模式：設置求根容差與最大迭代次數
    pub fn with_root_settings(mut self, tolerance: f64, max_iterations: u32) -> Self {
        self.root_tolerance = tolerance;
        self.root_max_iterations = max_iterations;
        self
    }
}

/// 整合批量優化器（Method1）設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSizingConfig {
    /// 運送次數 n 的搜尋上限
    pub max_shipments: u32,

    /// 每個 n 的座標下降輪數上限
    pub max_rounds: u32,

    /// 相對收斂容差
    pub tolerance: f64,

    /// 是否平行搜尋 n
    pub parallel: bool,

    /// 搜尋時限（None 表示不限）
    pub deadline: Option<Duration>,
}

impl Default for LotSizingConfig {
    fn default() -> Self {
        Self {
            max_shipments: 20,
            max_rounds: 100,
            tolerance: 1e-9,
            parallel: true,
            deadline: None,
        }
    }
}

impl LotSizingConfig {
    /// 建構器模式：設置 n 的搜尋上限
    pub fn with_max_shipments(mut self, max_shipments: u32) -> Self {
        self.max_shipments = max_shipments;
        self
    }

    /// 建構器模式：設置座標下降輪數上限
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// 建構器模式：設置是否平行搜尋
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置搜尋時限
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_defaults() {
        let config = StrategyConfig::default();

        assert_eq!(config.initial_inventory, 1000.0);
        assert_eq!(config.min_price, 30.0);
        assert_eq!(config.max_price, 40.0);
        assert_eq!(config.demand_intercept, 100.0);
        assert_eq!(config.demand_slope, 1.0);
        assert_eq!(config.demand_fluctuation, 0.2);
        assert_eq!(config.holding_cost, 5.0);
        assert_eq!(config.ordering_cost, 150.0);
    }

    #[test]
    fn test_strategy_config_builder() {
        let config = StrategyConfig::default()
            .with_max_periods(10)
            .with_service_factor(2.0)
            .with_root_settings(1e-6, 50);

        assert_eq!(config.max_periods, 10);
        assert_eq!(config.service_factor, 2.0);
        assert_eq!(config.root_tolerance, 1e-6);
        assert_eq!(config.root_max_iterations, 50);
    }

    #[test]
    fn test_lot_sizing_config_builder() {
        let config = LotSizingConfig::default()
            .with_max_shipments(8)
            .with_parallel(false)
            .with_deadline(Duration::from_secs(2));

        assert_eq!(config.max_shipments, 8);
        assert!(!config.parallel);
        assert_eq!(config.deadline, Some(Duration::from_secs(2)));
        assert_eq!(config.max_rounds, 100);
    }
}
