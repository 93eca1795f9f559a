//! 優化結果模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 策略種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    /// 動態定價/庫存（alg-ir）
    #[serde(rename = "alg-ir")]
    DynamicPricing,
    /// 運輸成本批量（supply-chain）
    #[serde(rename = "supply-chain")]
    TransportLotSizing,
    /// 混合策略
    #[default]
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl StrategyKind {
    /// 由名稱解析策略種類
    ///
    /// 未知名稱一律視為混合策略（寬鬆預設，不是錯誤）。
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "alg-ir" => StrategyKind::DynamicPricing,
            "supply-chain" => StrategyKind::TransportLotSizing,
            _ => StrategyKind::Hybrid,
        }
    }

    /// 名稱是否為已知策略
    pub fn is_known_token(token: &str) -> bool {
        matches!(
            token.trim().to_ascii_lowercase().as_str(),
            "alg-ir" | "supply-chain" | "hybrid"
        )
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            StrategyKind::DynamicPricing => "alg-ir",
            StrategyKind::TransportLotSizing => "supply-chain",
            StrategyKind::Hybrid => "hybrid",
        }
    }
}

/// 優化狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptimizationStatus {
    /// 所有求根皆收斂
    Optimal,
    /// 有解但求根曾退化為最佳估計
    Feasible,
    /// 尚未計算
    Pending,
}

/// 定價/庫存模擬的單期紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmStep {
    /// 期別（從 0 起算）
    pub period: u32,

    /// 售價
    pub price: f64,

    /// 期初庫存
    pub inventory: f64,

    /// 本期取出量
    pub retrieval: f64,

    /// 該售價下的需求
    pub demand: f64,

    /// 本期收益
    pub revenue: f64,
}

/// 策略優化結果
///
/// 未計算的欄位保持 `None`，與「計算結果為 0」區分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// 產生結果的策略
    pub strategy: StrategyKind,

    /// 狀態
    pub status: OptimizationStatus,

    // 定價欄位
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_q: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecasted_lead_time: Option<f64>,

    // 運輸欄位
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_savings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_shipments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_time_reduction: Option<f64>,

    /// 定價模擬的逐期紀錄
    #[serde(default)]
    pub steps: Vec<AlgorithmStep>,

    /// 建議日期（定價推算的日期在前）
    #[serde(default)]
    pub recommended_dates: Vec<NaiveDate>,

    /// 計算耗時（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computation_time_ms: Option<u128>,
}

impl OptimizationResult {
    /// 創建尚未計算的結果
    pub fn pending(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            status: OptimizationStatus::Pending,
            optimal_q: None,
            reorder_point: None,
            safety_stock: None,
            forecasted_lead_time: None,
            transport_cost: None,
            cost_savings: None,
            optimal_shipments: None,
            setup_time_reduction: None,
            steps: Vec::new(),
            recommended_dates: Vec::new(),
            computation_time_ms: None,
        }
    }

    /// 是否含定價欄位
    pub fn has_pricing_fields(&self) -> bool {
        self.optimal_q.is_some()
            || self.reorder_point.is_some()
            || self.safety_stock.is_some()
            || self.forecasted_lead_time.is_some()
    }

    /// 是否含運輸欄位
    pub fn has_transport_fields(&self) -> bool {
        self.transport_cost.is_some()
            || self.cost_savings.is_some()
            || self.optimal_shipments.is_some()
            || self.setup_time_reduction.is_some()
    }

    pub fn is_optimal(&self) -> bool {
        self.status == OptimizationStatus::Optimal
    }
}

/// 總成本拆解（年成本）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub setup: f64,
    pub crashing: f64,
    pub ordering: f64,
    pub transport: f64,
    pub buyer_holding: f64,
    pub vendor_holding: f64,
    pub backorder: f64,
    pub defect: f64,
    pub production: f64,
    pub investment: f64,
}

impl CostBreakdown {
    /// 總成本 TC
    pub fn total(&self) -> f64 {
        self.setup
            + self.crashing
            + self.ordering
            + self.transport
            + self.buyer_holding
            + self.vendor_holding
            + self.backorder
            + self.defect
            + self.production
            + self.investment
    }
}

/// 外層搜尋中單一運送次數的結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipmentCandidate {
    /// 運送次數 n
    pub shipments: u32,

    /// 該 n 下的最小總成本（不可行則為 None）
    pub total_cost: Option<f64>,
}

/// 整合批量優化結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSizingResult {
    /// 分店ID
    pub branch_id: String,

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

    /// 達成的整備時間 Ts
    pub setup_time: f64,

    /// 總成本 TC（最小化目標）
    pub total_cost: f64,

    /// 各整備作業的壓縮量 xᵢ（依輸入順序）
    pub crash_amounts: Vec<f64>,

    /// 成本拆解
    pub breakdown: CostBreakdown,

    /// 外層搜尋過的所有 n
    pub candidates: Vec<ShipmentCandidate>,

    /// 計算耗時（毫秒）
    pub computation_time_ms: Option<u128>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alg-ir", StrategyKind::DynamicPricing)]
    #[case("supply-chain", StrategyKind::TransportLotSizing)]
    #[case("hybrid", StrategyKind::Hybrid)]
    #[case(" Alg-IR ", StrategyKind::DynamicPricing)]
    #[case("unknown", StrategyKind::Hybrid)]
    #[case("", StrategyKind::Hybrid)]
    fn test_strategy_kind_from_token(#[case] token: &str, #[case] expected: StrategyKind) {
        assert_eq!(StrategyKind::from_token(token), expected);
    }

    #[test]
    fn test_known_tokens() {
        assert!(StrategyKind::is_known_token("supply-chain"));
        assert!(!StrategyKind::is_known_token("greedy"));
        assert_eq!(StrategyKind::Hybrid.as_token(), "hybrid");
    }

    #[test]
    fn test_default_kind_is_hybrid() {
        assert_eq!(StrategyKind::default(), StrategyKind::Hybrid);
    }

    #[test]
    fn test_pending_result_is_empty() {
        let result = OptimizationResult::pending(StrategyKind::Hybrid);

        assert_eq!(result.status, OptimizationStatus::Pending);
        assert!(!result.has_pricing_fields());
        assert!(!result.has_transport_fields());
        assert!(!result.is_optimal());
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let mut result = OptimizationResult::pending(StrategyKind::TransportLotSizing);
        result.transport_cost = Some(0.0);

        let json = serde_json::to_value(&result).unwrap();

        // 計算為 0 的欄位保留，未計算的欄位不出現
        assert_eq!(json["transportCost"], serde_json::json!(0.0));
        assert!(json.get("optimalQ").is_none());
        assert_eq!(json["strategy"], serde_json::json!("supply-chain"));
        assert_eq!(json["status"], serde_json::json!("PENDING"));
    }

    #[test]
    fn test_cost_breakdown_total() {
        let breakdown = CostBreakdown {
            setup: 1.0,
            crashing: 2.0,
            ordering: 3.0,
            transport: 4.0,
            buyer_holding: 5.0,
            vendor_holding: 6.0,
            backorder: 7.0,
            defect: 8.0,
            production: 9.0,
            investment: 10.0,
        };
        assert_eq!(breakdown.total(), 55.0);
    }
}
