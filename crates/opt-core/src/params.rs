//! 優化參數模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DemandCurve, OptError, Result};

/// 動態定價/庫存策略參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// 期初庫存 Q₀
    pub initial_inventory: f64,

    /// 價格下限 m
    pub min_price: f64,

    /// 價格上限 M
    pub max_price: f64,

    /// 需求曲線
    pub demand: DemandCurve,

    /// 模擬起始日（推算建議日期，未提供則不產生日期）
    pub start_date: Option<NaiveDate>,
}

impl PricingParameters {
    /// 創建定價參數
    pub fn new(
        initial_inventory: f64,
        min_price: f64,
        max_price: f64,
        demand: DemandCurve,
    ) -> Result<Self> {
        if !initial_inventory.is_finite() || initial_inventory < 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "期初庫存不可為負: Q0={initial_inventory}"
            )));
        }
        if !(min_price.is_finite() && max_price.is_finite()) || min_price < 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "價格區間無效: [{min_price}, {max_price}]"
            )));
        }
        if min_price > max_price {
            return Err(OptError::InvalidParameters(format!(
                "價格下限大於上限: [{min_price}, {max_price}]"
            )));
        }

        Ok(Self {
            initial_inventory,
            min_price,
            max_price,
            demand,
            start_date: None,
        })
    }

    /// 建構器模式：設置模擬起始日
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// 運輸批量策略參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportParameters {
    /// 年需求量 D
    pub demand: f64,

    /// 單位持有成本 h
    pub holding_cost: f64,

    /// 每次訂購成本 S
    pub ordering_cost: f64,

    /// 運輸距離
    pub distance: f64,

    /// 第一批出貨日（推算出貨日期，未提供則不產生日期）
    pub start_date: Option<NaiveDate>,
}

impl TransportParameters {
    /// 創建運輸批量參數
    pub fn new(demand: f64, holding_cost: f64, ordering_cost: f64, distance: f64) -> Result<Self> {
        if !demand.is_finite() || demand <= 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "需求量必須為正: D={demand}"
            )));
        }
        if !holding_cost.is_finite() || holding_cost <= 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "持有成本必須為正: h={holding_cost}"
            )));
        }
        if !ordering_cost.is_finite() || ordering_cost <= 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "訂購成本必須為正: S={ordering_cost}"
            )));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "運輸距離不可為負: distance={distance}"
            )));
        }

        Ok(Self {
            demand,
            holding_cost,
            ordering_cost,
            distance,
            start_date: None,
        })
    }

    /// 建構器模式：設置第一批出貨日
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// 策略參數（依策略種類只填入對應的一組）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyParameters {
    Pricing(PricingParameters),
    Transport(TransportParameters),
    Hybrid {
        pricing: PricingParameters,
        transport: TransportParameters,
    },
}

/// 分店參數覆寫
///
/// 未設置的欄位由策略工廠以預設常數補齊。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchParameters {
    /// 分店ID
    pub branch_id: String,

    pub initial_inventory: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub demand_intercept: Option<f64>,
    pub demand_slope: Option<f64>,
    pub demand_fluctuation: Option<f64>,
    pub annual_demand: Option<f64>,
    pub holding_cost: Option<f64>,
    pub ordering_cost: Option<f64>,
    pub distance: Option<f64>,

    /// 規劃起始日
    pub start_date: Option<NaiveDate>,
}

impl BranchParameters {
    /// 創建只含分店ID的參數（全部使用預設值）
    pub fn new(branch_id: impl Into<String>) -> Self {
        Self {
            branch_id: branch_id.into(),
            ..Self::default()
        }
    }

    /// 建構器模式：設置期初庫存
    pub fn with_initial_inventory(mut self, quantity: f64) -> Self {
        self.initial_inventory = Some(quantity);
        self
    }

    /// 建構器模式：設置價格區間
    pub fn with_price_band(mut self, min_price: f64, max_price: f64) -> Self {
        self.min_price = Some(min_price);
        self.max_price = Some(max_price);
        self
    }

    /// 建構器模式：設置需求曲線參數
    pub fn with_demand_curve(mut self, intercept: f64, slope: f64, fluctuation: f64) -> Self {
        self.demand_intercept = Some(intercept);
        self.demand_slope = Some(slope);
        self.demand_fluctuation = Some(fluctuation);
        self
    }

    /// 建構器模式：設置運輸批量參數
    pub fn with_transport(
        mut self,
        annual_demand: f64,
        holding_cost: f64,
        ordering_cost: f64,
        distance: f64,
    ) -> Self {
        self.annual_demand = Some(annual_demand);
        self.holding_cost = Some(holding_cost);
        self.ordering_cost = Some(ordering_cost);
        self.distance = Some(distance);
        self
    }

    /// 建構器模式：設置規劃起始日
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// 整備作業（可壓縮）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetupActivity {
    /// 正常工時 aᵢ
    pub normal_duration: f64,

    /// 壓縮下限 bᵢ（bᵢ ≤ aᵢ）
    pub crash_floor: f64,

    /// 單位壓縮成本 cᵢ
    pub crash_unit_cost: f64,
}

impl SetupActivity {
    pub fn new(normal_duration: f64, crash_floor: f64, crash_unit_cost: f64) -> Self {
        Self {
            normal_duration,
            crash_floor,
            crash_unit_cost,
        }
    }

    /// 最大可壓縮量 aᵢ - bᵢ
    pub fn max_crash(&self) -> f64 {
        self.normal_duration - self.crash_floor
    }
}

/// 整合供應商-買方批量請求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSizingRequest {
    /// 分店ID
    pub branch_id: String,

    /// 年需求量 D
    pub demand: f64,

    /// 生產速率下限 Pmin
    pub min_production_rate: f64,

    /// 生產速率上限 Pmax
    pub max_production_rate: f64,

    /// 原始供應商整備成本 Av0
    pub vendor_setup_cost: f64,

    /// 買方訂購成本 A0
    pub ordering_cost: f64,

    /// 每次運送成本 CT
    pub transport_cost: f64,

    /// 買方持有成本 hb
    pub buyer_holding_cost: f64,

    /// 供應商持有成本 hv
    pub vendor_holding_cost: f64,

    /// 缺貨成本 π
    pub backorder_cost: f64,

    /// 生產成本係數 ξ1（與速率成反比的部分）
    pub rate_cost_inverse: f64,

    /// 生產成本係數 ξ2（與速率成正比的部分）
    pub rate_cost_linear: f64,

    /// 品質投資係數 B1
    pub quality_investment: f64,

    /// 整備成本降低投資係數 B2
    pub setup_investment: f64,

    /// 需求標準差 σ（每單位前置時間）
    pub demand_std_dev: f64,

    /// 不良品成本 ρ
    pub defect_cost: f64,

    /// 原始不良率 θ0
    pub baseline_defect_rate: f64,

    /// 運輸前置時間 tT
    pub transport_lead_time: f64,

    /// 整備作業清單
    pub setup_activities: Vec<SetupActivity>,
}

impl LotSizingRequest {
    /// 創建請求，其餘成本常數預設為 0
    pub fn new(
        branch_id: impl Into<String>,
        demand: f64,
        min_production_rate: f64,
        max_production_rate: f64,
        setup_activities: Vec<SetupActivity>,
    ) -> Self {
        Self {
            branch_id: branch_id.into(),
            demand,
            min_production_rate,
            max_production_rate,
            vendor_setup_cost: 0.0,
            ordering_cost: 0.0,
            transport_cost: 0.0,
            buyer_holding_cost: 0.0,
            vendor_holding_cost: 0.0,
            backorder_cost: 0.0,
            rate_cost_inverse: 0.0,
            rate_cost_linear: 0.0,
            quality_investment: 0.0,
            setup_investment: 0.0,
            demand_std_dev: 0.0,
            defect_cost: 0.0,
            baseline_defect_rate: 0.0,
            transport_lead_time: 0.0,
            setup_activities,
        }
    }

    /// 建構器模式：設置整備與訂購成本
    pub fn with_setup_costs(mut self, vendor_setup_cost: f64, ordering_cost: f64) -> Self {
        self.vendor_setup_cost = vendor_setup_cost;
        self.ordering_cost = ordering_cost;
        self
    }

    /// 建構器模式：設置運輸成本與前置時間
    pub fn with_transport(mut self, transport_cost: f64, transport_lead_time: f64) -> Self {
        self.transport_cost = transport_cost;
        self.transport_lead_time = transport_lead_time;
        self
    }

    /// 建構器模式：設置持有成本
    pub fn with_holding_costs(mut self, buyer: f64, vendor: f64) -> Self {
        self.buyer_holding_cost = buyer;
        self.vendor_holding_cost = vendor;
        self
    }

    /// 建構器模式：設置缺貨成本與需求標準差
    pub fn with_backorder(mut self, backorder_cost: f64, demand_std_dev: f64) -> Self {
        self.backorder_cost = backorder_cost;
        self.demand_std_dev = demand_std_dev;
        self
    }

    /// 建構器模式：設置生產成本係數 ξ1、ξ2
    pub fn with_production_cost(mut self, inverse: f64, linear: f64) -> Self {
        self.rate_cost_inverse = inverse;
        self.rate_cost_linear = linear;
        self
    }

    /// 建構器模式：設置品質參數（ρ、θ0、B1）
    pub fn with_quality(
        mut self,
        defect_cost: f64,
        baseline_defect_rate: f64,
        investment: f64,
    ) -> Self {
        self.defect_cost = defect_cost;
        self.baseline_defect_rate = baseline_defect_rate;
        self.quality_investment = investment;
        self
    }

    /// 建構器模式：設置整備成本降低投資係數 B2
    pub fn with_setup_investment(mut self, investment: f64) -> Self {
        self.setup_investment = investment;
        self
    }

    /// 正常整備時間 Σaᵢ
    pub fn normal_setup_time(&self) -> f64 {
        self.setup_activities.iter().map(|a| a.normal_duration).sum()
    }

    /// 最短整備時間 Σbᵢ
    pub fn minimum_setup_time(&self) -> f64 {
        self.setup_activities.iter().map(|a| a.crash_floor).sum()
    }

    /// 驗證請求，任何搜尋開始前即失敗
    pub fn validate(&self) -> Result<()> {
        if self.setup_activities.is_empty() {
            return Err(OptError::InvalidRequest("整備作業清單不可為空".to_string()));
        }
        if !self.demand.is_finite() || self.demand <= 0.0 {
            return Err(OptError::InvalidRequest(format!(
                "需求量必須為正: D={}",
                self.demand
            )));
        }
        if self.min_production_rate > self.max_production_rate {
            return Err(OptError::InvalidRequest(format!(
                "生產速率下限大於上限: [{}, {}]",
                self.min_production_rate, self.max_production_rate
            )));
        }
        if !self.min_production_rate.is_finite()
            || !self.max_production_rate.is_finite()
            || self.min_production_rate <= 0.0
        {
            return Err(OptError::InvalidRequest(format!(
                "生產速率必須為正: [{}, {}]",
                self.min_production_rate, self.max_production_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.baseline_defect_rate) {
            return Err(OptError::InvalidRequest(format!(
                "原始不良率必須介於 0 與 1: θ0={}",
                self.baseline_defect_rate
            )));
        }

        let constants = [
            ("Av0", self.vendor_setup_cost),
            ("A0", self.ordering_cost),
            ("CT", self.transport_cost),
            ("hb", self.buyer_holding_cost),
            ("hv", self.vendor_holding_cost),
            ("π", self.backorder_cost),
            ("ξ1", self.rate_cost_inverse),
            ("ξ2", self.rate_cost_linear),
            ("B1", self.quality_investment),
            ("B2", self.setup_investment),
            ("σ", self.demand_std_dev),
            ("ρ", self.defect_cost),
            ("tT", self.transport_lead_time),
        ];
        if let Some((name, value)) = constants
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(OptError::InvalidRequest(format!(
                "成本常數不可為負: {name}={value}"
            )));
        }

        for (index, activity) in self.setup_activities.iter().enumerate() {
            let valid = activity.crash_floor >= 0.0
                && activity.crash_floor <= activity.normal_duration
                && activity.crash_unit_cost >= 0.0
                && activity.normal_duration.is_finite()
                && activity.crash_unit_cost.is_finite();
            if !valid {
                return Err(OptError::InvalidRequest(format!(
                    "整備作業 {} 無效: a={}, b={}, c={}",
                    index + 1,
                    activity.normal_duration,
                    activity.crash_floor,
                    activity.crash_unit_cost
                )));
            }
        }

        Ok(())
    }
}
