//! 需求曲線模型

use serde::{Deserialize, Serialize};

use crate::{OptError, Result};

/// 需求波動分佈
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandDistribution {
    /// 均勻分佈（目前唯一支援）
    #[default]
    Uniform,
}

/// 線性需求曲線 D(p) = a - b·p
///
/// 建構後不可變；波動 delta 定義對稱區間 D(p) ± delta，供穩健性檢查使用。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandCurve {
    intercept: f64,
    slope: f64,
    fluctuation: f64,
    distribution: DemandDistribution,
}

impl DemandCurve {
    /// 創建需求曲線
    ///
    /// 斜率必須為正、波動不可為負，否則回傳 `InvalidParameters`。
    pub fn new(intercept: f64, slope: f64, fluctuation: f64) -> Result<Self> {
        if !intercept.is_finite() || !slope.is_finite() || !fluctuation.is_finite() {
            return Err(OptError::InvalidParameters(format!(
                "需求參數必須為有限值: a={intercept}, b={slope}, delta={fluctuation}"
            )));
        }
        if slope <= 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "需求斜率必須為正: b={slope}"
            )));
        }
        if fluctuation < 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "需求波動不可為負: delta={fluctuation}"
            )));
        }
        if intercept < 0.0 {
            return Err(OptError::InvalidParameters(format!(
                "需求截距不可為負: a={intercept}"
            )));
        }

        Ok(Self {
            intercept,
            slope,
            fluctuation,
            distribution: DemandDistribution::Uniform,
        })
    }

    /// 建構器模式：設置波動分佈
    pub fn with_distribution(mut self, distribution: DemandDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn fluctuation(&self) -> f64 {
        self.fluctuation
    }

    pub fn distribution(&self) -> DemandDistribution {
        self.distribution
    }

    /// 價格 p 下的需求量，截斷於 0
    pub fn demand_at(&self, price: f64) -> f64 {
        (self.intercept - self.slope * price).max(0.0)
    }

    /// 邊際收益 d(p·D(p))/dp = a - 2·b·p
    pub fn marginal_revenue_at(&self, price: f64) -> f64 {
        self.intercept - 2.0 * self.slope * price
    }

    /// 需求波動區間 [D(p) - delta, D(p) + delta]
    pub fn band_at(&self, price: f64) -> (f64, f64) {
        let demand = self.demand_at(price);
        (demand - self.fluctuation, demand + self.fluctuation)
    }

    /// 反需求函數：售出 q 單位所需的價格
    pub fn price_for_quantity(&self, quantity: f64) -> f64 {
        (self.intercept - quantity) / self.slope
    }

    /// 價格 p 下的收益 p·D(p)
    pub fn revenue_at(&self, price: f64) -> f64 {
        price * self.demand_at(price)
    }
}
