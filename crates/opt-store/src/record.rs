//! 儲存紀錄

use chrono::{DateTime, Utc};
use opt_core::{LotSizingResult, OptimizationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 紀錄ID
pub type StoredId = Uuid;

/// 可儲存的優化結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "result", rename_all = "camelCase")]
pub enum StoredResult {
    Strategy(OptimizationResult),
    LotSizing(LotSizingResult),
}

impl StoredResult {
    pub fn as_strategy(&self) -> Option<&OptimizationResult> {
        match self {
            StoredResult::Strategy(result) => Some(result),
            StoredResult::LotSizing(_) => None,
        }
    }

    pub fn as_lot_sizing(&self) -> Option<&LotSizingResult> {
        match self {
            StoredResult::LotSizing(result) => Some(result),
            StoredResult::Strategy(_) => None,
        }
    }
}

impl From<OptimizationResult> for StoredResult {
    fn from(result: OptimizationResult) -> Self {
        StoredResult::Strategy(result)
    }
}

impl From<LotSizingResult> for StoredResult {
    fn from(result: LotSizingResult) -> Self {
        StoredResult::LotSizing(result)
    }
}

/// 儲存紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// 紀錄ID
    pub id: StoredId,

    /// 分店ID
    pub branch_id: String,

    /// 儲存時間
    pub saved_at: DateTime<Utc>,

    /// 優化結果
    pub result: StoredResult,
}

impl StoredRecord {
    /// 創建新紀錄
    pub fn new(branch_id: impl Into<String>, result: StoredResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            branch_id: branch_id.into(),
            saved_at: Utc::now(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opt_core::StrategyKind;

    #[test]
    fn test_record_serialization() {
        let record = StoredRecord::new(
            "BR-001",
            OptimizationResult::pending(StrategyKind::TransportLotSizing).into(),
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["branchId"], "BR-001");
        assert_eq!(json["result"]["type"], "strategy");
        assert_eq!(json["result"]["result"]["strategy"], "supply-chain");

        let back: StoredRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
