//! # Supply Chain Optimization
//!
//! 供應鏈優化引擎：動態定價、運輸批量、混合策略與整合批量優化（Method1），
//! 計算結果經儲存閘道保存。

pub use opt_calc::{OptimizationStrategy, RootFinder, StrategyFactory};
pub use opt_core::*;
pub use opt_optimizer::{CostModel, IntegratedCostModel, LotSizingOptimizer, SetupCrashing};
pub use opt_store::{InMemoryResultStore, ResultStore, StoredId, StoredRecord, StoredResult};

/// 優化服務
///
/// 執行計算後將結果交給儲存閘道；計算失敗時不寫入任何紀錄。
pub struct OptimizationService<S: ResultStore> {
    store: S,
    strategy_config: StrategyConfig,
    lot_sizing: LotSizingOptimizer,
}

impl<S: ResultStore> OptimizationService<S> {
    /// 以預設設定創建服務
    pub fn new(store: S) -> Self {
        Self {
            store,
            strategy_config: StrategyConfig::default(),
            lot_sizing: LotSizingOptimizer::new(LotSizingConfig::default()),
        }
    }

    /// 建構器模式：設置策略設定
    pub fn with_strategy_config(mut self, config: StrategyConfig) -> Self {
        self.strategy_config = config;
        self
    }

    /// 建構器模式：設置整合批量優化設定
    pub fn with_lot_sizing_config(mut self, config: LotSizingConfig) -> Self {
        self.lot_sizing = LotSizingOptimizer::new(config);
        self
    }

    /// 執行指定策略並儲存結果
    pub fn run_strategy(
        &mut self,
        token: &str,
        branch: &BranchParameters,
    ) -> Result<(StoredId, OptimizationResult)> {
        let strategy = StrategyFactory::create(token, branch, &self.strategy_config)?;
        let result = strategy.run()?;
        let id = self.store.save(&branch.branch_id, result.clone().into())?;

        tracing::info!(
            "分店 {} 策略 {} 完成，狀態 {:?}",
            branch.branch_id,
            result.strategy.as_token(),
            result.status
        );
        Ok((id, result))
    }

    /// 執行整合批量優化並儲存結果
    pub fn optimize_lot_size(
        &mut self,
        request: &LotSizingRequest,
    ) -> Result<(StoredId, LotSizingResult)> {
        let result = self.lot_sizing.optimize(request)?;
        let id = self.store.save(&request.branch_id, result.clone().into())?;
        Ok((id, result))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
