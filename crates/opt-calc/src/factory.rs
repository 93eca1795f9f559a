//! 策略工廠

use opt_core::{
    BranchParameters, DemandCurve, PricingParameters, Result, StrategyConfig, StrategyKind,
    StrategyParameters, TransportParameters,
};

use crate::OptimizationStrategy;

/// 策略工廠
///
/// 以名稱（"alg-ir"、"supply-chain"、"hybrid"）與分店參數建立策略，
/// 未覆寫的常數取自 `StrategyConfig`。未知名稱退回混合策略。
pub struct StrategyFactory;

impl StrategyFactory {
    /// 建立策略
    pub fn create(
        token: &str,
        branch: &BranchParameters,
        config: &StrategyConfig,
    ) -> Result<OptimizationStrategy> {
        if !StrategyKind::is_known_token(token) {
            tracing::warn!("未知的策略名稱 {:?}，改用混合策略", token);
        }
        let kind = StrategyKind::from_token(token);

        tracing::debug!("分店 {} 建立策略 {}", branch.branch_id, kind.as_token());

        let parameters = Self::resolve_parameters(kind, branch, config)?;
        Ok(OptimizationStrategy::from_parameters(parameters, config.clone()))
    }

    /// 以預設值補齊策略所需參數
    pub fn resolve_parameters(
        kind: StrategyKind,
        branch: &BranchParameters,
        config: &StrategyConfig,
    ) -> Result<StrategyParameters> {
        let parameters = match kind {
            StrategyKind::DynamicPricing => {
                StrategyParameters::Pricing(Self::pricing_parameters(branch, config)?)
            }
            StrategyKind::TransportLotSizing => {
                StrategyParameters::Transport(Self::transport_parameters(branch, config)?)
            }
            StrategyKind::Hybrid => StrategyParameters::Hybrid {
                pricing: Self::pricing_parameters(branch, config)?,
                transport: Self::transport_parameters(branch, config)?,
            },
        };
        Ok(parameters)
    }

    fn pricing_parameters(
        branch: &BranchParameters,
        config: &StrategyConfig,
    ) -> Result<PricingParameters> {
        let curve = DemandCurve::new(
            branch.demand_intercept.unwrap_or(config.demand_intercept),
            branch.demand_slope.unwrap_or(config.demand_slope),
            branch.demand_fluctuation.unwrap_or(config.demand_fluctuation),
        )?;
        let mut params = PricingParameters::new(
            branch.initial_inventory.unwrap_or(config.initial_inventory),
            branch.min_price.unwrap_or(config.min_price),
            branch.max_price.unwrap_or(config.max_price),
            curve,
        )?;
        params.start_date = branch.start_date;
        Ok(params)
    }

    fn transport_parameters(
        branch: &BranchParameters,
        config: &StrategyConfig,
    ) -> Result<TransportParameters> {
        let mut params = TransportParameters::new(
            branch.annual_demand.unwrap_or(config.annual_demand),
            branch.holding_cost.unwrap_or(config.holding_cost),
            branch.ordering_cost.unwrap_or(config.ordering_cost),
            branch.distance.unwrap_or(config.distance),
        )?;
        params.start_date = branch.start_date;
        Ok(params)
    }
}
