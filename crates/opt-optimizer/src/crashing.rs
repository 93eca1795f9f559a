//! 整備時間壓縮（activity crashing）

use opt_core::{OptError, Result, SetupActivity};

const TIME_EPSILON: f64 = 1e-9;

/// 壓縮方案
#[derive(Debug, Clone, PartialEq)]
pub struct CrashPlan {
    /// 各作業壓縮量 xᵢ（依輸入順序）
    pub crash_amounts: Vec<f64>,

    /// 壓縮總成本 Σcᵢ·xᵢ
    pub crash_cost: f64,

    /// 達成的整備時間 Σ(aᵢ - xᵢ)
    pub setup_time: f64,
}

/// 整備時間壓縮計算器
///
/// 沒有先後限制且每單位壓縮成本在作業內固定，屬可分離線性規劃，
/// 依 cᵢ 由小到大逐一完全壓縮即為最適解。
pub struct SetupCrashing;

impl SetupCrashing {
    /// 以最小成本將整備時間壓到 target 以下
    pub fn plan(activities: &[SetupActivity], target_setup_time: f64) -> Result<CrashPlan> {
        let normal: f64 = activities.iter().map(|a| a.normal_duration).sum();
        let floor: f64 = activities.iter().map(|a| a.crash_floor).sum();

        if target_setup_time < floor - TIME_EPSILON {
            return Err(OptError::InfeasibleSetupTime {
                target: target_setup_time,
                floor,
            });
        }

        let mut crash_amounts = vec![0.0; activities.len()];
        let mut remaining = (normal - target_setup_time).max(0.0);
        let mut crash_cost = 0.0;

        for index in Self::cost_order(activities) {
            if remaining <= TIME_EPSILON {
                break;
            }
            let activity = &activities[index];
            let amount = activity.max_crash().min(remaining);
            crash_amounts[index] = amount;
            crash_cost += activity.crash_unit_cost * amount;
            remaining -= amount;
        }

        let crashed: f64 = crash_amounts.iter().sum();

        Ok(CrashPlan {
            crash_amounts,
            crash_cost,
            setup_time: normal - crashed,
        })
    }

    /// 以最小成本縮短 reduction 單位整備時間
    pub fn plan_reduction(activities: &[SetupActivity], reduction: f64) -> Result<CrashPlan> {
        let normal: f64 = activities.iter().map(|a| a.normal_duration).sum();
        Self::plan(activities, normal - reduction)
    }

    /// 壓縮成本曲線的轉折點
    ///
    /// 從不壓縮開始，依成本順序逐一完全壓縮作業，共 k+1 個方案。
    /// 成本曲線在轉折點之間為線性，整合成本對整備時間的最小值必落在轉折點上。
    pub fn breakpoints(activities: &[SetupActivity]) -> Vec<CrashPlan> {
        let normal: f64 = activities.iter().map(|a| a.normal_duration).sum();
        let mut plans = Vec::with_capacity(activities.len() + 1);

        let mut crash_amounts = vec![0.0; activities.len()];
        let mut crash_cost = 0.0;
        let mut crashed = 0.0;
        plans.push(CrashPlan {
            crash_amounts: crash_amounts.clone(),
            crash_cost,
            setup_time: normal,
        });

        for index in Self::cost_order(activities) {
            let activity = &activities[index];
            let amount = activity.max_crash();
            if amount <= 0.0 {
                continue;
            }
            crash_amounts[index] = amount;
            crash_cost += activity.crash_unit_cost * amount;
            crashed += amount;
            plans.push(CrashPlan {
                crash_amounts: crash_amounts.clone(),
                crash_cost,
                setup_time: normal - crashed,
            });
        }

        plans
    }

    /// 依單位壓縮成本遞增排序的作業索引（同成本保持輸入順序）
    fn cost_order(activities: &[SetupActivity]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..activities.len()).collect();
        order.sort_by(|&i, &j| {
            activities[i]
                .crash_unit_cost
                .total_cmp(&activities[j].crash_unit_cost)
        });
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activities() -> Vec<SetupActivity> {
        vec![
            SetupActivity::new(10.0, 6.0, 3.0),
            SetupActivity::new(8.0, 5.0, 1.0),
        ]
    }

    #[test]
    fn test_cheapest_activity_crashed_first() {
        let plan = SetupCrashing::plan_reduction(&activities(), 5.0).unwrap();

        // 成本 1 的作業先完全壓縮 3 單位，再由成本 3 的作業補 2 單位
        assert_eq!(plan.crash_amounts, vec![2.0, 3.0]);
        assert_eq!(plan.crash_cost, 9.0);
        assert_eq!(plan.setup_time, 13.0);
    }

    #[test]
    fn test_partial_crash_of_cheapest() {
        let plan = SetupCrashing::plan_reduction(&activities(), 2.0).unwrap();

        assert_eq!(plan.crash_amounts, vec![0.0, 2.0]);
        assert_eq!(plan.crash_cost, 2.0);
    }

    #[test]
    fn test_no_crash_needed() {
        let plan = SetupCrashing::plan(&activities(), 20.0).unwrap();

        assert_eq!(plan.crash_amounts, vec![0.0, 0.0]);
        assert_eq!(plan.crash_cost, 0.0);
        assert_eq!(plan.setup_time, 18.0);
    }

    #[test]
    fn test_full_crash_reaches_floor() {
        let plan = SetupCrashing::plan(&activities(), 11.0).unwrap();

        assert_eq!(plan.crash_amounts, vec![4.0, 3.0]);
        assert_eq!(plan.crash_cost, 15.0);
        assert_eq!(plan.setup_time, 11.0);
    }

    #[test]
    fn test_target_below_floor_is_infeasible() {
        let result = SetupCrashing::plan(&activities(), 10.0);

        assert!(matches!(
            result,
            Err(OptError::InfeasibleSetupTime { floor, .. }) if floor == 11.0
        ));
    }

    #[test]
    fn test_breakpoints() {
        let plans = SetupCrashing::breakpoints(&activities());

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].setup_time, 18.0);
        assert_eq!(plans[1].setup_time, 15.0);
        assert_eq!(plans[1].crash_cost, 3.0);
        assert_eq!(plans[2].setup_time, 11.0);
        assert_eq!(plans[2].crash_cost, 15.0);
    }

    #[test]
    fn test_greedy_matches_exhaustive_grid() {
        // 以格點窮舉驗證貪婪解為最小成本
        let acts = activities();
        let greedy = SetupCrashing::plan_reduction(&acts, 5.0).unwrap();

        let mut best = f64::INFINITY;
        for i in 0..=40 {
            for j in 0..=30 {
                let x1 = i as f64 * 0.1;
                let x2 = j as f64 * 0.1;
                if x1 + x2 >= 5.0 - 1e-9 {
                    best = best.min(3.0 * x1 + 1.0 * x2);
                }
            }
        }
        assert!(greedy.crash_cost <= best + 1e-9);
    }
}
