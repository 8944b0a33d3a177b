// ==========================================
// 合同汇总报表 - 透视汇总引擎
// ==========================================
// 输入: 已筛选的合同行
// 输出: PivotResult（行 Work Type × 列 Plan，Amount 合计）
// ==========================================
// 步骤:
// 1) 单行金额先舍入到 2 位（银行家舍入）
// 2) 按 (Work Type, Plan) 分组求和，缺失组合补 0
// 3) 排序: 优先工种在前，其余按字母序
//    Plan 列全部为数值时按数值升序，否则按字符串升序
// ==========================================

use crate::config::{PriorityOrder, ReportConfig, DEFAULT_PRIORITY_WORK_TYPES};
use crate::domain::{round_amount, ContractRow, PivotResult, PivotRow};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::{debug, info};

// ==========================================
// PivotAggregator - 透视汇总引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct PivotAggregator {
    priority_work_types: Vec<String>,
    priority_order: PriorityOrder,
}

impl Default for PivotAggregator {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRIORITY_WORK_TYPES.iter().map(|s| s.to_string()).collect(),
            PriorityOrder::Alphabetical,
        )
    }
}

impl PivotAggregator {
    pub fn new(priority_work_types: Vec<String>, priority_order: PriorityOrder) -> Self {
        Self {
            priority_work_types,
            priority_order,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.priority_work_types.clone(), config.priority_order)
    }

    /// 透视汇总
    ///
    /// - Work Type 或 Plan 缺失的行不参与透视
    /// - Amount 缺失按 0 计入（分组仍然存在）
    /// - 空输入 → 空结果
    pub fn aggregate<'a, I>(&self, rows: I) -> PivotResult
    where
        I: IntoIterator<Item = &'a ContractRow>,
    {
        let mut plans: BTreeSet<String> = BTreeSet::new();
        let mut groups: BTreeMap<String, BTreeMap<String, Decimal>> = BTreeMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let (Some(work_type), Some(plan)) = (&row.work_type, &row.plan) else {
                skipped += 1;
                continue;
            };
            let amount = round_amount(row.amount.unwrap_or(Decimal::ZERO));

            plans.insert(plan.clone());
            *groups
                .entry(work_type.clone())
                .or_default()
                .entry(plan.clone())
                .or_insert(Decimal::ZERO) += amount;
        }

        if skipped > 0 {
            debug!(skipped = skipped, "缺少 Work Type / Plan 的行未参与透视");
        }

        let plans = sort_plans(plans);
        let mut pivot_rows: Vec<PivotRow> = groups
            .into_iter()
            .map(|(work_type, by_plan)| PivotRow {
                amounts: plans
                    .iter()
                    .map(|plan| by_plan.get(plan).copied().unwrap_or(Decimal::ZERO))
                    .collect(),
                work_type,
            })
            .collect();

        pivot_rows.sort_by(|a, b| {
            self.priority_rank(&a.work_type)
                .cmp(&self.priority_rank(&b.work_type))
                .then_with(|| a.work_type.cmp(&b.work_type))
        });

        info!(
            work_types = pivot_rows.len(),
            plans = plans.len(),
            "透视汇总完成"
        );

        PivotResult {
            plans,
            rows: pivot_rows,
        }
    }

    /// 排序等级
    ///
    /// - Alphabetical: 优先工种统一为 0，组内按名称
    /// - Listed: 优先工种按配置位置 0..n
    /// - 非优先工种: n
    fn priority_rank(&self, work_type: &str) -> usize {
        let work_type = work_type.trim();
        let position = self
            .priority_work_types
            .iter()
            .position(|p| p == work_type);

        match (position, self.priority_order) {
            (Some(_), PriorityOrder::Alphabetical) => 0,
            (Some(idx), PriorityOrder::Listed) => idx,
            (None, _) => self.priority_work_types.len().max(1),
        }
    }
}

/// Plan 列排序
///
/// 全部可解析为数值 → 数值升序（999 在 1001 之前）；否则保持字符串升序
fn sort_plans(plans: BTreeSet<String>) -> Vec<String> {
    let numeric: Option<Vec<(Decimal, String)>> = plans
        .iter()
        .map(|p| Decimal::from_str(p).ok().map(|n| (n, p.clone())))
        .collect();

    match numeric {
        Some(mut keyed) => {
            // 数值相同的标签（"7" / "7.0"）按字符串决定先后
            keyed.sort();
            keyed.into_iter().map(|(_, plan)| plan).collect()
        }
        None => plans.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(work_type: Option<&str>, plan: Option<&str>, amount: Option<&str>) -> ContractRow {
        ContractRow {
            community: Some("A".to_string()),
            series: Some("X".to_string()),
            work_type: work_type.map(str::to_string),
            plan: plan.map(str::to_string),
            amount: amount.map(dec),
            scar_date: None,
            row_number: 0,
        }
    }

    #[test]
    fn test_empty_input_gives_empty_result() {
        let result = PivotAggregator::default().aggregate(&Vec::<ContractRow>::new());
        assert!(result.is_empty());
        assert!(result.plans.is_empty());
    }

    #[test]
    fn test_sums_and_fills_missing_with_zero() {
        let rows = vec![
            row(Some("RG"), Some("P1"), Some("100.004")),
            row(Some("RG"), Some("P1"), Some("0.996")),
            row(Some("ZZ"), Some("P2"), Some("50")),
        ];
        let result = PivotAggregator::default().aggregate(&rows);

        assert_eq!(result.plans, vec!["P1", "P2"]);
        // 100.00 + 1.00
        assert_eq!(result.amount("RG", "P1"), Some(dec("101.00")));
        assert_eq!(result.amount("RG", "P2"), Some(Decimal::ZERO));
        assert_eq!(result.amount("ZZ", "P1"), Some(Decimal::ZERO));
        assert_eq!(result.amount("ZZ", "P2"), Some(dec("50")));
    }

    #[test]
    fn test_numeric_plans_sort_by_value() {
        let rows = vec![
            row(Some("RG"), Some("1001"), Some("100")),
            row(Some("ZZ"), Some("999"), Some("50")),
            row(Some("ZZ"), Some("25"), Some("1")),
        ];
        let result = PivotAggregator::default().aggregate(&rows);

        assert_eq!(result.plans, vec!["25", "999", "1001"]);
        assert_eq!(
            result.to_table().rendered_rows(),
            vec![
                vec!["RG", "0.00", "0.00", "100.00"],
                vec!["ZZ", "1.00", "50.00", "0.00"],
            ]
        );
    }

    #[test]
    fn test_mixed_plans_sort_as_text() {
        let rows = vec![
            row(Some("RG"), Some("999"), Some("1")),
            row(Some("RG"), Some("1001"), Some("1")),
            row(Some("RG"), Some("B12"), Some("1")),
        ];
        let result = PivotAggregator::default().aggregate(&rows);
        assert_eq!(result.plans, vec!["1001", "999", "B12"]);
    }

    #[test]
    fn test_rows_rounded_before_summing() {
        // 0.005 舍入为 0.00（银行家舍入），两行合计仍为 0.00
        let rows = vec![
            row(Some("RG"), Some("P1"), Some("0.005")),
            row(Some("RG"), Some("P1"), Some("0.005")),
        ];
        let result = PivotAggregator::default().aggregate(&rows);
        assert_eq!(result.amount("RG", "P1"), Some(dec("0.00")));
    }

    #[test]
    fn test_priority_rows_first_alphabetical() {
        let rows = vec![
            row(Some("AA"), Some("P1"), Some("1")),
            row(Some("RG"), Some("P1"), Some("1")),
            row(Some("LS"), Some("P1"), Some("1")),
            row(Some("ZZ"), Some("P1"), Some("1")),
            row(Some("PV"), Some("P1"), Some("1")),
            row(Some("FG"), Some("P1"), Some("1")),
        ];
        let result = PivotAggregator::default().aggregate(&rows);
        assert_eq!(
            result.work_types(),
            vec!["FG", "LS", "PV", "RG", "AA", "ZZ"]
        );
    }

    #[test]
    fn test_priority_rows_first_listed() {
        let rows = vec![
            row(Some("AA"), Some("P1"), Some("1")),
            row(Some("FG"), Some("P1"), Some("1")),
            row(Some("RG"), Some("P1"), Some("1")),
            row(Some("PV"), Some("P1"), Some("1")),
        ];
        let aggregator = PivotAggregator::new(
            vec!["RG".into(), "PV".into(), "FG".into(), "LS".into()],
            PriorityOrder::Listed,
        );
        let result = aggregator.aggregate(&rows);
        assert_eq!(result.work_types(), vec!["RG", "PV", "FG", "AA"]);
    }

    #[test]
    fn test_incomplete_rows_skipped_and_missing_amount_is_zero() {
        let rows = vec![
            row(None, Some("P1"), Some("10")),
            row(Some("RG"), None, Some("10")),
            row(Some("LS"), Some("P1"), None),
        ];
        let result = PivotAggregator::default().aggregate(&rows);

        assert_eq!(result.work_types(), vec!["LS"]);
        assert_eq!(result.amount("LS", "P1"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let rows = vec![
            row(Some("RG"), Some("P1"), Some("12.345")),
            row(Some("XX"), Some("P2"), Some("7")),
        ];
        let aggregator = PivotAggregator::default();
        assert_eq!(aggregator.aggregate(&rows), aggregator.aggregate(&rows));
    }
}
