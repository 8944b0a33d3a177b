// ==========================================
// 合同汇总报表 - 行筛选引擎
// ==========================================
// 规则: Community / Series 字符串精确相等；
//       指定 Scar Date 时日期精确相等（非区间），未指定时不限日期
// 无匹配返回空集，是否告警由调用方决定
// ==========================================

use crate::domain::{ContractRow, Dataset, SelectionCriteria};
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct RowFilter {
    // 无状态引擎,不需要注入依赖
}

impl RowFilter {
    pub fn new() -> Self {
        Self {}
    }

    /// scar_date 为 None 时返回该 (Community, Series) 下的全部行，含无日期的行
    pub fn filter<'a>(
        &self,
        dataset: &'a Dataset,
        community: &str,
        series: &str,
        scar_date: Option<NaiveDate>,
    ) -> Vec<&'a ContractRow> {
        let rows: Vec<&ContractRow> = dataset
            .iter()
            .filter(|row| {
                row.community.as_deref() == Some(community)
                    && row.series.as_deref() == Some(series)
                    && scar_date.map_or(true, |d| row.scar_date == Some(d))
            })
            .collect();

        debug!(
            community = community,
            series = series,
            scar_date = ?scar_date,
            matched = rows.len(),
            "行筛选完成"
        );
        rows
    }

    pub fn filter_by<'a>(
        &self,
        dataset: &'a Dataset,
        criteria: &SelectionCriteria,
    ) -> Vec<&'a ContractRow> {
        self.filter(
            dataset,
            &criteria.community,
            &criteria.series,
            Some(criteria.scar_date),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(community: &str, series: &str, scar_date: NaiveDate, row_number: usize) -> ContractRow {
        ContractRow {
            community: Some(community.to_string()),
            series: Some(series.to_string()),
            work_type: Some("RG".to_string()),
            plan: Some("P1".to_string()),
            amount: None,
            scar_date: Some(scar_date),
            row_number,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            row("Mesa", "40s", date(2024, 1, 1), 1),
            row("Mesa", "40s", date(2024, 2, 1), 2),
            row("Mesa Verde", "40s", date(2024, 1, 1), 3),
            row("Mesa", "40", date(2024, 1, 1), 4),
            row("Mesa", "40s", date(2024, 1, 1), 5),
        ])
    }

    #[test]
    fn test_exact_match_all_three() {
        let data = dataset();
        let rows = RowFilter::new().filter(&data, "Mesa", "40s", Some(date(2024, 1, 1)));
        let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![1, 5]);
    }

    #[test]
    fn test_rows_without_date_never_match() {
        let mut rows = dataset().rows().to_vec();
        rows[0].scar_date = None;
        let data = Dataset::new(rows);
        let matched = RowFilter::new().filter(&data, "Mesa", "40s", Some(date(2024, 1, 1)));
        let numbers: Vec<usize> = matched.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![5]);
    }

    #[test]
    fn test_no_substring_matching() {
        let data = dataset();
        assert!(RowFilter::new()
            .filter(&data, "Mes", "40s", Some(date(2024, 1, 1)))
            .is_empty());
        assert!(RowFilter::new()
            .filter(&data, "Mesa", "4", Some(date(2024, 1, 1)))
            .is_empty());
    }

    #[test]
    fn test_without_date_matches_every_date() {
        let mut rows = dataset().rows().to_vec();
        rows[1].scar_date = None;
        let data = Dataset::new(rows);

        let matched = RowFilter::new().filter(&data, "Mesa", "40s", None);
        let numbers: Vec<usize> = matched.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![1, 2, 5]);
    }

    #[test]
    fn test_filter_by_criteria() {
        let data = dataset();
        let criteria = SelectionCriteria {
            community: "Mesa".to_string(),
            series: "40s".to_string(),
            scar_date: date(2024, 2, 1),
        };
        let rows = RowFilter::new().filter_by(&data, &criteria);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 2);
    }
}
