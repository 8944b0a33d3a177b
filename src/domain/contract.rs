// ==========================================
// 合同汇总报表 - 合同行与数据集
// ==========================================
// 职责: 固定 schema 的合同记录 + 只读数据集
// 红线: 加载后不可变，不含任何筛选/汇总逻辑
// ==========================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// ContractRow - 单条合同记录
// ==========================================
// 文本字段已 TRIM，空串归一为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRow {
    pub community: Option<String>,
    pub series: Option<String>,
    pub work_type: Option<String>,
    pub plan: Option<String>,
    pub amount: Option<Decimal>,
    pub scar_date: Option<NaiveDate>,

    /// 源文件中的数据行号（1 起，不含表头）
    pub row_number: usize,
}

// ==========================================
// Dataset - 会话级只读数据集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<ContractRow>,
}

impl Dataset {
    pub fn new(rows: Vec<ContractRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ContractRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContractRow> {
        self.rows.iter()
    }
}

impl FromIterator<ContractRow> for Dataset {
    fn from_iter<I: IntoIterator<Item = ContractRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ==========================================
// ColumnMapping - 源列名映射
// ==========================================
// 不同版本的源表使用不同的日期列名（Scar.Date / Scar Start Date），
// 日期列按别名顺序匹配第一个存在的列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub community: String,
    pub series: String,
    pub work_type: String,
    pub plan: String,
    pub amount: String,
    pub scar_date_aliases: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            community: "Community".to_string(),
            series: "Series".to_string(),
            work_type: "Work Type".to_string(),
            plan: "Plan".to_string(),
            amount: "Amount".to_string(),
            scar_date_aliases: vec!["Scar.Date".to_string(), "Scar Start Date".to_string()],
        }
    }
}

impl ColumnMapping {
    /// 日期列的展示名（首个别名），用于错误信息
    pub fn scar_date_label(&self) -> &str {
        self.scar_date_aliases
            .first()
            .map(String::as_str)
            .unwrap_or("Scar.Date")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_accepts_both_date_aliases() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.scar_date_aliases, vec!["Scar.Date", "Scar Start Date"]);
        assert_eq!(mapping.scar_date_label(), "Scar.Date");
    }

    #[test]
    fn test_dataset_from_iter() {
        let dataset: Dataset = (1..=3)
            .map(|n| ContractRow {
                community: Some("A".to_string()),
                series: None,
                work_type: None,
                plan: None,
                amount: None,
                scar_date: None,
                row_number: n,
            })
            .collect();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows()[2].row_number, 3);
    }
}
