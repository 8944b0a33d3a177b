// ==========================================
// 合同汇总报表 - 透视结果
// ==========================================
// 行: Work Type，列: Plan，值: Amount 合计
// 展示层只接收 FormattedTable，单元格为带标签的 CellValue
// ==========================================

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 金额保留位数
pub const AMOUNT_SCALE: u32 = 2;

/// 金额舍入策略：银行家舍入（与源数据工具的数值库默认行为一致）
pub const AMOUNT_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// 透视表首列表头
pub const WORK_TYPE_HEADER: &str = "Work Type";

/// 金额舍入到 2 位小数
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, AMOUNT_ROUNDING)
}

/// 千分位 + 2 位小数格式化
///
/// # 示例
/// - 1234567.891 → "1,234,567.89"
/// - -1234.5 → "-1,234.50"
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_amount(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let raw = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

// ==========================================
// PivotRow / PivotResult
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub work_type: String,
    /// 与 PivotResult::plans 一一对应，缺失组合为 0
    pub amounts: Vec<Decimal>,
}

impl PivotRow {
    pub fn total(&self) -> Decimal {
        self.amounts.iter().copied().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    /// 列（Plan），升序
    pub plans: Vec<String>,
    /// 行，已按优先级 + 字母序排列
    pub rows: Vec<PivotRow>,
}

impl PivotResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 查询单元格（work_type, plan）
    pub fn amount(&self, work_type: &str, plan: &str) -> Option<Decimal> {
        let col = self.plans.iter().position(|p| p == plan)?;
        self.rows
            .iter()
            .find(|row| row.work_type == work_type)
            .and_then(|row| row.amounts.get(col).copied())
    }

    pub fn work_types(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.work_type.as_str()).collect()
    }

    pub fn grand_total(&self) -> Decimal {
        self.rows.iter().map(PivotRow::total).sum()
    }

    /// 转换为展示表格
    pub fn to_table(&self) -> FormattedTable {
        let mut header = Vec::with_capacity(self.plans.len() + 1);
        header.push(WORK_TYPE_HEADER.to_string());
        header.extend(self.plans.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(row.amounts.len() + 1);
                cells.push(CellValue::Label(row.work_type.clone()));
                cells.extend(row.amounts.iter().copied().map(CellValue::Amount));
                cells
            })
            .collect();

        FormattedTable { header, rows }
    }
}

// ==========================================
// CellValue - 带标签的单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Label(String),
    Amount(Decimal),
}

impl CellValue {
    pub fn render(&self) -> String {
        match self {
            CellValue::Label(label) => label.clone(),
            CellValue::Amount(amount) => format_amount(*amount),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Amount(_))
    }
}

// ==========================================
// FormattedTable - 交给展示层的表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl FormattedTable {
    /// 所有单元格渲染为字符串
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(CellValue::render).collect())
            .collect()
    }
}
