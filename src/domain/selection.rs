// ==========================================
// 合同汇总报表 - 级联选择状态
// ==========================================
// 级联顺序: Community → Series → Scar Date
// 红线: 上游变更必须清空下游选择（禁止陈旧的交叉选择）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SelectionLevel - 选择层级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionLevel {
    Community,
    Series,
    ScarDate,
}

impl fmt::Display for SelectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionLevel::Community => write!(f, "community"),
            SelectionLevel::Series => write!(f, "series"),
            SelectionLevel::ScarDate => write!(f, "scar_date"),
        }
    }
}

// ==========================================
// SelectionOption - 选项值
// ==========================================
// 文本层级（Community / Series）与日期层级共用一个选项类型
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SelectionOption {
    Text(String),
    Date(NaiveDate),
}

impl SelectionOption {
    /// 展示文本（日期为 %Y-%m-%d）
    pub fn label(&self) -> String {
        match self {
            SelectionOption::Text(text) => text.clone(),
            SelectionOption::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SelectionOption::Text(text) => Some(text),
            SelectionOption::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SelectionOption::Text(_) => None,
            SelectionOption::Date(date) => Some(*date),
        }
    }
}

impl fmt::Display for SelectionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// SelectionCriteria - 完整筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub community: String,
    pub series: String,
    pub scar_date: NaiveDate,
}

// ==========================================
// SelectionState - 当前选择
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    community: Option<String>,
    series: Option<String>,
    scar_date: Option<NaiveDate>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn community(&self) -> Option<&str> {
        self.community.as_deref()
    }

    pub fn series(&self) -> Option<&str> {
        self.series.as_deref()
    }

    pub fn scar_date(&self) -> Option<NaiveDate> {
        self.scar_date
    }

    /// 选择社区
    ///
    /// 社区变化时清空 series / scar_date；重复选择同一社区保持下游不变
    pub fn select_community(&mut self, community: impl Into<String>) {
        let community = community.into();
        if self.community.as_deref() != Some(community.as_str()) {
            self.series = None;
            self.scar_date = None;
        }
        self.community = Some(community);
    }

    /// 选择系列
    ///
    /// # 返回
    /// - false: 尚未选择社区，选择被忽略
    pub fn select_series(&mut self, series: impl Into<String>) -> bool {
        if self.community.is_none() {
            return false;
        }
        let series = series.into();
        if self.series.as_deref() != Some(series.as_str()) {
            self.scar_date = None;
        }
        self.series = Some(series);
        true
    }

    /// 选择 Scar 日期
    ///
    /// # 返回
    /// - false: 社区或系列未选择，选择被忽略
    pub fn select_scar_date(&mut self, scar_date: NaiveDate) -> bool {
        if self.community.is_none() || self.series.is_none() {
            return false;
        }
        self.scar_date = Some(scar_date);
        true
    }

    /// 清空指定层级及其所有下游
    pub fn clear_from(&mut self, level: SelectionLevel) {
        match level {
            SelectionLevel::Community => {
                self.community = None;
                self.series = None;
                self.scar_date = None;
            }
            SelectionLevel::Series => {
                self.series = None;
                self.scar_date = None;
            }
            SelectionLevel::ScarDate => {
                self.scar_date = None;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.community.is_some() && self.series.is_some() && self.scar_date.is_some()
    }

    /// 三级全部选定时返回筛选条件
    pub fn criteria(&self) -> Option<SelectionCriteria> {
        match (&self.community, &self.series, self.scar_date) {
            (Some(community), Some(series), Some(scar_date)) => Some(SelectionCriteria {
                community: community.clone(),
                series: series.clone(),
                scar_date,
            }),
            _ => None,
        }
    }
}
