// ==========================================
// 合同汇总报表 - 级联选项引擎
// ==========================================
// 职责: 根据已选条件计算下一级可选值
// Community: 全量去重，升序
// Series: 限定 Community，升序；Community 未选 → 空
// Scar Date: 限定 Community + Series，降序（默认选中最新日期）
// ==========================================

use crate::domain::{Dataset, SelectionLevel, SelectionOption, SelectionState};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

// ==========================================
// NarrowedOptions - 文本过滤结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NarrowedOptions {
    pub matches: Vec<SelectionOption>,
    /// 恰好剩余一个匹配项时自动选中
    pub auto_selected: Option<SelectionOption>,
}

// ==========================================
// CascadingSelector - 级联选项引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CascadingSelector {
    // 无状态引擎,不需要注入依赖
}

impl CascadingSelector {
    pub fn new() -> Self {
        Self {}
    }

    /// 社区选项（全量去重，升序）
    pub fn community_options(&self, dataset: &Dataset) -> Vec<String> {
        dataset
            .iter()
            .filter_map(|row| row.community.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 系列选项（限定社区，升序）
    pub fn series_options(&self, dataset: &Dataset, community: Option<&str>) -> Vec<String> {
        let Some(community) = community else {
            return Vec::new();
        };
        dataset
            .iter()
            .filter(|row| row.community.as_deref() == Some(community))
            .filter_map(|row| row.series.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Scar 日期选项（限定社区 + 系列，降序）
    pub fn scar_date_options(
        &self,
        dataset: &Dataset,
        community: Option<&str>,
        series: Option<&str>,
    ) -> Vec<NaiveDate> {
        let (Some(community), Some(series)) = (community, series) else {
            return Vec::new();
        };
        dataset
            .iter()
            .filter(|row| {
                row.community.as_deref() == Some(community) && row.series.as_deref() == Some(series)
            })
            .filter_map(|row| row.scar_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    /// 按层级计算选项
    pub fn options_for(
        &self,
        level: SelectionLevel,
        dataset: &Dataset,
        selection: &SelectionState,
    ) -> Vec<SelectionOption> {
        let options: Vec<SelectionOption> = match level {
            SelectionLevel::Community => self
                .community_options(dataset)
                .into_iter()
                .map(SelectionOption::Text)
                .collect(),
            SelectionLevel::Series => self
                .series_options(dataset, selection.community())
                .into_iter()
                .map(SelectionOption::Text)
                .collect(),
            SelectionLevel::ScarDate => self
                .scar_date_options(dataset, selection.community(), selection.series())
                .into_iter()
                .map(SelectionOption::Date)
                .collect(),
        };
        debug!(level = %level, count = options.len(), "选项计算完成");
        options
    }

    /// 文本过滤（大小写不敏感的子串匹配）
    ///
    /// 查询按原样匹配（空白也参与匹配），TRIM 由展示层负责；
    /// 空查询保留全部选项
    pub fn narrow(&self, query: &str, options: &[SelectionOption]) -> NarrowedOptions {
        let needle = query.to_lowercase();
        let matches: Vec<SelectionOption> = options
            .iter()
            .filter(|option| option.label().to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let auto_selected = match matches.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };

        NarrowedOptions {
            matches,
            auto_selected,
        }
    }
}
