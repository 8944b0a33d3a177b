// ==========================================
// 合同汇总报表 - 报表会话 API
// ==========================================
// 职责: 串联 数据加载 → 级联选择 → 行筛选 → 透视汇总
// 会话: 持有数据集缓存与当前选择，单线程逐次交互处理
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ReportConfig;
use crate::domain::{Dataset, PivotResult, SelectionLevel, SelectionOption, SelectionState};
use crate::engine::{CascadingSelector, NarrowedOptions, PivotAggregator, RowFilter};
use crate::importer::{DatasetCache, DatasetLoader};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// ReportSession
// ==========================================
pub struct ReportSession {
    config: ReportConfig,
    loader: DatasetLoader,
    cache: DatasetCache,
    selection: SelectionState,

    // 引擎
    selector: CascadingSelector,
    row_filter: RowFilter,
    aggregator: PivotAggregator,
}

impl ReportSession {
    pub fn new(config: ReportConfig, loader: DatasetLoader) -> Self {
        let aggregator = PivotAggregator::from_config(&config);
        Self {
            config,
            loader,
            cache: DatasetCache::new(),
            selection: SelectionState::new(),
            selector: CascadingSelector::new(),
            row_filter: RowFilter::new(),
            aggregator,
        }
    }

    /// 按配置构建（数据源由 source_url 决定）
    pub fn from_config(config: ReportConfig) -> ApiResult<Self> {
        let loader = DatasetLoader::from_config(&config)?;
        Ok(Self::new(config, loader))
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    // ==========================================
    // 数据集
    // ==========================================

    /// 加载数据集（按 reuse_within_session 策略复用缓存）
    pub async fn load(&mut self) -> ApiResult<Arc<Dataset>> {
        Ok(self.loader.load(&mut self.cache).await?)
    }

    /// 强制重新拉取
    pub async fn reload(&mut self) -> ApiResult<Arc<Dataset>> {
        Ok(self.loader.reload(&mut self.cache).await?)
    }

    /// 显式失效缓存，下一次 load 重新拉取
    pub fn invalidate(&mut self) -> bool {
        self.cache.invalidate()
    }

    /// 当前已加载的数据集
    pub fn dataset(&self) -> ApiResult<Arc<Dataset>> {
        self.cache
            .get()
            .map(|entry| Arc::clone(&entry.dataset))
            .ok_or(ApiError::NotLoaded)
    }

    // ==========================================
    // 级联选择
    // ==========================================

    pub fn options(&self, level: SelectionLevel) -> ApiResult<Vec<SelectionOption>> {
        let dataset = self.dataset()?;
        Ok(self.selector.options_for(level, &dataset, &self.selection))
    }

    pub fn community_options(&self) -> ApiResult<Vec<String>> {
        Ok(self.selector.community_options(&*self.dataset()?))
    }

    pub fn series_options(&self) -> ApiResult<Vec<String>> {
        Ok(self
            .selector
            .series_options(&*self.dataset()?, self.selection.community()))
    }

    pub fn scar_date_options(&self) -> ApiResult<Vec<NaiveDate>> {
        Ok(self.selector.scar_date_options(
            &*self.dataset()?,
            self.selection.community(),
            self.selection.series(),
        ))
    }

    /// 选择某一层级的值
    ///
    /// 值必须在当前选项中；上游变化时自动清空下游
    pub fn select(&mut self, level: SelectionLevel, option: &SelectionOption) -> ApiResult<()> {
        let valid = self.options(level)?;
        if !valid.contains(option) {
            warn!(level = %level, value = %option, "选项不在当前可选范围内");
            return Err(ApiError::InvalidSelection {
                level,
                value: option.label(),
            });
        }

        let applied = match (level, option) {
            (SelectionLevel::Community, SelectionOption::Text(value)) => {
                self.selection.select_community(value.clone());
                true
            }
            (SelectionLevel::Series, SelectionOption::Text(value)) => {
                self.selection.select_series(value.clone())
            }
            (SelectionLevel::ScarDate, SelectionOption::Date(value)) => {
                self.selection.select_scar_date(*value)
            }
            _ => false,
        };

        if !applied {
            return Err(ApiError::InvalidSelection {
                level,
                value: option.label(),
            });
        }
        Ok(())
    }

    pub fn select_community(&mut self, community: &str) -> ApiResult<()> {
        self.select(
            SelectionLevel::Community,
            &SelectionOption::Text(community.to_string()),
        )
    }

    pub fn select_series(&mut self, series: &str) -> ApiResult<()> {
        self.select(
            SelectionLevel::Series,
            &SelectionOption::Text(series.to_string()),
        )
    }

    pub fn select_scar_date(&mut self, scar_date: NaiveDate) -> ApiResult<()> {
        self.select(SelectionLevel::ScarDate, &SelectionOption::Date(scar_date))
    }

    /// 文本过滤选项，唯一匹配时自动选中
    pub fn narrow(&mut self, level: SelectionLevel, query: &str) -> ApiResult<NarrowedOptions> {
        let options = self.options(level)?;
        let narrowed = self.selector.narrow(query, &options);
        if let Some(option) = &narrowed.auto_selected {
            info!(level = %level, value = %option, "唯一匹配，自动选中");
            self.select(level, option)?;
        }
        Ok(narrowed)
    }

    /// 清空指定层级及其下游
    pub fn clear_from(&mut self, level: SelectionLevel) {
        self.selection.clear_from(level);
    }

    // ==========================================
    // 生成报表
    // ==========================================

    /// 生成透视表
    ///
    /// # 返回
    /// - Err(EmptySelection): 三级选择未完成，不做任何计算
    /// - Err(EmptyResult): 筛选无匹配行，不做透视
    /// - Err(Import): reuse_within_session=false 时重新拉取失败
    #[instrument(skip(self))]
    pub async fn create_table(&mut self) -> ApiResult<PivotResult> {
        let criteria = self.selection.criteria().ok_or_else(|| {
            warn!("选择不完整，跳过报表生成");
            ApiError::EmptySelection
        })?;

        let dataset = self.load().await?;

        let rows = self.row_filter.filter_by(&dataset, &criteria);
        if rows.is_empty() {
            warn!(
                community = %criteria.community,
                series = %criteria.series,
                scar_date = %criteria.scar_date,
                "筛选结果为空"
            );
            return Err(ApiError::EmptyResult);
        }

        let result = self.aggregator.aggregate(rows);
        info!(
            community = %criteria.community,
            series = %criteria.series,
            work_types = result.rows.len(),
            grand_total = %result.grand_total(),
            "报表生成完成"
        );
        Ok(result)
    }
}
