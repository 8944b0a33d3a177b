// ==========================================
// 合同汇总报表 - 数据集加载器
// ==========================================
// 流程: 拉取 → 解析 → 列规范化 → 写入会话缓存
// 缓存: 会话级显式对象（加载时间 + load_id），显式失效
// 策略: reuse_within_session 决定是否复用已加载数据
// ==========================================

use crate::config::ReportConfig;
use crate::domain::{ColumnMapping, Dataset};
use crate::importer::column_normalizer::ColumnNormalizer;
use crate::importer::data_source;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::DataSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// DatasetCache - 会话级缓存
// ==========================================
#[derive(Debug, Clone)]
pub struct CachedDataset {
    pub dataset: Arc<Dataset>,
    pub loaded_at: DateTime<Utc>,
    pub load_id: String,
    pub origin: String,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetCache {
    entry: Option<CachedDataset>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&CachedDataset> {
        self.entry.as_ref()
    }

    pub fn is_warm(&self) -> bool {
        self.entry.is_some()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.loaded_at)
    }

    pub fn store(&mut self, entry: CachedDataset) {
        self.entry = Some(entry);
    }

    /// 显式失效，返回失效前是否有缓存
    pub fn invalidate(&mut self) -> bool {
        let was_warm = self.entry.is_some();
        self.entry = None;
        if was_warm {
            debug!("数据集缓存已失效");
        }
        was_warm
    }
}

// ==========================================
// DatasetLoader
// ==========================================
pub struct DatasetLoader {
    source: Box<dyn DataSource>,
    parser: UniversalFileParser,
    normalizer: ColumnNormalizer,
    reuse_within_session: bool,
}

impl DatasetLoader {
    pub fn new(
        source: Box<dyn DataSource>,
        columns: ColumnMapping,
        reuse_within_session: bool,
    ) -> Self {
        Self {
            source,
            parser: UniversalFileParser,
            normalizer: ColumnNormalizer::new(columns),
            reuse_within_session,
        }
    }

    /// 按配置构建（数据源由 source_url 决定）
    pub fn from_config(config: &ReportConfig) -> ImportResult<Self> {
        let source = data_source::from_location(&config.source_url, config.fetch)?;
        Ok(Self::new(
            source,
            config.columns.clone(),
            config.reuse_within_session,
        ))
    }

    /// 加载数据集
    ///
    /// - reuse_within_session 且缓存有效: 直接返回缓存
    /// - 否则: 重新拉取并覆盖缓存
    pub async fn load(&self, cache: &mut DatasetCache) -> ImportResult<Arc<Dataset>> {
        if self.reuse_within_session {
            if let Some(entry) = cache.get() {
                debug!(load_id = %entry.load_id, loaded_at = %entry.loaded_at, "命中数据集缓存");
                return Ok(Arc::clone(&entry.dataset));
            }
        }
        self.reload(cache).await
    }

    /// 强制重新拉取
    ///
    /// 失败时缓存保持原状
    pub async fn reload(&self, cache: &mut DatasetCache) -> ImportResult<Arc<Dataset>> {
        let load_id = Uuid::new_v4().to_string();
        let dataset = Arc::new(self.fetch_dataset(&load_id).await?);

        cache.store(CachedDataset {
            dataset: Arc::clone(&dataset),
            loaded_at: Utc::now(),
            load_id,
            origin: self.source.describe(),
        });
        Ok(dataset)
    }

    #[instrument(skip(self), fields(source = %self.source.describe()))]
    async fn fetch_dataset(&self, load_id: &str) -> ImportResult<Dataset> {
        let start_time = Instant::now();
        info!(load_id = %load_id, "开始加载合同数据");

        // === 步骤 1: 拉取 ===
        let payload = self.source.fetch().await.map_err(|e| {
            error!(load_id = %load_id, error = %e, "数据拉取失败");
            e
        })?;

        // === 步骤 2: 解析 ===
        let table = self
            .parser
            .parse(&payload.bytes, payload.format)
            .map_err(|e| {
                error!(load_id = %load_id, error = %e, "文件解析失败");
                e
            })?;
        debug!(
            load_id = %load_id,
            columns = table.headers.len(),
            rows = table.rows.len(),
            "文件解析完成"
        );

        // === 步骤 3: 列规范化 ===
        let dataset = self.normalizer.normalize(&table).map_err(|e| {
            error!(load_id = %load_id, error = %e, "列规范化失败");
            e
        })?;

        info!(
            load_id = %load_id,
            rows = dataset.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "合同数据加载完成"
        );
        Ok(dataset)
    }
}
