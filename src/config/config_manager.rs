// ==========================================
// 合同汇总报表 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 层级: 默认值 < 环境变量 (CONTRACT_REPORT_<KEY>) < 显式覆写
// ==========================================

use crate::config::report_config::{
    FetchPolicy, PriorityOrder, ReportConfig, DEFAULT_PRIORITY_WORK_TYPES, DEFAULT_SOURCE_URL,
};
use crate::config::report_config_trait::ReportConfigReader;
use crate::domain::ColumnMapping;
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::time::Duration;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "CONTRACT_REPORT_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从进程环境变量加载
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// 从 (变量名, 值) 序列加载，仅识别 CONTRACT_REPORT_ 前缀
    ///
    /// 例: CONTRACT_REPORT_SOURCE_URL → source_url
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = vars
            .into_iter()
            .filter_map(|(name, value)| {
                name.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_lowercase(), value.into()))
            })
            .collect();
        Self { values }
    }

    /// 显式覆写单个配置
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// 读取配置值，空白值视为未配置
    fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        self.get_config_value(key).map(str::to_string)
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 数值配置，格式错误时回退默认值并告警
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                default
            }),
        }
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> bool {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = default,
                    "布尔配置格式错误，使用默认值"
                );
                default
            }),
        }
    }

    fn get_list_or_default(&self, key: &str, default: &[&str]) -> Vec<String> {
        let list: Vec<String> = self
            .get_config_value(key)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if list.is_empty() {
            default.iter().map(|s| s.to_string()).collect()
        } else {
            list
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 说明
    /// - access_secret 以掩码输出
    /// - 用于启动日志
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let masked: BTreeMap<&str, &str> = self
            .values
            .iter()
            .map(|(k, v)| {
                if k == config_keys::ACCESS_SECRET {
                    (k.as_str(), "***")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        Ok(serde_json::to_string(&json!(masked))?)
    }
}

/// 布尔值解析（1/0, true/false, yes/no, y/n, on/off）
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// ReportConfigReader Trait 实现
// ==========================================
impl ReportConfigReader for ConfigManager {
    fn get_title(&self) -> String {
        self.get_config_or_default(config_keys::TITLE, "Pulte Contracts")
    }

    fn get_source_url(&self) -> String {
        self.get_config_or_default(config_keys::SOURCE_URL, DEFAULT_SOURCE_URL)
    }

    fn get_fetch_policy(&self) -> FetchPolicy {
        let defaults = FetchPolicy::default();
        FetchPolicy {
            timeout: Duration::from_secs(self.get_parsed_or_default(
                config_keys::FETCH_TIMEOUT_SECS,
                defaults.timeout.as_secs(),
            )),
            max_attempts: self
                .get_parsed_or_default(config_keys::FETCH_MAX_ATTEMPTS, defaults.max_attempts)
                .max(1),
            retry_backoff: Duration::from_millis(self.get_parsed_or_default(
                config_keys::FETCH_RETRY_BACKOFF_MS,
                defaults.retry_backoff.as_millis() as u64,
            )),
            max_body_bytes: self
                .get_parsed_or_default(config_keys::MAX_BODY_BYTES, defaults.max_body_bytes),
        }
    }

    fn get_reuse_within_session(&self) -> bool {
        self.get_bool_or_default(config_keys::REUSE_WITHIN_SESSION, true)
    }

    fn get_column_mapping(&self) -> ColumnMapping {
        let defaults = ColumnMapping::default();
        let default_aliases: Vec<&str> = defaults
            .scar_date_aliases
            .iter()
            .map(String::as_str)
            .collect();

        let column = |key: &str, default: &str| self.get_config_or_default(key, default);

        ColumnMapping {
            community: column(config_keys::COLUMN_COMMUNITY, &defaults.community),
            series: column(config_keys::COLUMN_SERIES, &defaults.series),
            work_type: column(config_keys::COLUMN_WORK_TYPE, &defaults.work_type),
            plan: column(config_keys::COLUMN_PLAN, &defaults.plan),
            amount: column(config_keys::COLUMN_AMOUNT, &defaults.amount),
            scar_date_aliases: self
                .get_list_or_default(config_keys::SCAR_DATE_ALIASES, &default_aliases),
        }
    }

    fn get_priority_work_types(&self) -> Vec<String> {
        self.get_list_or_default(config_keys::PRIORITY_WORK_TYPES, &DEFAULT_PRIORITY_WORK_TYPES)
    }

    fn get_priority_order(&self) -> PriorityOrder {
        match self.get_config_value(config_keys::PRIORITY_ORDER) {
            None => PriorityOrder::default(),
            Some(raw) => PriorityOrder::parse(raw).unwrap_or_else(|| {
                tracing::warn!(
                    config_key = config_keys::PRIORITY_ORDER,
                    raw_value = %raw,
                    "未知的优先工种排序方式，使用 alphabetical"
                );
                PriorityOrder::default()
            }),
        }
    }

    fn get_enable_search(&self) -> bool {
        self.get_bool_or_default(config_keys::ENABLE_SEARCH, false)
    }

    fn get_access_secret(&self) -> Option<String> {
        self.get_global_config_value(config_keys::ACCESS_SECRET)
    }

    fn get_locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, "en")
    }
}

impl From<&ConfigManager> for ReportConfig {
    fn from(manager: &ConfigManager) -> Self {
        manager.report_config()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 展示
    pub const TITLE: &str = "title";
    pub const LOCALE: &str = "locale";

    // 数据源
    pub const SOURCE_URL: &str = "source_url";
    pub const FETCH_TIMEOUT_SECS: &str = "fetch_timeout_secs";
    pub const FETCH_MAX_ATTEMPTS: &str = "fetch_max_attempts";
    pub const FETCH_RETRY_BACKOFF_MS: &str = "fetch_retry_backoff_ms";
    pub const MAX_BODY_BYTES: &str = "max_body_bytes";
    pub const REUSE_WITHIN_SESSION: &str = "reuse_within_session";

    // 列映射
    pub const COLUMN_COMMUNITY: &str = "column_community";
    pub const COLUMN_SERIES: &str = "column_series";
    pub const COLUMN_WORK_TYPE: &str = "column_work_type";
    pub const COLUMN_PLAN: &str = "column_plan";
    pub const COLUMN_AMOUNT: &str = "column_amount";
    pub const SCAR_DATE_ALIASES: &str = "scar_date_aliases"; // 逗号分隔

    // 透视
    pub const PRIORITY_WORK_TYPES: &str = "priority_work_types"; // 逗号分隔
    pub const PRIORITY_ORDER: &str = "priority_order";

    // 交互
    pub const ENABLE_SEARCH: &str = "enable_search";
    pub const ACCESS_SECRET: &str = "access_secret";
}
