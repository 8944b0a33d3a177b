// ==========================================
// 合同汇总报表 - 报表配置
// ==========================================
// 由 ConfigManager 物化，业务模块只依赖此结构
// ==========================================

use crate::domain::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 源文件默认地址
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/TapatioSpice/PulteContracts/main/PulteContracts1.xlsx";

/// 默认优先工种（排在透视表最前）
pub const DEFAULT_PRIORITY_WORK_TYPES: [&str; 4] = ["RG", "PV", "FG", "LS"];

// ==========================================
// FetchPolicy - 拉取策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// 单次请求超时
    pub timeout: Duration,
    /// 最大尝试次数（1 = 不重试）
    pub max_attempts: u32,
    /// 线性退避步长（第 n 次失败后等待 n * retry_backoff）
    pub retry_backoff: Duration,
    /// 响应体上限
    pub max_body_bytes: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(500),
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}

// ==========================================
// PriorityOrder - 优先工种组内排序
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityOrder {
    /// 优先组内按字母序（FG, LS, PV, RG）
    #[default]
    Alphabetical,
    /// 优先组内按配置列出的顺序（RG, PV, FG, LS）
    Listed,
}

impl PriorityOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "alphabetical" => Some(PriorityOrder::Alphabetical),
            "listed" => Some(PriorityOrder::Listed),
            _ => None,
        }
    }
}

impl fmt::Display for PriorityOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityOrder::Alphabetical => write!(f, "alphabetical"),
            PriorityOrder::Listed => write!(f, "listed"),
        }
    }
}

// ==========================================
// ReportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub title: String,
    pub source_url: String,
    pub fetch: FetchPolicy,
    /// true: 会话内复用已加载数据；false: 每次生成报表前重新拉取
    pub reuse_within_session: bool,
    pub columns: ColumnMapping,
    pub priority_work_types: Vec<String>,
    pub priority_order: PriorityOrder,
    /// 选择器前是否提供文本过滤
    pub enable_search: bool,
    /// 访问口令（None = 不启用）
    pub access_secret: Option<String>,
    pub locale: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Pulte Contracts".to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch: FetchPolicy::default(),
            reuse_within_session: true,
            columns: ColumnMapping::default(),
            priority_work_types: DEFAULT_PRIORITY_WORK_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            priority_order: PriorityOrder::default(),
            enable_search: false,
            access_secret: None,
            locale: "en".to_string(),
        }
    }
}
