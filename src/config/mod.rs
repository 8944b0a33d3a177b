// ==========================================
// 合同汇总报表 - 配置层
// ==========================================
// 职责: 系统配置管理,支持多级覆写
// 来源: 默认值 / 环境变量 / 显式覆写
// ==========================================

pub mod config_manager;
pub mod report_config;
pub mod report_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, parse_bool, ConfigManager, ENV_PREFIX};
pub use report_config::{
    FetchPolicy, PriorityOrder, ReportConfig, DEFAULT_PRIORITY_WORK_TYPES, DEFAULT_SOURCE_URL,
};
pub use report_config_trait::ReportConfigReader;
