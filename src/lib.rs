// ==========================================
// 合同汇总报表 - 核心库
// ==========================================
// 流程: 远程表格 → 列规范化 → 级联选择 → 行筛选 → 透视汇总
// 展示层为外部协作者，核心不含渲染逻辑
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 选项/筛选/透视
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 会话接口
pub mod api;

// 应用层 - 展示层接口
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    CellValue, ColumnMapping, ContractRow, Dataset, FormattedTable, PivotResult, PivotRow,
    SelectionCriteria, SelectionLevel, SelectionOption, SelectionState,
};

// 引擎
pub use engine::{CascadingSelector, NarrowedOptions, PivotAggregator, RowFilter};

// 导入
pub use importer::{DatasetCache, DatasetLoader, ImportError, ImportResult};

// 配置
pub use config::{ConfigManager, ReportConfig, ReportConfigReader};

// API
pub use api::{ApiError, ApiResult, ReportSession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "contract-report";
