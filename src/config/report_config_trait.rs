// ==========================================
// 合同汇总报表 - 配置读取 Trait
// ==========================================
// 职责: 定义报表所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::report_config::{FetchPolicy, PriorityOrder, ReportConfig};
use crate::domain::ColumnMapping;

// ==========================================
// ReportConfigReader Trait
// ==========================================
// 实现者: ConfigManager
pub trait ReportConfigReader: Send + Sync {
    /// 报表标题
    ///
    /// # 默认值
    /// - "Pulte Contracts"
    fn get_title(&self) -> String;

    /// 源文件地址（http(s) URL、file:// 或本地路径）
    fn get_source_url(&self) -> String;

    /// 拉取策略（超时 / 重试 / 响应体上限）
    fn get_fetch_policy(&self) -> FetchPolicy;

    /// 会话内是否复用已加载数据
    ///
    /// # 默认值
    /// - true
    fn get_reuse_within_session(&self) -> bool;

    /// 源列名映射
    fn get_column_mapping(&self) -> ColumnMapping;

    /// 优先工种列表
    ///
    /// # 默认值
    /// - ["RG", "PV", "FG", "LS"]
    fn get_priority_work_types(&self) -> Vec<String>;

    /// 优先工种组内排序方式
    ///
    /// # 默认值
    /// - Alphabetical
    fn get_priority_order(&self) -> PriorityOrder;

    /// 是否启用选项文本过滤
    fn get_enable_search(&self) -> bool;

    /// 访问口令（未配置 = 不启用口令）
    fn get_access_secret(&self) -> Option<String>;

    /// 界面语言
    fn get_locale(&self) -> String;

    /// 物化完整配置
    fn report_config(&self) -> ReportConfig {
        ReportConfig {
            title: self.get_title(),
            source_url: self.get_source_url(),
            fetch: self.get_fetch_policy(),
            reuse_within_session: self.get_reuse_within_session(),
            columns: self.get_column_mapping(),
            priority_work_types: self.get_priority_work_types(),
            priority_order: self.get_priority_order(),
            enable_search: self.get_enable_search(),
            access_secret: self.get_access_secret(),
            locale: self.get_locale(),
        }
    }
}
