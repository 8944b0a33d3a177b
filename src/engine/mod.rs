// ==========================================
// 合同汇总报表 - 引擎层
// ==========================================
// 职责: 级联选项 / 行筛选 / 透视汇总
// 红线: 只读 Dataset，无 I/O，无状态
// ==========================================

pub mod pivot;
pub mod row_filter;
pub mod selector;

// 重导出核心引擎
pub use pivot::PivotAggregator;
pub use row_filter::RowFilter;
pub use selector::{CascadingSelector, NarrowedOptions};
