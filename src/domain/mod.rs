// ==========================================
// 合同汇总报表 - 领域模型层
// ==========================================
// 职责: 定义合同记录、选择状态、透视结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod contract;
pub mod pivot;
pub mod selection;

// 重导出核心类型
pub use contract::{ColumnMapping, ContractRow, Dataset};
pub use pivot::{
    format_amount, round_amount, CellValue, FormattedTable, PivotResult, PivotRow,
    WORK_TYPE_HEADER,
};
pub use selection::{SelectionCriteria, SelectionLevel, SelectionOption, SelectionState};
