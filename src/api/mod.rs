// ==========================================
// 合同汇总报表 - API 层
// ==========================================
// 职责: 会话级业务接口，供展示层调用
// 红线: 不含渲染逻辑
// ==========================================

pub mod error;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use report_api::ReportSession;
