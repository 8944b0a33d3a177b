// ==========================================
// 合同汇总报表 - API层错误类型
// ==========================================
// 职责: 统一会话级错误，区分致命错误与提示类错误
// 致命: 导入失败（拉取/解析/列缺失/值非法）
// 提示: 选择不完整、筛选无结果、选项无效、口令错误
// ==========================================

use crate::domain::SelectionLevel;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 致命错误
    // ==========================================
    #[error(transparent)]
    Import(#[from] ImportError),

    // ==========================================
    // 提示类错误（不中断会话）
    // ==========================================
    #[error("selection incomplete: community, series and scar date are all required")]
    EmptySelection,

    #[error("no data found for the selection")]
    EmptyResult,

    #[error("'{value}' is not a valid {level} option")]
    InvalidSelection { level: SelectionLevel, value: String },

    #[error("dataset not loaded")]
    NotLoaded,

    #[error("access denied")]
    AccessDenied,
}

impl ApiError {
    /// 是否中断会话
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Import(_))
    }

    /// 是否应以警告形式展示
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ApiError::EmptySelection
                | ApiError::EmptyResult
                | ApiError::InvalidSelection { .. }
                | ApiError::NotLoaded
        )
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let fatal = ApiError::from(ImportError::EmptyWorkbook);
        assert!(fatal.is_fatal());
        assert!(!fatal.is_warning());

        assert!(ApiError::EmptySelection.is_warning());
        assert!(ApiError::EmptyResult.is_warning());
        assert!(!ApiError::AccessDenied.is_fatal());
        assert!(!ApiError::AccessDenied.is_warning());
    }

    #[test]
    fn test_invalid_selection_message() {
        let err = ApiError::InvalidSelection {
            level: SelectionLevel::Series,
            value: "90s".to_string(),
        };
        assert_eq!(err.to_string(), "'90s' is not a valid series option");
    }
}
