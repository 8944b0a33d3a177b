// ==========================================
// 合同汇总报表 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 拉取失败 / 解析失败 / 列缺失 / 值无法转换
// 所有导入错误对当前会话均为致命错误
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 拉取相关错误 =====
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to fetch {url}: HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("response body too large (limit {limit_bytes} bytes, received {received_bytes} bytes)")]
    BodyTooLarge {
        limit_bytes: usize,
        received_bytes: usize,
    },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    // ===== 解析相关错误 =====
    #[error("unsupported file format: {0} (expected .xlsx/.xls/.xlsm/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("workbook has no worksheet or header row")]
    EmptyWorkbook,

    // ===== 列校验错误 =====
    #[error("Column '{column}' not found in data (accepted names: {})", .aliases.join(", "))]
    MissingColumn { column: String, aliases: Vec<String> },

    #[error("invalid date (row {row}, column {column}): {value}")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid amount (row {row}, column {column}): {value}")]
    InvalidAmount {
        row: usize,
        column: String,
        value: String,
    },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for ImportError {
    fn from(err: reqwest::Error) -> Self {
        ImportError::Fetch {
            url: err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_lists_aliases() {
        let err = ImportError::MissingColumn {
            column: "Scar.Date".to_string(),
            aliases: vec!["Scar.Date".to_string(), "Scar Start Date".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Column 'Scar.Date' not found in data (accepted names: Scar.Date, Scar Start Date)"
        );
    }

    #[test]
    fn test_invalid_amount_message_has_row_and_value() {
        let err = ImportError::InvalidAmount {
            row: 7,
            column: "Amount".to_string(),
            value: "n/a".to_string(),
        };
        assert_eq!(err.to_string(), "invalid amount (row 7, column Amount): n/a");
    }
}
