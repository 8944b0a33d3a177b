// ==========================================
// 合同汇总报表 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 拉取 → 解析 → 清洗/列规范化 → Dataset
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::file_parser::{RawTable, SourceFormat};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

// ==========================================
// SourcePayload - 拉取结果
// ==========================================
#[derive(Debug, Clone)]
pub struct SourcePayload {
    /// 来源描述（URL 或本地路径），仅用于日志与错误信息
    pub origin: String,
    pub format: SourceFormat,
    pub bytes: Vec<u8>,
}

// ==========================================
// DataSource Trait
// ==========================================
// 用途: 远程/本地表格文件的拉取接口
// 实现者: HttpDataSource, FileDataSource
#[async_trait]
pub trait DataSource: Send + Sync {
    /// 拉取完整文件
    ///
    /// # 返回
    /// - Ok(SourcePayload): 文件字节 + 格式
    /// - Err: 网络错误、状态码错误、文件不存在等（对会话致命）
    async fn fetch(&self) -> ImportResult<SourcePayload>;

    /// 来源描述
    fn describe(&self) -> String;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件字节 → 原始表格（首行为表头）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格级清洗与类型转换
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// TRIM；空白字符串 → None
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 解析日期（多种常见格式，时间部分截断）
    fn parse_date(&self, value: &str) -> Option<NaiveDate>;

    /// 解析金额（允许千分位、货币符号、科学计数法）
    fn parse_amount(&self, value: &str) -> Option<Decimal>;
}
