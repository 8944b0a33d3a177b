// ==========================================
// 合同汇总报表 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 输入: 文件字节（来自远程或本地）
// 输出: RawTable（首行为表头，完全空白的行跳过）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

// ==========================================
// SourceFormat - 源文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Xlsx,
    Xlsm,
    Xls,
    Ods,
    Csv,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_lowercase().as_str() {
            "xlsx" => Some(SourceFormat::Xlsx),
            "xlsm" => Some(SourceFormat::Xlsm),
            "xls" => Some(SourceFormat::Xls),
            "ods" => Some(SourceFormat::Ods),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    /// 从 URL / 路径推断格式（忽略 query 与 fragment）
    pub fn from_location(location: &str) -> Option<Self> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// 从 HTTP Content-Type 推断格式
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match mime.as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(SourceFormat::Xlsx)
            }
            "application/vnd.ms-excel.sheet.macroenabled.12" => Some(SourceFormat::Xlsm),
            "application/vnd.ms-excel" => Some(SourceFormat::Xls),
            "application/vnd.oasis.opendocument.spreadsheet" => Some(SourceFormat::Ods),
            "text/csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        !matches!(self, SourceFormat::Csv)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Xlsx => write!(f, "xlsx"),
            SourceFormat::Xlsm => write!(f, "xlsm"),
            SourceFormat::Xls => write!(f, "xls"),
            SourceFormat::Ods => write!(f, "ods"),
            SourceFormat::Csv => write!(f, "csv"),
        }
    }
}

// ==========================================
// RawTable - 原始表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 数据行号（1 起，不含表头）
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl RawTable {
    /// 列名精确匹配（表头已 TRIM）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }
}

impl RawRow {
    /// 越界列视为空单元格（CSV 允许行长度不一致）
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

fn push_row(rows: &mut Vec<RawRow>, row_number: usize, cells: Vec<String>) {
    // 跳过完全空白的行
    if cells.iter().all(|v| v.is_empty()) {
        return;
    }
    rows.push(RawRow { row_number, cells });
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyWorkbook);
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record.iter().map(|v| v.trim().to_string()).collect();
            push_row(&mut rows, row_idx + 1, cells);
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格 → 字符串
    ///
    /// 日期单元格统一输出 `%Y-%m-%d %H:%M:%S`，错误单元格视为空
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::Empty | Data::Error(_) => String::new(),
            Data::String(s) => s.trim().to_string(),
            Data::DateTime(_) | Data::DateTimeIso(_) => cell
                .as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| cell.to_string().trim().to_string()),
            other => other.to_string().trim().to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ImportError::EmptyWorkbook)??;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or(ImportError::EmptyWorkbook)?;
        let headers: Vec<String> = header_row.iter().map(Self::cell_to_string).collect();

        let mut rows = Vec::new();
        for (row_idx, data_row) in sheet_rows.enumerate() {
            let cells = data_row.iter().map(Self::cell_to_string).collect();
            push_row(&mut rows, row_idx + 1, cells);
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据格式自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, bytes: &[u8], format: SourceFormat) -> ImportResult<RawTable> {
        if format.is_spreadsheet() {
            ExcelParser.parse_bytes(bytes)
        } else {
            CsvParser.parse_bytes(bytes)
        }
    }
}
