// ==========================================
// 合同汇总报表 - 列规范化
// ==========================================
// 职责: 必需列存在性校验（日期列支持别名）+ 类型转换
// 输入: RawTable
// 输出: Dataset（固定 schema）
// 红线: 日期/金额无法解析时整批失败，不静默丢行
// ==========================================

use crate::domain::{ColumnMapping, ContractRow, Dataset};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawTable};
use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;
use tracing::{debug, info, instrument};

// ==========================================
// ResolvedColumns - 列索引（每次加载解析一次）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub community: usize,
    pub series: usize,
    pub work_type: usize,
    pub plan: usize,
    pub amount: usize,
    pub scar_date: usize,

    /// 实际命中的日期列名
    pub scar_date_name: String,
}

// ==========================================
// ColumnNormalizer
// ==========================================
pub struct ColumnNormalizer {
    mapping: ColumnMapping,
    cleaner: Box<dyn DataCleanerTrait>,
}

impl ColumnNormalizer {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self::with_cleaner(mapping, Box::new(DataCleaner))
    }

    pub fn with_cleaner(mapping: ColumnMapping, cleaner: Box<dyn DataCleanerTrait>) -> Self {
        Self { mapping, cleaner }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// 解析必需列索引
    ///
    /// 校验顺序: 日期列（按别名顺序）→ Community → Series → Work Type → Plan → Amount
    /// 返回首个缺失列的 MissingColumn 错误
    pub fn resolve(&self, table: &RawTable) -> ImportResult<ResolvedColumns> {
        let (scar_date, scar_date_name) = self
            .mapping
            .scar_date_aliases
            .iter()
            .find_map(|alias| table.column_index(alias).map(|idx| (idx, alias.clone())))
            .ok_or_else(|| ImportError::MissingColumn {
                column: self.mapping.scar_date_label().to_string(),
                aliases: self.mapping.scar_date_aliases.clone(),
            })?;

        let require = |name: &str| {
            table.column_index(name).ok_or_else(|| ImportError::MissingColumn {
                column: name.to_string(),
                aliases: vec![name.to_string()],
            })
        };

        Ok(ResolvedColumns {
            community: require(&self.mapping.community)?,
            series: require(&self.mapping.series)?,
            work_type: require(&self.mapping.work_type)?,
            plan: require(&self.mapping.plan)?,
            amount: require(&self.mapping.amount)?,
            scar_date,
            scar_date_name,
        })
    }

    /// 原始表格 → Dataset
    #[instrument(skip(self, table), fields(rows = table.rows.len()))]
    pub fn normalize(&self, table: &RawTable) -> ImportResult<Dataset> {
        let columns = self.resolve(table)?;
        debug!(scar_date_column = %columns.scar_date_name, "必需列校验通过");

        let rows = table
            .rows
            .iter()
            .map(|row| self.convert_row(row, &columns))
            .collect::<ImportResult<Vec<_>>>()?;

        let missing_dates = rows.iter().filter(|r| r.scar_date.is_none()).count();
        info!(
            rows = rows.len(),
            missing_dates = missing_dates,
            "列规范化完成"
        );

        Ok(Dataset::new(rows))
    }

    fn text(&self, row: &RawRow, idx: usize) -> Option<String> {
        self.cleaner.normalize_null(Some(row.cell(idx).to_string()))
    }

    fn convert_row(&self, row: &RawRow, columns: &ResolvedColumns) -> ImportResult<ContractRow> {
        let scar_date = match self.text(row, columns.scar_date) {
            None => None,
            Some(value) => Some(self.cleaner.parse_date(&value).ok_or_else(|| {
                ImportError::InvalidDate {
                    row: row.row_number,
                    column: columns.scar_date_name.clone(),
                    value,
                }
            })?),
        };

        let amount = match self.text(row, columns.amount) {
            None => None,
            Some(value) => Some(self.cleaner.parse_amount(&value).ok_or_else(|| {
                ImportError::InvalidAmount {
                    row: row.row_number,
                    column: self.mapping.amount.clone(),
                    value,
                }
            })?),
        };

        Ok(ContractRow {
            community: self.text(row, columns.community),
            series: self.text(row, columns.series),
            work_type: self.text(row, columns.work_type),
            plan: self.text(row, columns.plan),
            amount,
            scar_date,
            row_number: row.row_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::CsvParser;
    use crate::importer::importer_trait::FileParser;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn table(csv: &str) -> RawTable {
        CsvParser.parse_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_normalize_with_primary_date_alias() {
        let raw = table(
            "Community,Series,Work Type,Plan,Amount,Scar.Date\n\
             Mesa, 40s ,RG,P1,100.004,2024-01-01\n",
        );
        let dataset = ColumnNormalizer::new(ColumnMapping::default())
            .normalize(&raw)
            .unwrap();

        let row = &dataset.rows()[0];
        assert_eq!(row.community.as_deref(), Some("Mesa"));
        assert_eq!(row.series.as_deref(), Some("40s"));
        assert_eq!(row.amount, Some(Decimal::from_str("100.004").unwrap()));
        assert_eq!(row.scar_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_normalize_with_secondary_date_alias() {
        let raw = table(
            "Community,Series,Work Type,Plan,Amount,Scar Start Date\n\
             Mesa,40s,RG,P1,5,01/15/2024\n",
        );
        let normalizer = ColumnNormalizer::new(ColumnMapping::default());
        let columns = normalizer.resolve(&raw).unwrap();
        assert_eq!(columns.scar_date_name, "Scar Start Date");

        let dataset = normalizer.normalize(&raw).unwrap();
        assert_eq!(dataset.rows()[0].scar_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_missing_date_column() {
        let raw = table("Community,Series,Work Type,Plan,Amount\nMesa,40s,RG,P1,5\n");
        let err = ColumnNormalizer::new(ColumnMapping::default())
            .normalize(&raw)
            .unwrap_err();

        match err {
            ImportError::MissingColumn { column, aliases } => {
                assert_eq!(column, "Scar.Date");
                assert_eq!(aliases.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_other_column() {
        let raw = table("Community,Work Type,Plan,Amount,Scar.Date\nMesa,RG,P1,5,2024-01-01\n");
        let err = ColumnNormalizer::new(ColumnMapping::default())
            .normalize(&raw)
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { ref column, .. } if column == "Series"));
    }

    #[test]
    fn test_invalid_date_fails_whole_load() {
        let raw = table(
            "Community,Series,Work Type,Plan,Amount,Scar.Date\n\
             Mesa,40s,RG,P1,5,2024-01-01\n\
             Mesa,40s,RG,P1,5,not a date\n",
        );
        let err = ColumnNormalizer::new(ColumnMapping::default())
            .normalize(&raw)
            .unwrap_err();

        match err {
            ImportError::InvalidDate { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Scar.Date");
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_amount_fails_whole_load() {
        let raw = table(
            "Community,Series,Work Type,Plan,Amount,Scar.Date\n\
             Mesa,40s,RG,P1,lots,2024-01-01\n",
        );
        let err = ColumnNormalizer::new(ColumnMapping::default())
            .normalize(&raw)
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidAmount { row: 1, .. }));
    }

    #[test]
    fn test_blank_cells_become_absent() {
        let raw = table(
            "Community,Series,Work Type,Plan,Amount,Scar.Date\n\
             Mesa,,RG,P1,,\n",
        );
        let dataset = ColumnNormalizer::new(ColumnMapping::default())
            .normalize(&raw)
            .unwrap();

        let row = &dataset.rows()[0];
        assert_eq!(row.series, None);
        assert_eq!(row.amount, None);
        assert_eq!(row.scar_date, None);
    }

    #[test]
    fn test_custom_column_mapping() {
        let mapping = ColumnMapping {
            community: "Subdivision".to_string(),
            ..ColumnMapping::default()
        };
        let raw = table(
            "Subdivision,Series,Work Type,Plan,Amount,Scar.Date\n\
             Mesa,40s,RG,P1,1,2024-01-01\n",
        );
        let dataset = ColumnNormalizer::new(mapping).normalize(&raw).unwrap();
        assert_eq!(dataset.rows()[0].community.as_deref(), Some("Mesa"));
    }
}
