// ==========================================
// 合同汇总报表 - 导入层
// ==========================================
// 职责: 外部数据导入,生成只读 Dataset
// 支持: HTTP / 本地文件; Excel, CSV
// ==========================================

// 模块声明
pub mod column_normalizer;
pub mod data_cleaner;
pub mod data_source;
pub mod dataset_loader;
pub mod error;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use column_normalizer::{ColumnNormalizer, ResolvedColumns};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use data_source::{from_location, FileDataSource, HttpDataSource};
pub use dataset_loader::{CachedDataset, DatasetCache, DatasetLoader};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRow, RawTable, SourceFormat, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, DataSource, FileParser, SourcePayload};
