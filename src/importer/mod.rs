// ==========================================
// Merchify 降价建议 - 导入层
// ==========================================
// 职责: 外部文件导入，生成 IST 记录与计划目标
// 支持: CSV, Excel/ODS（首个工作表）
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod data_importer_impl;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use data_importer_impl::DataImporterImpl;
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, RawRow, RawTable, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, DataImporter, DqValidator, FieldMapper, FileParser};
