// ==========================================
// Merchify 降价建议 - 导出层
// ==========================================
// 职责: 将建议结果写为可下载的 CSV
// ==========================================

pub mod csv_exporter;

use thiserror::Error;

pub use csv_exporter::{CsvExporter, EXPORT_HEADERS};

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    CsvWriteError(#[from] csv::Error),

    #[error("文件写入失败: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
