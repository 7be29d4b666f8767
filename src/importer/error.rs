// ==========================================
// Merchify 降价建议 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 口径: 结构性问题（缺列/计划表缺值/重复键）才报错
//       单行数值问题降级为 None + DQ 记录，不报错
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xls/.ods）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件无数据行: {0}")]
    EmptyTable(String),

    // ===== 结构性错误 =====
    #[error("缺少必需列 ({table}): {column}")]
    MissingColumn { table: String, column: String },

    #[error("计划表必填字段缺失 (行 {row}): {field}")]
    MissingInput { row: usize, field: String },

    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("数值范围错误 (行 {row}, 字段 {field}): 值 {value} 超出范围 [{min}, {max}]")]
    ValueRangeError {
        row: usize,
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("计划表重复键 (Warengruppe={category}, Monat={period}): 行 {rows:?}")]
    JoinAmbiguity {
        category: String,
        period: String,
        rows: Vec<usize>,
    },

    // ===== 配置错误 =====
    #[error("配置读取失败: {0}")]
    ConfigReadError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 是否为计划表/表头等结构性问题（整批无效）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ImportError::MissingColumn { .. }
                | ImportError::MissingInput { .. }
                | ImportError::TypeConversionError { .. }
                | ImportError::ValueRangeError { .. }
                | ImportError::JoinAmbiguity { .. }
        )
    }
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

// 实现 From<ConfigError>
impl From<crate::config::ConfigError> for ImportError {
    fn from(err: crate::config::ConfigError) -> Self {
        ImportError::ConfigReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
