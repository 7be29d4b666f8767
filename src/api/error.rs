// ==========================================
// Merchify 降价建议 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为用户可读的本地化消息
// 口径: 用户消息统一为 "Empfehlungen konnten nicht berechnet werden: <原因>"
// ==========================================

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("批量导入失败: {0}")]
    BatchImportFailed(String),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 本地化的失败原因（不含前缀）
    pub fn localized_reason(&self) -> String {
        match self {
            ApiError::Import(err) => localize_import_error(err),
            // 带上下文链: "<上下文>: <根因>"
            ApiError::Other(err) => format!("{:#}", err),
            other => other.to_string(),
        }
    }

    /// 面向用户的完整消息
    pub fn user_message(&self) -> String {
        t_with_args(
            "recommendation.failed",
            &[("reason", self.localized_reason().as_str())],
        )
    }
}

fn localize_import_error(err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(path) => {
            t_with_args("import.file_not_found", &[("path", path.as_str())])
        }
        ImportError::UnsupportedFormat(format) => {
            t_with_args("import.unsupported_format", &[("format", format.as_str())])
        }
        ImportError::MissingColumn { table, column } => t_with_args(
            "import.missing_column",
            &[("table", table.as_str()), ("column", column.as_str())],
        ),
        ImportError::MissingInput { row, field } => {
            let row = row.to_string();
            t_with_args(
                "import.missing_input",
                &[("row", row.as_str()), ("field", field.as_str())],
            )
        }
        ImportError::ValueRangeError {
            row, field, value, ..
        } => {
            let row = row.to_string();
            let value = value.to_string();
            t_with_args(
                "import.value_range",
                &[
                    ("row", row.as_str()),
                    ("field", field.as_str()),
                    ("value", value.as_str()),
                ],
            )
        }
        ImportError::JoinAmbiguity {
            category,
            period,
            rows,
        } => {
            let rows = rows
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            t_with_args(
                "import.join_ambiguity",
                &[
                    ("category", category.as_str()),
                    ("period", period.as_str()),
                    ("rows", rows.as_str()),
                ],
            )
        }
        other => format!("{} ({})", t("common.failed"), other),
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::set_locale;
    use crate::i18n::tests::LOCALE_TEST_LOCK;

    #[test]
    fn test_user_message_german() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("de");

        let err = ApiError::from(ImportError::MissingInput {
            row: 4,
            field: "markdown_low_pct".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Empfehlungen konnten nicht berechnet werden: Planwert fehlt (Zeile 4): markdown_low_pct"
        );
    }

    #[test]
    fn test_user_message_english() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");

        let err = ApiError::from(ImportError::JoinAmbiguity {
            category: "Shirts".to_string(),
            period: "März".to_string(),
            rows: vec![2, 5],
        });
        let msg = err.user_message();
        assert!(msg.starts_with("Could not compute recommendations:"));
        assert!(msg.contains("rows 2, 5"));

        set_locale("de");
    }
}
