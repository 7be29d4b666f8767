// ==========================================
// Merchify 降价建议 - 导入批次与 DQ 报告
// ==========================================

use crate::domain::types::DqLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ImportKind - 导入表类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportKind {
    Actual, // IST-Daten
    Plan,   // Planwerte
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub kind: ImportKind,                   // 表类型
    pub file_name: Option<String>,          // 源文件名
    pub total_rows: usize,                  // 总行数
    pub success_rows: usize,                // 成功导入行数
    pub blocked_rows: usize,                // 阻断行数（DQ ERROR）
    pub warning_rows: usize,                // 警告行数（DQ WARNING）
    pub conflict_rows: usize,               // 冲突行数
    pub imported_at: DateTime<Utc>,         // 导入时间
    pub elapsed_ms: u128,                   // 导入耗时（毫秒）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,   // 源文件行号
    pub key: Option<String>, // 行标识（Artikel 或 Warengruppe/Monat）
    pub level: DqLevel,      // 违规级别
    pub field: String,       // 违规字段
    pub message: String,     // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize,
    pub success: usize,
    pub blocked: usize,
    pub warning: usize,
    pub conflict: usize,
}

impl DqSummary {
    /// 由违规明细统计（按行去重）
    pub fn from_violations(total_rows: usize, success: usize, violations: &[DqViolation]) -> Self {
        use std::collections::HashSet;

        let rows_at = |level: DqLevel| {
            violations
                .iter()
                .filter(|v| v.level == level)
                .map(|v| v.row_number)
                .collect::<HashSet<_>>()
                .len()
        };

        Self {
            total_rows,
            success,
            blocked: rows_at(DqLevel::Error),
            warning: rows_at(DqLevel::Warning),
            conflict: rows_at(DqLevel::Conflict),
        }
    }
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome<T> {
    pub batch: ImportBatch,
    pub records: Vec<T>,
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}
