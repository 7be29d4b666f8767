// ==========================================
// Merchify 降价建议 - 计划目标领域模型
// ==========================================
// 用途: 每个商品组每月一行的 Planwerte
// 红线: 关键字段缺失时整表拒绝，不做默认补零
// ==========================================

use crate::domain::types::PeriodMonth;
use serde::{Deserialize, Serialize};

// ==========================================
// PlanTarget - 计划目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTarget {
    // ===== 连接键 =====
    pub category: String,          // 商品组（Warengruppe），已 TRIM
    pub period_label: PeriodMonth, // 月份（Monat）

    // ===== 目标与降价档位 =====
    pub target_coverage_weeks: f64, // 目标 Reichweite（周）
    pub markdown_high_pct: f64,     // 高档降价百分比
    pub markdown_medium_pct: f64,   // 中档降价百分比
    pub markdown_low_pct: f64,      // 低档降价百分比

    // ===== 信息字段 =====
    pub reduction_runs_per_period: Option<i32>, // 每期降价轮次（不参与规则）

    // ===== 元信息 =====
    pub row_number: usize,
}

impl PlanTarget {
    pub fn new(
        category: impl Into<String>,
        period_label: PeriodMonth,
        target_coverage_weeks: f64,
        markdown_high_pct: f64,
        markdown_medium_pct: f64,
        markdown_low_pct: f64,
    ) -> Self {
        Self {
            category: category.into(),
            period_label,
            target_coverage_weeks,
            markdown_high_pct,
            markdown_medium_pct,
            markdown_low_pct,
            reduction_runs_per_period: None,
            row_number: 0,
        }
    }
}

// ==========================================
// RawPlanRecord - 导入中间结构体
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlanRecord {
    pub category: Option<String>,
    pub period_label: Option<PeriodMonth>,
    pub target_coverage_weeks: Option<f64>,
    pub markdown_high_pct: Option<f64>,
    pub markdown_medium_pct: Option<f64>,
    pub markdown_low_pct: Option<f64>,
    pub reduction_runs_per_period: Option<i32>,

    // 元信息
    pub row_number: usize,
}

impl RawPlanRecord {
    /// 返回第一个缺失的必填字段名（None 表示齐全）
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.category.is_none() {
            return Some("category");
        }
        if self.period_label.is_none() {
            return Some("period_label");
        }
        if self.target_coverage_weeks.is_none() {
            return Some("target_coverage_weeks");
        }
        if self.markdown_high_pct.is_none() {
            return Some("markdown_high_pct");
        }
        if self.markdown_medium_pct.is_none() {
            return Some("markdown_medium_pct");
        }
        if self.markdown_low_pct.is_none() {
            return Some("markdown_low_pct");
        }
        None
    }

    /// 必填字段齐全时转换为 PlanTarget
    pub fn into_target(self) -> Option<PlanTarget> {
        Some(PlanTarget {
            category: self.category?,
            period_label: self.period_label?,
            target_coverage_weeks: self.target_coverage_weeks?,
            markdown_high_pct: self.markdown_high_pct?,
            markdown_medium_pct: self.markdown_medium_pct?,
            markdown_low_pct: self.markdown_low_pct?,
            reduction_runs_per_period: self.reduction_runs_per_period,
            row_number: self.row_number,
        })
    }
}
