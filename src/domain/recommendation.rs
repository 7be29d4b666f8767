// ==========================================
// Merchify 降价建议 - 建议结果领域模型
// ==========================================
// 用途: 引擎输出，每条 IST 记录恰好一行
// 红线: 未匹配计划时计划字段为 None，不是 0
// ==========================================

use crate::domain::actual::ActualRecord;
use crate::domain::plan::PlanTarget;
use crate::domain::types::{MarkdownTier, PeriodMonth};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Recommendation - 单品降价建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    // ===== IST 字段 =====
    pub item_id: String,
    pub category: String,
    pub period_date: Option<NaiveDate>,
    pub period_label: Option<PeriodMonth>,
    pub coverage_weeks: Option<f64>,
    pub price: Option<f64>,
    pub sales_qty: Option<f64>,
    pub inventory_qty: Option<f64>,

    // ===== 计划字段（未匹配时为 None）=====
    pub target_coverage_weeks: Option<f64>,
    pub markdown_high_pct: Option<f64>,
    pub markdown_medium_pct: Option<f64>,
    pub markdown_low_pct: Option<f64>,
    pub reduction_runs_per_period: Option<i32>,

    // ===== 规则输出 =====
    pub delta_weeks: Option<f64>,               // coverage - target
    pub markdown_tier: Option<MarkdownTier>,    // None = 无法判定
    pub recommended_markdown_pct: Option<f64>,  // None = 无法给出建议
    pub reason: String,                         // 规则命中说明（可解释性）

    // ===== 元信息 =====
    pub row_number: usize,
}

impl Recommendation {
    /// 以 IST 记录和（可能缺失的）计划行构造，规则输出待填
    pub fn from_parts(actual: &ActualRecord, target: Option<&PlanTarget>) -> Self {
        Self {
            item_id: actual.item_id.clone(),
            category: actual.category.trim().to_string(),
            period_date: actual.period_date,
            period_label: actual.period_label,
            coverage_weeks: actual.coverage_weeks,
            price: actual.price,
            sales_qty: actual.sales_qty,
            inventory_qty: actual.inventory_qty,
            target_coverage_weeks: target.map(|t| t.target_coverage_weeks),
            markdown_high_pct: target.map(|t| t.markdown_high_pct),
            markdown_medium_pct: target.map(|t| t.markdown_medium_pct),
            markdown_low_pct: target.map(|t| t.markdown_low_pct),
            reduction_runs_per_period: target.and_then(|t| t.reduction_runs_per_period),
            delta_weeks: None,
            markdown_tier: None,
            recommended_markdown_pct: None,
            reason: String::new(),
            row_number: actual.row_number,
        }
    }

    /// 是否匹配到计划行
    pub fn is_matched(&self) -> bool {
        self.target_coverage_weeks.is_some()
    }
}
