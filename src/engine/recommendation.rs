// ==========================================
// Merchify 降价建议 - 降价建议引擎
// ==========================================
// 职责: 左连接 + 逐行降价判定 + 确定性排序
// 输入: IST 记录 + 计划目标
// 输出: Recommendation 列表（每条 IST 记录恰好一行）
// 红线: 逐行独立计算，无跨行状态；单行数据问题不阻断整批
// ==========================================

use crate::domain::actual::ActualRecord;
use crate::domain::plan::PlanTarget;
use crate::domain::recommendation::Recommendation;
use crate::engine::join::{join, JoinedRow};
use crate::engine::markdown::{decide_markdown, TierPercentages, TierThresholds};
use std::cmp::Ordering;
use tracing::{info, instrument};

// ==========================================
// MarkdownEngine - 降价建议引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MarkdownEngine {
    thresholds: TierThresholds,
}

impl MarkdownEngine {
    /// 使用默认阈值（8 / 4 周）
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算全部降价建议
    ///
    /// 1. 左连接 (Warengruppe, Monat)
    /// 2. 逐行判定档位
    /// 3. 按 (Warengruppe, Monat, Artikel) 排序，输入顺序兜底
    #[instrument(skip(self, actuals, targets), fields(actuals = actuals.len(), targets = targets.len()))]
    pub fn evaluate(&self, actuals: &[ActualRecord], targets: &[PlanTarget]) -> Vec<Recommendation> {
        let joined = join(actuals, targets);
        let mut recommendations: Vec<Recommendation> =
            joined.iter().map(|row| self.evaluate_row(row)).collect();

        sort_recommendations(&mut recommendations);

        info!(
            rows = recommendations.len(),
            matched = recommendations.iter().filter(|r| r.is_matched()).count(),
            recommended = recommendations
                .iter()
                .filter(|r| r.recommended_markdown_pct.is_some())
                .count(),
            "降价建议计算完成"
        );

        recommendations
    }

    /// 单行判定
    pub fn evaluate_row(&self, row: &JoinedRow<'_>) -> Recommendation {
        let mut recommendation = Recommendation::from_parts(row.actual, row.target);

        let percentages = row.target.map(|t| {
            TierPercentages::new(t.markdown_high_pct, t.markdown_medium_pct, t.markdown_low_pct)
        });
        let decision = decide_markdown(
            row.actual.coverage_weeks,
            row.target.map(|t| t.target_coverage_weeks),
            percentages,
            &self.thresholds,
        );

        recommendation.delta_weeks = decision.delta_weeks;
        recommendation.markdown_tier = decision.tier;
        recommendation.recommended_markdown_pct = decision.markdown_pct;
        recommendation.reason = decision.reason;
        recommendation
    }
}

/// 展示顺序: (Warengruppe, Monat, Artikel)，稳定排序保留输入顺序
pub fn sort_recommendations(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(compare_for_display);
}

fn compare_for_display(a: &Recommendation, b: &Recommendation) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| a.period_label.cmp(&b.period_label))
        .then_with(|| a.item_id.cmp(&b.item_id))
}
