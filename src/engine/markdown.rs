// ==========================================
// Merchify 降价建议 - 降价档位判定规则
// ==========================================
// 红线: 输入缺失时结果为"无法判定"(None)，不是 0
// 红线: 区间为左开右闭: (4, 8] → 中档, (8, ∞) → 高档
// ==========================================
// 输入: Reichweite、目标 Reichweite、三档降价百分比
// 输出: 档位 + 建议降价百分比 + reason
// ==========================================

use crate::domain::types::MarkdownTier;
use serde::{Deserialize, Serialize};

/// 默认高档阈值（周）
pub const DEFAULT_HIGH_ABOVE_WEEKS: f64 = 8.0;

/// 默认中档阈值（周）
pub const DEFAULT_MEDIUM_ABOVE_WEEKS: f64 = 4.0;

// ==========================================
// TierThresholds - 档位阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub high_above_weeks: f64,   // delta > 此值 → 高档
    pub medium_above_weeks: f64, // delta > 此值 → 中档
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high_above_weeks: DEFAULT_HIGH_ABOVE_WEEKS,
            medium_above_weeks: DEFAULT_MEDIUM_ABOVE_WEEKS,
        }
    }
}

impl TierThresholds {
    /// 构造阈值，要求 0 <= medium < high 且均为有限值
    pub fn new(high_above_weeks: f64, medium_above_weeks: f64) -> Option<Self> {
        let valid = high_above_weeks.is_finite()
            && medium_above_weeks.is_finite()
            && medium_above_weeks >= 0.0
            && medium_above_weeks < high_above_weeks;

        valid.then_some(Self {
            high_above_weeks,
            medium_above_weeks,
        })
    }

    /// 按 delta 判定档位（顺序执行，命中即返回）
    ///
    /// 1) delta > high_above → High
    /// 2) delta > medium_above → Medium
    /// 3) delta > 0 → Low
    /// 4) 其他 → None
    pub fn classify(&self, delta_weeks: f64) -> MarkdownTier {
        if delta_weeks > self.high_above_weeks {
            MarkdownTier::High
        } else if delta_weeks > self.medium_above_weeks {
            MarkdownTier::Medium
        } else if delta_weeks > 0.0 {
            MarkdownTier::Low
        } else {
            MarkdownTier::None
        }
    }
}

// ==========================================
// TierPercentages - 三档降价百分比
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPercentages {
    pub high_pct: f64,
    pub medium_pct: f64,
    pub low_pct: f64,
}

impl TierPercentages {
    pub fn new(high_pct: f64, medium_pct: f64, low_pct: f64) -> Self {
        Self {
            high_pct,
            medium_pct,
            low_pct,
        }
    }

    /// 取档位对应的百分比
    pub fn for_tier(&self, tier: MarkdownTier) -> f64 {
        match tier {
            MarkdownTier::High => self.high_pct,
            MarkdownTier::Medium => self.medium_pct,
            MarkdownTier::Low => self.low_pct,
            MarkdownTier::None => 0.0,
        }
    }
}

// ==========================================
// MarkdownDecision - 单行判定结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownDecision {
    pub delta_weeks: Option<f64>,
    pub tier: Option<MarkdownTier>,
    pub markdown_pct: Option<f64>,
    pub reason: String,
}

/// 有限数值才视为"存在"
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// 单行降价判定（带 reason）
///
/// 规则（顺序执行，命中即返回）:
/// 1) coverage 或 target 缺失/非有限值 → 无法判定
/// 2) delta = coverage - target
/// 3) 按阈值判定档位，返回档位对应百分比；None 档返回 0
pub fn decide_markdown(
    coverage_weeks: Option<f64>,
    target_coverage_weeks: Option<f64>,
    percentages: Option<TierPercentages>,
    thresholds: &TierThresholds,
) -> MarkdownDecision {
    let coverage = match present(coverage_weeks) {
        Some(c) => c,
        None => {
            return MarkdownDecision {
                delta_weeks: None,
                tier: None,
                markdown_pct: None,
                reason: "MARKDOWN_UNDETERMINED: coverage_weeks missing".to_string(),
            }
        }
    };

    let (target, percentages) = match (present(target_coverage_weeks), percentages) {
        (Some(t), Some(p)) => (t, p),
        _ => {
            return MarkdownDecision {
                delta_weeks: None,
                tier: None,
                markdown_pct: None,
                reason: "MARKDOWN_UNDETERMINED: no plan target".to_string(),
            }
        }
    };

    let delta = coverage - target;
    let tier = thresholds.classify(delta);
    let markdown_pct = percentages.for_tier(tier);

    let reason = match tier {
        MarkdownTier::High => format!(
            "MARKDOWN_RULE_HIGH: delta={} > {}",
            delta, thresholds.high_above_weeks
        ),
        MarkdownTier::Medium => format!(
            "MARKDOWN_RULE_MEDIUM: {} < delta={} <= {}",
            thresholds.medium_above_weeks, delta, thresholds.high_above_weeks
        ),
        MarkdownTier::Low => format!(
            "MARKDOWN_RULE_LOW: 0 < delta={} <= {}",
            delta, thresholds.medium_above_weeks
        ),
        MarkdownTier::None => format!("MARKDOWN_RULE_NONE: delta={} <= 0", delta),
    };

    MarkdownDecision {
        delta_weeks: Some(delta),
        tier: Some(tier),
        markdown_pct: Some(markdown_pct),
        reason,
    }
}

/// 按默认阈值（8 / 4 周）计算建议降价百分比
///
/// - coverage 或 target 缺失 → None（无法给出建议，区别于"无需降价"的 0）
/// - delta > 8 → high_pct
/// - 4 < delta <= 8 → medium_pct
/// - 0 < delta <= 4 → low_pct
/// - delta <= 0 → 0
pub fn recommend_markdown(
    coverage_weeks: Option<f64>,
    target_coverage_weeks: Option<f64>,
    high_pct: f64,
    medium_pct: f64,
    low_pct: f64,
) -> Option<f64> {
    decide_markdown(
        coverage_weeks,
        target_coverage_weeks,
        Some(TierPercentages::new(high_pct, medium_pct, low_pct)),
        &TierThresholds::default(),
    )
    .markdown_pct
}
