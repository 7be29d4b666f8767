// ==========================================
// Merchify 降价建议 - 分析聚合（Analyse & Empfehlung）
// ==========================================
// 职责: 为热力图/柱状图提供聚合数据，不做渲染
// 输入: Recommendation 列表
// 输出: 商品组 × 月份 单元格、档位分布、整体汇总
// ==========================================

use crate::domain::recommendation::Recommendation;
use crate::domain::types::{MarkdownTier, PeriodMonth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// HeatmapCell - 商品组 × 月份 聚合单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub category: String,
    pub period_label: Option<PeriodMonth>,
    pub item_count: usize,
    pub avg_coverage_weeks: Option<f64>,     // 仅统计有 Reichweite 的行
    pub total_sales_qty: f64,
    pub total_inventory_qty: f64,
    pub sell_through_ratio: Option<f64>,     // sales / (sales + inventory)
    pub avg_recommended_markdown_pct: Option<f64>,
}

// ==========================================
// TierDistribution - 单个商品组的档位分布
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub category: String,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
    pub undetermined: usize,
}

// ==========================================
// AnalysisSummary - 整体汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub recommended_rows: usize,       // 有建议值（含 0）的行
    pub markdown_rows: usize,          // 建议降价 > 0 的行
    pub avg_markdown_pct: Option<f64>, // 仅统计有建议值的行
}

/// 均值（空集为 None）
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[derive(Default)]
struct CellAccumulator {
    item_count: usize,
    coverages: Vec<f64>,
    markdowns: Vec<f64>,
    sales: f64,
    inventory: f64,
}

/// 商品组 × 月份 热力图数据，按 (商品组, 月份) 排序
pub fn coverage_heatmap(recommendations: &[Recommendation]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(String, Option<PeriodMonth>), CellAccumulator> = BTreeMap::new();

    for rec in recommendations {
        let acc = cells
            .entry((rec.category.clone(), rec.period_label))
            .or_default();

        acc.item_count += 1;
        if let Some(coverage) = rec.coverage_weeks.filter(|v| v.is_finite()) {
            acc.coverages.push(coverage);
        }
        if let Some(pct) = rec.recommended_markdown_pct {
            acc.markdowns.push(pct);
        }
        acc.sales += rec.sales_qty.filter(|v| v.is_finite()).unwrap_or(0.0);
        acc.inventory += rec.inventory_qty.filter(|v| v.is_finite()).unwrap_or(0.0);
    }

    cells
        .into_iter()
        .map(|((category, period_label), acc)| {
            let denominator = acc.sales + acc.inventory;
            HeatmapCell {
                category,
                period_label,
                item_count: acc.item_count,
                avg_coverage_weeks: mean(&acc.coverages),
                total_sales_qty: acc.sales,
                total_inventory_qty: acc.inventory,
                sell_through_ratio: (denominator > 0.0).then(|| acc.sales / denominator),
                avg_recommended_markdown_pct: mean(&acc.markdowns),
            }
        })
        .collect()
}

/// 各商品组降价档位分布，按商品组排序
pub fn tier_distribution(recommendations: &[Recommendation]) -> Vec<TierDistribution> {
    let mut by_category: BTreeMap<&str, TierDistribution> = BTreeMap::new();

    for rec in recommendations {
        let entry = by_category
            .entry(rec.category.as_str())
            .or_insert_with(|| TierDistribution {
                category: rec.category.clone(),
                ..Default::default()
            });

        match rec.markdown_tier {
            Some(MarkdownTier::High) => entry.high += 1,
            Some(MarkdownTier::Medium) => entry.medium += 1,
            Some(MarkdownTier::Low) => entry.low += 1,
            Some(MarkdownTier::None) => entry.none += 1,
            None => entry.undetermined += 1,
        }
    }

    by_category.into_values().collect()
}

/// 整体汇总
pub fn summarize(recommendations: &[Recommendation]) -> AnalysisSummary {
    let markdowns: Vec<f64> = recommendations
        .iter()
        .filter_map(|r| r.recommended_markdown_pct)
        .collect();

    AnalysisSummary {
        total_rows: recommendations.len(),
        matched_rows: recommendations.iter().filter(|r| r.is_matched()).count(),
        recommended_rows: markdowns.len(),
        markdown_rows: markdowns.iter().filter(|&&pct| pct > 0.0).count(),
        avg_markdown_pct: mean(&markdowns),
    }
}
