// ==========================================
// Merchify 降价建议 - 引擎层
// ==========================================
// 职责: 实现降价规则、左连接、分析聚合
// 红线: 引擎不读文件，所有规则必须输出 reason
// ==========================================

pub mod analysis;
pub mod join;
pub mod markdown;
pub mod recommendation;

// 重导出核心引擎
pub use analysis::{
    coverage_heatmap, summarize, tier_distribution, AnalysisSummary, HeatmapCell,
    TierDistribution,
};
pub use join::{join, JoinedRow, PlanIndex, PlanKey};
pub use markdown::{
    decide_markdown, recommend_markdown, MarkdownDecision, TierPercentages, TierThresholds,
};
pub use recommendation::{sort_recommendations, MarkdownEngine};
