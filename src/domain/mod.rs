// ==========================================
// Merchify 降价建议 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件解析逻辑，不含引擎逻辑
// ==========================================

pub mod actual;
pub mod import;
pub mod plan;
pub mod recommendation;
pub mod types;

// 重导出核心类型
pub use actual::{ActualRecord, RawActualRecord};
pub use import::{DqSummary, DqViolation, ImportBatch, ImportKind, ImportOutcome};
pub use plan::{PlanTarget, RawPlanRecord};
pub use recommendation::Recommendation;
pub use types::{DqLevel, DuplicatePlanPolicy, MarkdownTier, PeriodMonth};
