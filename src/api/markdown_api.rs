// ==========================================
// Merchify 降价建议 - 分析 API
// ==========================================
// 职责: 一次请求内串联 导入 → 引擎 → 分析/导出
// 红线: 无全局会话状态，调用方显式传入数据表
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::MarkdownConfigReader;
use crate::domain::actual::ActualRecord;
use crate::domain::import::{DqSummary, DqViolation, ImportBatch, ImportOutcome};
use crate::domain::plan::PlanTarget;
use crate::domain::recommendation::Recommendation;
use crate::engine::analysis::{
    coverage_heatmap, summarize, tier_distribution, AnalysisSummary, HeatmapCell,
    TierDistribution,
};
use crate::engine::markdown::TierThresholds;
use crate::engine::recommendation::MarkdownEngine;
use crate::export::CsvExporter;
use crate::i18n::t_with_args;
use crate::importer::{DataImporter, DataImporterImpl};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

// ==========================================
// LoadedTable - 导入后的数据表
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedTable<T> {
    pub records: Vec<T>,
    pub batches: Vec<ImportBatch>,
    pub summary: DqSummary, // 多文件时为合计
    pub violations: Vec<DqViolation>,
}

impl<T> LoadedTable<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            batches: Vec::new(),
            summary: DqSummary::default(),
            violations: Vec::new(),
        }
    }

    fn push_outcome(&mut self, outcome: ImportOutcome<T>) {
        self.summary.total_rows += outcome.summary.total_rows;
        self.summary.success += outcome.summary.success;
        self.summary.blocked += outcome.summary.blocked;
        self.summary.warning += outcome.summary.warning;
        self.summary.conflict += outcome.summary.conflict;
        self.records.extend(outcome.records);
        self.batches.push(outcome.batch);
        self.violations.extend(outcome.violations);
    }

    fn from_outcome(outcome: ImportOutcome<T>) -> Self {
        let mut table = Self::empty();
        table.push_outcome(outcome);
        table
    }
}

/// 导入批次的本地化摘要，如 "ist.csv: 4 von 5 Zeilen importiert, ..."
pub fn describe_batch(batch: &ImportBatch) -> String {
    let summary = t_with_args(
        "import.summary",
        &[
            ("success", batch.success_rows.to_string().as_str()),
            ("total", batch.total_rows.to_string().as_str()),
            ("blocked", batch.blocked_rows.to_string().as_str()),
            ("warning", batch.warning_rows.to_string().as_str()),
        ],
    );
    match &batch.file_name {
        Some(name) => format!("{}: {}", name, summary),
        None => summary,
    }
}

// ==========================================
// MarkdownReport - 分析结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownReport {
    pub thresholds: TierThresholds,
    pub recommendations: Vec<Recommendation>,
    pub summary: AnalysisSummary,
    pub heatmap: Vec<HeatmapCell>,
    pub tier_distribution: Vec<TierDistribution>,
    pub import_batches: Vec<ImportBatch>, // 仅 run() 填充
}

// ==========================================
// MarkdownApi
// ==========================================
pub struct MarkdownApi<C>
where
    C: MarkdownConfigReader,
{
    importer: DataImporterImpl<C>,
}

impl<C> MarkdownApi<C>
where
    C: MarkdownConfigReader + Send + Sync,
{
    pub fn new(config: C) -> Self {
        Self {
            importer: DataImporterImpl::with_default_components(config),
        }
    }

    /// 按配置切换消息语言
    pub async fn apply_locale(&self) -> ApiResult<()> {
        let locale = self.importer.config().get_locale().await?;
        crate::i18n::set_locale(&locale);
        Ok(())
    }

    /// 导入一个或多个 IST 文件（并发解析，结果按文件顺序拼接）
    ///
    /// # 说明
    /// - 任一文件失败即整体失败（不返回部分数据）
    #[instrument(skip(self, paths), fields(files = paths.len()))]
    pub async fn load_actuals(&self, paths: &[PathBuf]) -> ApiResult<LoadedTable<ActualRecord>> {
        match paths {
            [] => Err(ApiError::InvalidInput("未提供 IST 文件".to_string())),
            [single] => Ok(LoadedTable::from_outcome(
                self.importer.import_actuals(single).await?,
            )),
            _ => {
                let results = self.importer.batch_import_actuals(paths.to_vec()).await;
                let mut table = LoadedTable::empty();
                let mut failures = Vec::new();
                for result in results {
                    match result {
                        Ok(outcome) => table.push_outcome(outcome),
                        Err(msg) => failures.push(msg),
                    }
                }

                if !failures.is_empty() {
                    error!(failed = failures.len(), "IST 批量导入存在失败文件");
                    return Err(ApiError::BatchImportFailed(failures.join("; ")));
                }
                Ok(table)
            }
        }
    }

    /// 导入计划目标
    pub async fn load_plan_targets(&self, path: &Path) -> ApiResult<LoadedTable<PlanTarget>> {
        let outcome = self.importer.import_plan_targets(path).await?;
        Ok(LoadedTable::from_outcome(outcome))
    }

    /// 计算降价建议与分析聚合
    #[instrument(skip(self, actuals, targets), fields(actuals = actuals.len(), targets = targets.len()))]
    pub async fn compute_recommendations(
        &self,
        actuals: &[ActualRecord],
        targets: &[PlanTarget],
    ) -> ApiResult<MarkdownReport> {
        let thresholds = self.importer.config().get_tier_thresholds().await?;
        let engine = MarkdownEngine::with_thresholds(thresholds);
        let recommendations = engine.evaluate(actuals, targets);

        Ok(MarkdownReport {
            thresholds,
            summary: summarize(&recommendations),
            heatmap: coverage_heatmap(&recommendations),
            tier_distribution: tier_distribution(&recommendations),
            recommendations,
            import_batches: Vec::new(),
        })
    }

    /// 一次完整分析：导入 IST 与计划 → 计算
    pub async fn run(&self, actual_paths: &[PathBuf], plan_path: &Path) -> ApiResult<MarkdownReport> {
        let actuals = self.load_actuals(actual_paths).await?;
        let plan = self.load_plan_targets(plan_path).await?;

        let mut report = self
            .compute_recommendations(&actuals.records, &plan.records)
            .await?;
        report.import_batches = actuals.batches;
        report.import_batches.extend(plan.batches);

        info!(
            rows = report.summary.total_rows,
            matched = report.summary.matched_rows,
            markdown = report.summary.markdown_rows,
            "分析完成"
        );
        Ok(report)
    }

    /// 导出建议结果为 CSV
    pub fn export_csv(&self, recommendations: &[Recommendation], path: &Path) -> ApiResult<()> {
        CsvExporter::new().export_to_path(recommendations, path)?;
        Ok(())
    }
}
