// ==========================================
// Merchify 降价建议 - 数据导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到类型化记录
// 流程: 解析 → 表头校验 → 映射/清洗 → DQ 校验 → (计划表) 重复键处理
// 说明: 导入结果只在内存中返回，不落库
// ==========================================

use crate::config::MarkdownConfigReader;
use crate::domain::actual::ActualRecord;
use crate::domain::import::{DqSummary, DqViolation, ImportBatch, ImportKind, ImportOutcome};
use crate::domain::plan::PlanTarget;
use crate::domain::types::DqLevel;
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DataImporter, DqValidator as _, FieldMapper, FileParser};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// DataImporterImpl - 数据导入器实现
// ==========================================
pub struct DataImporterImpl<C>
where
    C: MarkdownConfigReader,
{
    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl<C> DataImporterImpl<C>
where
    C: MarkdownConfigReader,
{
    /// 创建新的 DataImporter 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(config: C, file_parser: Box<dyn FileParser>, field_mapper: Box<dyn FieldMapper>) -> Self {
        Self {
            config,
            file_parser,
            field_mapper,
        }
    }

    /// 使用默认组件（按扩展名解析 + 德/英列名映射）
    pub fn with_default_components(config: C) -> Self {
        Self::new(
            config,
            Box::new(UniversalFileParser),
            Box::new(FieldMapperImpl::new()),
        )
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn build_batch(
    batch_id: String,
    kind: ImportKind,
    file_path: &Path,
    summary: &DqSummary,
    started: Instant,
) -> ImportBatch {
    ImportBatch {
        batch_id,
        kind,
        file_name: file_name_of(file_path),
        total_rows: summary.total_rows,
        success_rows: summary.success,
        blocked_rows: summary.blocked,
        warning_rows: summary.warning,
        conflict_rows: summary.conflict,
        imported_at: Utc::now(),
        elapsed_ms: started.elapsed().as_millis(),
    }
}

#[async_trait::async_trait]
impl<C> DataImporter for DataImporterImpl<C>
where
    C: MarkdownConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_actuals(&self, file_path: &Path) -> ImportResult<ImportOutcome<ActualRecord>> {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(file_path = %file_path.display(), "开始导入 IST 数据");

        // === 步骤 1: 解析文件 ===
        let table = self.file_parser.parse_to_raw_table(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        // === 步骤 2: 表头校验 ===
        self.field_mapper.check_actual_headers(&table.headers)?;

        // === 步骤 3: 映射 + DQ 校验 ===
        let validator = DqValidator::new(self.config.get_coverage_anomaly_weeks().await?);
        let total_rows = table.rows.len();
        let mut records = Vec::with_capacity(total_rows);
        let mut violations: Vec<DqViolation> = Vec::new();

        for row in &table.rows {
            let (raw, mapping_violations) = self.field_mapper.map_to_raw_actual(row);
            let row_violations = validator.validate_actual(&raw);
            let blocked = row_violations.iter().any(|v| v.level == DqLevel::Error);

            violations.extend(mapping_violations);
            violations.extend(row_violations);

            if blocked {
                debug!(row_number = row.row_number, "行被 DQ 阻断");
                continue;
            }
            if let Some(record) = raw.into_actual() {
                records.push(record);
            }
        }

        let summary = DqSummary::from_violations(total_rows, records.len(), &violations);
        if summary.blocked > 0 {
            warn!(blocked = summary.blocked, "部分 IST 行因缺少主键被阻断");
        }

        let batch = build_batch(batch_id, ImportKind::Actual, file_path, &summary, started);
        info!(
            total_rows = batch.total_rows,
            success = batch.success_rows,
            blocked = batch.blocked_rows,
            warning = batch.warning_rows,
            elapsed_ms = batch.elapsed_ms as u64,
            "IST 数据导入完成"
        );

        Ok(ImportOutcome {
            batch,
            records,
            summary,
            violations,
        })
    }

    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_plan_targets(&self, file_path: &Path) -> ImportResult<ImportOutcome<PlanTarget>> {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(file_path = %file_path.display(), "开始导入计划目标");

        // === 步骤 1: 解析文件 ===
        let table = self.file_parser.parse_to_raw_table(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        // === 步骤 2: 表头校验 ===
        self.field_mapper.check_plan_headers(&table.headers)?;

        // === 步骤 3: 映射 + 行校验（任一行失败整表拒绝）===
        let validator = DqValidator::new(self.config.get_coverage_anomaly_weeks().await?);
        let total_rows = table.rows.len();
        let mut targets = Vec::with_capacity(total_rows);

        for row in &table.rows {
            let raw = self.field_mapper.map_to_raw_plan(row)?;
            validator.validate_plan_row(&raw).map_err(|e| {
                error!(row_number = row.row_number, error = %e, "计划表校验失败");
                e
            })?;

            let row_number = raw.row_number;
            let target = raw.into_target().ok_or_else(|| {
                ImportError::InternalError(format!("计划行 {} 转换失败", row_number))
            })?;
            targets.push(target);
        }

        // === 步骤 4: 重复键处理 ===
        let policy = self.config.get_duplicate_plan_policy().await?;
        let (records, violations) = validator.resolve_plan_duplicates(targets, policy)?;

        let summary = DqSummary::from_violations(total_rows, records.len(), &violations);
        let batch = build_batch(batch_id, ImportKind::Plan, file_path, &summary, started);
        info!(
            total_rows = batch.total_rows,
            success = batch.success_rows,
            conflict = batch.conflict_rows,
            policy = %policy,
            elapsed_ms = batch.elapsed_ms as u64,
            "计划目标导入完成"
        );

        Ok(ImportOutcome {
            batch,
            records,
            summary,
            violations,
        })
    }

    async fn batch_import_actuals(
        &self,
        file_paths: Vec<PathBuf>,
    ) -> Vec<Result<ImportOutcome<ActualRecord>, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入 IST 文件");

        // 为每个文件创建导入任务
        let import_tasks = file_paths.into_iter().map(|path| async move {
            let path_str = path.display().to_string();
            match self.import_actuals(&path).await {
                Ok(outcome) => {
                    info!(file = %path_str, success = outcome.summary.success, "文件导入成功");
                    Ok(outcome)
                }
                Err(e) => {
                    error!(file = %path_str, error = %e, "文件导入失败");
                    Err(format!("文件 {} 导入失败: {}", path_str, e))
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigResult;
    use crate::domain::types::{DuplicatePlanPolicy, PeriodMonth};
    use async_trait::async_trait;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    struct FixedConfig {
        policy: DuplicatePlanPolicy,
    }

    #[async_trait]
    impl MarkdownConfigReader for FixedConfig {
        async fn get_high_delta_weeks(&self) -> ConfigResult<f64> {
            Ok(8.0)
        }
        async fn get_medium_delta_weeks(&self) -> ConfigResult<f64> {
            Ok(4.0)
        }
        async fn get_duplicate_plan_policy(&self) -> ConfigResult<DuplicatePlanPolicy> {
            Ok(self.policy)
        }
        async fn get_coverage_anomaly_weeks(&self) -> ConfigResult<f64> {
            Ok(104.0)
        }
        async fn get_locale(&self) -> ConfigResult<String> {
            Ok("de".to_string())
        }
    }

    fn importer(policy: DuplicatePlanPolicy) -> DataImporterImpl<FixedConfig> {
        DataImporterImpl::with_default_components(FixedConfig { policy })
    }

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_import_actuals_blocks_rows_without_keys() {
        let file = csv_file(
            "Artikel;Warengruppe;Datum;Reichweite\n\
             A1;Shirts;14.03.2025;22\n\
             ;Shirts;14.03.2025;10\n\
             A3;Hosen;2025-04-01;abc\n",
        );

        let outcome = importer(DuplicatePlanPolicy::Reject)
            .import_actuals(file.path())
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.summary.total_rows, 3);
        assert_eq!(outcome.summary.blocked, 1);
        assert_eq!(outcome.records[0].period_label, Some(PeriodMonth::March));
        assert_eq!(outcome.records[1].coverage_weeks, None);
        assert_eq!(outcome.batch.kind, ImportKind::Actual);
        assert!(!outcome.batch.batch_id.is_empty());
    }

    #[tokio::test]
    async fn test_import_plan_duplicate_rejected() {
        let file = csv_file(
            "Warengruppe,Monat,Ziel-Reichweite,Abschrift hoch,Abschrift mittel,Abschrift niedrig\n\
             Shirts,März,14,30,20,10\n\
             Shirts,März,12,25,15,5\n",
        );

        let result = importer(DuplicatePlanPolicy::Reject)
            .import_plan_targets(file.path())
            .await;
        assert!(matches!(result, Err(ImportError::JoinAmbiguity { .. })));
    }

    #[tokio::test]
    async fn test_import_plan_duplicate_first_match() {
        let file = csv_file(
            "Warengruppe,Monat,Ziel-Reichweite,Abschrift hoch,Abschrift mittel,Abschrift niedrig\n\
             Shirts,März,14,30,20,10\n\
             Shirts,März,12,25,15,5\n",
        );

        let outcome = importer(DuplicatePlanPolicy::FirstMatch)
            .import_plan_targets(file.path())
            .await
            .unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].target_coverage_weeks, 14.0);
        assert_eq!(outcome.summary.conflict, 1);
    }
}
