// ==========================================
// Merchify 降价建议 - 数据质量校验器实现
// ==========================================
// 职责: IST 行级 DQ 校验 + 计划表结构校验 + 计划重复键处理
// 口径: IST 问题只记录不中断；计划表问题整表拒绝
// ==========================================

use crate::domain::actual::RawActualRecord;
use crate::domain::import::DqViolation;
use crate::domain::plan::{PlanTarget, RawPlanRecord};
use crate::domain::types::{DqLevel, DuplicatePlanPolicy};
use crate::engine::join::PlanKey;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::DqValidator as DqValidatorTrait;
use std::collections::HashMap;

/// 降价百分比允许范围
const PCT_MIN: f64 = 0.0;
const PCT_MAX: f64 = 100.0;

pub struct DqValidator {
    coverage_anomaly_weeks: f64, // Reichweite 异常阈值（周）
}

impl DqValidator {
    pub fn new(coverage_anomaly_weeks: f64) -> Self {
        Self {
            coverage_anomaly_weeks,
        }
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_actual(&self, record: &RawActualRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let key = record.item_id.clone();

        let mut push = |level: DqLevel, field: &str, message: String| {
            violations.push(DqViolation {
                row_number: record.row_number,
                key: key.clone(),
                level,
                field: field.to_string(),
                message,
            });
        };

        // 主键缺失 → 阻断
        if record.item_id.is_none() {
            push(DqLevel::Error, "item_id", "Artikel 缺失".to_string());
        }
        if record.category.is_none() {
            push(DqLevel::Error, "category", "Warengruppe 缺失".to_string());
        }

        // 无期间 → 保留但无法匹配计划
        if record.period_date.is_none() && record.period_label.is_none() {
            push(
                DqLevel::Warning,
                "period_label",
                "缺少日期与月份，无法匹配计划".to_string(),
            );
        }

        match record.coverage_weeks {
            None => push(
                DqLevel::Info,
                "coverage_weeks",
                "Reichweite 为空，无法给出降价建议".to_string(),
            ),
            Some(weeks) if weeks < 0.0 => push(
                DqLevel::Warning,
                "coverage_weeks",
                format!("Reichweite 为负数: {:.2}", weeks),
            ),
            Some(weeks) if weeks > self.coverage_anomaly_weeks => push(
                DqLevel::Warning,
                "coverage_weeks",
                format!(
                    "Reichweite 异常 ({:.2} > {:.2} 周)",
                    weeks, self.coverage_anomaly_weeks
                ),
            ),
            Some(_) => {}
        }

        violations
    }

    fn validate_plan_row(&self, record: &RawPlanRecord) -> ImportResult<()> {
        if let Some(field) = record.first_missing_field() {
            return Err(ImportError::MissingInput {
                row: record.row_number,
                field: field.to_string(),
            });
        }

        let percentages = [
            ("markdown_high_pct", record.markdown_high_pct),
            ("markdown_medium_pct", record.markdown_medium_pct),
            ("markdown_low_pct", record.markdown_low_pct),
        ];
        for (field, value) in percentages {
            if let Some(value) = value {
                if !(PCT_MIN..=PCT_MAX).contains(&value) {
                    return Err(ImportError::ValueRangeError {
                        row: record.row_number,
                        field: field.to_string(),
                        value,
                        min: PCT_MIN,
                        max: PCT_MAX,
                    });
                }
            }
        }

        Ok(())
    }

    fn resolve_plan_duplicates(
        &self,
        targets: Vec<PlanTarget>,
        policy: DuplicatePlanPolicy,
    ) -> ImportResult<(Vec<PlanTarget>, Vec<DqViolation>)> {
        // 键 → 出现的行号（保持输入顺序）
        let mut rows_by_key: HashMap<PlanKey, Vec<usize>> = HashMap::new();
        for target in &targets {
            rows_by_key
                .entry(PlanKey::of_target(target))
                .or_default()
                .push(target.row_number);
        }

        if policy == DuplicatePlanPolicy::Reject {
            // 取首个重复键所在位置最靠前者，保证报错确定
            let first_duplicate = targets.iter().find_map(|target| {
                let key = PlanKey::of_target(target);
                rows_by_key
                    .get(&key)
                    .filter(|rows| rows.len() > 1)
                    .map(|rows| (key, rows.clone()))
            });

            if let Some((key, rows)) = first_duplicate {
                return Err(ImportError::JoinAmbiguity {
                    category: key.category,
                    period: key.period_label.to_string(),
                    rows,
                });
            }
            return Ok((targets, Vec::new()));
        }

        let mut kept = Vec::with_capacity(targets.len());
        let mut violations = Vec::new();
        let mut seen: HashMap<PlanKey, usize> = HashMap::new();

        for target in targets {
            let key = PlanKey::of_target(&target);
            if let Some(first_row) = seen.get(&key) {
                violations.push(DqViolation {
                    row_number: target.row_number,
                    key: Some(format!("{}/{}", key.category, key.period_label)),
                    level: DqLevel::Conflict,
                    field: "category,period_label".to_string(),
                    message: format!("计划键重复，沿用第 {} 行", first_row),
                });
                continue;
            }
            seen.insert(key, target.row_number);
            kept.push(target);
        }

        Ok((kept, violations))
    }
}
