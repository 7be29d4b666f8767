// ==========================================
// Merchify 降价建议 - IST × 计划 左连接
// ==========================================
// 红线: 左连接语义，每条 IST 记录在输出中恰好出现一次
// 连接键: (TRIM 后的 Warengruppe, Monat)
// 重复计划键: 首行命中（first match wins），其余忽略并告警
// ==========================================

use crate::domain::actual::ActualRecord;
use crate::domain::plan::PlanTarget;
use crate::domain::types::PeriodMonth;
use std::collections::HashMap;
use tracing::{debug, warn};

// ==========================================
// PlanKey - 连接键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanKey {
    pub category: String,
    pub period_label: PeriodMonth,
}

impl PlanKey {
    pub fn new(category: &str, period_label: PeriodMonth) -> Self {
        Self {
            category: category.trim().to_string(),
            period_label,
        }
    }

    /// IST 记录的连接键（无月份标签时无法连接）
    pub fn of_actual(actual: &ActualRecord) -> Option<Self> {
        actual
            .period_label
            .map(|label| Self::new(&actual.category, label))
    }

    pub fn of_target(target: &PlanTarget) -> Self {
        Self::new(&target.category, target.period_label)
    }
}

// ==========================================
// PlanIndex - 计划表哈希索引
// ==========================================
pub struct PlanIndex<'a> {
    index: HashMap<PlanKey, &'a PlanTarget>,
    duplicate_rows: usize,
}

impl<'a> PlanIndex<'a> {
    /// 建立索引；重复键保留输入顺序中的第一行
    pub fn build(targets: &'a [PlanTarget]) -> Self {
        let mut index = HashMap::with_capacity(targets.len());
        let mut duplicate_rows = 0;

        for target in targets {
            let key = PlanKey::of_target(target);
            if index.contains_key(&key) {
                duplicate_rows += 1;
                warn!(
                    category = %key.category,
                    period = %key.period_label,
                    row_number = target.row_number,
                    "计划表存在重复键，保留首行"
                );
                continue;
            }
            index.insert(key, target);
        }

        Self {
            index,
            duplicate_rows,
        }
    }

    pub fn get(&self, key: &PlanKey) -> Option<&'a PlanTarget> {
        self.index.get(key).copied()
    }

    /// 查找 IST 记录对应的计划行
    pub fn lookup(&self, actual: &ActualRecord) -> Option<&'a PlanTarget> {
        PlanKey::of_actual(actual).and_then(|key| self.get(&key))
    }

    /// 被忽略的重复计划行数
    pub fn duplicate_rows(&self) -> usize {
        self.duplicate_rows
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// ==========================================
// JoinedRow - 连接结果
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub actual: &'a ActualRecord,
    pub target: Option<&'a PlanTarget>,
}

/// 左外连接: IST 记录 → 计划目标
///
/// 输出长度恒等于 actuals.len()，顺序与输入一致
pub fn join<'a>(actuals: &'a [ActualRecord], targets: &'a [PlanTarget]) -> Vec<JoinedRow<'a>> {
    let index = PlanIndex::build(targets);
    let rows: Vec<JoinedRow<'a>> = actuals
        .iter()
        .map(|actual| JoinedRow {
            actual,
            target: index.lookup(actual),
        })
        .collect();

    debug!(
        actuals = actuals.len(),
        targets = targets.len(),
        matched = rows.iter().filter(|r| r.target.is_some()).count(),
        "左连接完成"
    );

    rows
}
