// ==========================================
// Merchify 降价建议 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::actual::{ActualRecord, RawActualRecord};
use crate::domain::import::{DqViolation, ImportOutcome};
use crate::domain::plan::{PlanTarget, RawPlanRecord};
use crate::domain::types::{DuplicatePlanPolicy, PeriodMonth};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{RawRow, RawTable};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

// ==========================================
// DataImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: DataImporterImpl
#[async_trait]
pub trait DataImporter: Send + Sync {
    /// 导入 IST 数据
    ///
    /// # 流程
    /// 1. 文件读取与解析
    /// 2. 表头校验（缺列即报错）
    /// 3. 字段映射与类型转换（非法数值 → None + DQ 警告）
    /// 4. DQ 校验（缺少 Artikel/Warengruppe 的行被阻断）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 有效记录 + 批次信息 + DQ 明细
    /// - Err: 文件错误或结构性错误
    async fn import_actuals(&self, file_path: &Path) -> ImportResult<ImportOutcome<ActualRecord>>;

    /// 导入计划目标
    ///
    /// # 说明
    /// - 任一行必填字段缺失/非法 → 整表拒绝（MissingInput）
    /// - 降价百分比为负 → 整表拒绝（ValueRangeError）
    /// - 重复键按配置策略处理（REJECT / FIRST_MATCH）
    async fn import_plan_targets(
        &self,
        file_path: &Path,
    ) -> ImportResult<ImportOutcome<PlanTarget>>;

    /// 批量导入多个 IST 文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，某个文件失败不影响其他文件
    /// - 返回顺序与输入顺序一致
    async fn batch_import_actuals(
        &self,
        file_paths: Vec<std::path::PathBuf>,
    ) -> Vec<Result<ImportOutcome<ActualRecord>, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 行记录）
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 列名别名解析 + 类型转换
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 检查表头是否含全部 IST 必需列
    fn check_actual_headers(&self, headers: &[String]) -> ImportResult<()>;

    /// 检查表头是否含全部计划必需列
    fn check_plan_headers(&self, headers: &[String]) -> ImportResult<()>;

    /// 映射 IST 行；非法数值降级为 None，并返回对应 DQ 记录
    fn map_to_raw_actual(&self, row: &RawRow) -> (RawActualRecord, Vec<DqViolation>);

    /// 映射计划行；非法值即报错
    fn map_to_raw_plan(&self, row: &RawRow) -> ImportResult<RawPlanRecord>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 数据清洗接口
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白/NaN → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 宽松解析数值；非法 → None
    fn parse_decimal(&self, value: &str) -> Option<f64>;

    /// 解析日期（多种格式 + 表格序列日期）；非法 → None
    fn parse_date(&self, value: &str) -> Option<NaiveDate>;

    /// 解析月份标签（月份名/数字/日期）；非法 → None
    fn parse_month(&self, value: &str) -> Option<PeriodMonth>;

    /// 解析整数；非整数 → None
    fn parse_integer(&self, value: &str) -> Option<i32>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据质量校验接口
// 实现者: DqValidator
pub trait DqValidator: Send + Sync {
    /// 校验 IST 行（必填键缺失 → ERROR，Reichweite 异常 → WARNING）
    fn validate_actual(&self, record: &RawActualRecord) -> Vec<DqViolation>;

    /// 校验计划行（必填缺失 → MissingInput，负百分比 → ValueRangeError）
    fn validate_plan_row(&self, record: &RawPlanRecord) -> ImportResult<()>;

    /// 按策略处理计划表重复键
    ///
    /// # 返回
    /// - Ok((保留的计划行, 冲突记录))
    /// - Err(JoinAmbiguity): REJECT 策略下存在重复键
    fn resolve_plan_duplicates(
        &self,
        targets: Vec<PlanTarget>,
        policy: DuplicatePlanPolicy,
    ) -> ImportResult<(Vec<PlanTarget>, Vec<DqViolation>)>;
}
