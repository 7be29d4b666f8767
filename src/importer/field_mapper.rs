// ==========================================
// Merchify 降价建议 - 字段映射器实现
// ==========================================
// 职责: 源列名（德/英别名）→ 标准字段 + 类型转换
// 口径: 列名匹配忽略大小写、空格、下划线、连字符、括号，ä/ö/ü/ß 与 ae/oe/ue/ss 等价
// ==========================================

use crate::domain::actual::RawActualRecord;
use crate::domain::import::DqViolation;
use crate::domain::plan::RawPlanRecord;
use crate::domain::types::{DqLevel, PeriodMonth};
use crate::importer::data_cleaner::{is_ambiguous_grouping, DataCleaner};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use crate::importer::importer_trait::{DataCleaner as _, FieldMapper as FieldMapperTrait};

// ==========================================
// 标准字段与列名别名
// ==========================================
pub mod columns {
    /// (标准列名, 已归一化的别名列表)
    pub type ColumnDef = (&'static str, &'static [&'static str]);

    pub const ITEM: ColumnDef = (
        "Artikel",
        &["artikel", "artikelnummer", "artikelnr", "sku", "itemid", "item"],
    );
    pub const CATEGORY: ColumnDef = (
        "Warengruppe",
        &["warengruppe", "wg", "kategorie", "category"],
    );
    pub const DATE: ColumnDef = ("Datum", &["datum", "date", "perioddate"]);
    pub const MONTH: ColumnDef = ("Monat", &["monat", "periode", "month", "periodlabel"]);
    pub const COVERAGE: ColumnDef = (
        "Reichweite",
        &[
            "reichweite",
            "reichweitewochen",
            "reichweiteinwochen",
            "coverageweeks",
            "coverage",
        ],
    );
    pub const PRICE: ColumnDef = ("Preis", &["preis", "vk", "vkpreis", "price"]);
    pub const SALES: ColumnDef = ("Absatz", &["absatz", "abverkauf", "salesqty", "sales"]);
    pub const INVENTORY: ColumnDef = (
        "Lagerbestand",
        &["lagerbestand", "bestand", "inventoryqty", "inventory"],
    );

    pub const TARGET: ColumnDef = (
        "Ziel-Reichweite",
        &[
            "zielreichweite",
            "sollreichweite",
            "planreichweite",
            "targetcoverageweeks",
            "targetcoverage",
        ],
    );
    pub const HIGH: ColumnDef = (
        "Abschrift hoch",
        &["abschrifthoch", "abschrifthochprozent", "markdownhighpct"],
    );
    pub const MEDIUM: ColumnDef = (
        "Abschrift mittel",
        &["abschriftmittel", "abschriftmittelprozent", "markdownmediumpct"],
    );
    pub const LOW: ColumnDef = (
        "Abschrift niedrig",
        &["abschriftniedrig", "abschriftniedrigprozent", "markdownlowpct"],
    );
    pub const RUNS: ColumnDef = (
        "Reduzierungsläufe",
        &[
            "reduzierungslaeufe",
            "reduzierungslaeufeproperiode",
            "abschriftenlaeufe",
            "reductionrunsperperiod",
        ],
    );
}

use columns::ColumnDef;

/// 列名归一化
pub fn normalize_header(header: &str) -> String {
    let mut normalized = String::with_capacity(header.len());
    for c in header.trim().chars().flat_map(|c| c.to_lowercase()) {
        match c {
            'ä' => normalized.push_str("ae"),
            'ö' => normalized.push_str("oe"),
            'ü' => normalized.push_str("ue"),
            'ß' => normalized.push_str("ss"),
            ' ' | '_' | '-' | '(' | ')' | '.' | '/' | '%' => {}
            other => normalized.push(other),
        }
    }
    normalized
}

fn header_matches(header: &str, def: &ColumnDef) -> bool {
    let normalized = normalize_header(header);
    def.1.iter().any(|alias| *alias == normalized)
}

fn has_column(headers: &[String], def: &ColumnDef) -> bool {
    headers.iter().any(|h| header_matches(h, def))
}

fn require_column(headers: &[String], def: &ColumnDef, table: &str) -> ImportResult<()> {
    if has_column(headers, def) {
        Ok(())
    } else {
        Err(ImportError::MissingColumn {
            table: table.to_string(),
            column: def.0.to_string(),
        })
    }
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 按别名提取非空文本
    fn get_string(&self, row: &RawRow, def: &ColumnDef) -> Option<String> {
        let mut matches: Vec<(&String, &String)> = row
            .values
            .iter()
            .filter(|(header, _)| header_matches(header, def))
            .collect();
        // 同义列并存时按列名排序取首个非空值，保证结果确定
        matches.sort_by(|a, b| a.0.cmp(b.0));

        matches
            .into_iter()
            .find_map(|(_, value)| self.cleaner.normalize_null(Some(value.clone())))
    }

    /// IST 数值字段：非法值 → None + WARNING
    fn lenient_decimal(
        &self,
        row: &RawRow,
        def: &ColumnDef,
        field: &str,
        key: &Option<String>,
        violations: &mut Vec<DqViolation>,
    ) -> Option<f64> {
        let text = self.get_string(row, def)?;
        match self.cleaner.parse_decimal(&text) {
            Some(value) => {
                if is_ambiguous_grouping(&text) {
                    violations.push(DqViolation {
                        row_number: row.row_number,
                        key: key.clone(),
                        level: DqLevel::Info,
                        field: field.to_string(),
                        message: format!(
                            "{} 按小数解析为 {}（千分位请写作 {}）",
                            text,
                            value,
                            text.replace(|c: char| c == ',' || c == '.', "")
                        ),
                    });
                }
                Some(value)
            }
            None => {
                violations.push(DqViolation {
                    row_number: row.row_number,
                    key: key.clone(),
                    level: DqLevel::Warning,
                    field: field.to_string(),
                    message: format!("无法解析为数值: {}，按空值处理", text),
                });
                None
            }
        }
    }

    /// 计划数值字段：非法值即报错，缺失返回 None
    fn strict_decimal(&self, row: &RawRow, def: &ColumnDef, field: &str) -> ImportResult<Option<f64>> {
        match self.get_string(row, def) {
            None => Ok(None),
            Some(text) => self
                .cleaner
                .parse_decimal(&text)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: field.to_string(),
                    message: format!("无法解析为数值: {}", text),
                }),
        }
    }

    /// 计划整数字段（Reduzierungsläufe）：可缺失，非整数即报错
    fn strict_integer(&self, row: &RawRow, def: &ColumnDef, field: &str) -> ImportResult<Option<i32>> {
        match self.get_string(row, def) {
            None => Ok(None),
            Some(text) => self
                .cleaner
                .parse_integer(&text)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: field.to_string(),
                    message: format!("不是整数: {}", text),
                }),
        }
    }

    fn strict_month(&self, row: &RawRow) -> ImportResult<Option<PeriodMonth>> {
        match self.get_string(row, &columns::MONTH) {
            None => Ok(None),
            Some(text) => self
                .cleaner
                .parse_month(&text)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: "period_label".to_string(),
                    message: format!("无法识别的月份: {}", text),
                }),
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn check_actual_headers(&self, headers: &[String]) -> ImportResult<()> {
        const TABLE: &str = "IST-Daten";
        require_column(headers, &columns::ITEM, TABLE)?;
        require_column(headers, &columns::CATEGORY, TABLE)?;
        if !has_column(headers, &columns::DATE) && !has_column(headers, &columns::MONTH) {
            return Err(ImportError::MissingColumn {
                table: TABLE.to_string(),
                column: format!("{}/{}", columns::DATE.0, columns::MONTH.0),
            });
        }
        require_column(headers, &columns::COVERAGE, TABLE)
    }

    fn check_plan_headers(&self, headers: &[String]) -> ImportResult<()> {
        const TABLE: &str = "Planung";
        for def in [
            &columns::CATEGORY,
            &columns::MONTH,
            &columns::TARGET,
            &columns::HIGH,
            &columns::MEDIUM,
            &columns::LOW,
        ] {
            require_column(headers, def, TABLE)?;
        }
        Ok(())
    }

    fn map_to_raw_actual(&self, row: &RawRow) -> (RawActualRecord, Vec<DqViolation>) {
        let mut violations = Vec::new();
        let item_id = self.get_string(row, &columns::ITEM);
        let key = item_id.clone();

        let period_date = self.get_string(row, &columns::DATE).and_then(|text| {
            let parsed = self.cleaner.parse_date(&text);
            if parsed.is_none() {
                violations.push(DqViolation {
                    row_number: row.row_number,
                    key: key.clone(),
                    level: DqLevel::Warning,
                    field: "period_date".to_string(),
                    message: format!("日期无法解析: {}", text),
                });
            }
            parsed
        });

        let period_label = self.get_string(row, &columns::MONTH).and_then(|text| {
            let parsed = self.cleaner.parse_month(&text);
            if parsed.is_none() {
                violations.push(DqViolation {
                    row_number: row.row_number,
                    key: key.clone(),
                    level: DqLevel::Warning,
                    field: "period_label".to_string(),
                    message: format!("月份无法识别: {}", text),
                });
            }
            parsed
        });

        let record = RawActualRecord {
            category: self.get_string(row, &columns::CATEGORY),
            period_date,
            period_label,
            coverage_weeks: self.lenient_decimal(
                row,
                &columns::COVERAGE,
                "coverage_weeks",
                &key,
                &mut violations,
            ),
            price: self.lenient_decimal(row, &columns::PRICE, "price", &key, &mut violations),
            sales_qty: self.lenient_decimal(row, &columns::SALES, "sales_qty", &key, &mut violations),
            inventory_qty: self.lenient_decimal(
                row,
                &columns::INVENTORY,
                "inventory_qty",
                &key,
                &mut violations,
            ),
            item_id,
            row_number: row.row_number,
        };

        (record, violations)
    }

    fn map_to_raw_plan(&self, row: &RawRow) -> ImportResult<RawPlanRecord> {
        Ok(RawPlanRecord {
            category: self.get_string(row, &columns::CATEGORY),
            period_label: self.strict_month(row)?,
            target_coverage_weeks: self.strict_decimal(row, &columns::TARGET, "target_coverage_weeks")?,
            markdown_high_pct: self.strict_decimal(row, &columns::HIGH, "markdown_high_pct")?,
            markdown_medium_pct: self.strict_decimal(row, &columns::MEDIUM, "markdown_medium_pct")?,
            markdown_low_pct: self.strict_decimal(row, &columns::LOW, "markdown_low_pct")?,
            reduction_runs_per_period: self.strict_integer(row, &columns::RUNS, "reduction_runs_per_period")?,
            row_number: row.row_number,
        })
    }
}
