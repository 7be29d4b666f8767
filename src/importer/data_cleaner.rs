// ==========================================
// Merchify 降价建议 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值与日期宽松解析
// 口径: 德式数字（1.234,5）与英式数字（1,234.5）均可识别
// ==========================================

use crate::domain::types::PeriodMonth;
use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// 表格序列日期的合理范围（约 1954 ~ 2119 年）
const SERIAL_DATE_MIN: f64 = 20_000.0;
const SERIAL_DATE_MAX: f64 = 80_000.0;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() || is_null_marker(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_decimal(&self, value: &str) -> Option<f64> {
        let compact = compact_number(value);
        if compact.is_empty() || is_null_marker(&compact) {
            return None;
        }

        let commas = compact.matches(',').count();
        let dots = compact.matches('.').count();

        let normalized = match (compact.rfind(','), compact.rfind('.')) {
            // 两种分隔符都有：最后出现者为小数点
            (Some(comma), Some(dot)) if comma > dot => {
                compact.replace('.', "").replace(',', ".")
            }
            (Some(_), Some(_)) => compact.replace(',', ""),
            // 同一分隔符出现多次且无另一种：千分位（12.345.678 / 1,234,567）
            (Some(_), None) if commas > 1 && is_grouped(&compact, ',') => compact.replace(',', ""),
            (None, Some(_)) if dots > 1 && is_grouped(&compact, '.') => compact.replace('.', ""),
            // 仅一个逗号：德式小数
            (Some(_), None) => compact.replace(',', "."),
            _ => compact,
        };

        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y%m%d", "%d/%m/%Y", "%Y/%m/%d"];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                return Some(date);
            }
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%d.%m.%Y %H:%M:%S",
            "%d.%m.%Y %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Some(dt.date());
            }
        }

        // 表格序列日期（1899-12-30 起算天数）
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|serial| (SERIAL_DATE_MIN..=SERIAL_DATE_MAX).contains(serial))
            .and_then(|serial| {
                NaiveDate::from_ymd_opt(1899, 12, 30)
                    .map(|epoch| epoch + Duration::days(serial.trunc() as i64))
            })
    }

    fn parse_month(&self, value: &str) -> Option<PeriodMonth> {
        PeriodMonth::parse_label(value).or_else(|| self.parse_date(value).map(PeriodMonth::from_date))
    }

    fn parse_integer(&self, value: &str) -> Option<i32> {
        let number = self.parse_decimal(value)?;
        (number.fract() == 0.0 && number.abs() <= i32::MAX as f64).then(|| number as i32)
    }
}

fn compact_number(value: &str) -> String {
    value
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect()
}

/// 首段 1~3 位，其余各段恰好 3 位
fn is_grouped(compact: &str, separator: char) -> bool {
    let mut groups = compact.trim_start_matches('-').split(separator);
    let head_ok = groups
        .next()
        .map(|head| (1..=3).contains(&head.len()) && head.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    head_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// 单个分隔符后恰好 3 位数字（1.234 / 1,234）：千分位还是小数无法区分
///
/// 解析口径固定为小数（1.234 → 1.234，1,234 → 1.234），调用方据此记 DQ 提示
pub fn is_ambiguous_grouping(value: &str) -> bool {
    let compact = compact_number(value);
    let separators: Vec<usize> = compact
        .char_indices()
        .filter(|(_, c)| *c == ',' || *c == '.')
        .map(|(i, _)| i)
        .collect();

    match separators.as_slice() {
        [pos] => {
            let (int_part, frac_part) = (&compact[..*pos], &compact[pos + 1..]);
            let int_digits = int_part.trim_start_matches('-');
            frac_part.len() == 3
                && frac_part.chars().all(|c| c.is_ascii_digit())
                && !int_digits.is_empty()
                && int_digits.chars().all(|c| c.is_ascii_digit())
                && int_digits != "0"
        }
        _ => false,
    }
}

/// 常见空值标记
fn is_null_marker(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "nan" | "null" | "none" | "n/a" | "na" | "-" | "#n/a" | "#nv"
    )
}
