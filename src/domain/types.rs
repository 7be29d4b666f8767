// ==========================================
// Merchify 降价建议 - 领域类型定义
// ==========================================
// 职责: 月份标签、降价档位、DQ 级别、计划重复键策略
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 月份标签 (Period Label / Monat)
// ==========================================
// 连接键的一部分；显示为德文月份名
// 排序按自然月份顺序（Januar < Februar < ...）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl PeriodMonth {
    pub const ALL: [PeriodMonth; 12] = [
        PeriodMonth::January,
        PeriodMonth::February,
        PeriodMonth::March,
        PeriodMonth::April,
        PeriodMonth::May,
        PeriodMonth::June,
        PeriodMonth::July,
        PeriodMonth::August,
        PeriodMonth::September,
        PeriodMonth::October,
        PeriodMonth::November,
        PeriodMonth::December,
    ];

    /// 从月份数字（1-12）构造
    pub fn from_number(month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self::ALL[(month - 1) as usize])
        } else {
            None
        }
    }

    /// 从日期派生月份标签
    pub fn from_date(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        // month() 恒在 1..=12
        Self::ALL[date.month0() as usize]
    }

    /// 月份数字（1-12）
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// 德文月份名（显示/导出口径）
    pub fn german_name(&self) -> &'static str {
        match self {
            PeriodMonth::January => "Januar",
            PeriodMonth::February => "Februar",
            PeriodMonth::March => "März",
            PeriodMonth::April => "April",
            PeriodMonth::May => "Mai",
            PeriodMonth::June => "Juni",
            PeriodMonth::July => "Juli",
            PeriodMonth::August => "August",
            PeriodMonth::September => "September",
            PeriodMonth::October => "Oktober",
            PeriodMonth::November => "November",
            PeriodMonth::December => "Dezember",
        }
    }

    /// 英文月份名
    pub fn english_name(&self) -> &'static str {
        match self {
            PeriodMonth::January => "January",
            PeriodMonth::February => "February",
            PeriodMonth::March => "March",
            PeriodMonth::April => "April",
            PeriodMonth::May => "May",
            PeriodMonth::June => "June",
            PeriodMonth::July => "July",
            PeriodMonth::August => "August",
            PeriodMonth::September => "September",
            PeriodMonth::October => "October",
            PeriodMonth::November => "November",
            PeriodMonth::December => "December",
        }
    }

    /// 解析月份标签
    ///
    /// 支持:
    /// - 德文/英文全称（大小写不敏感，"Maerz" 与 "März" 等价）
    /// - 三字母缩写（Jan, Mär, Mrz, Okt, Dez, Oct, Dec ...）
    /// - 月份数字 1-12（允许前导 0）
    pub fn parse_label(value: &str) -> Option<Self> {
        let normalized = value.trim().trim_end_matches('.').to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        if let Ok(number) = normalized.parse::<u32>() {
            return Self::from_number(number);
        }

        let normalized = normalized.replace("ae", "ä");
        let month = match normalized.as_str() {
            "januar" | "january" | "jan" | "jänner" | "jän" => PeriodMonth::January,
            "februar" | "february" | "feb" => PeriodMonth::February,
            "märz" | "march" | "mär" | "mrz" | "mar" => PeriodMonth::March,
            "april" | "apr" => PeriodMonth::April,
            "mai" | "may" => PeriodMonth::May,
            "juni" | "june" | "jun" => PeriodMonth::June,
            "juli" | "july" | "jul" => PeriodMonth::July,
            "august" | "aug" => PeriodMonth::August,
            "september" | "sep" | "sept" => PeriodMonth::September,
            "oktober" | "october" | "okt" | "oct" => PeriodMonth::October,
            "november" | "nov" => PeriodMonth::November,
            "dezember" | "december" | "dez" | "dec" => PeriodMonth::December,
            _ => return None,
        };
        Some(month)
    }
}

impl fmt::Display for PeriodMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.german_name())
    }
}

impl FromStr for PeriodMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| format!("无法识别的月份标签: {}", s))
    }
}

// ==========================================
// 降价档位 (Markdown Tier)
// ==========================================
// 由 Reichweite 超出目标的幅度决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkdownTier {
    None,   // 不降价（delta <= 0）
    Low,    // 低档（0 < delta <= medium_above）
    Medium, // 中档（medium_above < delta <= high_above）
    High,   // 高档（delta > high_above）
}

impl fmt::Display for MarkdownTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkdownTier::None => write!(f, "NONE"),
            MarkdownTier::Low => write!(f, "LOW"),
            MarkdownTier::Medium => write!(f, "MEDIUM"),
            MarkdownTier::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// DQ 级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,    // 错误（阻断该行）
    Warning,  // 警告（允许导入）
    Info,     // 提示（仅记录）
    Conflict, // 冲突（重复键）
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Error => write!(f, "ERROR"),
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Info => write!(f, "INFO"),
            DqLevel::Conflict => write!(f, "CONFLICT"),
        }
    }
}

// ==========================================
// 计划表重复键策略
// ==========================================
// 同一 (Warengruppe, Monat) 出现多行计划时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicatePlanPolicy {
    Reject,     // 导入时拒绝整张计划表
    FirstMatch, // 保留首行，其余记为冲突
}

impl fmt::Display for DuplicatePlanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePlanPolicy::Reject => write!(f, "REJECT"),
            DuplicatePlanPolicy::FirstMatch => write!(f, "FIRST_MATCH"),
        }
    }
}

impl FromStr for DuplicatePlanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REJECT" => Ok(DuplicatePlanPolicy::Reject),
            "FIRST_MATCH" | "FIRST" => Ok(DuplicatePlanPolicy::FirstMatch),
            other => Err(format!("未知的重复键策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_label_german_and_english() {
        assert_eq!(PeriodMonth::parse_label("März"), Some(PeriodMonth::March));
        assert_eq!(PeriodMonth::parse_label("Maerz"), Some(PeriodMonth::March));
        assert_eq!(PeriodMonth::parse_label("  March "), Some(PeriodMonth::March));
        assert_eq!(PeriodMonth::parse_label("OKT"), Some(PeriodMonth::October));
        assert_eq!(PeriodMonth::parse_label("Dec."), Some(PeriodMonth::December));
    }

    #[test]
    fn test_parse_label_numbers() {
        assert_eq!(PeriodMonth::parse_label("3"), Some(PeriodMonth::March));
        assert_eq!(PeriodMonth::parse_label("03"), Some(PeriodMonth::March));
        assert_eq!(PeriodMonth::parse_label("12"), Some(PeriodMonth::December));
        assert_eq!(PeriodMonth::parse_label("13"), None);
        assert_eq!(PeriodMonth::parse_label("0"), None);
    }

    #[test]
    fn test_parse_label_invalid() {
        assert_eq!(PeriodMonth::parse_label(""), None);
        assert_eq!(PeriodMonth::parse_label("   "), None);
        assert_eq!(PeriodMonth::parse_label("Frühling"), None);
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(PeriodMonth::from_date(date), PeriodMonth::March);
        assert_eq!(PeriodMonth::from_date(date).number(), 3);
    }

    #[test]
    fn test_display_is_german() {
        assert_eq!(PeriodMonth::March.to_string(), "März");
        assert_eq!(PeriodMonth::October.to_string(), "Oktober");
    }

    #[test]
    fn test_month_ordering() {
        assert!(PeriodMonth::January < PeriodMonth::February);
        assert!(PeriodMonth::November < PeriodMonth::December);
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!(
            "reject".parse::<DuplicatePlanPolicy>(),
            Ok(DuplicatePlanPolicy::Reject)
        );
        assert_eq!(
            " FIRST_MATCH ".parse::<DuplicatePlanPolicy>(),
            Ok(DuplicatePlanPolicy::FirstMatch)
        );
        assert!("average".parse::<DuplicatePlanPolicy>().is_err());
    }
}
