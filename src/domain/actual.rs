// ==========================================
// Merchify 降价建议 - IST 数据领域模型
// ==========================================
// 用途: 导入层写入，引擎层只读
// 生命周期: 单次分析请求内，不落库
// ==========================================

use crate::domain::types::PeriodMonth;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ActualRecord - 单品单期 IST 数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualRecord {
    // ===== 主键 =====
    pub item_id: String,  // 商品编号（Artikel / SKU）
    pub category: String, // 商品组（Warengruppe），已 TRIM

    // ===== 期间 =====
    pub period_date: Option<NaiveDate>,     // 源数据日期
    pub period_label: Option<PeriodMonth>,  // 月份标签（由日期派生或取自 Monat 列）

    // ===== 降价规则输入 =====
    pub coverage_weeks: Option<f64>, // Reichweite（周），非法值为 None

    // ===== 报表字段（不参与降价规则）=====
    pub price: Option<f64>,         // 售价
    pub sales_qty: Option<f64>,     // 销量（Absatz）
    pub inventory_qty: Option<f64>, // 库存（Lagerbestand）

    // ===== 元信息 =====
    pub row_number: usize, // 源文件行号（表头为第 1 行）
}

impl ActualRecord {
    /// 构造最小 IST 记录（其余字段为空）
    pub fn new(
        item_id: impl Into<String>,
        category: impl Into<String>,
        period_label: Option<PeriodMonth>,
        coverage_weeks: Option<f64>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            category: category.into(),
            period_date: None,
            period_label,
            coverage_weeks,
            price: None,
            sales_qty: None,
            inventory_qty: None,
            row_number: 0,
        }
    }

    /// 设置日期并同步派生月份标签
    pub fn with_period_date(mut self, date: NaiveDate) -> Self {
        self.period_date = Some(date);
        self.period_label = Some(PeriodMonth::from_date(date));
        self
    }
}

// ==========================================
// RawActualRecord - 导入中间结构体
// ==========================================
// 用途: 字段映射后、校验前的中间产物
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawActualRecord {
    pub item_id: Option<String>,
    pub category: Option<String>,
    pub period_date: Option<NaiveDate>,
    pub period_label: Option<PeriodMonth>,
    pub coverage_weeks: Option<f64>,
    pub price: Option<f64>,
    pub sales_qty: Option<f64>,
    pub inventory_qty: Option<f64>,

    // 元信息
    pub row_number: usize,
}

impl RawActualRecord {
    /// 必填字段齐全时转换为 ActualRecord
    pub fn into_actual(self) -> Option<ActualRecord> {
        let item_id = self.item_id?;
        let category = self.category?;

        // 日期优先于显式月份列
        let period_label = self
            .period_date
            .map(PeriodMonth::from_date)
            .or(self.period_label);

        Some(ActualRecord {
            item_id,
            category,
            period_date: self.period_date,
            period_label,
            coverage_weeks: self.coverage_weeks,
            price: self.price,
            sales_qty: self.sales_qty,
            inventory_qty: self.inventory_qty,
            row_number: self.row_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_actual_derives_label_from_date() {
        let raw = RawActualRecord {
            item_id: Some("A1".to_string()),
            category: Some("Shirts".to_string()),
            period_date: NaiveDate::from_ymd_opt(2025, 3, 5),
            period_label: Some(PeriodMonth::June),
            coverage_weeks: Some(12.0),
            row_number: 2,
            ..Default::default()
        };

        let actual = raw.into_actual().unwrap();
        assert_eq!(actual.period_label, Some(PeriodMonth::March));
        assert_eq!(actual.row_number, 2);
    }

    #[test]
    fn test_into_actual_requires_keys() {
        let raw = RawActualRecord {
            item_id: None,
            category: Some("Shirts".to_string()),
            ..Default::default()
        };
        assert!(raw.into_actual().is_none());
    }
}
