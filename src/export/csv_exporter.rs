// ==========================================
// Merchify 降价建议 - CSV 导出
// ==========================================
// 口径: 德文列名；缺失值写空单元格（不写 0）；数值保留两位小数
// ==========================================

use crate::domain::recommendation::Recommendation;
use crate::export::ExportResult;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

/// 导出列（顺序固定）
pub const EXPORT_HEADERS: &[&str] = &[
    "Artikel",
    "Warengruppe",
    "Datum",
    "Monat",
    "Reichweite",
    "Preis",
    "Absatz",
    "Lagerbestand",
    "Ziel-Reichweite",
    "Abschrift hoch",
    "Abschrift mittel",
    "Abschrift niedrig",
    "Reduzierungsläufe",
    "Delta (Wochen)",
    "Abschriftstufe",
    "Empfohlene Abschrift (%)",
    "Begründung",
];

fn fmt_number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn to_row(rec: &Recommendation) -> Vec<String> {
    vec![
        rec.item_id.clone(),
        rec.category.clone(),
        rec.period_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        rec.period_label.map(|m| m.to_string()).unwrap_or_default(),
        fmt_number(rec.coverage_weeks),
        fmt_number(rec.price),
        fmt_number(rec.sales_qty),
        fmt_number(rec.inventory_qty),
        fmt_number(rec.target_coverage_weeks),
        fmt_number(rec.markdown_high_pct),
        fmt_number(rec.markdown_medium_pct),
        fmt_number(rec.markdown_low_pct),
        rec.reduction_runs_per_period
            .map(|runs| runs.to_string())
            .unwrap_or_default(),
        fmt_number(rec.delta_weeks),
        rec.markdown_tier.map(|t| t.to_string()).unwrap_or_default(),
        fmt_number(rec.recommended_markdown_pct),
        rec.reason.clone(),
    ]
}

// ==========================================
// CsvExporter
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// 指定分隔符（如德式 Excel 习惯的 ;）
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// 写出到任意 writer
    pub fn write<W: Write>(&self, recommendations: &[Recommendation], writer: W) -> ExportResult<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(EXPORT_HEADERS)?;
        for rec in recommendations {
            wtr.write_record(to_row(rec))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// 写出到文件（覆盖已有文件）
    #[instrument(skip(self, recommendations), fields(rows = recommendations.len()))]
    pub fn export_to_path(&self, recommendations: &[Recommendation], path: &Path) -> ExportResult<()> {
        let file = File::create(path)?;
        self.write(recommendations, file)?;
        info!(path = %path.display(), "建议结果已导出");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actual::ActualRecord;
    use crate::domain::plan::PlanTarget;
    use crate::domain::types::PeriodMonth;
    use crate::engine::MarkdownEngine;

    fn export(recs: &[Recommendation]) -> String {
        let mut buffer = Vec::new();
        CsvExporter::new().write(recs, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_and_matched_row() {
        let actuals = vec![ActualRecord::new("A1", "Shirts", Some(PeriodMonth::March), Some(22.0))];
        let targets = vec![PlanTarget::new("Shirts", PeriodMonth::March, 14.0, 30.0, 20.0, 10.0)];
        let recs = MarkdownEngine::new().evaluate(&actuals, &targets);

        let output = export(&recs);
        let mut lines = output.lines();
        assert_eq!(lines.next().unwrap(), EXPORT_HEADERS.join(","));

        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], "A1");
        assert_eq!(row[3], "März");
        assert_eq!(row[4], "22.00");
        assert_eq!(row[8], "14.00");
        assert_eq!(row[13], "8.00");
        assert_eq!(row[14], "MEDIUM");
        assert_eq!(row[15], "20.00");
    }

    #[test]
    fn test_unmatched_row_has_empty_cells() {
        let actuals = vec![ActualRecord::new("A2", "Hosen", Some(PeriodMonth::May), Some(9.0))];
        let recs = MarkdownEngine::new().evaluate(&actuals, &[]);

        let output = export(&recs);
        let row: Vec<&str> = output.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[8], "");
        assert_eq!(row[15], "");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let mut buffer = Vec::new();
        CsvExporter::with_delimiter(b';').write(&[], &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with("Artikel;Warengruppe;"));
    }
}
