// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的配置库初始化、测试文件生成等功能
// ==========================================
#![allow(dead_code)]

use merchify::config::ConfigManager;
use merchify::domain::{ActualRecord, PeriodMonth, PlanTarget};
use std::error::Error;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// 创建临时配置库（已建表）
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时路径非 UTF-8")?
        .to_string();

    // ConfigManager::new 负责建表
    ConfigManager::new(&db_path)?;

    Ok((temp_file, db_path))
}

/// 写入配置项
pub fn insert_test_config(db_path: &str, entries: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    let manager = ConfigManager::new(db_path)?;
    for (key, value) in entries {
        manager.set_config_value(key, value)?;
    }
    Ok(())
}

/// 写临时 CSV 文件（扩展名 .csv）
pub fn write_csv(content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时文件失败");
    file.write_all(content.as_bytes()).expect("写入临时文件失败");
    file.flush().expect("刷新临时文件失败");
    file
}

/// IST 示例（德文列名，分号分隔，德式小数）
pub const ACTUALS_CSV: &str = "\
Artikel;Warengruppe;Datum;Reichweite;Preis;Absatz;Lagerbestand
A-100;Shirts;14.03.2025;22;19,99;12;80
A-101;Shirts;20.03.2025;9;24,99;30;20
A-200; Hosen ;2025-03-02;30,5;49,90;5;120
A-201;Hosen;2025-04-11;3;39,90;40;10
A-300;Jacken;2025-03-15;18;89,00;2;60
";

/// 计划示例
pub const PLAN_CSV: &str = "\
Warengruppe,Monat,Ziel-Reichweite,Abschrift hoch,Abschrift mittel,Abschrift niedrig,Reduzierungsläufe
Shirts,März,14,30,20,10,2
Hosen,März,12,40,25,10,1
Hosen,April,10,40,25,10,1
";

pub fn actual(item: &str, category: &str, month: PeriodMonth, coverage: Option<f64>) -> ActualRecord {
    ActualRecord::new(item, category, Some(month), coverage)
}

pub fn plan(category: &str, month: PeriodMonth, target: f64) -> PlanTarget {
    PlanTarget::new(category, month, target, 30.0, 20.0, 10.0)
}
