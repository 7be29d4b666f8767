// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成 IST/计划 测试数据集 CSV 文件
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use chrono::{Duration, NaiveDate};
use csv::{Writer, WriterBuilder};
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// IST 表头（德文列名）
const IST_HEADER: &[&str] = &[
    "Artikel",
    "Warengruppe",
    "Datum",
    "Reichweite",
    "Preis",
    "Absatz",
    "Lagerbestand",
];

// 计划表头
const PLAN_HEADER: &[&str] = &[
    "Warengruppe",
    "Monat",
    "Ziel-Reichweite",
    "Abschrift hoch",
    "Abschrift mittel",
    "Abschrift niedrig",
    "Reduzierungsläufe",
];

const CATEGORIES: &[&str] = &["Shirts", "Hosen", "Jacken", "Kleider", "Schuhe"];

const MONTHS: &[&str] = &[
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];

// IST 记录
#[derive(Clone)]
struct ActualRow {
    item_id: String,
    category: String,
    date: String,
    coverage_weeks: String,
    price: String,
    sales_qty: String,
    inventory_qty: String,
}

impl ActualRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.item_id.clone(),
            self.category.clone(),
            self.date.clone(),
            self.coverage_weeks.clone(),
            self.price.clone(),
            self.sales_qty.clone(),
            self.inventory_qty.clone(),
        ]
    }
}

// 生成正常 IST 记录（德式小数逗号）
fn generate_actual_row(index: usize) -> ActualRow {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).expect("固定起始日期");
    let date = base + Duration::days((index * 7 % 365) as i64);

    ActualRow {
        item_id: format!("A-{:05}", index + 1),
        category: CATEGORIES[index % CATEGORIES.len()].to_string(),
        date: date.format("%d.%m.%Y").to_string(),
        coverage_weeks: format!("{},{}", 2 + (index % 30), index % 10),
        price: format!("{},99", 9 + (index % 90)),
        sales_qty: format!("{}", 1 + (index % 40)),
        inventory_qty: format!("{}", 10 + (index % 150)),
    }
}

fn plan_row(category: &str, month: &str, target: f64) -> Vec<String> {
    vec![
        category.to_string(),
        month.to_string(),
        format!("{}", target),
        "40".to_string(),
        "25".to_string(),
        "10".to_string(),
        "2".to_string(),
    ]
}

fn ist_writer(path: &str) -> Result<Writer<File>, Box<dyn Error>> {
    let file = File::create(path)?;
    Ok(WriterBuilder::new().delimiter(b';').from_writer(file))
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. 正常 IST (100条)
    generate_normal_actuals()?;

    // 2. 全年计划（每个 Warengruppe × Monat 一行）
    generate_full_plan()?;

    // 3. 大数据集 (5000条)
    generate_large_actuals()?;

    // 4. 计划重复键
    generate_plan_duplicates()?;

    // 5. 计划缺失必填值
    generate_plan_missing_values()?;

    // 6. IST 非法数值
    generate_invalid_actuals()?;

    // 7. 档位边界
    generate_boundary_cases()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_normal_actuals() -> Result<(), Box<dyn Error>> {
    let mut wtr = ist_writer(&format!("{}/01_ist_normal.csv", OUTPUT_DIR))?;
    wtr.write_record(IST_HEADER)?;

    for i in 0..100 {
        wtr.write_record(&generate_actual_row(i).to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_ist_normal.csv (100条)");
    Ok(())
}

fn generate_full_plan() -> Result<(), Box<dyn Error>> {
    let file = File::create(format!("{}/02_plan_full_year.csv", OUTPUT_DIR))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(PLAN_HEADER)?;

    for (c, category) in CATEGORIES.iter().enumerate() {
        for (m, month) in MONTHS.iter().enumerate() {
            let target = 8.0 + ((c + m) % 8) as f64;
            wtr.write_record(&plan_row(category, month, target))?;
        }
    }

    wtr.flush()?;
    println!(
        "✓ 生成 02_plan_full_year.csv ({}条)",
        CATEGORIES.len() * MONTHS.len()
    );
    Ok(())
}

fn generate_large_actuals() -> Result<(), Box<dyn Error>> {
    let mut wtr = ist_writer(&format!("{}/03_ist_large.csv", OUTPUT_DIR))?;
    wtr.write_record(IST_HEADER)?;

    for i in 0..5000 {
        let record = generate_actual_row(i + 10000); // 避免与其他数据集冲突
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 03_ist_large.csv (5000条)");
    Ok(())
}

fn generate_plan_duplicates() -> Result<(), Box<dyn Error>> {
    let file = File::create(format!("{}/04_plan_duplicates.csv", OUTPUT_DIR))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(PLAN_HEADER)?;

    wtr.write_record(&plan_row("Shirts", "März", 14.0))?;
    wtr.write_record(&plan_row("Hosen", "März", 12.0))?;
    // 同键不同目标值（仅 FIRST_MATCH 可导入）
    wtr.write_record(&plan_row("Shirts", "3", 16.0))?;
    wtr.write_record(&plan_row(" Hosen ", "Maerz", 10.0))?;

    wtr.flush()?;
    println!("✓ 生成 04_plan_duplicates.csv (4条，2组重复)");
    Ok(())
}

fn generate_plan_missing_values() -> Result<(), Box<dyn Error>> {
    let file = File::create(format!("{}/05_plan_missing_values.csv", OUTPUT_DIR))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(PLAN_HEADER)?;

    wtr.write_record(&plan_row("Shirts", "April", 14.0))?;
    // 缺失 Ziel-Reichweite
    wtr.write_record(&["Hosen", "April", "", "40", "25", "10", "1"])?;
    // 缺失 Abschrift niedrig
    wtr.write_record(&["Jacken", "April", "12", "40", "25", "", "1"])?;

    wtr.flush()?;
    println!("✓ 生成 05_plan_missing_values.csv (3条)");
    Ok(())
}

fn generate_invalid_actuals() -> Result<(), Box<dyn Error>> {
    let mut wtr = ist_writer(&format!("{}/06_ist_invalid_values.csv", OUTPUT_DIR))?;
    wtr.write_record(IST_HEADER)?;

    wtr.write_record(&generate_actual_row(0).to_row())?;

    // Reichweite 非数字
    let mut record = generate_actual_row(1);
    record.coverage_weeks = "viel".to_string();
    wtr.write_record(&record.to_row())?;

    // 缺失 Warengruppe（阻断）
    let mut record = generate_actual_row(2);
    record.category = "".to_string();
    wtr.write_record(&record.to_row())?;

    // 日期无法解析（无期间，告警）
    let mut record = generate_actual_row(3);
    record.date = "irgendwann".to_string();
    wtr.write_record(&record.to_row())?;

    // 异常 Reichweite（负数 / 超大）
    let mut record = generate_actual_row(4);
    record.coverage_weeks = "-3".to_string();
    wtr.write_record(&record.to_row())?;
    let mut record = generate_actual_row(5);
    record.coverage_weeks = "999".to_string();
    wtr.write_record(&record.to_row())?;

    wtr.flush()?;
    println!("✓ 生成 06_ist_invalid_values.csv (6条)");
    Ok(())
}

fn generate_boundary_cases() -> Result<(), Box<dyn Error>> {
    let mut wtr = ist_writer(&format!("{}/07_ist_boundaries.csv", OUTPUT_DIR))?;
    wtr.write_record(IST_HEADER)?;

    // 以目标 10 周为基准: delta = 0 / 4 / 4.01 / 8 / 8.01
    let coverages = ["10", "14", "14,01", "18", "18,01", ""];
    for (i, coverage) in coverages.iter().enumerate() {
        let record = ActualRow {
            item_id: format!("B-{:03}", i + 1),
            category: "Shirts".to_string(),
            date: "15.06.2025".to_string(),
            coverage_weeks: coverage.to_string(),
            price: "19,99".to_string(),
            sales_qty: "10".to_string(),
            inventory_qty: "50".to_string(),
        };
        wtr.write_record(&record.to_row())?;
    }

    let file = File::create(format!("{}/07_plan_boundaries.csv", OUTPUT_DIR))?;
    let mut plan = Writer::from_writer(file);
    plan.write_record(PLAN_HEADER)?;
    plan.write_record(&plan_row("Shirts", "Juni", 10.0))?;
    plan.flush()?;

    wtr.flush()?;
    println!("✓ 生成 07_ist_boundaries.csv / 07_plan_boundaries.csv");
    Ok(())
}
