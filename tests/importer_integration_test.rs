// ==========================================
// DataImporter 集成测试
// ==========================================
// 测试目标: 验证 CSV → 类型化记录 的完整导入流程（含配置库）
// ==========================================

mod test_helpers;

use merchify::config::{config_keys, ConfigManager};
use merchify::domain::{DqLevel, PeriodMonth};
use merchify::importer::{DataImporter, DataImporterImpl, ImportError};
use merchify::logging;
use test_helpers::{create_test_db, insert_test_config, write_csv, ACTUALS_CSV, PLAN_CSV};

fn create_test_importer(db_path: &str) -> DataImporterImpl<ConfigManager> {
    let config = ConfigManager::new(db_path).expect("Failed to create ConfigManager");
    DataImporterImpl::with_default_components(config)
}

#[tokio::test]
async fn test_import_actuals_csv_basic() {
    logging::init_test();
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = write_csv(ACTUALS_CSV);
    let outcome = importer.import_actuals(file.path()).await.unwrap();

    assert_eq!(outcome.records.len(), 5);
    assert_eq!(outcome.summary.total_rows, 5);
    assert_eq!(outcome.summary.blocked, 0);

    let first = &outcome.records[0];
    assert_eq!(first.item_id, "A-100");
    assert_eq!(first.period_label, Some(PeriodMonth::March));
    assert_eq!(first.coverage_weeks, Some(22.0));
    assert_eq!(first.price, Some(19.99));
    assert_eq!(first.row_number, 2);

    // 商品组已 TRIM
    assert_eq!(outcome.records[2].category, "Hosen");
    assert_eq!(outcome.records[2].coverage_weeks, Some(30.5));
}

#[tokio::test]
async fn test_import_actuals_month_column_and_invalid_numbers() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = write_csv(
        "SKU,WG,Monat,Reichweite (Wochen)\n\
         X1,Shirts,Mai,viel\n\
         X2,,Mai,4\n\
         X3,Shirts,,4\n",
    );
    let outcome = importer.import_actuals(file.path()).await.unwrap();

    // X2 缺少商品组被阻断；X3 无月份保留
    let ids: Vec<&str> = outcome.records.iter().map(|r| r.item_id.as_str()).collect();
    assert_eq!(ids, vec!["X1", "X3"]);
    assert_eq!(outcome.records[0].period_label, Some(PeriodMonth::May));
    assert_eq!(outcome.records[0].coverage_weeks, None);
    assert_eq!(outcome.records[1].period_label, None);

    assert_eq!(outcome.summary.blocked, 1);
    assert!(outcome
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Warning && v.field == "coverage_weeks" && v.row_number == 2));
}

#[tokio::test]
async fn test_import_actuals_missing_column() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = write_csv("Artikel,Warengruppe,Datum\nA1,Shirts,2025-03-01\n");
    let err = importer.import_actuals(file.path()).await.unwrap_err();

    match err {
        ImportError::MissingColumn { column, .. } => assert_eq!(column, "Reichweite"),
        other => panic!("Expected MissingColumn, got {:?}", other),
    }
}

#[tokio::test]
async fn test_import_plan_targets_basic() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = write_csv(PLAN_CSV);
    let outcome = importer.import_plan_targets(file.path()).await.unwrap();

    assert_eq!(outcome.records.len(), 3);
    let shirts = &outcome.records[0];
    assert_eq!(shirts.category, "Shirts");
    assert_eq!(shirts.period_label, PeriodMonth::March);
    assert_eq!(shirts.target_coverage_weeks, 14.0);
    assert_eq!(shirts.markdown_medium_pct, 20.0);
    assert_eq!(shirts.reduction_runs_per_period, Some(2));
}

#[tokio::test]
async fn test_import_plan_missing_value_rejects_whole_table() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = write_csv(
        "Warengruppe,Monat,Ziel-Reichweite,Abschrift hoch,Abschrift mittel,Abschrift niedrig\n\
         Shirts,März,14,30,20,10\n\
         Hosen,März,12,40,,10\n",
    );
    let err = importer.import_plan_targets(file.path()).await.unwrap_err();

    match err {
        ImportError::MissingInput { row, field } => {
            assert_eq!(row, 3);
            assert_eq!(field, "markdown_medium_pct");
        }
        other => panic!("Expected MissingInput, got {:?}", other),
    }
}

#[tokio::test]
async fn test_import_plan_negative_pct_rejected() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = write_csv(
        "Warengruppe,Monat,Ziel-Reichweite,Abschrift hoch,Abschrift mittel,Abschrift niedrig\n\
         Shirts,März,14,30,-20,10\n",
    );
    let err = importer.import_plan_targets(file.path()).await.unwrap_err();
    assert!(matches!(err, ImportError::ValueRangeError { .. }));
    assert!(err.is_structural());
}

#[tokio::test]
async fn test_duplicate_policy_from_config() {
    let (_db, db_path) = create_test_db().unwrap();
    let duplicated = "Warengruppe,Monat,Ziel-Reichweite,Abschrift hoch,Abschrift mittel,Abschrift niedrig\n\
                      Shirts,März,14,30,20,10\n\
                      Shirts,3,12,25,15,5\n";

    // 默认 REJECT
    let file = write_csv(duplicated);
    let err = create_test_importer(&db_path)
        .import_plan_targets(file.path())
        .await
        .unwrap_err();
    match err {
        ImportError::JoinAmbiguity { rows, .. } => assert_eq!(rows, vec![2, 3]),
        other => panic!("Expected JoinAmbiguity, got {:?}", other),
    }

    // 切换为 FIRST_MATCH
    insert_test_config(&db_path, &[(config_keys::PLAN_DUPLICATE_POLICY, "FIRST_MATCH")]).unwrap();
    let outcome = create_test_importer(&db_path)
        .import_plan_targets(file.path())
        .await
        .unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].target_coverage_weeks, 14.0);
    assert_eq!(outcome.batch.conflict_rows, 1);
}

#[tokio::test]
async fn test_batch_import_keeps_file_order() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let first = write_csv("Artikel,Warengruppe,Monat,Reichweite\nA1,Shirts,März,10\n");
    let second = write_csv("Artikel,Warengruppe,Monat,Reichweite\nB1,Hosen,April,12\nB2,Hosen,April,3\n");

    let results = importer
        .batch_import_actuals(vec![
            first.path().to_path_buf(),
            std::path::PathBuf::from("gibt_es_nicht.csv"),
            second.path().to_path_buf(),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().records[0].item_id, "A1");
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().records.len(), 2);
}

#[tokio::test]
async fn test_unsupported_format() {
    let (_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let err = importer.import_actuals(file.path()).await.unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
