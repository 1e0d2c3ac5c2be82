// ==========================================
// 名册导入集成测试
// ==========================================
// 测试目标: CSV → 映射/校验 → 落库 → 汇总
// ==========================================

mod test_helpers;

use project_staffing::importer::{ImportError, RosterImporter};
use test_helpers::{create_test_state, fixture};

#[tokio::test]
async fn test_import_consultants_全部成功() {
    let (_tmp, state) = create_test_state();

    let summary = state
        .importer
        .import_consultants(fixture("consultants.csv"))
        .await
        .unwrap();

    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.skipped, 0);
    assert!(summary.is_clean());
    assert_eq!(state.consultant_api.get(1).unwrap().name, "Ada Lovelace");
}

#[tokio::test]
async fn test_import_consultants_行级错误不中断() {
    let (_tmp, state) = create_test_state();
    state
        .importer
        .import_consultants(fixture("consultants.csv"))
        .await
        .unwrap();

    let summary = state
        .importer
        .import_consultants(fixture("consultants_with_errors.csv"))
        .await
        .unwrap();

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 3);
    let rows: Vec<usize> = summary.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![3, 4, 5]);

    // 重复编号不覆盖已有数据
    assert_eq!(state.consultant_api.get(2).unwrap().name, "Bo Berg");
    assert_eq!(state.consultant_api.get(12).unwrap().name, "Fia Holm");
    assert_eq!(state.consultant_api.list().unwrap().len(), 5);
}

#[tokio::test]
async fn test_import_projects() {
    let (_tmp, state) = create_test_state();

    let summary = state
        .importer
        .import_projects(fixture("projects.csv"))
        .await
        .unwrap();

    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.errors.len(), 2);
    assert!(state.project_api.get(10).unwrap().is_active());
    assert!(!state.project_api.get(20).unwrap().is_active());
    assert!(state.project_api.get(30).unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_batch_import_部分文件失败() {
    let (_tmp, state) = create_test_state();

    let results = state
        .importer
        .batch_import(vec![
            fixture("consultants.csv"),
            fixture("missing.csv"),
            fixture("consultants_with_errors.csv"),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    let third = results[2].as_ref().unwrap();
    assert_ne!(third.batch_id, results[0].as_ref().unwrap().batch_id);
}

#[tokio::test]
async fn test_import_格式不支持() {
    let (_tmp, state) = create_test_state();
    let result = state
        .importer
        .import_consultants(fixture("consultants.xlsx"))
        .await;
    // 文件不存在时先报告不存在
    assert!(matches!(result, Err(ImportError::FileNotFound { .. })));

    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let result = state.importer.import_consultants(file.path()).await;
    assert!(matches!(result, Err(ImportError::UnsupportedFormat { .. })));
}
