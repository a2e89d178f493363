// ==========================================
// 文件导入 + 分析 端到端集成测试
// ==========================================
// 测试目标: CSV 文件 → 列自动识别 → 清洗 → 分析 → CSV 导出
// ==========================================

use furnace_cycle::api::{AnalysisApi, ApiError, ResultWriter};
use furnace_cycle::config::AnalysisConfig;
use furnace_cycle::domain::{AnalysisMode, PassFail};
use furnace_cycle::importer::{ImportError, ImportOptions, ProductionColumnHints};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

/// 标准周期传感器 CSV（每小时一行，08:00 开始）
fn sensor_lines(day: &str, gas: f64) -> Vec<String> {
    let mut lines = vec!["일시,로내온도,가스지침".to_string()];
    for hour in 0..=14u32 {
        let temperature = match hour {
            0 => 580.0,
            1 => 900.0,
            14 => 850.0,
            _ => 1250.0,
        };
        let meter = 1000.0 + gas * hour as f64 / 14.0;
        lines.push(format!("{} {:02}:00,{},{}", day, hour + 8, temperature, meter));
    }
    lines
}

#[tokio::test]
async fn test_single_unit_csv_end_to_end() {
    let dir = TempDir::new().unwrap();
    let production = write_file(
        dir.path(),
        "production.csv",
        &[
            "생산실적".to_string(),
            "일자,장입량".to_string(),
            "2025-03-10,\"20,000\"".to_string(),
            "합계,\"20,000\"".to_string(),
        ],
    );
    let mut sensor = sensor_lines("2025-03-10", 500.0);
    // 重复时间戳，保留后一行
    sensor.push("2025-03-10 22:00,850,1500".to_string());
    sensor.push("점검,,".to_string());
    let sensor = write_file(dir.path(), "furnace.csv", &sensor);

    let options = ImportOptions {
        production_header_row: 1,
        ..ImportOptions::default()
    };
    let api = AnalysisApi::new(AnalysisConfig::default(), options).unwrap();
    let response = api.analyze_files(production, vec![sensor]).await.unwrap();

    assert_eq!(response.dropped_production_rows, 1);
    assert_eq!(response.dropped_sensor_rows, 1);
    assert!(response.failed_files.is_empty());

    let report = &response.report;
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].specific_consumption_rounded(), 25.00);
    assert_eq!(report.results[0].pass_fail, PassFail::Pass);
    assert_eq!(report.sensor_table().count(), 15);

    // 导出 CSV
    let output = dir.path().join("result.csv");
    ResultWriter::write_csv_file(&report.results, &output).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().nth(1).unwrap().contains(",25.0,Pass,"));
}

#[tokio::test]
async fn test_multi_unit_files_with_one_unreadable() {
    let dir = TempDir::new().unwrap();
    let production = write_file(
        dir.path(),
        "production.csv",
        &[
            "date,weight,furnace".to_string(),
            "2025-03-10 08:00,20000,가열로1호기".to_string(),
            "2025-03-10 08:00,20000,가열로2호기".to_string(),
        ],
    );
    let f1 = write_file(dir.path(), "가열로1호기.csv", &sensor_lines("2025-03-10", 500.0));
    let f2 = dir.path().join("가열로2호기.xlsx");

    let config = AnalysisConfig {
        mode: AnalysisMode::MultiUnit,
        ..AnalysisConfig::default()
    };
    let api = AnalysisApi::new(config, ImportOptions::default()).unwrap();
    let response = api.analyze_files(production, vec![f1, f2]).await.unwrap();

    assert_eq!(response.failed_files.len(), 1);
    assert_eq!(response.report.results.len(), 1);
    assert_eq!(response.report.results[0].unit_id, "가열로1호기");
    assert_eq!(response.report.diagnostics.len(), 1);
}

#[tokio::test]
async fn test_missing_explicit_column_is_import_error() {
    let dir = TempDir::new().unwrap();
    let production = write_file(
        dir.path(),
        "production.csv",
        &["일자,장입량".to_string(), "2025-03-10,20000".to_string()],
    );
    let sensor = write_file(dir.path(), "furnace.csv", &sensor_lines("2025-03-10", 500.0));

    let options = ImportOptions {
        production_columns: ProductionColumnHints {
            weight: Some("중량".to_string()),
            ..ProductionColumnHints::default()
        },
        ..ImportOptions::default()
    };
    let api = AnalysisApi::new(AnalysisConfig::default(), options).unwrap();
    let result = api.analyze_files(production, vec![sensor]).await;

    assert!(matches!(
        result,
        Err(ApiError::Import(ImportError::ColumnNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_cp949_sensor_export_with_blank_cells() {
    let dir = TempDir::new().unwrap();
    let production = write_file(
        dir.path(),
        "production.csv",
        &["일자,장입량".to_string(), "2025-03-10,20000".to_string()],
    );

    // 保温段中间一行温度空白：保温被切断，周期不成立
    let mut lines = sensor_lines("2025-03-10", 500.0);
    lines[7] = "2025-03-10 14:00,,1214".to_string();
    let mut text = lines.join("\r\n");
    text.push_str("\r\n");
    let (encoded, _, _) = encoding_rs::EUC_KR.encode(&text);
    let sensor = dir.path().join("furnace.csv");
    std::fs::write(&sensor, &encoded).unwrap();

    let api = AnalysisApi::new(AnalysisConfig::default(), ImportOptions::default()).unwrap();
    let response = api.analyze_files(production, vec![sensor]).await.unwrap();

    assert!(response.failed_files.is_empty());
    assert_eq!(response.dropped_sensor_rows, 0);
    assert_eq!(response.report.sensor_table().count(), 15);
    assert!(response.report.results.is_empty());
    assert_eq!(response.report.diagnostics.len(), 1);
}

#[test]
fn test_invalid_config_is_rejected_by_api() {
    let config = AnalysisConfig {
        match_tolerance_hours: 72.0,
        ..AnalysisConfig::default()
    };
    let result = AnalysisApi::new(config, ImportOptions::default());
    assert!(matches!(result, Err(ApiError::Config(_))));
}
