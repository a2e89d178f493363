// ==========================================
// 加热炉周期核验系统 - 遥测数据加载器实现
// ==========================================
// 流程: 文件解析 → 列识别 → 逐行清洗（时间无法解析的行丢弃并计数）
// 并发: 多个传感器文件在阻塞线程池上并发解析，单个文件失败不影响其他文件
// ==========================================

use crate::domain::{ProductionCharge, SensorRow, SensorSource};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper, ProductionColumnHints, SensorColumnHints};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{ProductionLoad, SensorLoad, TelemetryImporter};
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// 加载选项
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// 传感器表表头行（从 0 开始）
    pub sensor_header_row: usize,
    /// 生产实绩表表头行（从 0 开始）
    pub production_header_row: usize,
    pub sensor_columns: SensorColumnHints,
    pub production_columns: ProductionColumnHints,
}

// ==========================================
// TelemetryImporterImpl
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TelemetryImporterImpl {
    options: ImportOptions,
}

impl TelemetryImporterImpl {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// 加载单个传感器文件（同步）
    ///
    /// # 返回
    /// - 数据源标签为文件名，多机组模式下从中提取机组号
    pub fn load_sensor_file(&self, file_path: &Path) -> ImportResult<SensorSource> {
        let label = source_label(file_path);
        let table = UniversalFileParser.parse(file_path, self.options.sensor_header_row)?;
        let columns = FieldMapper::sensor_columns(&table.headers, &self.options.sensor_columns)?;

        debug!(
            file = %label,
            time = %columns.time,
            temperature = %columns.temperature,
            gas = %columns.gas,
            "传感器列识别完成"
        );

        let total = table.records.len();
        let rows: Vec<SensorRow> = table
            .records
            .iter()
            .filter_map(|record| {
                let timestamp = DataCleaner::parse_timestamp(cell(record, &columns.time))?;
                // 数值缺失的行保留为 NaN，该行不属于任何温度带，会切断保温游程
                let temperature = DataCleaner::parse_number(cell(record, &columns.temperature))
                    .unwrap_or(f64::NAN);
                let meter_reading =
                    DataCleaner::parse_number(cell(record, &columns.gas)).unwrap_or(f64::NAN);
                Some(SensorRow {
                    timestamp,
                    temperature,
                    meter_reading,
                })
            })
            .collect();

        let dropped_rows = total - rows.len();
        if dropped_rows > 0 {
            warn!(file = %label, dropped = dropped_rows, "传感器数据存在时间无法解析的行，已丢弃");
        }

        Ok(SensorSource {
            label,
            rows,
            dropped_rows,
        })
    }

    /// 加载生产实绩文件（同步）
    pub fn load_production(&self, file_path: &Path) -> ImportResult<ProductionLoad> {
        let table = UniversalFileParser.parse(file_path, self.options.production_header_row)?;
        let columns =
            FieldMapper::production_columns(&table.headers, &self.options.production_columns)?;

        debug!(
            date = %columns.date,
            weight = %columns.weight,
            unit = ?columns.unit,
            "生产实绩列识别完成"
        );

        let total = table.records.len();
        let charges: Vec<ProductionCharge> = table
            .records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                let start = DataCleaner::parse_timestamp(cell(record, &columns.date))?;
                let weight_kg = DataCleaner::parse_weight(cell(record, &columns.weight))?;
                let unit_id = columns
                    .unit
                    .as_deref()
                    .map(|col| DataCleaner::clean_unit(cell(record, col)))
                    .unwrap_or_default();
                Some(ProductionCharge {
                    start,
                    weight_kg,
                    unit_id,
                    row_number: idx + 1,
                })
            })
            .collect();

        let dropped_rows = total - charges.len();
        if dropped_rows > 0 {
            warn!(dropped = dropped_rows, "生产实绩存在无法解析的行，已丢弃");
        }

        info!(charges = charges.len(), "生产实绩加载完成");

        Ok(ProductionLoad {
            charges,
            dropped_rows,
        })
    }
}

#[async_trait]
impl TelemetryImporter for TelemetryImporterImpl {
    async fn load_sensor_files(&self, file_paths: Vec<PathBuf>) -> ImportResult<SensorLoad> {
        info!(count = file_paths.len(), "开始批量加载传感器文件");

        // 为每个文件创建阻塞解析任务
        let tasks = file_paths.into_iter().map(|path| {
            let importer = self.clone();
            let path_str = path.display().to_string();
            async move {
                let joined =
                    tokio::task::spawn_blocking(move || importer.load_sensor_file(&path)).await;
                match joined {
                    Ok(Ok(source)) => {
                        info!(file = %path_str, rows = source.rows.len(), "传感器文件加载成功");
                        Ok(source)
                    }
                    Ok(Err(e)) => {
                        error!(file = %path_str, error = %e, "传感器文件加载失败");
                        Err((path_str, e.to_string()))
                    }
                    Err(e) => {
                        error!(file = %path_str, error = %e, "传感器加载任务异常终止");
                        Err((path_str, format!("加载任务异常终止: {}", e)))
                    }
                }
            }
        });

        // 并发执行，结果保持输入顺序
        let results = join_all(tasks).await;

        let mut load = SensorLoad::default();
        for result in results {
            match result {
                Ok(source) => load.sources.push(source),
                Err(failure) => load.failures.push(failure),
            }
        }

        info!(
            success = load.sources.len(),
            failed = load.failures.len(),
            "批量加载完成"
        );

        Ok(load)
    }

    async fn load_production_file(&self, file_path: PathBuf) -> ImportResult<ProductionLoad> {
        let importer = self.clone();
        tokio::task::spawn_blocking(move || importer.load_production(&file_path))
            .await
            .map_err(|e| ImportError::InternalError(format!("加载任务异常终止: {}", e)))?
    }
}

fn cell<'a>(record: &'a std::collections::HashMap<String, String>, column: &str) -> &'a str {
    record.get(column).map(String::as_str).unwrap_or("")
}

fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CycleCriteria;
    use crate::domain::SensorSeries;
    use crate::engine::{CycleDetector, CycleRejection, Detection};
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    fn write_csv(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_load_sensor_file_drops_bad_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "가열로5호기.csv",
            &[
                "일시,온도,가스지침",
                "2025-03-10 00:00,580,1000",
                "점검중,,",
                "2025-03-10 02:00,abc,1010",
                "2025-03-10 03:00,900,1020",
            ],
        );

        let source = TelemetryImporterImpl::default().load_sensor_file(&path).unwrap();

        assert_eq!(source.label, "가열로5호기.csv");
        assert_eq!(source.rows.len(), 3);
        assert_eq!(source.dropped_rows, 1);
        assert!(source.rows[1].temperature.is_nan());
        assert_eq!(source.rows[1].meter_reading, 1010.0);
        assert_eq!(source.rows[2].temperature, 900.0);
    }

    #[test]
    fn test_blank_temperature_splits_holding_run() {
        let dir = TempDir::new().unwrap();
        let mut lines = vec!["일시,온도,가스지침".to_string(), "2025-03-10 00:00,580,1000".to_string()];
        for hour in 1..=12u32 {
            let temperature = if hour == 6 { String::new() } else { "1250".to_string() };
            lines.push(format!("2025-03-10 {:02}:00,{},{}", hour, temperature, 1000 + hour * 10));
        }
        lines.push("2025-03-10 13:00,850,1130".to_string());
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let path = write_csv(&dir, "sensor.csv", &lines);

        let source = TelemetryImporterImpl::default().load_sensor_file(&path).unwrap();
        assert_eq!(source.dropped_rows, 0);
        assert_eq!(source.rows.len(), 14);

        // 保温被空白行切成 4h + 5h 两段，均不足 10h
        let series = SensorSeries::from_readings(
            "U1",
            source.rows.into_iter().map(|row| row.with_unit("U1")),
        );
        let detection = CycleDetector::new(CycleCriteria::default())
            .detect(series.readings())
            .unwrap();
        assert_eq!(
            detection,
            Detection::Rejected(CycleRejection::NoValidHoldingInterval)
        );
    }

    #[test]
    fn test_load_production_with_thousands_separator() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "일자,장입량,호기").unwrap();
        writeln!(file, "2025-03-10,\"20,000\",f5").unwrap();
        writeln!(file, "날짜없음,1000,F5").unwrap();

        let load = TelemetryImporterImpl::default()
            .load_production(file.path())
            .unwrap();

        assert_eq!(load.charges.len(), 1);
        assert_eq!(load.dropped_rows, 1);
        assert_eq!(load.charges[0].weight_kg, 20000.0);
        assert_eq!(load.charges[0].unit_id, "F5");
        assert_eq!(load.charges[0].row_number, 1);
    }

    #[test]
    fn test_load_with_header_row_and_explicit_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "sensor.csv",
            &["운전 기록", "ts,t1,meter", "2025-03-10 00:00,580,1000"],
        );
        let options = ImportOptions {
            sensor_header_row: 1,
            sensor_columns: SensorColumnHints {
                time: Some("ts".to_string()),
                temperature: Some("t1".to_string()),
                gas: Some("meter".to_string()),
            },
            ..Default::default()
        };

        let source = TelemetryImporterImpl::new(options).load_sensor_file(&path).unwrap();
        assert_eq!(source.rows.len(), 1);
        assert_eq!(source.rows[0].meter_reading, 1000.0);
    }

    #[tokio::test]
    async fn test_batch_load_reports_failed_file() {
        let dir = TempDir::new().unwrap();
        let good = write_csv(&dir, "F1.csv", &["time,temp,gas", "2025-03-10 00:00,580,1000"]);
        let missing = dir.path().join("F2.csv");

        let load = TelemetryImporterImpl::default()
            .load_sensor_files(vec![good, missing])
            .await
            .unwrap();

        assert_eq!(load.sources.len(), 1);
        assert_eq!(load.failures.len(), 1);
        assert!(load.failures[0].0.ends_with("F2.csv"));
    }
}
