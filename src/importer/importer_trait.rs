// ==========================================
// 加热炉周期核验系统 - 导入 Trait
// ==========================================
// 职责: 定义文件解析与遥测数据加载接口（不包含实现）
// ==========================================

use crate::domain::{ProductionCharge, SensorSource};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 原始表（表头 + 行记录）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// 按原始顺序排列的表头（用于列自动识别）
    pub headers: Vec<String>,
    /// 行记录（列名 → 值），已跳过全空行
    pub records: Vec<HashMap<String, String>>,
}

/// 生产实绩加载结果
#[derive(Debug, Clone, Default)]
pub struct ProductionLoad {
    pub charges: Vec<ProductionCharge>,
    /// 日期或装炉量无法解析而丢弃的行数
    pub dropped_rows: usize,
}

/// 多个传感器文件的加载结果
#[derive(Debug, Clone, Default)]
pub struct SensorLoad {
    pub sources: Vec<SensorSource>,
    /// 加载失败的文件（文件路径, 错误信息）
    pub failures: Vec<(String, String)>,
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - header_row: 表头所在行（从 0 开始），之前的行全部丢弃
    fn parse_to_raw_table(&self, file_path: &Path, header_row: usize) -> ImportResult<RawTable>;
}

// ==========================================
// TelemetryImporter Trait
// ==========================================
// 用途: 加热炉传感器数据与生产实绩加载主接口
// 实现者: TelemetryImporterImpl
#[async_trait]
pub trait TelemetryImporter: Send + Sync {
    /// 批量加载传感器文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的加载是独立的，单个文件失败记入 failures，不影响其他文件
    async fn load_sensor_files(&self, file_paths: Vec<PathBuf>) -> ImportResult<SensorLoad>;

    /// 加载生产实绩文件
    async fn load_production_file(&self, file_path: PathBuf) -> ImportResult<ProductionLoad>;
}
