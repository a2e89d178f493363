// ==========================================
// 加热炉周期核验系统 - 分析 API
// ==========================================
// 职责: 加载文件 → 执行分析 → 返回报告与加载诊断
// 说明: 文件加载为异步并发，分析本身同步执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnalysisConfig, ConfigManager};
use crate::engine::{AnalysisInput, AnalysisOrchestrator, AnalysisReport};
use crate::importer::{ImportOptions, TelemetryImporter, TelemetryImporterImpl};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 文件分析的返回结果
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub report: AnalysisReport,
    /// 加载失败而被排除的传感器文件（文件路径, 错误信息）
    pub failed_files: Vec<(String, String)>,
    /// 各传感器文件丢弃的行数合计
    pub dropped_sensor_rows: usize,
    pub dropped_production_rows: usize,
}

// ==========================================
// AnalysisApi - 分析 API
// ==========================================
pub struct AnalysisApi {
    config: AnalysisConfig,
    importer: TelemetryImporterImpl,
}

impl AnalysisApi {
    /// 创建分析 API（配置在此处校验）
    pub fn new(config: AnalysisConfig, options: ImportOptions) -> ApiResult<Self> {
        config.validate()?;
        debug!(config = %ConfigManager::snapshot(&config)?, "分析配置");
        Ok(Self {
            config,
            importer: TelemetryImporterImpl::new(options),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 对已规范化的输入执行分析
    pub fn analyze(&self, input: AnalysisInput) -> ApiResult<AnalysisReport> {
        let orchestrator = AnalysisOrchestrator::new(self.config.clone());
        Ok(orchestrator.run(input)?)
    }

    /// 加载生产实绩与传感器文件后执行分析
    ///
    /// # 参数
    /// - production_file: 生产实绩文件
    /// - sensor_files: 传感器文件（至少一个）
    ///
    /// # 返回
    /// - 单个传感器文件加载失败时记入 failed_files，分析继续
    pub async fn analyze_files(
        &self,
        production_file: PathBuf,
        sensor_files: Vec<PathBuf>,
    ) -> ApiResult<AnalysisResponse> {
        if sensor_files.is_empty() {
            return Err(ApiError::InvalidInput("至少需要一个传感器文件".to_string()));
        }

        let (production, sensors) = futures::join!(
            self.importer.load_production_file(production_file),
            self.importer.load_sensor_files(sensor_files)
        );
        let production = production?;
        let sensors = sensors?;

        for (file, reason) in &sensors.failures {
            warn!(file = %file, reason = %reason, "传感器文件已排除");
        }

        let dropped_sensor_rows = sensors.sources.iter().map(|s| s.dropped_rows).sum();
        info!(
            charges = production.charges.len(),
            sources = sensors.sources.len(),
            dropped_sensor_rows,
            dropped_production_rows = production.dropped_rows,
            "文件加载完成"
        );

        let report = self.analyze(AnalysisInput {
            sensor_sources: sensors.sources,
            charges: production.charges,
        })?;

        Ok(AnalysisResponse {
            report,
            failed_files: sensors.failures,
            dropped_sensor_rows,
            dropped_production_rows: production.dropped_rows,
        })
    }
}
