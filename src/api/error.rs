// ==========================================
// 加热炉周期核验系统 - API层错误类型
// ==========================================
// 职责: 汇总导入/配置/分析各层错误，对外提供统一错误类型
// ==========================================

use crate::config::ConfigError;
use crate::engine::AnalysisError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 下层错误
    // ==========================================
    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("分析中止: {0}")]
    Analysis(#[from] AnalysisError),

    // ==========================================
    // 输入与输出错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("结果导出失败: {0}")]
    ExportError(String),
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
