// ==========================================
// 加热炉周期核验系统 - API 层
// ==========================================
// 职责: 对外提供分析入口与结果导出，供命令行或外部界面调用
// ==========================================

pub mod analysis_api;
pub mod error;
pub mod result_writer;

// 重导出核心类型
pub use analysis_api::{AnalysisApi, AnalysisResponse};
pub use error::{ApiError, ApiResult};
pub use result_writer::ResultWriter;
