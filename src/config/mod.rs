// ==========================================
// 加热炉周期核验系统 - 配置层
// ==========================================
// 职责: 分析参数定义、加载与校验
// 存储: JSON 文件（可选），缺省时使用内置默认值
// ==========================================

pub mod analysis_config;
pub mod config_manager;
pub mod error;

// 重导出核心配置类型
pub use analysis_config::{
    hours_to_duration, AnalysisConfig, CycleCriteria, MAX_TOLERANCE_HOURS, MAX_UNITS,
    MIN_TOLERANCE_HOURS,
};
pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
