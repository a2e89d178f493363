// ==========================================
// 加热炉周期核验系统 - 核心库
// ==========================================
// 职责: 热处理周期识别 + 装炉匹配 + 燃气单耗核验
// 技术栈: Rust + CSV/Excel 导入
// 系统定位: 决策支持系统 (核验结果由人工确认)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AnalysisMode, PassFail};

// 领域实体
pub use domain::{
    CycleCandidate, CycleResult, ProductionCharge, RunSummary, SensorReading, SensorSeries,
    SensorSource, UnitSummary,
};

// 配置
pub use config::{AnalysisConfig, ConfigManager, CycleCriteria};

// 引擎
pub use engine::{
    AnalysisInput, AnalysisOrchestrator, AnalysisReport, ChargeMatcher, CycleDetector,
    FurnaceIdentityResolver, ReportingAggregator, UnitEconomicsCalculator,
};

// API
pub use api::{AnalysisApi, ResultWriter};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const SYSTEM_NAME: &str = "加热炉周期核验系统";
