// ==========================================
// 加热炉周期核验系统 - 引擎层
// ==========================================
// 职责: 周期识别、装炉匹配、单耗计算、机组解析、汇总
// 红线: 引擎不读文件，所有阈值经配置结构体显式传入
// 红线: 未识别到周期是业务结果（附原因），不是错误
// ==========================================

pub mod aggregator;
pub mod charge_matcher;
pub mod cycle_detector;
pub mod error;
pub mod holding;
pub mod orchestrator;
pub mod unit_economics;
pub mod unit_resolver;

// 重导出核心引擎
pub use aggregator::ReportingAggregator;
pub use charge_matcher::{
    ChargeMatcher, DegenerateReason, MatchOutcome, MatchPolicy, MatchRejection,
    SEARCH_HORIZON_HOURS,
};
pub use cycle_detector::{CycleDetector, CycleRejection, Detection};
pub use error::{AnalysisError, AnalysisResult};
pub use holding::{FlagRun, HoldingInterval};
pub use orchestrator::{AnalysisInput, AnalysisOrchestrator, AnalysisReport, ChargeDiagnostic};
pub use unit_economics::UnitEconomicsCalculator;
pub use unit_resolver::{FurnaceIdentityResolver, UnitResolution, DEFAULT_UNIT_ID};
