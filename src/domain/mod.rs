// ==========================================
// 加热炉周期核验系统 - 领域模型层
// ==========================================
// 职责: 定义读数、装炉记录、周期结果等领域实体
// 红线: 不含文件读取逻辑，不含识别/匹配逻辑
// ==========================================

pub mod charge;
pub mod cycle;
pub mod reading;
pub mod types;

// 重导出核心类型
pub use charge::ProductionCharge;
pub use cycle::{round2, CycleCandidate, CycleResult, RunSummary, UnitSummary};
pub use reading::{SensorReading, SensorRow, SensorSeries, SensorSource};
pub use types::{AnalysisMode, PassFail};
