// ==========================================
// 加热炉周期核验系统 - 领域类型定义
// ==========================================
// 红线: 达标判定为三值枚举，由单耗计算器一次性给出，下游不得重算
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 达标判定 (Pass / Fail)
// ==========================================
// 未启用目标单耗时为 NotApplicable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassFail {
    Pass,          // 单耗 <= 目标
    Fail,          // 单耗 > 目标
    NotApplicable, // 未设定目标
}

impl fmt::Display for PassFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassFail::Pass => write!(f, "Pass"),
            PassFail::Fail => write!(f, "Fail"),
            PassFail::NotApplicable => write!(f, "N/A"),
        }
    }
}

// ==========================================
// 分析模式 (Analysis Mode)
// ==========================================
// SingleUnit: 所有数据归属同一隐式机组，按日历日期匹配装炉记录
// MultiUnit: 从数据源标签提取机组号，按机组号 + 时间容差匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    SingleUnit,
    MultiUnit,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::SingleUnit => write!(f, "single_unit"),
            AnalysisMode::MultiUnit => write!(f, "multi_unit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_fail_display() {
        assert_eq!(PassFail::Pass.to_string(), "Pass");
        assert_eq!(PassFail::Fail.to_string(), "Fail");
        assert_eq!(PassFail::NotApplicable.to_string(), "N/A");
    }

    #[test]
    fn test_analysis_mode_serde() {
        let mode: AnalysisMode = serde_json::from_str("\"multi_unit\"").unwrap();
        assert_eq!(mode, AnalysisMode::MultiUnit);
        assert_eq!(AnalysisMode::default(), AnalysisMode::SingleUnit);
    }
}
