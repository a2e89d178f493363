// ==========================================
// 加热炉周期核验系统 - 分析配置
// ==========================================
// 职责: 周期判定边界条件、目标单耗、匹配容差、机组识别规则
// 红线: 所有阈值通过本结构体显式传递，引擎不读取任何全局状态
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::AnalysisMode;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// 单次分析允许的最大机组数（固定值）
pub const MAX_UNITS: usize = 20;

/// 匹配容差允许范围（小时）
pub const MIN_TOLERANCE_HOURS: f64 = 1.0;
pub const MAX_TOLERANCE_HOURS: f64 = 48.0;

// ==========================================
// CycleCriteria - 周期判定边界条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleCriteria {
    /// 开始温度上限 (°C)：温度 <= 该值视为装炉开始候选
    pub start_max_c: f64,
    /// 保温温度下限 (°C)
    pub hold_min_c: f64,
    /// 保温温度上限 (°C)
    pub hold_max_c: f64,
    /// 结束温度上限 (°C)：保温结束后温度 <= 该值视为周期结束
    pub end_max_c: f64,
    /// 最短保温时长 (小时)
    pub min_holding_hours: f64,
    /// 严格模式：要求装炉后出现升温爬坡，并拒绝周期中途异常低温
    pub strict_mode: bool,
}

impl Default for CycleCriteria {
    fn default() -> Self {
        Self {
            start_max_c: 600.0,
            hold_min_c: 1230.0,
            hold_max_c: 1270.0,
            end_max_c: 900.0,
            min_holding_hours: 10.0,
            strict_mode: false,
        }
    }
}

impl CycleCriteria {
    pub fn min_holding_duration(&self) -> Duration {
        hours_to_duration(self.min_holding_hours)
    }

    /// 保温判定（闭区间）
    pub fn is_holding(&self, temperature: f64) -> bool {
        self.hold_min_c <= temperature && temperature <= self.hold_max_c
    }
}

// ==========================================
// AnalysisConfig - 完整分析配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub criteria: CycleCriteria,
    /// 目标单耗 (Nm3/t)，None 表示不做达标判定
    pub target_specific_consumption: Option<f64>,
    /// 装炉时间与识别到的周期开始时间的允许偏差（小时，1~48）
    pub match_tolerance_hours: f64,
    /// 最大机组数（不超过 MAX_UNITS）
    pub max_units: usize,
    pub mode: AnalysisMode,
    /// 机组标签前缀（多机组模式，如 "가열로"）
    pub unit_label_prefix: String,
    /// 机组标签后缀（可选，如 "호기"）
    pub unit_label_suffix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            criteria: CycleCriteria::default(),
            target_specific_consumption: Some(25.53),
            match_tolerance_hours: 1.0,
            max_units: MAX_UNITS,
            mode: AnalysisMode::SingleUnit,
            unit_label_prefix: "가열로".to_string(),
            unit_label_suffix: "호기".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn match_tolerance(&self) -> Duration {
        hours_to_duration(self.match_tolerance_hours)
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> ConfigResult<()> {
        let c = &self.criteria;

        for (key, value) in [
            ("criteria.start_max_c", c.start_max_c),
            ("criteria.hold_min_c", c.hold_min_c),
            ("criteria.hold_max_c", c.hold_max_c),
            ("criteria.end_max_c", c.end_max_c),
        ] {
            if !value.is_finite() {
                return Err(invalid(key, format!("温度阈值必须为有限数值: {}", value)));
            }
        }

        if c.hold_min_c > c.hold_max_c {
            return Err(invalid(
                "criteria.hold_min_c",
                format!("保温下限 {} 大于保温上限 {}", c.hold_min_c, c.hold_max_c),
            ));
        }

        if !(c.min_holding_hours.is_finite() && c.min_holding_hours > 0.0) {
            return Err(invalid(
                "criteria.min_holding_hours",
                format!("最短保温时长必须大于 0: {}", c.min_holding_hours),
            ));
        }

        if !(MIN_TOLERANCE_HOURS..=MAX_TOLERANCE_HOURS).contains(&self.match_tolerance_hours) {
            return Err(invalid(
                "match_tolerance_hours",
                format!(
                    "匹配容差 {} 超出范围 [{}, {}]",
                    self.match_tolerance_hours, MIN_TOLERANCE_HOURS, MAX_TOLERANCE_HOURS
                ),
            ));
        }

        if self.max_units == 0 || self.max_units > MAX_UNITS {
            return Err(invalid(
                "max_units",
                format!("最大机组数 {} 超出范围 [1, {}]", self.max_units, MAX_UNITS),
            ));
        }

        if let Some(target) = self.target_specific_consumption {
            if !(target.is_finite() && target > 0.0) {
                return Err(invalid(
                    "target_specific_consumption",
                    format!("目标单耗必须大于 0: {}", target),
                ));
            }
        }

        if self.mode == AnalysisMode::MultiUnit && self.unit_label_prefix.trim().is_empty() {
            return Err(invalid("unit_label_prefix", "多机组模式下机组标签前缀不能为空".to_string()));
        }

        Ok(())
    }
}

/// 小时数（实数）转换为 chrono::Duration（毫秒精度）
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}
