// ==========================================
// 加热炉周期核验系统 - 装炉记录匹配器
// ==========================================
// 规则: 每条装炉记录独立截取搜索窗口并调用周期识别器
// 规则: 同一传感器周期可能同时满足多条装炉记录，不做去重
// 规则: 装炉量 <= 0 或燃气用量 <= 0 视为仪表/数据故障，静默剔除
// ==========================================

use crate::config::{hours_to_duration, CycleCriteria};
use crate::domain::{CycleCandidate, ProductionCharge, SensorSeries};
use crate::engine::cycle_detector::{CycleDetector, CycleRejection, Detection};
use crate::engine::error::{AnalysisError, AnalysisResult};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// 搜索窗口向后延伸的时长（小时）：单日周期可能跨越 24 小时
pub const SEARCH_HORIZON_HOURS: i64 = 48;

/// 匹配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// 多机组: 窗口 [开始 - 容差, 开始 + 48h)，并校验开始时间偏差 <= 容差
    Tolerance,
    /// 单机组: 装炉日期即匹配键，窗口 [日期 0 点 - 容差, 日期 0 点 + 48h)，不校验开始偏差
    CalendarDate,
}

/// 退化匹配原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DegenerateReason {
    NonPositiveWeight,
    NonPositiveGasDelta,
}

/// 装炉记录未产出结果的原因
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchRejection {
    /// 该机组在搜索窗口内没有任何读数
    NoSensorData,
    /// 周期识别失败
    Cycle { rejection: CycleRejection },
    /// 识别到周期但开始时间偏差超出容差
    ToleranceExceeded { offset_minutes: i64 },
    /// 装炉量或燃气用量非正
    DegenerateMatch { reason: DegenerateReason },
    /// 单机组模式下同一日期的后续装炉记录
    DuplicateChargeDate,
}

impl fmt::Display for MatchRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRejection::NoSensorData => write!(f, "搜索窗口内无传感器数据"),
            MatchRejection::Cycle { rejection } => write!(f, "{}", rejection),
            MatchRejection::ToleranceExceeded { offset_minutes } => {
                write!(f, "周期开始时间偏差 {} 分钟，超出匹配容差", offset_minutes)
            }
            MatchRejection::DegenerateMatch { reason } => match reason {
                DegenerateReason::NonPositiveWeight => write!(f, "装炉量非正"),
                DegenerateReason::NonPositiveGasDelta => write!(f, "燃气用量非正（表计倒走或停滞）"),
            },
            MatchRejection::DuplicateChargeDate => write!(f, "同日已有装炉记录参与分析"),
        }
    }
}

/// 单条装炉记录的匹配结果
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Accepted(CycleCandidate),
    Rejected(MatchRejection),
}

// ==========================================
// ChargeMatcher - 装炉记录匹配器
// ==========================================
#[derive(Debug, Clone)]
pub struct ChargeMatcher {
    detector: CycleDetector,
    tolerance: Duration,
    policy: MatchPolicy,
}

impl ChargeMatcher {
    /// # 参数
    /// - criteria: 周期判定边界条件
    /// - tolerance_hours: 匹配容差（小时）
    /// - policy: 匹配策略
    pub fn new(criteria: CycleCriteria, tolerance_hours: f64, policy: MatchPolicy) -> Self {
        Self {
            detector: CycleDetector::new(criteria),
            tolerance: hours_to_duration(tolerance_hours),
            policy,
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// 计算装炉记录的搜索窗口 [from, to)
    pub fn search_window(&self, charge: &ProductionCharge) -> (NaiveDateTime, NaiveDateTime) {
        let anchor = match self.policy {
            MatchPolicy::Tolerance => charge.start,
            MatchPolicy::CalendarDate => charge.charge_date().and_time(NaiveTime::MIN),
        };
        (
            anchor - self.tolerance,
            anchor + Duration::hours(SEARCH_HORIZON_HOURS),
        )
    }

    /// 为单条装炉记录匹配周期
    ///
    /// 窗口内无读数记为 NoSensorData；识别器的其他错误原样返回
    pub fn match_charge(
        &self,
        charge: &ProductionCharge,
        series: &SensorSeries,
    ) -> AnalysisResult<MatchOutcome> {
        let (from, to) = self.search_window(charge);
        let window = series.window(from, to);

        let candidate = match self.detector.detect(window) {
            Ok(Detection::Cycle(candidate)) => candidate,
            Ok(Detection::Rejected(rejection)) => {
                return Ok(MatchOutcome::Rejected(MatchRejection::Cycle { rejection }));
            }
            Err(AnalysisError::EmptyWindow) => {
                return Ok(MatchOutcome::Rejected(MatchRejection::NoSensorData));
            }
            Err(e) => return Err(e),
        };

        if self.policy == MatchPolicy::Tolerance {
            let offset = abs_offset(charge.start, candidate.start.timestamp);
            if offset > self.tolerance {
                debug!(
                    row = charge.row_number,
                    charge_start = %charge.start,
                    cycle_start = %candidate.start.timestamp,
                    "周期开始偏差超出容差"
                );
                return Ok(MatchOutcome::Rejected(MatchRejection::ToleranceExceeded {
                    offset_minutes: offset.num_minutes(),
                }));
            }
        }

        if charge.weight_kg.is_nan() || charge.weight_kg <= 0.0 {
            return Ok(MatchOutcome::Rejected(MatchRejection::DegenerateMatch {
                reason: DegenerateReason::NonPositiveWeight,
            }));
        }

        let gas_delta = candidate.gas_delta();
        if gas_delta.is_nan() || gas_delta <= 0.0 {
            return Ok(MatchOutcome::Rejected(MatchRejection::DegenerateMatch {
                reason: DegenerateReason::NonPositiveGasDelta,
            }));
        }

        Ok(MatchOutcome::Accepted(candidate))
    }
}

fn abs_offset(a: NaiveDateTime, b: NaiveDateTime) -> Duration {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn charge(h: u32, m: u32) -> ProductionCharge {
        ProductionCharge {
            start: NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
            weight_kg: 20_000.0,
            unit_id: "U1".to_string(),
            row_number: 1,
        }
    }

    #[test]
    fn test_search_window_tolerance_policy() {
        let matcher = ChargeMatcher::new(CycleCriteria::default(), 2.0, MatchPolicy::Tolerance);
        let c = charge(8, 0);
        let (from, to) = matcher.search_window(&c);
        assert_eq!(from, c.start - Duration::hours(2));
        assert_eq!(to, c.start + Duration::hours(48));
    }

    #[test]
    fn test_search_window_calendar_policy_uses_midnight() {
        let matcher = ChargeMatcher::new(CycleCriteria::default(), 1.0, MatchPolicy::CalendarDate);
        let c = charge(8, 0);
        let midnight = c.charge_date().and_hms_opt(0, 0, 0).unwrap();
        let (from, to) = matcher.search_window(&c);
        assert_eq!(from, midnight - Duration::hours(1));
        assert_eq!(to, midnight + Duration::hours(48));
    }

    #[test]
    fn test_empty_series_yields_no_sensor_data() {
        let matcher = ChargeMatcher::new(CycleCriteria::default(), 1.0, MatchPolicy::Tolerance);
        let outcome = matcher
            .match_charge(&charge(8, 0), &SensorSeries::default())
            .unwrap();
        assert_eq!(outcome, MatchOutcome::Rejected(MatchRejection::NoSensorData));
    }

    #[test]
    fn test_abs_offset_symmetric() {
        let a = charge(8, 0).start;
        let b = charge(9, 30).start;
        assert_eq!(abs_offset(a, b), Duration::minutes(90));
        assert_eq!(abs_offset(b, a), Duration::minutes(90));
    }
}
