// ==========================================
// 加热炉周期核验系统 - 热处理周期识别器
// ==========================================
// 四阶段依次锚定，每阶段只在上一阶段锚点之后搜索:
//   1. 开始: 温度 <= start_max（严格模式需观察到装炉后升温爬坡）
//   2. 保温: 保温带游程中第一个时长 >= 最短保温时长的区间，取其末时刻
//   3. 结束: 保温结束后第一个温度 <= end_max 的读数
//   4. 校验: 严格模式下 [开始+2h, 结束) 内不得出现低于 start_max 的温度
// 每次调用最多返回一个周期，不继续向后扫描
// ==========================================

use crate::config::CycleCriteria;
use crate::domain::{CycleCandidate, SensorReading};
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::holding;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// 严格模式: 开始候选之后最多观察的样本数
pub const REHEAT_LOOKAHEAD_SAMPLES: usize = 10;
/// 严格模式: 观察窗口至少需要的样本数
pub const REHEAT_MIN_SAMPLES: usize = 5;
/// 严格模式: 观察窗口首尾温升下限 (°C)
pub const REHEAT_MIN_RISE_C: f64 = 5.0;
/// 严格模式: 异常低温检查从开始后多少小时起算
pub const ABNORMAL_CHECK_DELAY_HOURS: i64 = 2;

/// 未识别到周期的原因
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleRejection {
    /// 窗口内没有温度 <= start_max 的读数
    NoStartCandidate,
    /// 严格模式下没有候选满足升温爬坡条件
    NoValidReheatStart,
    /// 没有保温区间达到最短保温时长
    NoValidHoldingInterval,
    /// 保温结束后温度未降至 end_max 以下
    EndNotReached,
    /// 严格模式下周期中途出现异常低温
    AbnormalLowTemperature { at: NaiveDateTime },
}

impl fmt::Display for CycleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleRejection::NoStartCandidate => write!(f, "无开始温度候选"),
            CycleRejection::NoValidReheatStart => write!(f, "无有效的装炉后升温开始点"),
            CycleRejection::NoValidHoldingInterval => write!(f, "无满足最短时长的保温区间"),
            CycleRejection::EndNotReached => write!(f, "保温后未降至结束温度"),
            CycleRejection::AbnormalLowTemperature { at } => {
                write!(f, "周期开始 2 小时后出现异常低温 at {}", at.format("%Y-%m-%d %H:%M"))
            }
        }
    }
}

/// 单次识别结果
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Cycle(CycleCandidate),
    Rejected(CycleRejection),
}

impl Detection {
    pub fn candidate(&self) -> Option<&CycleCandidate> {
        match self {
            Detection::Cycle(c) => Some(c),
            Detection::Rejected(_) => None,
        }
    }
}

// ==========================================
// CycleDetector - 周期识别器
// ==========================================
#[derive(Debug, Clone)]
pub struct CycleDetector {
    criteria: CycleCriteria,
}

impl CycleDetector {
    pub fn new(criteria: CycleCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &CycleCriteria {
        &self.criteria
    }

    /// 在按时间排序的单机组窗口内识别一个周期
    ///
    /// # 返回
    /// - Ok(Detection::Cycle): 识别成功
    /// - Ok(Detection::Rejected): 窗口内无有效周期（正常业务结果）
    /// - Err(AnalysisError::EmptyWindow): 窗口为空
    pub fn detect(&self, window: &[SensorReading]) -> AnalysisResult<Detection> {
        if window.is_empty() {
            return Err(AnalysisError::EmptyWindow);
        }

        Ok(match self.scan(window) {
            Ok(candidate) => Detection::Cycle(candidate),
            Err(rejection) => Detection::Rejected(rejection),
        })
    }

    fn scan(&self, window: &[SensorReading]) -> Result<CycleCandidate, CycleRejection> {
        // 1) 开始点
        let start_idx = self.find_start(window)?;
        let start = &window[start_idx];

        // 2) 保温区间（严格晚于开始点）
        let after_start = strictly_after(window, start.timestamp);
        let holding = holding::first_qualifying_interval(after_start, &self.criteria)
            .ok_or(CycleRejection::NoValidHoldingInterval)?;

        // 3) 结束点（严格晚于保温结束）
        let end = strictly_after(window, holding.end)
            .iter()
            .find(|r| r.temperature <= self.criteria.end_max_c)
            .ok_or(CycleRejection::EndNotReached)?;

        // 4) 异常低温校验
        if self.criteria.strict_mode {
            self.check_abnormal_low(window, start, end)?;
        }

        Ok(CycleCandidate {
            start: start.clone(),
            end: end.clone(),
            holding_end: holding.end,
        })
    }

    fn find_start(&self, window: &[SensorReading]) -> Result<usize, CycleRejection> {
        let start_max = self.criteria.start_max_c;
        let mut candidates = window
            .iter()
            .enumerate()
            .filter(|(_, r)| r.temperature <= start_max)
            .map(|(idx, _)| idx)
            .peekable();

        let first = *candidates.peek().ok_or(CycleRejection::NoStartCandidate)?;
        if !self.criteria.strict_mode {
            return Ok(first);
        }

        candidates
            .find(|&idx| shows_reheat(window, idx))
            .ok_or(CycleRejection::NoValidReheatStart)
    }

    fn check_abnormal_low(
        &self,
        window: &[SensorReading],
        start: &SensorReading,
        end: &SensorReading,
    ) -> Result<(), CycleRejection> {
        let check_from = start.timestamp + Duration::hours(ABNORMAL_CHECK_DELAY_HOURS);
        let abnormal = window
            .iter()
            .filter(|r| r.timestamp >= check_from && r.timestamp < end.timestamp)
            .find(|r| r.temperature < self.criteria.start_max_c);

        match abnormal {
            Some(r) => Err(CycleRejection::AbnormalLowTemperature { at: r.timestamp }),
            None => Ok(()),
        }
    }
}

/// 候选点之后的观察窗口（不含候选点本身）出现足够温升
fn shows_reheat(window: &[SensorReading], idx: usize) -> bool {
    let from = idx + 1;
    let to = (from + REHEAT_LOOKAHEAD_SAMPLES).min(window.len());
    if to < from + REHEAT_MIN_SAMPLES {
        return false;
    }

    let ahead = &window[from..to];
    match (ahead.first(), ahead.last()) {
        (Some(first), Some(last)) => last.temperature - first.temperature >= REHEAT_MIN_RISE_C,
        _ => false,
    }
}

fn strictly_after(window: &[SensorReading], anchor: NaiveDateTime) -> &[SensorReading] {
    let idx = window.partition_point(|r| r.timestamp <= anchor);
    &window[idx..]
}
