// ==========================================
// 加热炉周期核验系统 - 保温区间识别
// ==========================================
// 规则: 按读数顺序对"是否处于保温带"做游程分组（非时间间隔分组）
// 规则: 区间时长 = 组内最后时间戳 - 组内首个时间戳，比较使用 >=
// ==========================================

use crate::config::CycleCriteria;
use crate::domain::SensorReading;
use chrono::{Duration, NaiveDateTime};

/// 标志游程（闭区间下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagRun {
    pub flag: bool,
    pub start_idx: usize,
    pub end_idx: usize,
}

impl FlagRun {
    /// 游程内样本数（游程至少含一个样本）
    pub fn sample_count(&self) -> usize {
        self.end_idx + 1 - self.start_idx
    }
}

/// 单次线性扫描，标志值变化或输入结束时收束当前游程
pub fn flag_runs<T, F>(items: &[T], mut flag_of: F) -> Vec<FlagRun>
where
    F: FnMut(&T) -> bool,
{
    let mut runs = Vec::new();
    let mut current: Option<FlagRun> = None;

    for (idx, item) in items.iter().enumerate() {
        let flag = flag_of(item);
        match current.as_mut() {
            Some(run) if run.flag == flag => run.end_idx = idx,
            _ => {
                if let Some(run) = current.take() {
                    runs.push(run);
                }
                current = Some(FlagRun {
                    flag,
                    start_idx: idx,
                    end_idx: idx,
                });
            }
        }
    }

    runs.extend(current);
    runs
}

/// 保温区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldingInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub samples: usize,
}

impl HoldingInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// 按时间顺序列出所有保温区间
pub fn holding_intervals(readings: &[SensorReading], criteria: &CycleCriteria) -> Vec<HoldingInterval> {
    flag_runs(readings, |r| criteria.is_holding(r.temperature))
        .into_iter()
        .filter(|run| run.flag)
        .map(|run| HoldingInterval {
            start: readings[run.start_idx].timestamp,
            end: readings[run.end_idx].timestamp,
            samples: run.sample_count(),
        })
        .collect()
}

/// 时长达到下限的保温区间
pub fn accepted_intervals(
    intervals: &[HoldingInterval],
    min_duration: Duration,
) -> impl Iterator<Item = &HoldingInterval> {
    intervals.iter().filter(move |i| i.duration() >= min_duration)
}

/// 第一个达到最短保温时长的区间
pub fn first_qualifying_interval(
    readings: &[SensorReading],
    criteria: &CycleCriteria,
) -> Option<HoldingInterval> {
    let intervals = holding_intervals(readings, criteria);
    let first = accepted_intervals(&intervals, criteria.min_holding_duration())
        .next()
        .copied();
    first
}
