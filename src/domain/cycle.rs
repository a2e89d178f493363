// ==========================================
// 加热炉周期核验系统 - 周期与结果实体
// ==========================================

use crate::domain::reading::SensorReading;
use crate::domain::types::PassFail;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 周期识别器输出的候选周期（每次搜索窗口临时生成，不单独保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleCandidate {
    pub start: SensorReading,
    pub end: SensorReading,
    pub holding_end: NaiveDateTime,
}

impl CycleCandidate {
    /// 周期内燃气用量（可能为负，表示表计倒走）
    pub fn gas_delta(&self) -> f64 {
        self.end.meter_reading - self.start.meter_reading
    }
}

/// 单个 (装炉, 周期) 匹配成功后的核验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    pub unit_id: String,
    pub cycle_date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub start_meter: f64,
    pub end_time: NaiveDateTime,
    pub end_meter: f64,
    /// 燃气用量 (Nm3) = 结束读数 - 开始读数
    pub gas_used: f64,
    pub charge_weight_kg: f64,
    /// 单耗原值 (Nm3/t)，汇总统计使用原值
    pub specific_consumption: f64,
    pub pass_fail: PassFail,
    pub holding_end: NaiveDateTime,
}

impl CycleResult {
    /// 报表展示用单耗（保留两位小数）
    pub fn specific_consumption_rounded(&self) -> f64 {
        round2(self.specific_consumption)
    }
}

/// 单机组汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub unit_id: String,
    pub cycle_count: usize,
    pub mean_specific_consumption: f64,
    pub total_charge_weight_kg: f64,
    pub total_gas_used: f64,
    pub pass_count: usize,
    pub fail_count: usize,
}

/// 整次分析汇总
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub cycle_count: usize,
    /// 无结果时为 None
    pub mean_specific_consumption: Option<f64>,
    /// 平均单耗与目标的差值（未启用目标或无结果时为 None）
    pub delta_to_target: Option<f64>,
    pub pass_count: usize,
    pub fail_count: usize,
    pub not_applicable_count: usize,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(25.0), 25.0);
        assert_eq!(round2(25.534), 25.53);
        assert_eq!(round2(25.535_1), 25.54);
    }
}
