// ==========================================
// 加热炉周期核验系统 - 燃气单耗计算器
// ==========================================
// 公式: 单耗 (Nm3/t) = 燃气用量 / (装炉量 kg / 1000)
// 判定: 启用目标时 单耗 <= 目标 为 Pass，否则 Fail；未启用为 NotApplicable
// 前置: 装炉量 > 0、燃气用量 > 0 已由匹配器保证
// ==========================================

use crate::domain::{CycleCandidate, CycleResult, PassFail, ProductionCharge};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitEconomicsCalculator {
    target: Option<f64>,
}

impl UnitEconomicsCalculator {
    pub fn new(target: Option<f64>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn specific_consumption(gas_used: f64, charge_weight_kg: f64) -> f64 {
        gas_used / (charge_weight_kg / 1000.0)
    }

    pub fn classify(&self, specific_consumption: f64) -> PassFail {
        match self.target {
            None => PassFail::NotApplicable,
            Some(target) if specific_consumption <= target => PassFail::Pass,
            Some(_) => PassFail::Fail,
        }
    }

    /// 将匹配成功的 (装炉, 周期) 转换为核验结果
    pub fn evaluate(&self, charge: &ProductionCharge, candidate: &CycleCandidate) -> CycleResult {
        let gas_used = candidate.gas_delta();
        let specific_consumption = Self::specific_consumption(gas_used, charge.weight_kg);

        CycleResult {
            unit_id: charge.unit_id.clone(),
            cycle_date: charge.charge_date(),
            start_time: candidate.start.timestamp,
            start_meter: candidate.start.meter_reading,
            end_time: candidate.end.timestamp,
            end_meter: candidate.end.meter_reading,
            gas_used,
            charge_weight_kg: charge.weight_kg,
            specific_consumption,
            pass_fail: self.classify(specific_consumption),
            holding_end: candidate.holding_end,
        }
    }
}
