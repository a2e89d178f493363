// ==========================================
// 加热炉周期核验系统 - 装炉生产记录
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 一次装炉（一批料）的生产实绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCharge {
    /// 装炉记录开始时间（单机组模式下仅日期有效）
    pub start: NaiveDateTime,
    /// 装炉量 (kg)
    pub weight_kg: f64,
    /// 机组号（单机组模式下由编排器统一赋值）
    pub unit_id: String,
    /// 源表行号（用于诊断输出）
    pub row_number: usize,
}

impl ProductionCharge {
    pub fn charge_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// 装炉量 (t)
    pub fn weight_t(&self) -> f64 {
        self.weight_kg / 1000.0
    }
}
