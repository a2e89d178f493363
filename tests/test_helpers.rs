// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供读数序列、装炉记录、标准周期等测试数据构造
// ==========================================

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use furnace_cycle::config::CycleCriteria;
use furnace_cycle::domain::{ProductionCharge, SensorReading, SensorRow, SensorSource};

/// 测试基准日 2025-03-10 00:00
pub fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// 基准日 + 分钟偏移
pub fn at_min(minutes: i64) -> NaiveDateTime {
    base() + Duration::minutes(minutes)
}

pub fn reading(timestamp: NaiveDateTime, temperature: f64, meter: f64) -> SensorReading {
    SensorReading {
        timestamp,
        temperature,
        meter_reading: meter,
        unit_id: "U1".to_string(),
    }
}

/// 按分钟间隔构造读数序列（表计读数逐点 +1）
pub fn minute_series(start: NaiveDateTime, temperatures: &[f64]) -> Vec<SensorReading> {
    temperatures
        .iter()
        .enumerate()
        .map(|(i, &t)| reading(start + Duration::minutes(i as i64), t, 1000.0 + i as f64))
        .collect()
}

/// 标准热处理周期（每小时一个读数）
///
/// - start + 0h: 580°C，表计 1000
/// - start + 1h: 900°C
/// - start + 2h ~ 13h: 1250°C（保温 11 小时）
/// - start + 14h: 850°C，表计 1000 + gas
pub fn standard_cycle(start: NaiveDateTime, gas: f64) -> Vec<SensorReading> {
    let mut out = Vec::new();
    for hour in 0..=14i64 {
        let temperature = match hour {
            0 => 580.0,
            1 => 900.0,
            14 => 850.0,
            _ => 1250.0,
        };
        let meter = 1000.0 + gas * hour as f64 / 14.0;
        out.push(reading(start + Duration::hours(hour), temperature, meter));
    }
    out
}

/// 将读数转换为数据源（去掉机组号）
pub fn source(label: &str, readings: &[SensorReading]) -> SensorSource {
    SensorSource {
        label: label.to_string(),
        rows: readings
            .iter()
            .map(|r| SensorRow {
                timestamp: r.timestamp,
                temperature: r.temperature,
                meter_reading: r.meter_reading,
            })
            .collect(),
        dropped_rows: 0,
    }
}

pub fn charge(unit_id: &str, start: NaiveDateTime, weight_kg: f64, row_number: usize) -> ProductionCharge {
    ProductionCharge {
        start,
        weight_kg,
        unit_id: unit_id.to_string(),
        row_number,
    }
}

pub fn default_criteria() -> CycleCriteria {
    CycleCriteria::default()
}

pub fn strict_criteria() -> CycleCriteria {
    CycleCriteria {
        strict_mode: true,
        ..CycleCriteria::default()
    }
}
