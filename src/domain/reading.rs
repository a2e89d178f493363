// ==========================================
// 加热炉周期核验系统 - 传感器读数
// ==========================================
// 约束: 单机组序列按时间严格递增（同一时间戳后写覆盖前写）
// 约束: 燃气表读数应单调不减，但此处不强制，倒走由匹配阶段剔除
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 加载器输出的原始行（尚未归属机组）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRow {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub meter_reading: f64,
}

impl SensorRow {
    pub fn with_unit(self, unit_id: &str) -> SensorReading {
        SensorReading {
            timestamp: self.timestamp,
            temperature: self.temperature,
            meter_reading: self.meter_reading,
            unit_id: unit_id.to_string(),
        }
    }
}

/// 一个传感器数据源（通常对应一个上传文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSource {
    /// 数据源标签（文件名），多机组模式下从中提取机组号
    pub label: String,
    pub rows: Vec<SensorRow>,
    /// 加载阶段因时间无法解析而丢弃的行数
    pub dropped_rows: usize,
}

/// 归属某机组的温度/燃气表读数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub timestamp: NaiveDateTime,
    /// 炉温 (°C)
    pub temperature: f64,
    /// 累计燃气表读数 (Nm3)
    pub meter_reading: f64,
    pub unit_id: String,
}

// ==========================================
// SensorSeries - 单机组有序读数序列
// ==========================================
#[derive(Debug, Clone, Default, Serialize)]
pub struct SensorSeries {
    unit_id: String,
    readings: Vec<SensorReading>,
}

impl SensorSeries {
    /// 构建序列：按时间排序，同一时间戳保留最后一次出现的读数
    pub fn from_readings<I>(unit_id: &str, readings: I) -> Self
    where
        I: IntoIterator<Item = SensorReading>,
    {
        let mut by_timestamp: BTreeMap<NaiveDateTime, SensorReading> = BTreeMap::new();
        for reading in readings {
            by_timestamp.insert(reading.timestamp, reading);
        }

        Self {
            unit_id: unit_id.to_string(),
            readings: by_timestamp.into_values().collect(),
        }
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// 半开区间 [from, to) 内的读数切片
    pub fn window(&self, from: NaiveDateTime, to: NaiveDateTime) -> &[SensorReading] {
        let lo = self.readings.partition_point(|r| r.timestamp < from);
        let hi = self.readings.partition_point(|r| r.timestamp < to);
        &self.readings[lo..hi.max(lo)]
    }

    /// 闭区间 [from, to] 内的读数切片
    pub fn window_inclusive(&self, from: NaiveDateTime, to: NaiveDateTime) -> &[SensorReading] {
        let lo = self.readings.partition_point(|r| r.timestamp < from);
        let hi = self.readings.partition_point(|r| r.timestamp <= to);
        &self.readings[lo..hi.max(lo)]
    }
}
