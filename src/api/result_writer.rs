// ==========================================
// 加热炉周期核验系统 - 结果导出
// ==========================================
// 格式: CSV（UTF-8），单耗保留两位小数
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{round2, CycleResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 导出行
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    unit_id: &'a str,
    cycle_date: String,
    start_time: String,
    start_meter: f64,
    end_time: String,
    end_meter: f64,
    gas_used: f64,
    charge_weight_kg: f64,
    specific_consumption: f64,
    pass_fail: String,
    holding_end: String,
}

impl<'a> From<&'a CycleResult> for ResultRow<'a> {
    fn from(r: &'a CycleResult) -> Self {
        Self {
            unit_id: &r.unit_id,
            cycle_date: r.cycle_date.to_string(),
            start_time: r.start_time.format(TIME_FORMAT).to_string(),
            start_meter: r.start_meter,
            end_time: r.end_time.format(TIME_FORMAT).to_string(),
            end_meter: r.end_meter,
            gas_used: round2(r.gas_used),
            charge_weight_kg: r.charge_weight_kg,
            specific_consumption: r.specific_consumption_rounded(),
            pass_fail: r.pass_fail.to_string(),
            holding_end: r.holding_end.format(TIME_FORMAT).to_string(),
        }
    }
}

pub struct ResultWriter;

impl ResultWriter {
    /// 将结果写入任意输出流
    pub fn write_csv<W: Write>(results: &[CycleResult], writer: W) -> ApiResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for result in results {
            wtr.serialize(ResultRow::from(result))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// 将结果写入文件（覆盖）
    pub fn write_csv_file(results: &[CycleResult], path: &Path) -> ApiResult<()> {
        let file = std::fs::File::create(path)?;
        Self::write_csv(results, file)
    }
}
