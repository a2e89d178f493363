// ==========================================
// 加热炉周期核验系统 - 分析编排器
// ==========================================
// 流程: 机组解析 → 构建单机组序列 → 逐条装炉匹配 → 单耗计算 → 汇总
// 红线: 机组数超限/无有效机组时中止，不输出部分结果
// 说明: 单条装炉/单个数据源的失败只记入诊断，不影响其他记录
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::{
    AnalysisMode, CycleResult, ProductionCharge, RunSummary, SensorReading, SensorSeries,
    SensorSource, UnitSummary,
};
use crate::engine::aggregator::ReportingAggregator;
use crate::engine::charge_matcher::{ChargeMatcher, MatchOutcome, MatchPolicy, MatchRejection};
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::unit_economics::UnitEconomicsCalculator;
use crate::engine::unit_resolver::{FurnaceIdentityResolver, DEFAULT_UNIT_ID};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// 趋势切片前后留白（小时）
pub const TREND_MARGIN_HOURS: i64 = 1;

/// 分析输入（已由加载器规范化）
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub sensor_sources: Vec<SensorSource>,
    pub charges: Vec<ProductionCharge>,
}

/// 未产出结果的装炉记录及原因
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeDiagnostic {
    pub charge: ProductionCharge,
    pub rejection: MatchRejection,
}

// ==========================================
// AnalysisReport - 分析报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: String,
    pub mode: AnalysisMode,
    /// 本次分析使用的配置快照
    pub config: AnalysisConfig,
    /// 按装炉表顺序输出的核验结果
    pub results: Vec<CycleResult>,
    pub unit_summaries: Vec<UnitSummary>,
    pub run_summary: RunSummary,
    pub diagnostics: Vec<ChargeDiagnostic>,
    /// 无法解析机组号而被剔除的数据源标签
    pub unresolved_sources: Vec<String>,
    /// 规范化后的完整传感器表（按机组）
    pub series: BTreeMap<String, SensorSeries>,
}

impl AnalysisReport {
    /// 规范化后的完整传感器表（按机组号、时间排序）
    pub fn sensor_table(&self) -> impl Iterator<Item = &SensorReading> {
        self.series.values().flat_map(|s| s.readings().iter())
    }

    /// 结果对应的趋势数据：[开始 - 1h, 结束 + 1h]
    pub fn cycle_trend(&self, result: &CycleResult) -> &[SensorReading] {
        let margin = Duration::hours(TREND_MARGIN_HOURS);
        match self.series.get(&result.unit_id) {
            Some(series) => {
                series.window_inclusive(result.start_time - margin, result.end_time + margin)
            }
            None => &[],
        }
    }
}

// ==========================================
// AnalysisOrchestrator - 分析编排器
// ==========================================
pub struct AnalysisOrchestrator {
    config: AnalysisConfig,
}

impl AnalysisOrchestrator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 执行一次完整分析
    pub fn run(&self, input: AnalysisInput) -> AnalysisResult<AnalysisReport> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("analysis_run", run_id = %run_id, mode = %self.config.mode);
        let _guard = span.enter();

        info!(
            sources = input.sensor_sources.len(),
            charges = input.charges.len(),
            "开始周期核验分析"
        );

        let resolver = self.identity_resolver()?;
        let (series, unresolved_sources) =
            self.build_series(input.sensor_sources, resolver.as_ref())?;

        let policy = match self.config.mode {
            AnalysisMode::SingleUnit => MatchPolicy::CalendarDate,
            AnalysisMode::MultiUnit => MatchPolicy::Tolerance,
        };
        let matcher = ChargeMatcher::new(
            self.config.criteria.clone(),
            self.config.match_tolerance_hours,
            policy,
        );
        let calculator = UnitEconomicsCalculator::new(self.config.target_specific_consumption);

        let mut results = Vec::new();
        let mut diagnostics = Vec::new();
        let mut seen_dates: HashSet<NaiveDate> = HashSet::new();

        for charge in self.normalize_charges(input.charges, resolver.as_ref()) {
            if policy == MatchPolicy::CalendarDate && !seen_dates.insert(charge.charge_date()) {
                diagnostics.push(ChargeDiagnostic {
                    charge,
                    rejection: MatchRejection::DuplicateChargeDate,
                });
                continue;
            }

            let outcome = match series.get(&charge.unit_id) {
                Some(unit_series) => matcher.match_charge(&charge, unit_series)?,
                None => MatchOutcome::Rejected(MatchRejection::NoSensorData),
            };

            match outcome {
                MatchOutcome::Accepted(candidate) => {
                    let result = calculator.evaluate(&charge, &candidate);
                    debug!(
                        unit = %result.unit_id,
                        row = charge.row_number,
                        start = %result.start_time,
                        end = %result.end_time,
                        specific_consumption = result.specific_consumption,
                        verdict = %result.pass_fail,
                        "装炉记录匹配成功"
                    );
                    results.push(result);
                }
                MatchOutcome::Rejected(rejection) => {
                    debug!(
                        unit = %charge.unit_id,
                        row = charge.row_number,
                        reason = %rejection,
                        "装炉记录未匹配到有效周期"
                    );
                    diagnostics.push(ChargeDiagnostic { charge, rejection });
                }
            }
        }

        let unit_summaries = ReportingAggregator::by_unit(&results);
        let run_summary =
            ReportingAggregator::run_summary(&results, self.config.target_specific_consumption);

        info!(
            matched = results.len(),
            rejected = diagnostics.len(),
            units = series.len(),
            "周期核验分析完成"
        );

        Ok(AnalysisReport {
            run_id,
            mode: self.config.mode,
            config: self.config.clone(),
            results,
            unit_summaries,
            run_summary,
            diagnostics,
            unresolved_sources,
            series,
        })
    }

    fn identity_resolver(&self) -> AnalysisResult<Option<FurnaceIdentityResolver>> {
        match self.config.mode {
            AnalysisMode::SingleUnit => Ok(None),
            AnalysisMode::MultiUnit => FurnaceIdentityResolver::new(
                &self.config.unit_label_prefix,
                &self.config.unit_label_suffix,
                self.config.max_units,
            )
            .map(Some),
        }
    }

    /// 将数据源归属到机组并构建去重后的有序序列
    fn build_series(
        &self,
        sources: Vec<SensorSource>,
        resolver: Option<&FurnaceIdentityResolver>,
    ) -> AnalysisResult<(BTreeMap<String, SensorSeries>, Vec<String>)> {
        let mut grouped: BTreeMap<String, Vec<SensorReading>> = BTreeMap::new();
        let mut unresolved = Vec::new();

        match resolver {
            None => {
                let readings: Vec<SensorReading> = sources
                    .into_iter()
                    .flat_map(|s| s.rows)
                    .map(|row| row.with_unit(DEFAULT_UNIT_ID))
                    .collect();
                if readings.is_empty() {
                    return Err(AnalysisError::NoValidUnits);
                }
                grouped.insert(DEFAULT_UNIT_ID.to_string(), readings);
            }
            Some(resolver) => {
                let resolution = resolver.resolve(sources.iter().map(|s| s.label.as_str()))?;
                unresolved = resolution.unresolved;

                for (source, unit) in sources.into_iter().zip(resolution.assignments) {
                    if let Some(unit_id) = unit {
                        let entry = grouped.entry(unit_id.clone()).or_default();
                        entry.extend(source.rows.into_iter().map(|row| row.with_unit(&unit_id)));
                    }
                }
            }
        }

        let series = grouped
            .into_iter()
            .map(|(unit_id, readings)| {
                let series = SensorSeries::from_readings(&unit_id, readings);
                if series.is_empty() {
                    warn!(unit = %unit_id, "机组无有效读数");
                }
                (unit_id, series)
            })
            .collect();

        Ok((series, unresolved))
    }

    fn normalize_charges(
        &self,
        charges: Vec<ProductionCharge>,
        resolver: Option<&FurnaceIdentityResolver>,
    ) -> Vec<ProductionCharge> {
        charges
            .into_iter()
            .map(|mut charge| {
                charge.unit_id = match resolver {
                    None => DEFAULT_UNIT_ID.to_string(),
                    Some(resolver) => resolver.normalize_charge_unit(&charge.unit_id),
                };
                charge
            })
            .collect()
    }
}
