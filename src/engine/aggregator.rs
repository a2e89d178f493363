// ==========================================
// 加热炉周期核验系统 - 报表汇总器
// ==========================================
// 职责: 按机组汇总核验结果（纯函数，每次从完整结果集重算）
// ==========================================

use crate::domain::{CycleResult, PassFail, RunSummary, UnitSummary};
use std::collections::BTreeMap;

pub struct ReportingAggregator;

impl ReportingAggregator {
    /// 按机组汇总（按机组号排序输出）
    pub fn by_unit(results: &[CycleResult]) -> Vec<UnitSummary> {
        let mut groups: BTreeMap<&str, Vec<&CycleResult>> = BTreeMap::new();
        for result in results {
            groups.entry(result.unit_id.as_str()).or_default().push(result);
        }

        groups
            .into_iter()
            .map(|(unit_id, rows)| {
                let count = rows.len();
                let sum_consumption: f64 = rows.iter().map(|r| r.specific_consumption).sum();
                UnitSummary {
                    unit_id: unit_id.to_string(),
                    cycle_count: count,
                    mean_specific_consumption: sum_consumption / count as f64,
                    total_charge_weight_kg: rows.iter().map(|r| r.charge_weight_kg).sum(),
                    total_gas_used: rows.iter().map(|r| r.gas_used).sum(),
                    pass_count: count_of(&rows, PassFail::Pass),
                    fail_count: count_of(&rows, PassFail::Fail),
                }
            })
            .collect()
    }

    /// 整次分析汇总
    pub fn run_summary(results: &[CycleResult], target: Option<f64>) -> RunSummary {
        if results.is_empty() {
            return RunSummary::default();
        }

        let rows: Vec<&CycleResult> = results.iter().collect();
        let mean = results.iter().map(|r| r.specific_consumption).sum::<f64>() / results.len() as f64;

        RunSummary {
            cycle_count: results.len(),
            mean_specific_consumption: Some(mean),
            delta_to_target: target.map(|t| mean - t),
            pass_count: count_of(&rows, PassFail::Pass),
            fail_count: count_of(&rows, PassFail::Fail),
            not_applicable_count: count_of(&rows, PassFail::NotApplicable),
        }
    }
}

fn count_of(rows: &[&CycleResult], verdict: PassFail) -> usize {
    rows.iter().filter(|r| r.pass_fail == verdict).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn result(unit: &str, gas: f64, weight: f64, pass_fail: PassFail) -> CycleResult {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        CycleResult {
            unit_id: unit.to_string(),
            cycle_date: ts.date(),
            start_time: ts,
            start_meter: 0.0,
            end_time: ts,
            end_meter: gas,
            gas_used: gas,
            charge_weight_kg: weight,
            specific_consumption: gas / (weight / 1000.0),
            pass_fail,
            holding_end: ts,
        }
    }

    #[test]
    fn test_by_unit_groups_and_sums() {
        let results = vec![
            result("B", 500.0, 20_000.0, PassFail::Pass),
            result("A", 600.0, 20_000.0, PassFail::Fail),
            result("B", 300.0, 10_000.0, PassFail::Fail),
        ];

        let summaries = ReportingAggregator::by_unit(&results);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].unit_id, "A");

        let b = &summaries[1];
        assert_eq!(b.cycle_count, 2);
        assert_eq!(b.mean_specific_consumption, 27.5);
        assert_eq!(b.total_charge_weight_kg, 30_000.0);
        assert_eq!(b.total_gas_used, 800.0);
        assert_eq!(b.pass_count, 1);
        assert_eq!(b.fail_count, 1);
    }

    #[test]
    fn test_run_summary_empty() {
        let summary = ReportingAggregator::run_summary(&[], Some(25.0));
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_run_summary_delta_to_target() {
        let results = vec![
            result("A", 500.0, 20_000.0, PassFail::Pass),
            result("A", 600.0, 20_000.0, PassFail::Fail),
        ];
        let summary = ReportingAggregator::run_summary(&results, Some(25.0));
        assert_eq!(summary.mean_specific_consumption, Some(27.5));
        assert_eq!(summary.delta_to_target, Some(2.5));
        assert_eq!(summary.pass_count, 1);
        assert_eq!(summary.fail_count, 1);

        let summary = ReportingAggregator::run_summary(&results, None);
        assert_eq!(summary.delta_to_target, None);
    }
}
