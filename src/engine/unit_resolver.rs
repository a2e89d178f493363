// ==========================================
// 加热炉周期核验系统 - 机组标识解析器
// ==========================================
// 规则: 标签中匹配 "前缀 + 数字 + 可选后缀"（不区分大小写），
//       去除匹配段内部空白并转大写后作为机组号
// 规则: 无法解析的数据源剔除并告警，不中止分析
// 红线: 机组数超过上限或为 0 时整次分析中止，不输出部分结果
// ==========================================

use crate::engine::error::{AnalysisError, AnalysisResult};
use regex::Regex;
use std::collections::BTreeSet;
use tracing::warn;

/// 单机组模式下的隐式机组号
pub const DEFAULT_UNIT_ID: &str = "DEFAULT";

/// 数据源机组解析结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitResolution {
    /// 与输入标签一一对应，None 表示无法解析
    pub assignments: Vec<Option<String>>,
    /// 无法解析的标签
    pub unresolved: Vec<String>,
    /// 去重后的机组号
    pub unit_ids: BTreeSet<String>,
}

// ==========================================
// FurnaceIdentityResolver - 机组标识解析器
// ==========================================
#[derive(Debug, Clone)]
pub struct FurnaceIdentityResolver {
    pattern: Regex,
    max_units: usize,
}

impl FurnaceIdentityResolver {
    /// # 参数
    /// - prefix: 标签前缀字面量（如 "가열로"）
    /// - suffix: 可选后缀字面量（如 "호기"），空串表示无后缀
    /// - max_units: 允许的最大机组数
    pub fn new(prefix: &str, suffix: &str, max_units: usize) -> AnalysisResult<Self> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(AnalysisError::InvalidUnitPattern("前缀为空".to_string()));
        }

        let suffix = suffix.trim();
        let expr = if suffix.is_empty() {
            format!(r"(?i){}\s*\d+", regex::escape(prefix))
        } else {
            format!(
                r"(?i){}\s*\d+(?:\s*{})?",
                regex::escape(prefix),
                regex::escape(suffix)
            )
        };

        let pattern =
            Regex::new(&expr).map_err(|e| AnalysisError::InvalidUnitPattern(e.to_string()))?;

        Ok(Self { pattern, max_units })
    }

    /// 从标签中提取机组号
    pub fn extract_unit_id(&self, label: &str) -> Option<String> {
        self.pattern.find(label).map(|m| {
            m.as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
    }

    /// 规范化生产实绩表中的机组列取值，使之与传感器数据源的机组号可比
    ///
    /// 能匹配规则时取匹配段，否则去空白后原样使用
    pub fn normalize_charge_unit(&self, raw: &str) -> String {
        self.extract_unit_id(raw).unwrap_or_else(|| {
            raw.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
    }

    /// 解析一组数据源标签
    ///
    /// # 返回
    /// - Err(TooManyUnits): 去重后机组数超过上限
    /// - Err(NoValidUnits): 没有任何标签可解析
    pub fn resolve<'a, I>(&self, labels: I) -> AnalysisResult<UnitResolution>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolution = UnitResolution::default();

        for label in labels {
            let unit = self.extract_unit_id(label);
            match &unit {
                Some(id) => {
                    resolution.unit_ids.insert(id.clone());
                }
                None => {
                    warn!(label = %label, "数据源标签中未识别到机组号，已剔除");
                    resolution.unresolved.push(label.to_string());
                }
            }
            resolution.assignments.push(unit);
        }

        if resolution.unit_ids.len() > self.max_units {
            return Err(AnalysisError::TooManyUnits {
                found: resolution.unit_ids.len(),
                max: self.max_units,
            });
        }
        if resolution.unit_ids.is_empty() {
            return Err(AnalysisError::NoValidUnits);
        }

        Ok(resolution)
    }
}
