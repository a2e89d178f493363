// ==========================================
// 加热炉周期核验系统 - 字段映射器实现
// ==========================================
// 职责: 逻辑字段 → 源表列名（显式指定或按关键字自动识别）
// 规则: 关键字按优先级依次匹配小写表头（包含即命中），全部未命中时取第一列
// ==========================================

use crate::importer::error::{ImportError, ImportResult};

// ===== 列识别关键字（按优先级） =====
pub const TIME_KEYWORDS: &[&str] = &["일시", "시간", "time"];
pub const TEMPERATURE_KEYWORDS: &[&str] = &["온도", "temp"];
pub const GAS_KEYWORDS: &[&str] = &["가스", "지침", "gas"];
pub const DATE_KEYWORDS: &[&str] = &["날짜", "일자", "date"];
pub const WEIGHT_KEYWORDS: &[&str] = &["장입", "중량", "weight"];
pub const UNIT_KEYWORDS: &[&str] = &["호기", "설비", "unit", "furnace"];

/// 传感器表列名（显式指定，None 表示自动识别）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorColumnHints {
    pub time: Option<String>,
    pub temperature: Option<String>,
    pub gas: Option<String>,
}

/// 生产实绩表列名（显式指定，None 表示自动识别）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionColumnHints {
    pub date: Option<String>,
    pub weight: Option<String>,
    pub unit: Option<String>,
}

/// 解析后的传感器表列名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorColumns {
    pub time: String,
    pub temperature: String,
    pub gas: String,
}

/// 解析后的生产实绩表列名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionColumns {
    pub date: String,
    pub weight: String,
    /// 机组列可缺省（单机组模式不需要）
    pub unit: Option<String>,
}

pub struct FieldMapper;

impl FieldMapper {
    /// 按关键字识别列，返回命中的表头
    pub fn detect(headers: &[String], keywords: &[&str]) -> Option<String> {
        keywords.iter().find_map(|keyword| {
            headers
                .iter()
                .find(|h| h.to_lowercase().contains(keyword))
                .cloned()
        })
    }

    /// 解析必需列：显式列名必须存在；否则关键字识别，未命中时取第一列
    pub fn resolve_required(
        headers: &[String],
        explicit: Option<&str>,
        keywords: &[&str],
    ) -> ImportResult<String> {
        if let Some(name) = explicit {
            return Self::require(headers, name);
        }

        Self::detect(headers, keywords)
            .or_else(|| headers.first().cloned())
            .ok_or_else(|| ImportError::EmptyTable("表头为空".to_string()))
    }

    /// 解析可选列：显式列名必须存在；否则关键字识别，未命中返回 None
    pub fn resolve_optional(
        headers: &[String],
        explicit: Option<&str>,
        keywords: &[&str],
    ) -> ImportResult<Option<String>> {
        match explicit {
            Some(name) => Self::require(headers, name).map(Some),
            None => Ok(Self::detect(headers, keywords)),
        }
    }

    pub fn sensor_columns(
        headers: &[String],
        hints: &SensorColumnHints,
    ) -> ImportResult<SensorColumns> {
        Ok(SensorColumns {
            time: Self::resolve_required(headers, hints.time.as_deref(), TIME_KEYWORDS)?,
            temperature: Self::resolve_required(
                headers,
                hints.temperature.as_deref(),
                TEMPERATURE_KEYWORDS,
            )?,
            gas: Self::resolve_required(headers, hints.gas.as_deref(), GAS_KEYWORDS)?,
        })
    }

    pub fn production_columns(
        headers: &[String],
        hints: &ProductionColumnHints,
    ) -> ImportResult<ProductionColumns> {
        Ok(ProductionColumns {
            date: Self::resolve_required(headers, hints.date.as_deref(), DATE_KEYWORDS)?,
            weight: Self::resolve_required(headers, hints.weight.as_deref(), WEIGHT_KEYWORDS)?,
            unit: Self::resolve_optional(headers, hints.unit.as_deref(), UNIT_KEYWORDS)?,
        })
    }

    fn require(headers: &[String], name: &str) -> ImportResult<String> {
        let name = name.trim();
        if headers.iter().any(|h| h == name) {
            Ok(name.to_string())
        } else {
            Err(ImportError::ColumnNotFound {
                column: name.to_string(),
                available: headers.join(", "),
            })
        }
    }
}
