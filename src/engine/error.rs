// ==========================================
// 加热炉周期核验系统 - 引擎错误类型
// ==========================================
// 说明: 只有整次分析无法进行时才返回错误；
//       单个装炉/数据源的失败以诊断值返回，不走错误通道
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 识别窗口为空（调用方输入不合法）
    #[error("周期识别窗口为空")]
    EmptyWindow,

    #[error("机组数 {found} 超过上限 {max}，分析中止")]
    TooManyUnits { found: usize, max: usize },

    #[error("未识别到任何有效机组，分析中止")]
    NoValidUnits,

    #[error("机组标签规则无效: {0}")]
    InvalidUnitPattern(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
