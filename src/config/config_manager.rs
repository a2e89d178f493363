// ==========================================
// 加热炉周期核验系统 - 配置管理器
// ==========================================
// 职责: 配置加载（显式路径 → 用户配置目录 → 内置默认值）与校验
// 存储: JSON 文件
// ==========================================

use crate::config::analysis_config::AnalysisConfig;
use crate::config::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 用户配置目录下的子目录名
const CONFIG_DIR_NAME: &str = "furnace-cycle";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    explicit_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// # 参数
    /// - explicit_path: 显式指定的配置文件（必须存在）；None 时回退到用户配置目录
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }

    /// 用户配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 加载并校验配置
    pub fn load(&self) -> ConfigResult<AnalysisConfig> {
        match &self.explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.clone()));
                }
                Self::read_file(path)
            }
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::read_file(&path),
                None => {
                    debug!("未找到配置文件，使用内置默认配置");
                    let config = AnalysisConfig::default();
                    config.validate()?;
                    Ok(config)
                }
            },
        }
    }

    /// 从 JSON 字符串解析并校验配置
    pub fn from_json_str(raw: &str) -> ConfigResult<AnalysisConfig> {
        let config: AnalysisConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 获取配置快照（JSON 格式），分析开始时写入日志
    pub fn snapshot(config: &AnalysisConfig) -> ConfigResult<String> {
        Ok(serde_json::to_string(config)?)
    }

    fn read_file(path: &Path) -> ConfigResult<AnalysisConfig> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "已加载配置文件");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"criteria": {{"start_max_c": 550.0}}, "match_tolerance_hours": 2.0}}"#
        )
        .unwrap();

        let manager = ConfigManager::new(Some(file.path().to_path_buf()));
        let config = manager.load().unwrap();
        assert_eq!(config.criteria.start_max_c, 550.0);
        assert_eq!(config.match_tolerance_hours, 2.0);
        assert_eq!(config.criteria.hold_min_c, 1230.0);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let manager = ConfigManager::new(Some(PathBuf::from("no_such_config.json")));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"match_tolerance_hours": 100.0}}"#).unwrap();

        let manager = ConfigManager::new(Some(file.path().to_path_buf()));
        assert!(matches!(
            manager.load(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_json_str_malformed() {
        assert!(matches!(
            ConfigManager::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_snapshot_roundtrips() {
        let config = AnalysisConfig::default();
        let snapshot = ConfigManager::snapshot(&config).unwrap();
        assert_eq!(ConfigManager::from_json_str(&snapshot).unwrap(), config);
    }
}
