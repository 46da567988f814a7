use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::error::Result;
use crate::table::engine::DEFAULT_PAGE_SIZE;

/// 配置文件 (~/.config/contractdesk/config.toml)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub page_size: usize,
    pub dataset: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            dataset: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 读取配置；文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.page_size = config.page_size.max(1);
        Ok(config)
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("page_size = 5").unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.dataset, None);
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_log_level_parsing() {
        let config: Config = toml::from_str("log_level = \"debug\"\ndataset = \"/tmp/d.toml\"").unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.dataset, Some(PathBuf::from("/tmp/d.toml")));

        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("contractdesk-{}.toml", uuid::Uuid::new_v4()));
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}
