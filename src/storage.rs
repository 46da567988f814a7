use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::models::Dataset;
use crate::sample::sample_dataset;

/// 加载数据集；未配置或文件不存在时使用内置样例
pub fn load_dataset(path: Option<&Path>) -> Result<Dataset> {
    let Some(path) = path else {
        info!("no dataset configured, using built-in sample");
        return Ok(sample_dataset());
    };

    if !path.exists() {
        warn!("dataset {} not found, using built-in sample", path.display());
        return Ok(sample_dataset());
    }

    let content = fs::read_to_string(path)?;
    let data: Dataset = toml::from_str(&content)?;
    info!(
        "loaded dataset {} ({} contracts)",
        path.display(),
        data.contracts.len()
    );
    Ok(data)
}

/// 导出数据集快照
pub fn save_dataset(data: &Dataset, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(data)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    info!("exported dataset to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("contractdesk-test-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_missing_file_falls_back_to_sample() {
        let path = temp_path("missing.toml");
        let data = load_dataset(Some(&path)).unwrap();
        assert!(!data.contracts.is_empty());
    }

    #[test]
    fn test_export_then_load() {
        let path = temp_path("export.toml");
        let sample = sample_dataset();
        save_dataset(&sample, &path).unwrap();

        let loaded = load_dataset(Some(&path)).unwrap();
        assert_eq!(loaded.agents, sample.agents);
        assert_eq!(loaded.contracts, sample.contracts);
        assert_eq!(loaded.messages.len(), sample.messages.len());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_is_decode_error() {
        let path = temp_path("bad.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "agents = 3").unwrap();
        assert!(matches!(load_dataset(Some(&path)), Err(AppError::Decode(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
