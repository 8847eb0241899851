use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// 寫入本機目錄，檔案存在時直接覆蓋
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_overwrites_previous_run() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("prices.csv", b"old,content\n").await.unwrap();
        let written = storage.write_file("prices.csv", b"new\n").await.unwrap();

        assert!(written.ends_with("prices.csv"));
        let content = std::fs::read_to_string(temp_dir.path().join("prices.csv")).unwrap();
        assert_eq!(content, "new\n");
    }

    #[tokio::test]
    async fn test_write_file_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("reports").join("daily"));

        storage.write_file("prices.csv", b"header\n").await.unwrap();
        assert!(temp_dir.path().join("reports/daily/prices.csv").exists());
    }
}
