use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[tokio::test]
    async fn test_deserialize() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json");
        tokio::fs::write(&path, r#"{"name":"gastos"}"#).await.unwrap();
        let sample: Sample = deserialize(&path).await.unwrap();
        assert_eq!(sample.name, "gastos");
    }

    #[tokio::test]
    async fn test_deserialize_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{").await.unwrap();
        let e = deserialize::<Sample>(&path).await.unwrap_err();
        assert!(e.to_string().contains("broken.json"));
    }
}
