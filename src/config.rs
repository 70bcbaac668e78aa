use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default model (optional)
    pub model: Option<String>,

    /// Provider identifier ("google" or "stub").
    pub provider: Option<String>,

    /// Upper bound on the model call, in seconds.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,

    /// Override for the Generative Language API endpoint.
    pub api_base: Option<String>,
}

impl Config {
    /// Load config if the file exists, otherwise return Ok(None).
    pub fn load_optional(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e))
                    .with_context(|| format!("failed to read config: {}", path.display()))
            }
        };

        let s = String::from_utf8(bytes).context("config is not valid UTF-8")?;
        let cfg: Config = toml::from_str(&s)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        Ok(Some(cfg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_optional(dir.path().join("config.toml")).unwrap().is_none());
    }

    #[test]
    fn parses_all_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "gemini-2.0-pro"
provider = "stub"
timeout_secs = 30

[google]
api_key = "k"
api_base = "http://localhost:8080"
"#,
        )
        .unwrap();

        let cfg = Config::load_optional(&path).unwrap().unwrap();
        assert_eq!(cfg.model.as_deref(), Some("gemini-2.0-pro"));
        assert_eq!(cfg.provider.as_deref(), Some("stub"));
        assert_eq!(cfg.timeout_secs, Some(30));
        assert_eq!(cfg.google.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.google.api_base.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn google_table_is_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"m\"\n").unwrap();

        let cfg = Config::load_optional(&path).unwrap().unwrap();
        assert!(cfg.google.api_key.is_none());
    }

    #[test]
    fn bad_toml_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();

        let err = Config::load_optional(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
