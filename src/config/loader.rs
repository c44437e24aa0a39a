use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::path::Path;

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數 `PERF_ENV` 取得當前環境設定
    pub fn from_env() -> Self {
        match env::var("PERF_ENV")
            .unwrap_or_else(|_| "development".into())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 載入指定環境的配置
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load_from_dir(&config_dir, env)
    }

    /// 從指定目錄載入配置
    pub fn load_from_dir<P: AsRef<Path>>(dir: P, env: Environment) -> Result<Config, ConfigError> {
        let config_path = dir.as_ref().join(env.as_filename());

        Config::builder()
            .add_source(File::from(config_path))
            // 環境變數優先級高於文件配置，例如 PERF__ANALYSIS__RISK_FREE_RATE=0.03
            .add_source(
                ConfigEnvironment::with_prefix("PERF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }
}
