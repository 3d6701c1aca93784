//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{
    chain_config::{parse_chain_list, ChainType},
    derivation_path::HARDENED_OFFSET,
    multi_chain_wallet::DerivationOptions,
};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub derivation: DerivationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// 派生配置
#[derive(Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    /// 派生顺序即输出顺序
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainType>,
    #[serde(default)]
    pub address_index: u32,
    #[serde(default)]
    pub passphrase: String,
    /// 无法解析的 HD_ADDRESS_INDEX 原值，交给 validate 报错
    #[serde(skip)]
    invalid_address_index: Option<String>,
}

impl std::fmt::Debug for DerivationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationConfig")
            .field("chains", &self.chains)
            .field("address_index", &self.address_index)
            .field("passphrase", &"[REDACTED]")
            .field("invalid_address_index", &self.invalid_address_index)
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: String, // "json" or "text"
    /// 关闭后助记词和私钥只输出脱敏形式
    pub reveal_secrets: bool,
    #[serde(skip)]
    invalid_reveal_secrets: Option<String>,
}

fn default_chains() -> Vec<ChainType> {
    ChainType::ALL.to_vec()
}

/// 解析开关值：1/true/yes/on 与 0/false/no/off（不区分大小写）
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl DerivationConfig {
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let (address_index, invalid_address_index) = match var("HD_ADDRESS_INDEX") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(index) => (index, None),
                Err(_) => (0, Some(raw)),
            },
            None => (0, None),
        };

        Self {
            // 无法解析的链列表保留为空，交给 validate 报错
            chains: match var("HD_CHAINS") {
                Some(list) => parse_chain_list(&list).unwrap_or_default(),
                None => default_chains(),
            },
            address_index,
            passphrase: var("HD_PASSPHRASE").unwrap_or_default(),
            invalid_address_index,
        }
    }

    /// 转换为派生服务参数
    pub fn to_options(&self) -> DerivationOptions {
        DerivationOptions {
            passphrase: self.passphrase.clone(),
            address_index: self.address_index,
        }
    }
}

impl LoggingConfig {
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            format: var("LOG_FORMAT").unwrap_or_else(|| "text".into()),
        }
    }
}

impl ReportConfig {
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let (reveal_secrets, invalid_reveal_secrets) = match var("REPORT_REVEAL_SECRETS") {
            Some(raw) => match parse_flag(&raw) {
                Some(flag) => (flag, None),
                // 无法识别时按脱敏处理，并由 validate 报错
                None => (false, Some(raw)),
            },
            None => (true, None),
        };

        Self {
            format: var("REPORT_FORMAT").unwrap_or_else(|| "text".into()),
            reveal_secrets,
            invalid_reveal_secrets,
        }
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self::from_vars(env_var)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_vars(env_var)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::from_vars(env_var)
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            derivation: DerivationConfig::default(),
            logging: LoggingConfig::default(),
            report: ReportConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.derivation.chains.is_empty() {
            anyhow::bail!("HD_CHAINS must name at least one supported chain (evm, tron)");
        }

        // 地址索引是非硬化子索引
        if let Some(raw) = &self.derivation.invalid_address_index {
            anyhow::bail!("HD_ADDRESS_INDEX must be an integer below 2^31, got {:?}", raw);
        }
        if self.derivation.address_index >= HARDENED_OFFSET {
            anyhow::bail!("HD_ADDRESS_INDEX must be below 2^31");
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        if self.report.format != "json" && self.report.format != "text" {
            anyhow::bail!("REPORT_FORMAT must be 'json' or 'text'");
        }

        if let Some(raw) = &self.report.invalid_reveal_secrets {
            anyhow::bail!(
                "REPORT_REVEAL_SECRETS must be one of 1/true/yes/on or 0/false/no/off, got {:?}",
                raw
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use tempfile::NamedTempFile;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        Config {
            derivation: DerivationConfig::from_vars(vars(pairs)),
            logging: LoggingConfig::from_vars(vars(pairs)),
            report: ReportConfig::from_vars(vars(pairs)),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]);
        assert_eq!(
            config.derivation.chains,
            vec![ChainType::Tron, ChainType::Evm]
        );
        assert_eq!(config.derivation.address_index, 0);
        assert!(config.derivation.passphrase.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.report.format, "text");
        assert!(config.report.reveal_secrets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_vars() {
        let config = config_from(&[
            ("HD_CHAINS", "eth"),
            ("HD_ADDRESS_INDEX", "7"),
            ("HD_PASSPHRASE", "TREZOR"),
            ("REPORT_FORMAT", "json"),
            ("REPORT_REVEAL_SECRETS", "0"),
        ]);
        assert_eq!(config.derivation.chains, vec![ChainType::Evm]);

        let options = config.derivation.to_options();
        assert_eq!(options.address_index, 7);
        assert_eq!(options.passphrase, "TREZOR");
        assert!(!config.report.reveal_secrets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[derivation]
chains = ["evm", "tron"]
address_index = 3

[logging]
level = "debug"
format = "json"

[report]
format = "json"
reveal_secrets = false
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.derivation.chains,
            vec![ChainType::Evm, ChainType::Tron]
        );
        assert_eq!(config.derivation.address_index, 3);
        assert_eq!(config.logging.format, "json");
        assert!(!config.report.reveal_secrets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_rejects_unknown_chain() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[derivation]\nchains = [\"solana\"]").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        assert!(Config::from_env_and_file(Some("/nonexistent/hd-wallet.toml")).is_ok());
        assert!(Config::from_env_and_file(None::<&str>).is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = config_from(&[("HD_CHAINS", "dogecoin")]);
        assert!(config.derivation.chains.is_empty());
        assert!(config.validate().is_err());

        config.derivation.chains = vec![ChainType::Evm];
        config.derivation.address_index = HARDENED_OFFSET;
        assert!(config.validate().is_err());

        config.derivation.address_index = HARDENED_OFFSET - 1;
        assert!(config.validate().is_ok());

        config.logging.level = "verbose".into();
        assert!(config.validate().is_err());

        config.logging.level = "info".into();
        config.report.format = "yaml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_address_index_rejected() {
        for raw in ["abc", "-1", "4294967296", "1e3", ""] {
            let config = config_from(&[("HD_ADDRESS_INDEX", raw)]);
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains("HD_ADDRESS_INDEX"),
                "{raw:?} gave {err}"
            );
        }

        // 可解析但超出非硬化范围
        let config = config_from(&[("HD_ADDRESS_INDEX", "2147483648")]);
        assert!(config.validate().is_err());

        let config = config_from(&[("HD_ADDRESS_INDEX", " 2147483647 ")]);
        assert_eq!(config.derivation.address_index, HARDENED_OFFSET - 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reveal_secrets_flag() {
        for raw in ["1", "true", "YES", "on"] {
            let config = config_from(&[("REPORT_REVEAL_SECRETS", raw)]);
            assert!(config.report.reveal_secrets, "{raw:?}");
            assert!(config.validate().is_ok());
        }
        for raw in ["0", "false", "No", "off"] {
            let config = config_from(&[("REPORT_REVEAL_SECRETS", raw)]);
            assert!(!config.report.reveal_secrets, "{raw:?}");
            assert!(config.validate().is_ok());
        }

        let config = config_from(&[("REPORT_REVEAL_SECRETS", "maybe")]);
        assert!(!config.report.reveal_secrets);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("REPORT_REVEAL_SECRETS"));
    }

    #[test]
    fn test_debug_hides_passphrase() {
        let config = config_from(&[("HD_PASSPHRASE", "hunter2")]);
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
