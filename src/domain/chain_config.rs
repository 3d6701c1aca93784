//! 链类型配置模块
//!
//! 定义支持的链族及其派生/地址常量。链集合是封闭的：新增一条链时，
//! 所有 `match ChainType` 的派发点都会在编译期报错，必须同步补齐。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// 链族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    /// EVM 兼容链 (Ethereum, BSC, Polygon, Arbitrum, ...)
    Evm,
    /// Tron
    Tron,
}

/// 链配置（静态常量）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain: ChainType,
    pub name: &'static str,
    pub symbol: &'static str,
    /// SLIP-44 coin type
    pub coin_type: u32,
}

const EVM_CONFIG: ChainConfig = ChainConfig {
    chain: ChainType::Evm,
    name: "Ethereum (EVM)",
    symbol: "ETH",
    coin_type: 60,
};

const TRON_CONFIG: ChainConfig = ChainConfig {
    chain: ChainType::Tron,
    name: "Tron",
    symbol: "TRX",
    coin_type: 195,
};

impl ChainType {
    /// 所有支持的链，顺序与演示输出一致
    pub const ALL: [ChainType; 2] = [ChainType::Tron, ChainType::Evm];

    pub fn config(self) -> &'static ChainConfig {
        match self {
            ChainType::Evm => &EVM_CONFIG,
            ChainType::Tron => &TRON_CONFIG,
        }
    }

    pub fn coin_type(self) -> u32 {
        self.config().coin_type
    }

    /// 规范名称（小写，用于配置与日志）
    pub fn as_str(self) -> &'static str {
        match self {
            ChainType::Evm => "evm",
            ChainType::Tron => "tron",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = WalletError;

    /// 解析链标识符（大小写不敏感，支持常见别名）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "evm" | "eth" | "ethereum" | "bsc" | "bnb" | "polygon" | "matic" | "arbitrum"
            | "optimism" | "avalanche" => Ok(ChainType::Evm),
            "tron" | "trx" => Ok(ChainType::Tron),
            _ => Err(WalletError::UnsupportedChain(s.to_string())),
        }
    }
}

/// 解析逗号分隔的链列表，例如 `"tron,evm"`
pub fn parse_chain_list(list: &str) -> Result<Vec<ChainType>, WalletError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ChainType::from_str)
        .collect()
}
