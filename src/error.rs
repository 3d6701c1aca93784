//! 派生流水线错误类型
//!
//! 每个阶段的失败都以显式错误向调用方传播，不再静默返回

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

/// 钱包派生错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// 安全随机源不可用
    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    /// 熵无法编码为助记词，或助记词校验失败
    #[error("mnemonic encoding failed: {0}")]
    Encoding(String),

    /// 助记词 → 种子 → 主密钥 失败
    #[error("seed derivation failed: {0}")]
    SeedDerivation(String),

    /// 派生路径语法错误
    #[error("invalid derivation path `{path}`: {reason}")]
    PathSyntax { path: String, reason: String },

    /// 路径中某一步子密钥派生失败
    #[error("derivation failed at step {step} of `{path}`: {reason}")]
    PathDerivation {
        path: String,
        step: usize,
        reason: String,
    },

    /// 私钥长度错误、为零或超出曲线阶
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// 不支持的链
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),
}

/// 标准错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 助记词（1xxx）
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    EntropyUnavailable = 1001,
    InvalidMnemonic = 1002,

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 派生（2xxx）
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    SeedDerivationFailed = 2001,
    InvalidDerivationPath = 2002,
    ChildDerivationFailed = 2003,

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 密钥与地址（3xxx）
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    InvalidPrivateKey = 3001,
    ChainNotSupported = 3002,
}

impl ErrorCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl WalletError {
    pub fn path_syntax(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathSyntax {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Entropy(_) => ErrorCode::EntropyUnavailable,
            Self::Encoding(_) => ErrorCode::InvalidMnemonic,
            Self::SeedDerivation(_) => ErrorCode::SeedDerivationFailed,
            Self::PathSyntax { .. } => ErrorCode::InvalidDerivationPath,
            Self::PathDerivation { .. } => ErrorCode::ChildDerivationFailed,
            Self::InvalidKey(_) => ErrorCode::InvalidPrivateKey,
            Self::UnsupportedChain(_) => ErrorCode::ChainNotSupported,
        }
    }

    /// 出错的流水线阶段（用于日志与报告）
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Entropy(_) | Self::Encoding(_) => "mnemonic",
            Self::UnsupportedChain(_) => "chain",
            Self::PathSyntax { .. } => "path",
            Self::SeedDerivation(_) | Self::PathDerivation { .. } => "derivation",
            Self::InvalidKey(_) => "keypair",
        }
    }
}
