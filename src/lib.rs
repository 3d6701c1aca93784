//! IronCore HD - 多链 HD 钱包派生
//!
//! 非托管模式：密钥只在内存中生成并返回给调用方，不落盘

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// 重新导出常用类型
pub use error::{ErrorCode, Result, WalletError};

pub mod prelude {
    pub use crate::{
        domain::{
            ChainType, DerivationOptions, DerivedWallet, MultiChainWalletService, WalletReport,
        },
        error::{ErrorCode, WalletError},
    };
}
