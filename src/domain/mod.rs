//! Domain 模块
//!
//! 助记词 → 派生路径 → 私钥 → 密钥对 → 地址

pub mod address;
pub mod chain_config;
pub mod derivation_path;
pub mod key_derivation;
pub mod keypair;
pub mod mnemonic;
pub mod multi_chain_wallet;


// 重新导出常用类型
pub use address::{format_address, validate_address};
pub use chain_config::{ChainConfig, ChainType};
pub use derivation_path::{format_path, format_path_for, DerivationPath};
pub use key_derivation::{derive_private_key, KeyMaterial};
pub use keypair::{reconstruct, KeyPair};
pub use mnemonic::{generate_mnemonic, parse_mnemonic, MnemonicPhrase};
pub use multi_chain_wallet::{
    DerivationOptions, DerivedWallet, MultiChainWalletService, WalletReport,
};
