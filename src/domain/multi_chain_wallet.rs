//! 多链钱包服务
//!
//! 编排整条派生流水线：助记词 → 路径 → 私钥 → 密钥对 → 地址。
//! 任一阶段失败都会中止当前请求并把错误返回给调用方，不产生部分结果。

use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    domain::{
        address::format_address,
        chain_config::ChainType,
        derivation_path::DerivationPath,
        key_derivation::derive_private_key_at,
        keypair::reconstruct,
        mnemonic::{generate_mnemonic, parse_mnemonic, MnemonicPhrase},
    },
    error::Result,
    infrastructure::log_redact::redact_address,
};

/// 派生参数
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DerivationOptions {
    /// BIP39 passphrase（默认空字符串；不同 passphrase 得到完全不同的钱包）
    pub passphrase: String,
    /// 地址索引（路径最后一级）
    pub address_index: u32,
}

impl std::fmt::Debug for DerivationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationOptions")
            .field("passphrase", &(!self.passphrase.is_empty()))
            .field("address_index", &self.address_index)
            .finish()
    }
}

/// 单条链的派生结果
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct DerivedWallet {
    #[zeroize(skip)]
    pub chain: ChainType,
    /// 派生路径
    pub derivation_path: String,
    /// 私钥 (hex)
    pub private_key: String,
    /// 未压缩公钥 X‖Y (hex)
    pub public_key: String,
    /// 地址
    pub address: String,
}

impl std::fmt::Debug for DerivedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedWallet")
            .field("chain", &self.chain)
            .field("derivation_path", &self.derivation_path)
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .field("address", &self.address)
            .finish()
    }
}

/// 一次运行的完整结果：同一个助记词派生出的所有链
#[derive(Debug, Clone)]
pub struct WalletReport {
    pub mnemonic: MnemonicPhrase,
    pub wallets: Vec<DerivedWallet>,
}

impl WalletReport {
    pub fn wallet(&self, chain: ChainType) -> Option<&DerivedWallet> {
        self.wallets.iter().find(|w| w.chain == chain)
    }
}

/// 多链钱包服务
#[derive(Debug, Clone, Default)]
pub struct MultiChainWalletService {
    options: DerivationOptions,
}

impl MultiChainWalletService {
    /// 默认参数：空 passphrase，索引 0
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DerivationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DerivationOptions {
        &self.options
    }

    /// 生成新助记词，并为每条请求的链派生钱包
    ///
    /// # 流程
    /// 1. 生成一次助记词（256 位熵）
    /// 2. 依次为每条链派生，任一失败立即返回错误
    pub fn create(&self, chains: &[ChainType]) -> Result<WalletReport> {
        let mnemonic = generate_mnemonic()?;
        self.create_with_mnemonic(mnemonic, chains)
    }

    /// 用已有助记词为每条链派生钱包
    pub fn create_with_mnemonic(
        &self,
        mnemonic: MnemonicPhrase,
        chains: &[ChainType],
    ) -> Result<WalletReport> {
        let wallets = chains
            .iter()
            .map(|&chain| self.derive(chain, &mnemonic))
            .collect::<Result<Vec<_>>>()?;

        Ok(WalletReport { mnemonic, wallets })
    }

    /// 校验助记词文本后派生
    pub fn derive_from_phrase(&self, chain: ChainType, phrase: &str) -> Result<DerivedWallet> {
        let mnemonic = parse_mnemonic(phrase)?;
        self.derive(chain, &mnemonic)
    }

    /// 为单条链派生钱包
    pub fn derive(&self, chain: ChainType, mnemonic: &MnemonicPhrase) -> Result<DerivedWallet> {
        self.derive_inner(chain, mnemonic).map_err(|err| {
            tracing::warn!(
                chain = %chain,
                stage = err.stage(),
                code = err.code().as_u32(),
                error = %err,
                "wallet derivation aborted"
            );
            err
        })
    }

    fn derive_inner(&self, chain: ChainType, mnemonic: &MnemonicPhrase) -> Result<DerivedWallet> {
        let path = DerivationPath::for_chain(chain, self.options.address_index)?;
        debug_assert!(path.matches_template(chain));

        let private_key =
            derive_private_key_at(mnemonic.as_str(), &path, &self.options.passphrase)?;
        let key_pair = reconstruct(private_key.as_bytes())?;
        let address = format_address(key_pair.public_key(), chain);

        tracing::info!(
            chain = %chain,
            path = %path,
            address = %redact_address(&address),
            "derived wallet"
        );

        Ok(DerivedWallet {
            chain,
            derivation_path: path.to_string(),
            private_key: private_key.to_hex(),
            public_key: key_pair.public_key_hex(),
            address,
        })
    }
}
