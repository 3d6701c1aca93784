//! 日志脱敏
//! 助记词、私钥永不以明文进入日志事件

use serde::Serialize;

use crate::domain::multi_chain_wallet::{DerivedWallet, WalletReport};

/// 可脱敏trait
pub trait SensitiveRedact {
    fn redact(&self) -> String;
}

/// 脱敏十六进制字符串（显示前缀和后缀）
pub fn redact_hex_string(hex: &str, show_chars: usize) -> String {
    if hex.len() <= show_chars * 2 {
        return "*".repeat(hex.len());
    }

    let prefix = &hex[..show_chars];
    let suffix = &hex[hex.len() - show_chars..];
    format!("{}...{}", prefix, suffix)
}

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    if address.len() < 10 {
        return "*".repeat(address.len());
    }

    let prefix = &address[..6];
    let suffix = &address[address.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

/// 脱敏助记词（只保留词数）
pub fn redact_mnemonic(phrase: &str) -> String {
    format!("<{} words>", phrase.split_whitespace().count())
}

/// 派生结果脱敏
#[derive(Debug, Serialize)]
pub struct RedactedWallet {
    pub chain: String,
    pub derivation_path: String,
    pub private_key: String,
    pub address: String,
}

impl From<&DerivedWallet> for RedactedWallet {
    fn from(wallet: &DerivedWallet) -> Self {
        Self {
            chain: wallet.chain.to_string(),
            derivation_path: wallet.derivation_path.clone(),
            private_key: redact_hex_string(&wallet.private_key, 4),
            address: redact_address(&wallet.address),
        }
    }
}

impl SensitiveRedact for WalletReport {
    fn redact(&self) -> String {
        #[derive(Serialize)]
        struct RedactedReport {
            mnemonic: String,
            wallets: Vec<RedactedWallet>,
        }

        serde_json::to_string(&RedactedReport {
            mnemonic: redact_mnemonic(self.mnemonic.as_str()),
            wallets: self.wallets.iter().map(RedactedWallet::from).collect(),
        })
        .unwrap_or_else(|_| "{ redacted }".to_string())
    }
}
