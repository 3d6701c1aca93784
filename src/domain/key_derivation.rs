//! 私钥派生
//!
//! 助记词 (+ passphrase) → BIP39 种子 → BIP32 主密钥 → 按路径逐级派生。
//! 某一级出现无效子密钥时直接失败，不跳到下一个索引（跳过会静默改变地址）。

use std::fmt;

use bip39::{Language, Mnemonic};
use coins_bip32::prelude::*;
use k256::ecdsa::SigningKey;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    domain::derivation_path::DerivationPath,
    error::{Result, WalletError},
};

/// secp256k1 标量长度
pub const PRIVATE_KEY_LEN: usize = 32;

/// 派生出的私钥原始字节，drop 时清零
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: [u8; PRIVATE_KEY_LEN],
}

impl KeyMaterial {
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// 从助记词和路径字符串派生私钥
///
/// # Arguments
/// * `mnemonic` - BIP39 助记词
/// * `path` - 派生路径，如 `m/44'/60'/0'/0/0`
/// * `passphrase` - BIP39 passphrase（默认空字符串）
pub fn derive_private_key(mnemonic: &str, path: &str, passphrase: &str) -> Result<KeyMaterial> {
    // 先校验路径语法，错误路径不做任何派生
    let path: DerivationPath = path.parse()?;
    derive_private_key_at(mnemonic, &path, passphrase)
}

/// 从助记词和已解析路径派生私钥
pub fn derive_private_key_at(
    mnemonic: &str,
    path: &DerivationPath,
    passphrase: &str,
) -> Result<KeyMaterial> {
    let seed = mnemonic_to_seed(mnemonic, passphrase)?;

    let master_key = XPriv::root_from_seed(&seed[..], None)
        .map_err(|e| WalletError::SeedDerivation(format!("master key: {}", e)))?;

    let derived_key = path
        .steps()
        .iter()
        .enumerate()
        .try_fold(master_key, |key, (step, child)| {
            key.derive_child(child.to_bip32())
                .map_err(|e| WalletError::PathDerivation {
                    path: path.to_string(),
                    step,
                    reason: e.to_string(),
                })
        })?;

    let signing_key: &SigningKey = derived_key.as_ref();
    let bytes: [u8; PRIVATE_KEY_LEN] = signing_key.to_bytes().into();

    tracing::debug!(path = %path, "derived private key");

    Ok(KeyMaterial { bytes })
}

/// 助记词 → 64 字节种子
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Result<Zeroizing<[u8; 64]>> {
    let mnemonic = Mnemonic::parse_in(Language::English, mnemonic)
        .map_err(|e| WalletError::SeedDerivation(format!("invalid mnemonic: {}", e)))?;

    Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_bip39_seed_vector() {
        // BIP39 官方向量（passphrase = "TREZOR"）
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(&seed[..]),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_ethereum_private_key_vector() {
        let key = derive_private_key(TEST_MNEMONIC, "m/44'/60'/0'/0/0", "").unwrap();
        assert_eq!(
            key.to_hex(),
            "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_private_key(TEST_MNEMONIC, "m/44'/195'/0'/0/0", "").unwrap();
        let b = derive_private_key(TEST_MNEMONIC, "m/44'/195'/0'/0/0", "").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_passphrase_changes_key() {
        let plain = derive_private_key(TEST_MNEMONIC, "m/44'/60'/0'/0/0", "").unwrap();
        let protected = derive_private_key(TEST_MNEMONIC, "m/44'/60'/0'/0/0", "TREZOR").unwrap();
        assert_ne!(plain.as_bytes(), protected.as_bytes());
        assert_eq!(
            protected.to_hex(),
            "62f1d86b246c81bdd8f6c166d56896a4a5e1eddbcaebe06480e5c0bc74c28224"
        );
    }

    #[test]
    fn test_path_syntax_checked_first() {
        // 助记词也无效，但路径错误必须先报出
        let err = derive_private_key("garbage", "m/44'/abc", "").unwrap_err();
        assert!(matches!(err, WalletError::PathSyntax { .. }));
    }

    #[test]
    fn test_invalid_mnemonic() {
        let err = derive_private_key("abandon abandon", "m/44'/60'/0'/0/0", "").unwrap_err();
        assert!(matches!(err, WalletError::SeedDerivation(_)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = derive_private_key(TEST_MNEMONIC, "m/44'/60'/0'/0/0", "").unwrap();
        assert_eq!(format!("{:?}", key), "KeyMaterial([REDACTED])");
    }
}
