//! BIP39 助记词生成
//!
//! 使用操作系统 CSPRNG 产生 256 位熵，编码为 24 词英文助记词。
//! 每次调用都是独立且不可重放的，它是下游所有密钥的信任根。

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, WalletError};

/// 熵长度（位）
pub const ENTROPY_BITS: usize = 256;

/// 熵长度（字节）
pub const ENTROPY_BYTES: usize = ENTROPY_BITS / 8;

/// 256 位熵对应的助记词词数
pub const WORD_COUNT: usize = 24;

/// 助记词
///
/// Debug 输出永不包含助记词本身，drop 时内存被清零。
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MnemonicPhrase {
    phrase: String,
}

impl MnemonicPhrase {
    /// 明文助记词（仅用于派生与最终报告）
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// 生成新的 24 词助记词
pub fn generate_mnemonic() -> Result<MnemonicPhrase> {
    generate_mnemonic_from(&mut OsRng)
}

/// 使用指定随机源生成助记词
pub fn generate_mnemonic_from<R: RngCore + ?Sized>(rng: &mut R) -> Result<MnemonicPhrase> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
    rng.try_fill_bytes(&mut entropy[..])
        .map_err(|e| WalletError::Entropy(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..])
        .map_err(|e| WalletError::Encoding(e.to_string()))?;

    tracing::debug!(words = mnemonic.word_count(), "generated mnemonic");

    Ok(MnemonicPhrase {
        phrase: mnemonic.to_string(),
    })
}

/// 解析并校验已有助记词（词表 + 校验和）
pub fn parse_mnemonic(phrase: &str) -> Result<MnemonicPhrase> {
    let mnemonic = Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| WalletError::Encoding(e.to_string()))?;

    Ok(MnemonicPhrase {
        phrase: mnemonic.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 固定输出的随机源
    struct FixedRng(u8);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    /// 永远失败的随机源
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "device not available",
            )))
        }
    }

    #[test]
    fn test_generate_24_words() {
        let mnemonic = generate_mnemonic().unwrap();
        assert_eq!(mnemonic.word_count(), WORD_COUNT);
        // 生成的助记词必须能通过校验
        assert!(parse_mnemonic(mnemonic.as_str()).is_ok());
    }

    #[test]
    fn test_generate_is_not_replayed() {
        let a = generate_mnemonic().unwrap();
        let b = generate_mnemonic().unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_zero_entropy_vector() {
        // BIP39 测试向量：32 字节全零熵
        let mnemonic = generate_mnemonic_from(&mut FixedRng(0)).unwrap();
        let expected = format!("{} art", ["abandon"; 23].join(" "));
        assert_eq!(mnemonic.as_str(), expected);
    }

    #[test]
    fn test_entropy_failure() {
        let err = generate_mnemonic_from(&mut BrokenRng).unwrap_err();
        assert!(matches!(err, WalletError::Entropy(_)));
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let err = parse_mnemonic(&["abandon"; 12].join(" ")).unwrap_err();
        assert!(matches!(err, WalletError::Encoding(_)));

        let err = parse_mnemonic("not a real mnemonic phrase").unwrap_err();
        assert!(matches!(err, WalletError::Encoding(_)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let mnemonic = generate_mnemonic_from(&mut FixedRng(0)).unwrap();
        let debug = format!("{:?}", mnemonic);
        assert!(!debug.contains("abandon"));
        assert!(debug.contains("REDACTED"));
    }
}
