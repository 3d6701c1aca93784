//! secp256k1 密钥对重建

use k256::ecdsa::{SigningKey, VerifyingKey};

use crate::{
    domain::key_derivation::PRIVATE_KEY_LEN,
    error::{Result, WalletError},
};

/// 未压缩公钥长度（0x04 前缀 + X + Y）
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// 私钥 + 对应公钥
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn public_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// 未压缩 SEC1 编码（65 字节，首字节 0x04）
    pub fn public_key_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        let point = self.verifying_key.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// 公钥 X‖Y（去掉 0x04 前缀）的 hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key_uncompressed()[1..])
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// 从 32 字节私钥重建密钥对
///
/// 长度必须正好是 32 字节；零或不小于曲线阶的标量被拒绝。
pub fn reconstruct(private_key: &[u8]) -> Result<KeyPair> {
    if private_key.len() != PRIVATE_KEY_LEN {
        return Err(WalletError::InvalidKey(format!(
            "expected {} bytes, got {}",
            PRIVATE_KEY_LEN,
            private_key.len()
        )));
    }

    let signing_key = SigningKey::from_slice(private_key)
        .map_err(|_| WalletError::InvalidKey("scalar is zero or exceeds curve order".into()))?;
    let verifying_key = VerifyingKey::from(&signing_key);

    Ok(KeyPair {
        signing_key,
        verifying_key,
    })
}
