//! 地址生成与格式校验
//!
//! 两条链都从未压缩公钥 X‖Y 的 Keccak256 取后 20 字节：
//! - EVM：`0x` + 40 位 hex，EIP-55 大小写校验
//! - Tron：版本字节 0x41 + 20 字节，Base58Check 编码（T 开头）

use k256::ecdsa::VerifyingKey;
use sha3::{Digest, Keccak256};

use crate::{domain::chain_config::ChainType, error::Result};

/// Tron 主网地址版本字节
pub const TRON_ADDRESS_VERSION: u8 = 0x41;

/// 地址字节长度
pub const ADDRESS_LEN: usize = 20;

/// 公钥 → 链地址
pub fn format_address(public_key: &VerifyingKey, chain: ChainType) -> String {
    let address = address_bytes(public_key);
    match chain {
        ChainType::Evm => to_checksum_address(&address),
        ChainType::Tron => to_tron_address(&address),
    }
}

/// 按链标识符生成地址；未知链返回 `UnsupportedChain`
pub fn format_address_for(public_key: &VerifyingKey, chain: &str) -> Result<String> {
    let chain: ChainType = chain.parse()?;
    Ok(format_address(public_key, chain))
}

/// Keccak256(X‖Y) 的后 20 字节
pub fn address_bytes(public_key: &VerifyingKey) -> [u8; ADDRESS_LEN] {
    let point = public_key.to_encoded_point(false);
    // 去掉 0x04 前缀
    let hash = Keccak256::digest(&point.as_bytes()[1..]);

    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&hash[12..]);
    address
}

/// EIP-55 校验和地址
/// https://eips.ethereum.org/EIPS/eip-55
pub fn to_checksum_address(address: &[u8; ADDRESS_LEN]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let checksummed: String = lower
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            if ch.is_ascii_alphabetic() && hash_nibble(&hash, i) >= 8 {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        })
        .collect();

    format!("0x{}", checksummed)
}

/// Tron Base58Check 地址
pub fn to_tron_address(address: &[u8; ADDRESS_LEN]) -> String {
    let mut payload = Vec::with_capacity(ADDRESS_LEN + 1);
    payload.push(TRON_ADDRESS_VERSION);
    payload.extend_from_slice(address);

    bs58::encode(payload).with_check().into_string()
}

fn hash_nibble(hash: &[u8], i: usize) -> u8 {
    let byte = hash[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

/// 验证地址格式
///
/// - EVM: `0x` + 40 hex；包含大写字母时校验 EIP-55
/// - Tron: Base58Check 解码为 21 字节且版本字节为 0x41
pub fn validate_address(chain: ChainType, address: &str) -> bool {
    match chain {
        ChainType::Evm => validate_evm_address(address),
        ChainType::Tron => validate_tron_address(address),
    }
}

fn validate_evm_address(address: &str) -> bool {
    let Some(hex_part) = address.strip_prefix("0x") else {
        return false;
    };

    if hex_part.len() != ADDRESS_LEN * 2 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    // 全小写或全大写视为未带校验和
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    if !(has_upper && has_lower) {
        return true;
    }

    let mut bytes = [0u8; ADDRESS_LEN];
    if hex::decode_to_slice(hex_part, &mut bytes).is_err() {
        return false;
    }
    to_checksum_address(&bytes) == address
}

fn validate_tron_address(address: &str) -> bool {
    if !address.starts_with('T') {
        return false;
    }

    match bs58::decode(address)
        .with_check(Some(TRON_ADDRESS_VERSION))
        .into_vec()
    {
        Ok(decoded) => decoded.len() == ADDRESS_LEN + 1,
        Err(_) => false,
    }
}
