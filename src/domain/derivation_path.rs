//! BIP44 派生路径
//!
//! 路径模板固定为 `m/44'/<coin_type>'/0'/0/<index>`，只有最后的地址索引可变。
//! 派生前必须先通过语法校验，错误路径立即以 `PathSyntax` 失败。

use std::{fmt, str::FromStr};

use crate::{
    domain::chain_config::ChainType,
    error::{Result, WalletError},
};

/// 硬化派生偏移量 (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP44 purpose
pub const BIP44_PURPOSE: u32 = 44;

/// 路径中的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    index: u32,
    hardened: bool,
}

impl ChildIndex {
    pub fn normal(index: u32) -> Option<Self> {
        (index < HARDENED_OFFSET).then_some(Self {
            index,
            hardened: false,
        })
    }

    pub fn hardened(index: u32) -> Option<Self> {
        (index < HARDENED_OFFSET).then_some(Self {
            index,
            hardened: true,
        })
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn is_hardened(self) -> bool {
        self.hardened
    }

    /// BIP32 编码后的索引（硬化时加上 2^31）
    pub fn to_bip32(self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// 已校验的派生路径
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    steps: Vec<ChildIndex>,
}

impl DerivationPath {
    /// 链的标准路径（解析一遍以校验索引范围）
    pub fn for_chain(chain: ChainType, index: u32) -> Result<Self> {
        format_path(chain, index).parse()
    }

    pub fn steps(&self) -> &[ChildIndex] {
        &self.steps
    }

    /// 最后一步的地址索引
    pub fn address_index(&self) -> Option<u32> {
        self.steps.last().map(|s| s.index())
    }

    /// 是否符合链的固定模板 `m/44'/<coin_type>'/0'/0/<index>`
    pub fn matches_template(&self, chain: ChainType) -> bool {
        match self.steps.as_slice() {
            [purpose, coin, account, change, index] => {
                purpose.is_hardened()
                    && purpose.index() == BIP44_PURPOSE
                    && coin.is_hardened()
                    && coin.index() == chain.coin_type()
                    && account.is_hardened()
                    && account.index() == 0
                    && !change.is_hardened()
                    && change.index() == 0
                    && !index.is_hardened()
            }
            _ => false,
        }
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix("m/")
            .ok_or_else(|| WalletError::path_syntax(path, "path must start with 'm/'"))?;

        let steps = rest
            .split('/')
            .enumerate()
            .map(|(pos, segment)| parse_segment(path, pos, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps })
    }
}

fn is_hardened_marker(c: char) -> bool {
    matches!(c, '\'' | 'h' | 'H')
}

fn parse_segment(path: &str, pos: usize, segment: &str) -> Result<ChildIndex> {
    let (digits, hardened) = match segment.strip_suffix(is_hardened_marker) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WalletError::path_syntax(
            path,
            format!("segment {} (`{}`) is not a number", pos, segment),
        ));
    }

    let index: u32 = digits.parse().map_err(|_| {
        WalletError::path_syntax(path, format!("segment {} (`{}`) overflows u32", pos, segment))
    })?;

    let child = if hardened {
        ChildIndex::hardened(index)
    } else {
        ChildIndex::normal(index)
    };

    child.ok_or_else(|| {
        WalletError::path_syntax(
            path,
            format!("segment {} index {} must be below 2^31", pos, index),
        )
    })
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

/// 生成链的标准派生路径
///
/// # Arguments
/// * `chain` - 链类型
/// * `index` - 地址索引
pub fn format_path(chain: ChainType, index: u32) -> String {
    format!("m/44'/{}'/0'/0/{}", chain.coin_type(), index)
}

/// 按链标识符生成路径；未知链返回 `UnsupportedChain` 而不是空字符串
pub fn format_path_for(chain: &str, index: u32) -> Result<String> {
    let chain: ChainType = chain.parse()?;
    Ok(format_path(chain, index))
}
