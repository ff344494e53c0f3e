//! Networks and the version headers of serialized extended keys.

use crate::{Error, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Chain a key belongs to. Baked into the version header of every serialized
/// extended key, so cross-network reuse is detectable at parse time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

/// Version header of a serialized extended key: {private, public} ×
/// {mainnet, testnet}. Anything else is rejected outright when parsing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Prefix {
    Xprv,
    Xpub,
    Tprv,
    Tpub,
}

impl Prefix {
    pub fn private_for(network: Network) -> Self {
        match network {
            Network::Mainnet => Prefix::Xprv,
            Network::Testnet => Prefix::Tprv,
        }
    }

    pub fn public_for(network: Network) -> Self {
        match network {
            Network::Mainnet => Prefix::Xpub,
            Network::Testnet => Prefix::Tpub,
        }
    }

    /// Header value, as written big-endian at the front of the record.
    pub fn version(self) -> u32 {
        match self {
            Prefix::Xprv => 0x0488_ade4,
            Prefix::Xpub => 0x0488_b21e,
            Prefix::Tprv => 0x0435_8394,
            Prefix::Tpub => 0x0435_87cf,
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.version().to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Result<Self> {
        match u32::from_be_bytes(bytes) {
            0x0488_ade4 => Ok(Prefix::Xprv),
            0x0488_b21e => Ok(Prefix::Xpub),
            0x0435_8394 => Ok(Prefix::Tprv),
            0x0435_87cf => Ok(Prefix::Tpub),
            _ => Err(Error::UnrecognizedVersion(bytes)),
        }
    }

    pub fn is_private(self) -> bool {
        matches!(self, Prefix::Xprv | Prefix::Tprv)
    }

    pub fn is_public(self) -> bool {
        !self.is_private()
    }

    pub fn network(self) -> Network {
        match self {
            Prefix::Xprv | Prefix::Xpub => Network::Mainnet,
            Prefix::Tprv | Prefix::Tpub => Network::Testnet,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prefix::Xprv => "xprv",
            Prefix::Xpub => "xpub",
            Prefix::Tprv => "tprv",
            Prefix::Tpub => "tpub",
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
