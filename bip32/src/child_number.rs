//! Child numbers: the per-parent index of a derived key.

use crate::{Error, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Index of a child key under its parent, with the top bit selecting hardened
/// derivation.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(transparent)]
pub struct ChildNumber(pub u32);

impl ChildNumber {
    /// Hardened derivation flag.
    pub const HARDENED_FLAG: u32 = 1 << 31;

    /// Build a child number from an index and a hardened flag. The index must
    /// leave the flag bit clear.
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index & Self::HARDENED_FLAG != 0 {
            return Err(Error::ChildNumber(format!("index {index} collides with the hardened flag")));
        }
        Ok(ChildNumber(if hardened { index | Self::HARDENED_FLAG } else { index }))
    }

    /// Index within the hardened or non-hardened range, flag bit cleared.
    pub fn index(&self) -> u32 {
        self.0 & !Self::HARDENED_FLAG
    }

    pub fn is_hardened(&self) -> bool {
        self.0 & Self::HARDENED_FLAG != 0
    }

    /// Big-endian wire form, as hashed into child derivation.
    pub fn to_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        ChildNumber(u32::from_be_bytes(bytes))
    }
}

impl From<u32> for ChildNumber {
    fn from(value: u32) -> Self {
        ChildNumber(value)
    }
}

impl Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())?;
        if self.is_hardened() {
            write!(f, "'")?;
        }
        Ok(())
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(child: &str) -> Result<ChildNumber> {
        let (index, hardened) = match child.strip_suffix('\'') {
            Some(index) => (index, true),
            None => (child, false),
        };

        let index = index.parse::<u32>().map_err(|_| Error::ChildNumber(format!("`{child}` is not a decimal index")))?;

        ChildNumber::new(index, hardened)
    }
}
