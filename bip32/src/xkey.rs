//! Parser for extended key types (i.e. `xprv` and `xpub`)

use crate::{ChildNumber, Error, ExtendedKeyAttrs, Prefix, Result, KEY_SIZE};
use sable_codec::{base58check, endian};
use std::fmt::{self, Display};
use std::str::{self, FromStr};
use zeroize::{Zeroize, Zeroizing};

/// Serialized extended key (e.g. `xprv` and `xpub`).
#[derive(Clone)]
pub struct ExtendedKey {
    /// [`Prefix`] (a.k.a. "version") of the key (e.g. `xprv`, `xpub`)
    pub prefix: Prefix,

    /// Extended key attributes.
    pub attrs: ExtendedKeyAttrs,

    /// Key material: a private scalar behind its zero pad byte, or a SEC1
    /// compressed point.
    pub key_bytes: [u8; KEY_SIZE + 1],
}

impl ExtendedKey {
    /// Size of an extended key when deserialized into bytes from Base58.
    pub const BYTE_SIZE: usize = 78;

    /// Maximum size of the Base58Check text form.
    pub const MAX_BASE58_SIZE: usize = base58check::max_encoded_len(Self::BYTE_SIZE);

    /// Write the Base58Check form to the provided buffer, returning a `&str`
    /// containing the serialized data.
    ///
    /// Note that this type also impls [`Display`] and therefore you can
    /// obtain an owned string by calling `to_string()`.
    pub fn write_base58<'a>(&self, buffer: &'a mut [u8; Self::MAX_BASE58_SIZE]) -> Result<&'a str> {
        let mut bytes = [0u8; Self::BYTE_SIZE];
        endian::write_u32_be(self.prefix.version(), &mut bytes[..4])?;
        bytes[4] = self.attrs.depth;
        bytes[5..9].copy_from_slice(&self.attrs.parent_fingerprint);
        bytes[9..13].copy_from_slice(&self.attrs.child_number.to_bytes());
        bytes[13..45].copy_from_slice(&self.attrs.chain_code);
        bytes[45..78].copy_from_slice(&self.key_bytes);

        let base58_len = base58check::encode_check_into(&bytes, buffer.as_mut_slice())?;
        bytes.zeroize();

        Ok(str::from_utf8(&buffer[..base58_len])?)
    }
}

impl Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; Self::MAX_BASE58_SIZE];
        self.write_base58(&mut buf).map_err(|_| fmt::Error).and_then(|base58| f.write_str(base58))
    }
}

impl FromStr for ExtendedKey {
    type Err = Error;

    fn from_str(base58: &str) -> Result<Self> {
        let bytes = Zeroizing::new(base58check::decode_check(base58)?);

        if bytes.len() != Self::BYTE_SIZE {
            return Err(Error::UnexpectedLength(bytes.len()));
        }

        let prefix = Prefix::from_bytes(bytes[..4].try_into()?)?;
        let depth = bytes[4];
        let parent_fingerprint = bytes[5..9].try_into()?;
        let child_number = ChildNumber::from_bytes(bytes[9..13].try_into()?);
        let chain_code = bytes[13..45].try_into()?;
        let key_bytes = bytes[45..78].try_into()?;

        let attrs = ExtendedKeyAttrs { depth, parent_fingerprint, child_number, chain_code };
        if attrs.depth == 0 && !attrs.is_master() {
            return Err(Error::InvalidDerivationData);
        }

        Ok(ExtendedKey { prefix, attrs, key_bytes })
    }
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        self.key_bytes.zeroize();
    }
}
