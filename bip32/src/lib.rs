//! Hierarchical-deterministic key derivation for the Sable wallet: extended
//! private and public keys, derivation paths, and the mnemonic seed-phrase
//! engine, built over an opaque elliptic-curve key capability.
//!
//! The curve itself stays behind the [`PrivateKey`] and [`PublicKey`] traits;
//! every byte-level encoding concern (Base58Check, endian fields, bit
//! packing) lives in `sable-codec`.

pub use secp256k1;
pub use secp256k1::SecretKey;

mod attrs;
mod child_number;
mod error;
mod mnemonic;
mod path;
mod prefix;
mod private_key;
mod public_key;
mod result;
pub mod types;
mod xkey;
mod xprivate_key;
mod xpublic_key;

pub use attrs::ExtendedKeyAttrs;
pub use child_number::ChildNumber;
pub use error::Error;
pub use mnemonic::{Language, Mnemonic, Seed, WordCount};
pub use path::DerivationPath;
pub use prefix::{Network, Prefix};
pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use result::Result;
pub use types::*;
pub use xkey::ExtendedKey;
pub use xprivate_key::ExtendedPrivateKey;
pub use xpublic_key::ExtendedPublicKey;
