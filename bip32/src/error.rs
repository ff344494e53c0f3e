//! Error type.

use crate::{ChildNumber, ExtendedKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Base58Check and byte-codec failures.
    #[error(transparent)]
    Codec(#[from] sable_codec::Error),

    /// Malformed scalar or point, or a private record without its zero pad.
    #[error("invalid key material: {0}")]
    InvalidKey(#[from] secp256k1::Error),

    #[error("tweak scalar out of range: {0}")]
    ScalarOutOfRange(#[from] secp256k1::scalar::OutOfRangeError),

    #[error(transparent)]
    Hmac(#[from] hmac::digest::InvalidLength),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// Extended key record field of the wrong width.
    #[error("malformed extended key record: {0}")]
    Decode(#[from] std::array::TryFromSliceError),

    #[error("decoded extended key is {0} bytes, expected {expected}", expected = ExtendedKey::BYTE_SIZE)]
    UnexpectedLength(usize),

    #[error("unrecognized extended key version {0:02x?}")]
    UnrecognizedVersion([u8; 4]),

    /// A record claiming `depth == 0` with a nonzero parent fingerprint or
    /// child number.
    #[error("master key record carries nonzero parent metadata")]
    InvalidDerivationData,

    #[error("seed length {0} is outside the supported 16..=64 byte range")]
    SeedLength(usize),

    #[error("maximum derivation depth exceeded")]
    Depth,

    /// The statistically near-impossible derivation failure: the tweak fell
    /// at or past the curve order, or the child key degenerated. Carries the
    /// failing index so the caller can retry with `child_number + 1`.
    #[error("derived key material is invalid at child number {0}; retry with the next index")]
    InvalidChildKey(ChildNumber),

    #[error("hardened derivation requires a private key")]
    HardenedDerivationOnPublicKey,

    #[error("rooted path `{0}` can only be derived from a master key")]
    RootedPathOnDerivedKey(String),

    /// [`Error::InvalidChildKey`] (or any other step failure) wrapped with
    /// the offending segment of a multi-step derivation.
    #[error("cannot derive segment {segment} of `{path}`: {source}")]
    PathSegment { path: String, segment: ChildNumber, source: Box<Error> },

    #[error("invalid child number: {0}")]
    ChildNumber(String),

    #[error("invalid derivation path `{0}`")]
    Path(String),

    #[error("mnemonic word count {0} is not supported")]
    WordCount(usize),

    #[error("`{0}` is not a word in the active wordlist")]
    InvalidWord(String),

    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    #[error("entropy length {0} is not a positive multiple of 4 bytes")]
    EntropyLength(usize),
}
