//! Shared type aliases for the key-material layer.

/// HMAC-SHA512 instance driving master and child derivation.
pub type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Size of a private scalar and of a chain code, in bytes.
pub const KEY_SIZE: usize = 32;

/// Chain code: entropy distinct from the key itself, mixed into every child
/// derivation as the HMAC key.
pub type ChainCode = [u8; KEY_SIZE];

/// Depth of a key within the derivation hierarchy.
pub type Depth = u8;

/// Hash160 (SHA-256 then RIPEMD-160) of a compressed public key.
pub type KeyId = [u8; 20];

/// First four bytes of a [`KeyId`], linking a child record to its parent.
pub type KeyFingerprint = [u8; 4];

/// Serialized private scalar.
pub type PrivateKeyBytes = [u8; KEY_SIZE];

/// SEC1 compressed point.
pub type PublicKeyBytes = [u8; KEY_SIZE + 1];
