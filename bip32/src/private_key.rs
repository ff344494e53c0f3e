//! Private key capability over the curve backend.

use secp256k1::Scalar;

use crate::{PrivateKeyBytes, PublicKey, Result};

/// The private half of the elliptic-curve capability this crate derives
/// against. Implementations own scalar validation and tweak addition; the
/// derivation engine never inspects curve internals.
pub trait PrivateKey: Sized {
    type PublicKey: PublicKey;

    /// Parse a scalar from its serialized form, rejecting zero and values at
    /// or past the curve order.
    fn from_bytes(bytes: &PrivateKeyBytes) -> Result<Self>;

    fn to_bytes(&self) -> PrivateKeyBytes;

    /// `self + tweak (mod n)`. Errors on an out-of-range tweak or a zero
    /// result.
    fn derive_child(&self, tweak: PrivateKeyBytes) -> Result<Self>;

    fn public_key(&self) -> Self::PublicKey;
}

impl PrivateKey for secp256k1::SecretKey {
    type PublicKey = secp256k1::PublicKey;

    fn from_bytes(bytes: &PrivateKeyBytes) -> Result<Self> {
        Ok(secp256k1::SecretKey::from_slice(bytes)?)
    }

    fn to_bytes(&self) -> PrivateKeyBytes {
        self.secret_bytes()
    }

    fn derive_child(&self, tweak: PrivateKeyBytes) -> Result<Self> {
        let tweak = Scalar::from_be_bytes(tweak)?;
        Ok(self.add_tweak(&tweak)?)
    }

    fn public_key(&self) -> Self::PublicKey {
        secp256k1::PublicKey::from_secret_key_global(self)
    }
}
