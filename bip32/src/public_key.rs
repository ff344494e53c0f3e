//! Public key capability over the curve backend.

use ripemd::Ripemd160;
use secp256k1::Scalar;
use sha2::{Digest, Sha256};

use crate::{KeyFingerprint, KeyId, PrivateKeyBytes, PublicKeyBytes, Result};

/// The public half of the elliptic-curve capability.
pub trait PublicKey: Sized {
    fn from_bytes(bytes: PublicKeyBytes) -> Result<Self>;

    /// SEC1 compressed form.
    fn to_bytes(&self) -> PublicKeyBytes;

    /// `self + tweak·G`. Errors on an out-of-range tweak or the point at
    /// infinity.
    fn derive_child(&self, tweak: PrivateKeyBytes) -> Result<Self>;

    /// Hash160 of the compressed point: the account/address fingerprinting
    /// value.
    fn identifier(&self) -> KeyId {
        Ripemd160::digest(Sha256::digest(self.to_bytes())).into()
    }

    /// First four identifier bytes, linking a child record to its parent.
    fn fingerprint(&self) -> KeyFingerprint {
        let mut fingerprint = KeyFingerprint::default();
        fingerprint.copy_from_slice(&self.identifier()[..4]);
        fingerprint
    }
}

impl PublicKey for secp256k1::PublicKey {
    fn from_bytes(bytes: PublicKeyBytes) -> Result<Self> {
        Ok(secp256k1::PublicKey::from_slice(&bytes)?)
    }

    fn to_bytes(&self) -> PublicKeyBytes {
        self.serialize()
    }

    fn derive_child(&self, tweak: PrivateKeyBytes) -> Result<Self> {
        let tweak = Scalar::from_be_bytes(tweak)?;
        Ok(self.add_exp_tweak(&secp256k1::SECP256K1, &tweak)?)
    }
}
