//! Extended public keys

use hmac::Mac;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::{
    result::Result, types::*, ChildNumber, DerivationPath, Error, ExtendedKey, ExtendedKeyAttrs, ExtendedPrivateKey, Network,
    Prefix, PrivateKey, PublicKey,
};

/// Extended public keys derived using BIP32.
///
/// Generic around a [`PublicKey`] type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendedPublicKey<K: PublicKey> {
    /// Derived public key
    public_key: K,

    /// Extended key attributes.
    attrs: ExtendedKeyAttrs,

    /// Network the key was created for.
    network: Network,
}

impl<K> ExtendedPublicKey<K>
where
    K: PublicKey,
{
    /// Obtain the non-extended public key value `K`.
    pub fn public_key(&self) -> &K {
        &self.public_key
    }

    /// Get attributes for this key such as depth, parent fingerprint,
    /// child number, and chain code.
    pub fn attrs(&self) -> &ExtendedKeyAttrs {
        &self.attrs
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Compute a 4-byte key fingerprint for this extended public key.
    pub fn fingerprint(&self) -> KeyFingerprint {
        self.public_key().fingerprint()
    }

    /// Derive a child key for a particular [`ChildNumber`].
    ///
    /// Hardened child numbers need the parent private scalar and are
    /// rejected here; an invalid tweak surfaces as
    /// [`Error::InvalidChildKey`] exactly as in private derivation.
    pub fn derive_child(&self, child_number: ChildNumber) -> Result<Self> {
        if child_number.is_hardened() {
            return Err(Error::HardenedDerivationOnPublicKey);
        }

        let depth = self.attrs.depth.checked_add(1).ok_or(Error::Depth)?;

        let mut hmac = HmacSha512::new_from_slice(&self.attrs.chain_code)?;
        hmac.update(&self.public_key.to_bytes());
        hmac.update(&child_number.to_bytes());

        let result = hmac.finalize().into_bytes();
        let (tweak, chain_code) = result.split_at(KEY_SIZE);

        let public_key =
            self.public_key.derive_child(tweak.try_into()?).map_err(|_| Error::InvalidChildKey(child_number))?;

        let attrs = ExtendedKeyAttrs {
            parent_fingerprint: self.public_key.fingerprint(),
            child_number,
            chain_code: chain_code.try_into()?,
            depth,
        };

        Ok(ExtendedPublicKey { public_key, attrs, network: self.network })
    }

    /// Apply every segment of `path`, root-most first, under the same rooted
    /// path rule as private derivation.
    pub fn derive_path(self, path: &DerivationPath) -> Result<Self> {
        if path.is_rooted() && !self.attrs.is_master() {
            return Err(Error::RootedPathOnDerivedKey(path.to_string()));
        }

        path.iter().try_fold(self, |key, child_number| {
            key.derive_child(child_number).map_err(|source| Error::PathSegment {
                path: path.to_string(),
                segment: child_number,
                source: Box::new(source),
            })
        })
    }

    /// Serialize the raw public key as a byte array (e.g. SEC1-encoded).
    pub fn to_bytes(&self) -> PublicKeyBytes {
        self.public_key.to_bytes()
    }

    /// Serialize this key as an [`ExtendedKey`] record.
    pub fn to_extended_key(&self) -> ExtendedKey {
        ExtendedKey { prefix: Prefix::public_for(self.network), attrs: self.attrs.clone(), key_bytes: self.to_bytes() }
    }
}

impl<K> Display for ExtendedPublicKey<K>
where
    K: PublicKey,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_extended_key(), f)
    }
}

impl<K> From<&ExtendedPrivateKey<K>> for ExtendedPublicKey<K::PublicKey>
where
    K: PrivateKey,
{
    fn from(xprv: &ExtendedPrivateKey<K>) -> ExtendedPublicKey<K::PublicKey> {
        ExtendedPublicKey {
            public_key: xprv.private_key().public_key(),
            attrs: xprv.attrs().clone(),
            network: xprv.network(),
        }
    }
}

impl<K> FromStr for ExtendedPublicKey<K>
where
    K: PublicKey,
{
    type Err = Error;

    fn from_str(xpub: &str) -> Result<Self> {
        ExtendedKey::from_str(xpub)?.try_into()
    }
}

impl<K> TryFrom<ExtendedKey> for ExtendedPublicKey<K>
where
    K: PublicKey,
{
    type Error = Error;

    fn try_from(extended_key: ExtendedKey) -> Result<ExtendedPublicKey<K>> {
        if extended_key.prefix.is_public() {
            Ok(ExtendedPublicKey {
                public_key: PublicKey::from_bytes(extended_key.key_bytes)?,
                attrs: extended_key.attrs.clone(),
                network: extended_key.prefix.network(),
            })
        } else {
            Err(Error::InvalidKey(secp256k1::Error::InvalidPublicKey))
        }
    }
}
