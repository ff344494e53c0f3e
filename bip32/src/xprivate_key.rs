use hmac::Mac;
use std::fmt::{self, Debug};
use std::str::FromStr;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    result::Result, types::*, ChildNumber, DerivationPath, Error, ExtendedKey, ExtendedKeyAttrs, ExtendedPublicKey, Network,
    Prefix, PrivateKey, PublicKey,
};

/// ASCII domain separator keying the master-key HMAC.
const MASTER_KEY_DOMAIN: &[u8; 12] = b"Bitcoin seed";

/// Extended private keys derived using BIP32.
///
/// Generic around a [`PrivateKey`] type.
#[derive(Clone)]
pub struct ExtendedPrivateKey<K: PrivateKey> {
    /// Derived private key
    private_key: K,

    /// Extended key attributes.
    attrs: ExtendedKeyAttrs,

    /// Network the key was created for.
    network: Network,
}

impl<K> ExtendedPrivateKey<K>
where
    K: PrivateKey,
{
    /// Maximum derivation depth.
    pub const MAX_DEPTH: Depth = u8::MAX;

    /// Create the root extended key for the given seed value.
    pub fn new<S>(seed: S, network: Network) -> Result<Self>
    where
        S: AsRef<[u8]>,
    {
        if !(16..=64).contains(&seed.as_ref().len()) {
            return Err(Error::SeedLength(seed.as_ref().len()));
        }

        let mut hmac = HmacSha512::new_from_slice(MASTER_KEY_DOMAIN)?;
        hmac.update(seed.as_ref());

        let result = hmac.finalize().into_bytes();
        let (secret_key, chain_code) = result.split_at(KEY_SIZE);
        let private_key = PrivateKey::from_bytes(secret_key.try_into()?)?;

        Ok(ExtendedPrivateKey { private_key, attrs: ExtendedKeyAttrs::master(chain_code.try_into()?), network })
    }

    /// Derive a child key for a particular [`ChildNumber`].
    ///
    /// A tweak at or past the curve order, or a zero child scalar, surfaces
    /// as [`Error::InvalidChildKey`] carrying the failing index; per the
    /// derivation standard this occurs with probability below 2^-127 and the
    /// caller recovers by retrying with `child_number + 1`.
    pub fn derive_child(&self, child_number: ChildNumber) -> Result<Self> {
        let depth = self.attrs.depth.checked_add(1).ok_or(Error::Depth)?;

        let mut hmac = HmacSha512::new_from_slice(&self.attrs.chain_code)?;

        if child_number.is_hardened() {
            hmac.update(&[0]);
            hmac.update(&self.private_key.to_bytes());
        } else {
            hmac.update(&self.private_key.public_key().to_bytes());
        }
        hmac.update(&child_number.to_bytes());

        let result = hmac.finalize().into_bytes();
        let (tweak, chain_code) = result.split_at(KEY_SIZE);

        let private_key =
            self.private_key.derive_child(tweak.try_into()?).map_err(|_| Error::InvalidChildKey(child_number))?;

        let attrs = ExtendedKeyAttrs {
            parent_fingerprint: self.private_key.public_key().fingerprint(),
            child_number,
            chain_code: chain_code.try_into()?,
            depth,
        };

        Ok(ExtendedPrivateKey { private_key, attrs, network: self.network })
    }

    /// Apply every segment of `path`, root-most first.
    ///
    /// A rooted path anchors at a master key; handing one to an
    /// already-derived key is rejected rather than reinterpreted. A failing
    /// step aborts the walk and is wrapped with the offending segment.
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

    /// Borrow the derived private key value.
    pub fn private_key(&self) -> &K {
        &self.private_key
    }

    /// The corresponding extended public key.
    pub fn public_key(&self) -> ExtendedPublicKey<K::PublicKey> {
        self.into()
    }

    /// Get attributes for this key such as depth, parent fingerprint,
    /// child number, and chain code.
    pub fn attrs(&self) -> &ExtendedKeyAttrs {
        &self.attrs
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Serialize the raw private key as a byte array.
    pub fn to_bytes(&self) -> PrivateKeyBytes {
        self.private_key.to_bytes()
    }

    /// Serialize this key as an [`ExtendedKey`] record.
    pub fn to_extended_key(&self) -> ExtendedKey {
        // Private key material rides behind a zero pad byte
        let mut key_bytes = [0u8; KEY_SIZE + 1];
        key_bytes[1..].copy_from_slice(&self.to_bytes());

        ExtendedKey { prefix: Prefix::private_for(self.network), attrs: self.attrs.clone(), key_bytes }
    }

    pub fn to_string(&self) -> Zeroizing<String> {
        Zeroizing::new(self.to_extended_key().to_string())
    }
}

impl<K> ConstantTimeEq for ExtendedPrivateKey<K>
where
    K: PrivateKey,
{
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut key_a = self.to_bytes();
        let mut key_b = other.to_bytes();

        let result = key_a.ct_eq(&key_b)
            & self.attrs.depth.ct_eq(&other.attrs.depth)
            & self.attrs.parent_fingerprint.ct_eq(&other.attrs.parent_fingerprint)
            & self.attrs.child_number.0.ct_eq(&other.attrs.child_number.0)
            & self.attrs.chain_code.ct_eq(&other.attrs.chain_code)
            & Choice::from((self.network == other.network) as u8);

        key_a.zeroize();
        key_b.zeroize();

        result
    }
}

impl<K> Debug for ExtendedPrivateKey<K>
where
    K: PrivateKey,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("private_key", &"...")
            .field("attrs", &self.attrs)
            .field("network", &self.network)
            .finish()
    }
}

/// NOTE: uses [`ConstantTimeEq`] internally
impl<K> Eq for ExtendedPrivateKey<K> where K: PrivateKey {}

/// NOTE: uses [`ConstantTimeEq`] internally
impl<K> PartialEq for ExtendedPrivateKey<K>
where
    K: PrivateKey,
{
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<K> FromStr for ExtendedPrivateKey<K>
where
    K: PrivateKey,
{
    type Err = Error;

    fn from_str(xprv: &str) -> Result<Self> {
        let key = ExtendedKey::from_str(xprv)?;
        key.try_into()
    }
}

impl<K> TryFrom<ExtendedKey> for ExtendedPrivateKey<K>
where
    K: PrivateKey,
{
    type Error = Error;

    fn try_from(extended_key: ExtendedKey) -> Result<ExtendedPrivateKey<K>> {
        if extended_key.prefix.is_private() && extended_key.key_bytes[0] == 0 {
            Ok(ExtendedPrivateKey {
                private_key: PrivateKey::from_bytes(extended_key.key_bytes[1..].try_into()?)?,
                attrs: extended_key.attrs.clone(),
                network: extended_key.prefix.network(),
            })
        } else {
            Err(Error::InvalidKey(secp256k1::Error::InvalidSecretKey))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExtendedPrivateKey;
    use crate::{ChildNumber, DerivationPath, Error, Network, SecretKey};
    use faster_hex::hex_decode_fallback;

    macro_rules! hex {
        ($str: literal) => {{
            let len = $str.as_bytes().len() / 2;
            let mut dst = vec![0; len];
            dst.resize(len, 0);
            hex_decode_fallback($str.as_bytes(), &mut dst);
            dst
        }
        [..]};
    }

    type Xprv = ExtendedPrivateKey<SecretKey>;

    fn vector_1_master() -> Xprv {
        Xprv::new(&hex!("000102030405060708090a0b0c0d0e0f"), Network::Mainnet).unwrap()
    }

    #[test]
    fn master_key_from_reference_seed() {
        let xprv = vector_1_master();
        assert_eq!(xprv.attrs().depth, 0);
        assert_eq!(xprv.attrs().parent_fingerprint, [0u8; 4]);
        assert_eq!(
            xprv.to_string().as_str(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            xprv.public_key().to_string(),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
    }

    #[test]
    fn vector_1_derivation_chain() {
        let steps: [(&str, &str); 5] = [
            (
                "m/0'",
                "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7",
            ),
            (
                "m/0'/1",
                "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs",
            ),
            (
                "m/0'/1/2'",
                "xprv9z4pot5VBttmtdRTWfWQmoH1taj2axGVzFqSb8C9xaxKymcFzXBDptWmT7FwuEzG3ryjH4ktypQSAewRiNMjANTtpgP4mLTj34bhnZX7UiM",
            ),
            (
                "m/0'/1/2'/2",
                "xprvA2JDeKCSNNZky6uBCviVfJSKyQ1mDYahRjijr5idH2WwLsEd4Hsb2Tyh8RfQMuPh7f7RtyzTtdrbdqqsunu5Mm3wDvUAKRHSC34sJ7in334",
            ),
            (
                "m/0'/1/2'/2/1000000000",
                "xprvA41z7zogVVwxVSgdKUHDy1SKmdb533PjDz7J6N6mV6uS3ze1ai8FHa8kmHScGpWmj4WggLyQjgPie1rFSruoUihUZREPSL39UNdE3BBDu76",
            ),
        ];

        for (path, expected) in steps {
            let path = path.parse::<DerivationPath>().unwrap();
            let derived = vector_1_master().derive_path(&path).unwrap();
            assert_eq!(derived.to_string().as_str(), expected, "path {path}");
            assert_eq!(derived.attrs().depth as usize, path.len());
        }
    }

    #[test]
    fn serialized_form_round_trips_field_wise() {
        let master = vector_1_master();
        let reparsed = master.to_string().parse::<Xprv>().unwrap();
        assert_eq!(master, reparsed);
        assert_eq!(master.network(), reparsed.network());

        let child = master.derive_child(ChildNumber::new(7, true).unwrap()).unwrap();
        let reparsed = child.to_string().parse::<Xprv>().unwrap();
        assert_eq!(child, reparsed);
        assert_eq!(child.attrs(), reparsed.attrs());
    }

    #[test]
    fn testnet_keys_carry_their_network() {
        let master = Xprv::new(&hex!("000102030405060708090a0b0c0d0e0f"), Network::Testnet).unwrap();
        let encoded = master.to_string();
        assert!(encoded.starts_with("tprv"));

        let reparsed = encoded.parse::<Xprv>().unwrap();
        assert_eq!(reparsed.network(), Network::Testnet);
        assert_ne!(encoded.as_str(), vector_1_master().to_string().as_str());
    }

    #[test]
    fn derivation_is_deterministic_and_branch_disjoint() {
        let master = vector_1_master();
        let child_number = ChildNumber::new(3, false).unwrap();

        let once = master.derive_child(child_number).unwrap();
        let twice = master.derive_child(child_number).unwrap();
        assert_eq!(once, twice);

        let hardened = master.derive_child(ChildNumber::new(3, true).unwrap()).unwrap();
        assert_ne!(once, hardened);
    }

    #[test]
    fn public_derivation_matches_private_derivation() {
        let master = vector_1_master();
        let child_number = ChildNumber::new(42, false).unwrap();

        let private_then_public = master.derive_child(child_number).unwrap().public_key();
        let public_then_derived = master.public_key().derive_child(child_number).unwrap();
        assert_eq!(private_then_public, public_then_derived);
    }

    #[test]
    fn rooted_paths_require_a_master_key() {
        let child = vector_1_master().derive_child(ChildNumber::new(0, true).unwrap()).unwrap();

        let rooted = "m/1".parse::<DerivationPath>().unwrap();
        assert!(matches!(child.clone().derive_path(&rooted), Err(Error::RootedPathOnDerivedKey(_))));

        let relative = "/1".parse::<DerivationPath>().unwrap();
        assert!(child.derive_path(&relative).is_ok());
    }

    #[test]
    fn depth_overflow_is_fatal() {
        // forge a key at maximum depth, then ask for one more step
        let deep = vector_1_master();
        let mut record = deep.to_extended_key();
        record.attrs.depth = u8::MAX;
        record.attrs.parent_fingerprint = [1, 2, 3, 4];
        record.attrs.child_number = ChildNumber(1);
        let deep: Xprv = record.try_into().unwrap();

        assert!(matches!(deep.derive_child(ChildNumber(0)), Err(Error::Depth)));
    }

    #[test]
    fn seed_length_is_bounded() {
        assert!(matches!(Xprv::new([0u8; 15], Network::Mainnet), Err(Error::SeedLength(15))));
        assert!(matches!(Xprv::new([0u8; 65], Network::Mainnet), Err(Error::SeedLength(65))));
        assert!(Xprv::new([0u8; 64], Network::Mainnet).is_ok());
    }
}
