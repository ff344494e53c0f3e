//! BIP39 mnemonic phrases

use borsh::{BorshDeserialize, BorshSerialize};
use pbkdf2::pbkdf2_hmac;
use rand_core::{CryptoRng, RngCore};
use sable_codec::bits;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use zeroize::{Zeroize, Zeroizing};

use super::language::Language;
use super::seed::Seed;
use crate::{Error, Result};

/// Number of PBKDF2 rounds to perform when deriving the seed
const PBKDF2_ROUNDS: u32 = 2048;

/// Bits carried by one mnemonic word.
const BITS_PER_WORD: usize = 11;

/// Word count for a BIP39 mnemonic phrase.
#[derive(Default, Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordCount {
    #[default]
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl WordCount {
    /// Entropy carried by a phrase of this length.
    pub fn entropy_bytes(&self) -> usize {
        match self {
            WordCount::Words12 => 16,
            WordCount::Words15 => 20,
            WordCount::Words18 => 24,
            WordCount::Words21 => 28,
            WordCount::Words24 => 32,
        }
    }

    pub fn word_count(&self) -> usize {
        let entropy_bits = self.entropy_bytes() * 8;
        (entropy_bits + entropy_bits / 32) / BITS_PER_WORD
    }
}

impl TryFrom<usize> for WordCount {
    type Error = Error;

    fn try_from(word_count: usize) -> Result<Self> {
        match word_count {
            12 => Ok(WordCount::Words12),
            15 => Ok(WordCount::Words15),
            18 => Ok(WordCount::Words18),
            21 => Ok(WordCount::Words21),
            24 => Ok(WordCount::Words24),
            _ => Err(Error::WordCount(word_count)),
        }
    }
}

/// BIP39 mnemonic phrases: sequences of words representing cryptographic keys.
///
/// The word sequence and the entropy are two spellings of one value; either
/// reconstructs the other.
#[derive(Clone)]
pub struct Mnemonic {
    /// Language
    language: Language,

    /// Source entropy for this phrase
    entropy: Vec<u8>,

    /// Mnemonic phrase
    phrase: String,
}

impl Mnemonic {
    pub fn random(word_count: WordCount, language: Language) -> Result<Mnemonic> {
        Mnemonic::random_impl(word_count, rand::thread_rng(), language)
    }

    /// Create a random BIP39 mnemonic phrase.
    pub fn random_impl(word_count: WordCount, mut rng: impl RngCore + CryptoRng, language: Language) -> Result<Self> {
        let mut entropy = Zeroizing::new(vec![0u8; word_count.entropy_bytes()]);
        rng.fill_bytes(&mut entropy);
        Self::from_entropy(entropy.to_vec(), language)
    }

    /// Create a new BIP39 mnemonic phrase from the given entropy, whose
    /// length must be a nonzero multiple of four bytes.
    pub fn from_entropy(entropy: Vec<u8>, language: Language) -> Result<Self> {
        if entropy.is_empty() || entropy.len() % 4 != 0 {
            return Err(Error::EntropyLength(entropy.len()));
        }

        let entropy = Zeroizing::new(entropy);
        let entropy_bits = entropy.len() * 8;
        let checksum_bits = entropy_bits / 32;
        let word_count = (entropy_bits + checksum_bits) / BITS_PER_WORD;

        // entropy then checksum as one MSB-first bit stream, sliced into
        // 11-bit word indexes
        let mut packed = Zeroizing::new(vec![0u8; (entropy_bits + checksum_bits).div_ceil(8)]);
        packed[..entropy.len()].copy_from_slice(&entropy);
        append_checksum(&mut packed, &entropy, checksum_bits);

        let wordlist = language.wordlist();
        let phrase = (0..word_count)
            .map(|word| wordlist.get_word(bits::get_bits(&packed, word * BITS_PER_WORD, BITS_PER_WORD) as u16))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Self { language, entropy: entropy.to_vec(), phrase })
    }

    /// Create a new BIP39 mnemonic phrase from the given string.
    ///
    /// Words are separated by any run of whitespace; leading and trailing
    /// whitespace is tolerated. The phrase is validated for word count,
    /// membership of every word in the wordlist, and the checksum carried by
    /// its final bits.
    pub fn new<S>(phrase: S, language: Language) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let phrase = phrase.as_ref();
        let wordmap = language.wordmap();

        let words: Vec<&str> = phrase.split_whitespace().collect();
        let (entropy_bits, checksum_bits) = entropy_split(words.len())?;

        let mut packed = Zeroizing::new(vec![0u8; (entropy_bits + checksum_bits).div_ceil(8)]);
        for (index, word) in words.iter().enumerate() {
            let value = wordmap.get_index(word).ok_or_else(|| Error::InvalidWord(word.to_string()))?;
            bits::append_bits(&mut packed, index * BITS_PER_WORD, value as u32, BITS_PER_WORD);
        }

        let entropy = Zeroizing::new(packed[..entropy_bits / 8].to_vec());
        if !checksum_matches(&packed, &entropy, checksum_bits) {
            return Err(Error::ChecksumMismatch);
        }

        Self::from_entropy(entropy.to_vec(), language)
    }

    /// Get source entropy for this phrase.
    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    /// Get the mnemonic phrase as a string reference.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Language this phrase's wordlist is for
    pub fn language(&self) -> Language {
        self.language
    }

    /// Convert this mnemonic phrase into the BIP39 seed value.
    pub fn to_seed(&self, password: &str) -> Seed {
        let salt = Zeroizing::new(format!("mnemonic{password}"));
        let mut seed = [0u8; Seed::SIZE];
        pbkdf2_hmac::<Sha512>(self.phrase.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed);
        Seed::new(seed)
    }
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.phrase.zeroize();
        self.entropy.zeroize();
    }
}

/// Derive `(entropy_bits, checksum_bits)` from a phrase's word count: the
/// integer-arithmetic inverse of the generation direction.
fn entropy_split(word_count: usize) -> Result<(usize, usize)> {
    let total_bits = word_count * BITS_PER_WORD;
    let entropy_bits = total_bits * 32 / 33;
    let checksum_bits = total_bits - entropy_bits;

    // one checksum bit per 32 entropy bits; anything else cannot have come
    // from a whole number of entropy bytes
    if word_count == 0 || checksum_bits * 32 != entropy_bits {
        return Err(Error::WordCount(word_count));
    }
    Ok((entropy_bits, checksum_bits))
}

/// Append the top `checksum_bits` of `SHA-256(entropy)` after the entropy
/// bits, in fragments of at most eight bits.
fn append_checksum(packed: &mut [u8], entropy: &[u8], checksum_bits: usize) {
    let hash = Sha256::digest(entropy);
    let mut offset = entropy.len() * 8;
    let mut remaining = checksum_bits;
    let mut byte = 0;
    while remaining > 0 {
        let take = remaining.min(8);
        bits::append_bits(packed, offset, (hash[byte] >> (8 - take)) as u32, take);
        offset += take;
        remaining -= take;
        byte += 1;
    }
}

/// Compare the checksum bits packed after the entropy against a freshly
/// computed `SHA-256(entropy)`, masking the partial final fragment.
fn checksum_matches(packed: &[u8], entropy: &[u8], checksum_bits: usize) -> bool {
    let hash = Sha256::digest(entropy);
    let mut offset = entropy.len() * 8;
    let mut remaining = checksum_bits;
    let mut byte = 0;
    while remaining > 0 {
        let take = remaining.min(8);
        if bits::get_bits(packed, offset, take) != (hash[byte] >> (8 - take)) as u32 {
            return false;
        }
        offset += take;
        remaining -= take;
        byte += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::{Mnemonic, WordCount};
    use crate::{Error, ExtendedPrivateKey, Language, Network, SecretKey};
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

    const ZERO_PHRASE_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn reference_phrases_decode_to_their_entropy() {
        let cases: [(&[u8], &str); 4] = [
            (&[0x00; 16], ZERO_PHRASE_12),
            (&[0x7f; 16], "legal winner thank year wave sausage worth useful legal winner thank yellow"),
            (&[0xff; 16], "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong"),
            (
                &[0x00; 32],
                "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
                 abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art",
            ),
        ];

        for (entropy, phrase) in cases {
            let generated = Mnemonic::from_entropy(entropy.to_vec(), Language::English).unwrap();
            assert_eq!(generated.phrase(), phrase);

            let decoded = Mnemonic::new(phrase, Language::English).unwrap();
            assert_eq!(decoded.entropy(), entropy);
        }
    }

    #[test]
    fn every_supported_length_round_trips() {
        for word_count in
            [WordCount::Words12, WordCount::Words15, WordCount::Words18, WordCount::Words21, WordCount::Words24]
        {
            let entropy: Vec<u8> = (0..word_count.entropy_bytes()).map(|i| (i * 41 + 7) as u8).collect();
            let mnemonic = Mnemonic::from_entropy(entropy.clone(), Language::English).unwrap();
            assert_eq!(mnemonic.phrase().split(' ').count(), word_count.word_count());

            let decoded = Mnemonic::new(mnemonic.phrase(), Language::English).unwrap();
            assert_eq!(decoded.entropy(), entropy);
        }
    }

    #[test]
    fn whitespace_runs_are_tolerated() {
        let sloppy = "  abandon\tabandon abandon abandon abandon abandon\n abandon abandon abandon abandon abandon   about \n";
        let decoded = Mnemonic::new(sloppy, Language::English).unwrap();
        assert_eq!(decoded.entropy(), [0u8; 16]);
        // the stored phrase is canonical, single-spaced
        assert_eq!(decoded.phrase(), ZERO_PHRASE_12);
    }

    #[test]
    fn altered_final_word_fails_the_checksum() {
        let tampered = ZERO_PHRASE_12.replace("about", "zoo");
        assert!(matches!(Mnemonic::new(tampered, Language::English), Err(Error::ChecksumMismatch)));

        let all_abandon = ZERO_PHRASE_12.replace("about", "abandon");
        assert!(matches!(Mnemonic::new(all_abandon, Language::English), Err(Error::ChecksumMismatch)));
    }

    #[test]
    fn unknown_words_are_named() {
        let phrase = ZERO_PHRASE_12.replace("about", "abandonn");
        match Mnemonic::new(phrase, Language::English) {
            Err(Error::InvalidWord(word)) => assert_eq!(word, "abandonn"),
            other => panic!("expected InvalidWord, got {:?}", other.err().map(|e| e.to_string())),
        }
    }

    #[test]
    fn unsupported_word_counts_are_rejected() {
        let thirteen = format!("{ZERO_PHRASE_12} abandon");
        assert!(matches!(Mnemonic::new(thirteen, Language::English), Err(Error::WordCount(13))));
        assert!(matches!(Mnemonic::new("", Language::English), Err(Error::WordCount(0))));
        assert!(matches!(WordCount::try_from(13usize), Err(Error::WordCount(13))));
    }

    #[test]
    fn entropy_length_must_be_a_multiple_of_four() {
        assert!(matches!(Mnemonic::from_entropy(vec![], Language::English), Err(Error::EntropyLength(0))));
        assert!(matches!(Mnemonic::from_entropy(vec![0u8; 17], Language::English), Err(Error::EntropyLength(17))));
        assert!(Mnemonic::from_entropy(vec![0u8; 20], Language::English).is_ok());
    }

    #[test]
    fn random_phrases_round_trip() {
        let mnemonic = Mnemonic::random(WordCount::Words24, Language::English).unwrap();
        assert_eq!(mnemonic.entropy().len(), 32);

        let decoded = Mnemonic::new(mnemonic.phrase(), Language::English).unwrap();
        assert_eq!(decoded.entropy(), mnemonic.entropy());
    }

    #[test]
    fn stretched_seed_matches_the_reference_vector() {
        let mnemonic = Mnemonic::new(ZERO_PHRASE_12, Language::English).unwrap();
        let seed = mnemonic.to_seed("TREZOR");
        assert_eq!(
            seed.as_bytes()[..],
            hex!(
                "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c\
                 7a3c4ab7c81b2f001698e7463b04"
            )
        );

        let xprv = ExtendedPrivateKey::<SecretKey>::new(seed, Network::Mainnet).unwrap();
        assert_eq!(
            xprv.to_string().as_str(),
            "xprv9s21ZrQH143K3h3fDYiay8mocZ3afhfULfb5GX8kCBdno77K4HiA5mv7zbPHeVo2Q9qsUvEmx9BUUTECujDoinzSsGLKX8pGvNLSct5ZYGw"
        );
    }

    #[test]
    fn phrase_to_master_key_vectors() {
        let data = [
            [
                "caution guide valley easily latin already visual fancy fork car switch runway vicious polar surprise fence boil light nut invite fiction visa hamster coyote",
                "xprv9s21ZrQH143K4VcEtb888srakzAVaKWE9L3Pyy6AxEhWLtJu5FK18mDHE1ar7LHT99KrrqcVQxRMSqnXj65vsuWDGUxeT3AVKVB7YW8FDoD"
            ],
            [
                "annual school will jazz response giant decide display beef slush together still water victory south eyebrow adult nasty minor twist empty caught smooth only",
                "xprv9s21ZrQH143K327fsEDJyFE3KXMsbohV237ET6FXnMfixZQJ5Q1myJwos2aGeBfbwmtpxPoAewr2XpKgc3rUAA9UbmYd3aFief6Q3qyu5gT"
            ],
            [
                "social anchor educate fold ancient wheel advice praise file fix attitude ivory",
                "xprv9s21ZrQH143K3ZsozYTEYBEJ4wL4MRPMrvXcNNmqNfbEuWKqMgRDD2psd7HrE5yWEd2UFK2TtdEJnfDFNYibjKzMGz7uYdze5vbjGRZHKmU"
            ],
            [
                "mother dress law arena peasant camera forum wisdom mutual inform silk regret",
                "xprv9s21ZrQH143K3QTdXMBavciDtwpgdgjKwu9WEJsc1rBdwjq11PsckuaNwhMGr8gDTUuKZaV8dDemXZuprfcqNhLDT3TJ16Kpq1DAFZ35WSE"
            ],
        ];

        for [seed_words, xprv_str] in data {
            let mnemonic = Mnemonic::new(seed_words, Language::English).unwrap();
            let seed = mnemonic.to_seed("");
            let xprv = ExtendedPrivateKey::<SecretKey>::new(seed, Network::Mainnet).unwrap();
            assert_eq!(xprv.to_string().as_str(), xprv_str, "xprv is not valid");
        }
    }
}
