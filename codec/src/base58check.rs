//! Base58Check: base-58 text encoding with a 4-byte double-SHA-256 checksum.
//!
//! Symbol order encodes magnitude, so the alphabet must match the reference
//! string character for character. Leading zero bytes carry no magnitude
//! through the division loop and are transcribed separately, one `'1'` per
//! zero byte.

use sha2::{Digest, Sha256};

use crate::{endian, Error, Result};

/// The 58-symbol alphabet; excludes `0`, `O`, `I` and `l`.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const CHECKSUM_LEN: usize = 4;

/// Reverse symbol lookup; `-1` marks bytes outside the alphabet.
const DIGITS: [i8; 128] = build_digits();

const fn build_digits() -> [i8; 128] {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
}

/// Conservative upper bound on the text length produced for an `n`-byte
/// payload, checksum included.
pub const fn max_encoded_len(n: usize) -> usize {
    (n + CHECKSUM_LEN) * 138 / 100 + 1
}

/// Conservative upper bound on the byte length decoded from `n` symbols.
pub const fn max_decoded_len(n: usize) -> usize {
    n * 733 / 1000 + 1
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Base-58 digits of the payload with its checksum appended, least significant first,
/// with one trailing zero digit per leading zero byte of the input.
fn encode_digits(payload: &[u8]) -> Vec<u8> {
    let check = checksum(payload);
    let mut digits: Vec<u8> = Vec::with_capacity(max_encoded_len(payload.len()));
    let mut leading_zeros = 0usize;
    let mut in_leading = true;

    for &byte in payload.iter().chain(check.iter()) {
        if in_leading && byte == 0 {
            leading_zeros += 1;
        } else {
            in_leading = false;
        }

        // digits := digits * 256 + byte, in base 58
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let acc = (*digit as u32) * 256 + carry;
            *digit = (acc % 58) as u8;
            carry = acc / 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    digits.resize(digits.len() + leading_zeros, 0);
    digits
}

/// Encode `payload` with its checksum appended.
pub fn encode_check(payload: &[u8]) -> String {
    encode_digits(payload)
        .iter()
        .rev()
        .map(|&digit| ALPHABET[digit as usize] as char)
        .collect()
}

/// Encode `payload` into `output`, returning the text length written. The
/// text is ASCII; size `output` with [`max_encoded_len`].
pub fn encode_check_into(payload: &[u8], output: &mut [u8]) -> Result<usize> {
    let digits = encode_digits(payload);
    if output.len() < digits.len() {
        return Err(Error::BufferTooSmall { needed: digits.len(), len: output.len() });
    }
    for (slot, &digit) in output.iter_mut().zip(digits.iter().rev()) {
        *slot = ALPHABET[digit as usize];
    }
    Ok(digits.len())
}

/// Decode `input`, verify and strip the trailing checksum, and return the
/// payload bytes.
pub fn decode_check(input: &str) -> Result<Vec<u8>> {
    // Big-endian accumulator, sized by the decode bound.
    let mut scratch = vec![0u8; max_decoded_len(input.len())];

    for (index, character) in input.chars().enumerate() {
        let digit = if character.is_ascii() { DIGITS[character as usize] } else { -1 };
        if digit < 0 {
            return Err(Error::InvalidCharacter { character, position: index + 1 });
        }

        // scratch := scratch * 58 + digit, in base 256
        let mut carry = digit as u32;
        for byte in scratch.iter_mut().rev() {
            carry += (*byte as u32) * 58;
            *byte = carry as u8;
            carry >>= 8;
        }
        debug_assert_eq!(carry, 0, "scratch sized below max_decoded_len");
    }

    let leading_zeros = input.bytes().take_while(|&b| b == ALPHABET[0]).count();
    let mut bytes: Vec<u8> = std::iter::repeat_n(0u8, leading_zeros)
        .chain(scratch.into_iter().skip_while(|&b| b == 0))
        .collect();

    if bytes.len() < CHECKSUM_LEN {
        return Err(Error::UnexpectedEnd { needed: CHECKSUM_LEN, len: bytes.len() });
    }
    let split = bytes.len() - CHECKSUM_LEN;
    let (computed, _) = endian::read_u32_le(&checksum(&bytes[..split]))?;
    let (found, _) = endian::read_u32_le(&bytes[split..])?;
    if computed != found {
        return Err(Error::InvalidChecksum { computed, found });
    }

    bytes.truncate(split);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    macro_rules! hex {
        ($str: literal) => {{
            let len = $str.as_bytes().len() / 2;
            let mut dst = vec![0; len];
            dst.resize(len, 0);
            faster_hex::hex_decode_fallback($str.as_bytes(), &mut dst);
            dst
        }
        [..]};
    }

    #[test]
    fn known_address_vector() {
        // Version byte plus hash160, the classic pay-to-pubkey-hash example.
        let payload = hex!("00010966776006953d5567439e5e39f86a0d273bee");
        assert_eq!(encode_check(payload), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
        assert_eq!(decode_check("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").unwrap(), payload);
    }

    #[test]
    fn leading_zero_bytes_become_leading_ones() {
        let encoded = encode_check(&[0u8; 5]);
        assert!(encoded.starts_with("11111"), "got {encoded}");
        assert_eq!(decode_check(&encoded).unwrap(), [0u8; 5]);
    }

    #[test]
    fn empty_payload_round_trips() {
        let encoded = encode_check(&[]);
        assert_eq!(decode_check(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn round_trips_across_lengths() {
        for len in [1usize, 2, 31, 32, 33, 78, 255, 256] {
            let payload: Vec<u8> = (0..len).map(|i| (i * 37 + len) as u8).collect();
            let encoded = encode_check(&payload);
            assert!(encoded.len() <= max_encoded_len(len), "bound violated at {len}");
            assert_eq!(decode_check(&encoded).unwrap(), payload, "length {len}");
        }
    }

    #[test]
    fn flipped_symbol_fails_checksum() {
        let mut encoded: Vec<char> = encode_check(&[0xabu8; 20]).chars().collect();
        for index in 0..encoded.len() {
            let original = encoded[index];
            let replacement = if original == '2' { '3' } else { '2' };
            encoded[index] = replacement;
            let tampered: String = encoded.iter().collect();
            assert!(
                matches!(
                    decode_check(&tampered),
                    Err(Error::InvalidChecksum { .. }) | Err(Error::UnexpectedEnd { .. })
                ),
                "flip at {index} was accepted"
            );
            encoded[index] = original;
        }
    }

    #[test]
    fn rejected_symbols_carry_their_position() {
        assert_eq!(
            decode_check("1l1"),
            Err(Error::InvalidCharacter { character: 'l', position: 2 })
        );
        assert_eq!(
            decode_check("abcO"),
            Err(Error::InvalidCharacter { character: 'O', position: 4 })
        );
        assert_eq!(
            decode_check("é"),
            Err(Error::InvalidCharacter { character: 'é', position: 1 })
        );
    }

    #[test]
    fn buffer_bound_is_enforced() {
        let mut small = [0u8; 4];
        assert!(matches!(
            encode_check_into(&[0xffu8; 32], &mut small),
            Err(Error::BufferTooSmall { .. })
        ));

        let mut sized = [0u8; max_encoded_len(32)];
        let written = encode_check_into(&[0xffu8; 32], &mut sized).unwrap();
        assert_eq!(
            std::str::from_utf8(&sized[..written]).unwrap(),
            encode_check(&[0xffu8; 32])
        );
    }
}
