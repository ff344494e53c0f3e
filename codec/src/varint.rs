//! Bitcoin-style compact-size integers.
//!
//! Values below `0xfd` occupy a single byte; larger values carry a one-byte
//! tag (`0xfd`/`0xfe`/`0xff`) followed by the value in 2, 4 or 8 little-endian
//! bytes. This is a byte-exact wire format shared with external systems.

use crate::{endian, Error, Result};

/// Length of the widest encoding (`0xff` tag plus eight bytes).
pub const MAX_ENCODED_LEN: usize = 9;

/// Exact length `encode` would produce for `value`, without encoding.
pub const fn encoded_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Encode `value` at the front of `output`, returning the bytes written.
pub fn encode(value: u64, output: &mut [u8]) -> Result<usize> {
    let needed = encoded_len(value);
    if output.len() < needed {
        return Err(Error::BufferTooSmall { needed, len: output.len() });
    }
    match needed {
        1 => output[0] = value as u8,
        3 => {
            output[0] = 0xfd;
            endian::write_u16_le(value as u16, &mut output[1..])?;
        }
        5 => {
            output[0] = 0xfe;
            endian::write_u32_le(value as u32, &mut output[1..])?;
        }
        _ => {
            output[0] = 0xff;
            endian::write_u64_le(value, &mut output[1..])?;
        }
    }
    Ok(needed)
}

/// Decode a compact-size integer from the front of `input`, returning the
/// value and the bytes consumed.
pub fn decode(input: &[u8]) -> Result<(u64, usize)> {
    let Some(&tag) = input.first() else {
        return Err(Error::UnexpectedEnd { needed: 1, len: 0 });
    };
    match tag {
        0xfd => {
            ensure(input, 3)?;
            let (value, _) = endian::read_u16_le(&input[1..])?;
            Ok((value as u64, 3))
        }
        0xfe => {
            ensure(input, 5)?;
            let (value, _) = endian::read_u32_le(&input[1..])?;
            Ok((value as u64, 5))
        }
        0xff => {
            ensure(input, 9)?;
            let (value, _) = endian::read_u64_le(&input[1..])?;
            Ok((value, 9))
        }
        value => Ok((value as u64, 1)),
    }
}

fn ensure(input: &[u8], needed: usize) -> Result<()> {
    if input.len() < needed {
        return Err(Error::UnexpectedEnd { needed, len: input.len() });
    }
    Ok(())
}
