//! Explicit big/little-endian integer accessors over caller buffers.
//!
//! These are conversions, not reinterpretations: results are identical on
//! every host byte order. Writers return the byte count written, readers the
//! decoded value together with the byte count consumed.

use crate::{Error, Result};

macro_rules! endian_codec {
    ($write:ident, $read:ident, $ty:ty, $to_bytes:ident, $from_bytes:ident, $order:literal) => {
        #[doc = concat!("Write `value` as ", stringify!($ty), " in ", $order, " byte order at the front of `output`.")]
        pub fn $write(value: $ty, output: &mut [u8]) -> Result<usize> {
            const WIDTH: usize = size_of::<$ty>();
            if output.len() < WIDTH {
                return Err(Error::BufferTooSmall { needed: WIDTH, len: output.len() });
            }
            output[..WIDTH].copy_from_slice(&value.$to_bytes());
            Ok(WIDTH)
        }

        #[doc = concat!("Read a ", $order, " ", stringify!($ty), " from the front of `input`.")]
        pub fn $read(input: &[u8]) -> Result<($ty, usize)> {
            const WIDTH: usize = size_of::<$ty>();
            if input.len() < WIDTH {
                return Err(Error::UnexpectedEnd { needed: WIDTH, len: input.len() });
            }
            let mut bytes = [0u8; WIDTH];
            bytes.copy_from_slice(&input[..WIDTH]);
            Ok((<$ty>::$from_bytes(bytes), WIDTH))
        }
    };
}

endian_codec!(write_u16_be, read_u16_be, u16, to_be_bytes, from_be_bytes, "big-endian");
endian_codec!(write_u16_le, read_u16_le, u16, to_le_bytes, from_le_bytes, "little-endian");
endian_codec!(write_u32_be, read_u32_be, u32, to_be_bytes, from_be_bytes, "big-endian");
endian_codec!(write_u32_le, read_u32_le, u32, to_le_bytes, from_le_bytes, "little-endian");
endian_codec!(write_u64_be, read_u64_be, u64, to_be_bytes, from_be_bytes, "big-endian");
endian_codec!(write_u64_le, read_u64_le, u64, to_le_bytes, from_le_bytes, "little-endian");
