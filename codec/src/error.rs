use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A symbol outside the Base58 alphabet. The position is 1-based.
    #[error("invalid character `{character}` at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Base58Check checksum words, compared as little-endian `u32`s.
    #[error("checksum mismatch: computed {computed:#010x}, found {found:#010x}")]
    InvalidChecksum { computed: u32, found: u32 },

    #[error("output buffer holds {len} bytes but {needed} are required")]
    BufferTooSmall { needed: usize, len: usize },

    #[error("input ends after {len} bytes but {needed} are required")]
    UnexpectedEnd { needed: usize, len: usize },
}
