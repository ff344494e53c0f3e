//! BIP39 mnemonic phrases

mod language;
mod phrase;
mod seed;

pub use language::Language;
pub use phrase::{Mnemonic, WordCount};
pub use seed::Seed;
