//! Transcript text processing: normalization, wake-phrase matching,
//! domain corrections, and the English filter.

pub mod corrections;
pub mod filter;
pub mod matcher;

pub use corrections::Corrections;
pub use filter::{english_ratio, is_english};
pub use matcher::{normalize, WakePhraseSet};
