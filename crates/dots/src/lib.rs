//! Dot numbers, dot sets, and the canonical fingerprints derived from them.
//!
//! A [`DotSet`] is the raw shape of one chord: the dots that were pressed
//! together, including the space dot (`0`) if present. A [`DotKey`] is the
//! canonical string fingerprint of a single *cell* (space excluded, dots
//! sorted ascending) used throughout the rest of the workspace to key
//! lookup tables and matcher buffers. A [`MultiCellKey`] joins several
//! [`DotKey`]s with `|`, preserving cell order.

mod key;
mod set;
mod unicode;

pub use key::{DotKey, MultiCellKey};
pub use set::DotSet;
pub use unicode::{dot_key_to_unicode, dots_to_unicode, BRAILLE_BASE};

/// A single dot position: `0` is the space chord, `1..=6` are the six
/// Perkins-style dots.
pub type Dot = u8;

/// Highest valid [`Dot`] value.
pub const MAX_DOT: Dot = 6;
