use crate::{key::DotKey, set::DotSet};

/// Code point of the empty braille cell (`U+2800`), the base all encodings
/// are offset from.
pub const BRAILLE_BASE: u32 = 0x2800;

/// Encodes a dot set's cell dots (space ignored) as a Unicode braille
/// glyph: `U+2800 + sum(2^(d-1))` over dots `d` in `1..=6`.
pub fn dots_to_unicode(set: &DotSet) -> char {
    let bits: u32 = set.cell_dots().map(|d| 1 << (d - 1)).sum();
    char::from_u32(BRAILLE_BASE + bits).expect("braille code points are always valid scalars")
}

/// Encodes a [`DotKey`] as its Unicode braille glyph. The empty key (space)
/// encodes as the braille space, `U+2800`.
pub fn dot_key_to_unicode(key: &DotKey) -> char {
    let bits: u32 = key.dots().map(|d| 1 << (d - 1)).sum();
    char::from_u32(BRAILLE_BASE + bits).expect("braille code points are always valid scalars")
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// `spec.md` §8, invariant 2 and the round-trip property:
        /// `dotKeyToUnicode(canonicalKey(S)) == dotsToUnicode(S)` for every
        /// dot set, and the result is always a valid `U+2800..=U+28FF` glyph.
        #[test]
        fn unicode_encoding_matches_bitmask_formula_and_round_trips(
            dots in prop::collection::hash_set(1u8..=6, 0..6)
        ) {
            let set = DotSet::from_dots(dots.iter().copied());
            let expected_bits: u32 = dots.iter().map(|d| 1u32 << (d - 1)).sum();
            let glyph = dots_to_unicode(&set);
            prop_assert_eq!(glyph as u32, BRAILLE_BASE + expected_bits);
            prop_assert!((BRAILLE_BASE..=BRAILLE_BASE + 0xff).contains(&(glyph as u32)));

            let key = DotKey::from_dot_set(&set);
            prop_assert_eq!(dot_key_to_unicode(&key), glyph);
        }
    }
}
