use std::fmt;

use crate::{set::DotSet, Dot};

const SEPARATOR: char = '|';

/// The canonical string fingerprint of a single cell: its dot numbers,
/// sorted ascending, concatenated as decimal digits. A space chord (no
/// cell dots) produces the empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotKey(String);

impl DotKey {
    /// The key for a space chord (no cell dots).
    pub fn space() -> Self {
        Self(String::new())
    }

    /// Derives the canonical key from a chord's [`DotSet`], ignoring dot `0`.
    pub fn from_dot_set(set: &DotSet) -> Self {
        Self(set.cell_dots().map(digit_char).collect())
    }

    /// Derives the canonical key directly from cell dots (`1..=6`).
    pub fn from_cell_dots(dots: impl IntoIterator<Item = Dot>) -> Self {
        let mut digits: Vec<Dot> = dots.into_iter().collect();
        digits.sort_unstable();
        digits.dedup();
        Self(digits.into_iter().map(digit_char).collect())
    }

    /// Canonicalises a raw per-cell digit string from a profile entry
    /// (e.g. `"41"` -> `"14"`) by sorting its characters.
    ///
    /// Returns `None` if the string contains a non-digit character; the
    /// unifier treats that as a discarded entry rather than an error.
    pub fn from_digit_str(s: &str) -> Option<Self> {
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let mut chars: Vec<char> = s.chars().collect();
        chars.sort_unstable();
        Some(Self(chars.into_iter().collect()))
    }

    /// Whether this key denotes the space chord.
    pub fn is_space(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw fingerprint string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates the dots encoded in this key, ascending.
    pub fn dots(&self) -> impl Iterator<Item = Dot> + '_ {
        self.0.chars().map(|c| c.to_digit(10).expect("DotKey invariant: digits only") as Dot)
    }
}

impl fmt::Display for DotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DotKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn digit_char(d: Dot) -> char {
    char::from(b'0' + d)
}

/// Canonical per-cell dot keys joined by `|`, preserving cell order.
///
/// Example: cells `{1,6}` then `{1,3}` -> `"16|13"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiCellKey(String);

impl MultiCellKey {
    /// Joins a sequence of per-cell keys into one multi-cell key.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a DotKey>) -> Self {
        let mut joined = String::new();
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                joined.push(SEPARATOR);
            }
            joined.push_str(cell.as_str());
        }
        Self(joined)
    }

    /// The raw joined fingerprint string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of cells encoded in this key.
    pub fn cell_count(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split(SEPARATOR).count()
        }
    }

    /// Whether `self` is a strict prefix of `other`, i.e. `other` starts
    /// with `self` followed by another separator-delimited cell.
    pub fn is_strict_prefix_of(&self, other: &str) -> bool {
        other.len() > self.0.len() && other.starts_with(self.0.as_str()) && other.as_bytes()[self.0.len()] == SEPARATOR as u8
    }
}

impl fmt::Display for MultiCellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MultiCellKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_sorts_and_concatenates() {
        assert_eq!(DotKey::from_cell_dots([1]).as_str(), "1");
        assert_eq!(DotKey::from_cell_dots([4, 1]).as_str(), "14");
        assert_eq!(DotKey::from_cell_dots([6, 5, 4, 3, 2, 1]).as_str(), "123456");
    }

    #[test]
    fn space_chord_is_empty_key() {
        let set = DotSet::from_dots([0]);
        assert_eq!(DotKey::from_dot_set(&set), DotKey::space());
    }

    #[test]
    fn from_digit_str_canonicalises_unsorted_input() {
        assert_eq!(DotKey::from_digit_str("41").unwrap().as_str(), "14");
        assert!(DotKey::from_digit_str("1a").is_none());
    }

    #[test]
    fn multi_cell_key_joins_with_pipe() {
        let a = DotKey::from_cell_dots([1, 6]);
        let b = DotKey::from_cell_dots([1, 3]);
        let multi = MultiCellKey::from_cells([&a, &b]);
        assert_eq!(multi.as_str(), "16|13");
        assert_eq!(multi.cell_count(), 2);
    }

    #[test]
    fn strict_prefix_requires_separator_boundary() {
        let prefix = MultiCellKey::from_cells([&DotKey::from_cell_dots([1])]);
        assert!(prefix.is_strict_prefix_of("1|4"));
        assert!(!prefix.is_strict_prefix_of("14"));
        assert!(!prefix.is_strict_prefix_of("1"));
    }
}
