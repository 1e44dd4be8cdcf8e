//! A buffered prefix matcher for sequences of per-cell [`DotKey`]s.
//!
//! This module provides [`PrefixMatcher`], which maps ordered sequences of
//! cells to entries drawn from a flat, ordered entry list (not a trie —
//! the lists here are short enough, and authored order matters for
//! tie-breaking, so a linear scan per call is the simplest correct
//! implementation).
//!
//! Two distinct tie-break policies are needed by the two call sites in
//! this workspace (the indicator matcher and the multi-cell matcher), so
//! rather than duplicate the buffering and leftover-recovery plumbing
//! twice, [`MatchPolicy`] parameterises a single implementation:
//!
//! - [`MatchPolicy::Deferred`]: a short match is held back (deferred) as
//!   long as a longer entry could still complete; it is only committed
//!   once the next cell proves the longer entry is not arriving. Used by
//!   the indicator matcher, where e.g. a bare capital-indicator cell is a
//!   prefix of a longer capital-passage sequence.
//! - [`MatchPolicy::Immediate`]: an exact match wins as soon as the
//!   buffer can grow no further (it is already at the longest known entry
//!   length), without ever being held back across a call boundary. Used
//!   by the multi-cell matcher, whose entries are authored to avoid
//!   overlaps except by length.
//!
//! Both policies share the same "no match" recovery: check whether
//! dropping the most recently pushed cell yields an exact match against
//! the remaining prefix, and if so emit that match with the dropped cell
//! as leftover input for the next stage. The immediate policy's recovery
//! inspects only the immediately-preceding prefix — it does not search
//! shorter prefixes still further back. Whether that is sufficient for
//! every multi-cell sequence length is an open question inherited from
//! the source design; this implementation preserves the behaviour rather
//! than second-guessing it.

use braille_dots::{DotKey, MultiCellKey};
use tracing::trace;

/// An entry that can be looked up by its canonical multi-cell fingerprint.
pub trait PrefixEntry: Clone {
    fn dots_key(&self) -> &MultiCellKey;
}

/// Tie-break policy distinguishing the indicator matcher from the
/// multi-cell matcher. See the module docs for the behavioural difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    Deferred,
    Immediate,
}

/// Outcome of pushing one cell into a [`PrefixMatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<E> {
    /// The buffered cells exactly match one entry, with no continuation.
    Matched(E),
    /// An entry matched, but the buffer holds one trailing cell that does
    /// not belong to it; the caller should re-offer it downstream.
    MatchedWithLeftover(E, DotKey),
    /// The buffer is a prefix of one or more entries; wait for more input.
    Pending,
    /// The buffer matches nothing, and recovery found no shorter match
    /// either; the caller should re-offer every buffered cell downstream.
    None(Vec<DotKey>),
}

/// A matcher over a fixed, ordered list of entries.
///
/// The entry list is authoritative order — when more than one entry could
/// share a dots key the first one wins, matching the "ordered lists,
/// scanned not hashed" requirement the entries come with.
pub struct PrefixMatcher<E> {
    policy: MatchPolicy,
    entries: Vec<E>,
    max_cells: usize,
    buffer: Vec<DotKey>,
    deferred: Option<E>,
}

impl<E: PrefixEntry> PrefixMatcher<E> {
    /// Builds a matcher over `entries`, deriving `max_cells` as the
    /// longest entry's cell count.
    pub fn new(policy: MatchPolicy, entries: Vec<E>) -> Self {
        let max_cells = entries.iter().map(|e| e.dots_key().cell_count()).max().unwrap_or(0);
        Self { policy, entries, max_cells, buffer: Vec::new(), deferred: None }
    }

    /// The longest entry length this matcher was built with.
    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Whether a chord is currently buffered awaiting more input.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Drops any buffered cells and deferred match without reporting them.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.deferred = None;
    }

    /// Returns and clears the buffered cells, discarding any deferred
    /// match. Used when the caller needs to force the buffer open (e.g.
    /// on deactivate or an explicit flush) without producing a match.
    pub fn flush_pending(&mut self) -> Vec<DotKey> {
        self.deferred = None;
        std::mem::take(&mut self.buffer)
    }

    /// Pushes one cell's key into the matcher. `filter` restricts which
    /// entries are eligible candidates this call (the multi-cell matcher
    /// uses it for mode filtering; the indicator matcher passes `|_| true`).
    pub fn push(&mut self, key: DotKey, mut filter: impl FnMut(&E) -> bool) -> MatchOutcome<E> {
        self.buffer.push(key);
        let prefix = MultiCellKey::from_cells(self.buffer.iter());

        let exact = self
            .entries
            .iter()
            .filter(|e| filter(e))
            .find(|e| e.dots_key().as_str() == prefix.as_str())
            .cloned();
        let longer_exists = self
            .entries
            .iter()
            .filter(|e| filter(e))
            .any(|e| prefix.is_strict_prefix_of(e.dots_key().as_str()));

        trace!(
            buffer_len = self.buffer.len(),
            has_exact = exact.is_some(),
            longer_exists,
            "prefix matcher step"
        );

        match self.policy {
            MatchPolicy::Deferred => self.step_deferred(exact, longer_exists),
            MatchPolicy::Immediate => self.step_immediate(exact, longer_exists, &mut filter),
        }
    }

    fn step_deferred(&mut self, exact: Option<E>, longer_exists: bool) -> MatchOutcome<E> {
        if let Some(entry) = exact {
            if !longer_exists {
                self.buffer.clear();
                self.deferred = None;
                return MatchOutcome::Matched(entry);
            }
            self.deferred = Some(entry);
            return MatchOutcome::Pending;
        }

        if longer_exists && self.buffer.len() < self.max_cells {
            return MatchOutcome::Pending;
        }

        if let Some(deferred) = self.deferred.take() {
            let leftover = self.buffer.pop().expect("buffer non-empty after push");
            self.buffer.clear();
            return MatchOutcome::MatchedWithLeftover(deferred, leftover);
        }

        MatchOutcome::None(std::mem::take(&mut self.buffer))
    }

    fn step_immediate(
        &mut self,
        exact: Option<E>,
        longer_exists: bool,
        filter: &mut impl FnMut(&E) -> bool,
    ) -> MatchOutcome<E> {
        if let Some(entry) = exact {
            if !longer_exists || self.buffer.len() >= self.max_cells {
                self.buffer.clear();
                return MatchOutcome::Matched(entry);
            }
            return MatchOutcome::Pending;
        }

        if longer_exists && self.buffer.len() < self.max_cells {
            return MatchOutcome::Pending;
        }

        if self.buffer.len() >= 2 {
            let last = self.buffer[self.buffer.len() - 1].clone();
            let preceding = MultiCellKey::from_cells(self.buffer[..self.buffer.len() - 1].iter());
            if let Some(prev) = self
                .entries
                .iter()
                .filter(|e| filter(e))
                .find(|e| e.dots_key().as_str() == preceding.as_str())
                .cloned()
            {
                self.buffer.clear();
                return MatchOutcome::MatchedWithLeftover(prev, last);
            }
        }

        MatchOutcome::None(std::mem::take(&mut self.buffer))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Entry {
        id: &'static str,
        key: MultiCellKey,
        mode: &'static str,
    }

    impl PrefixEntry for Entry {
        fn dots_key(&self) -> &MultiCellKey {
            &self.key
        }
    }

    fn key(dots: &[u8]) -> DotKey {
        DotKey::from_cell_dots(dots.iter().copied())
    }

    fn entry(id: &'static str, cells: &[&[u8]], mode: &'static str) -> Entry {
        let keys: Vec<DotKey> = cells.iter().map(|c| key(c)).collect();
        Entry { id, key: MultiCellKey::from_cells(keys.iter()), mode }
    }

    #[test]
    fn deferred_commits_short_match_when_no_continuation() {
        let mut m = PrefixMatcher::new(MatchPolicy::Deferred, vec![entry("cap", &[&[6]], "any")]);
        let outcome = m.push(key(&[6]), |_| true);
        assert_eq!(outcome, MatchOutcome::Matched(entry("cap", &[&[6]], "any")));
        assert!(!m.has_pending());
    }

    #[test]
    fn deferred_holds_short_match_while_longer_entry_still_possible() {
        let entries = vec![entry("cap", &[&[6]], "any"), entry("cap_word", &[&[6], &[6]], "any")];
        let mut m = PrefixMatcher::new(MatchPolicy::Deferred, entries);

        let first = m.push(key(&[6]), |_| true);
        assert_eq!(first, MatchOutcome::Pending);

        let second = m.push(key(&[6]), |_| true);
        assert_eq!(
            second,
            MatchOutcome::Matched(entry("cap_word", &[&[6], &[6]], "any"))
        );
    }

    #[test]
    fn deferred_falls_back_to_short_match_with_leftover() {
        let entries = vec![entry("cap", &[&[6]], "any"), entry("cap_word", &[&[6], &[6]], "any")];
        let mut m = PrefixMatcher::new(MatchPolicy::Deferred, entries);

        let first = m.push(key(&[6]), |_| true);
        assert_eq!(first, MatchOutcome::Pending);

        // A different cell arrives: "cap_word" cannot complete, but "cap" had matched.
        let second = m.push(key(&[1]), |_| true);
        assert_eq!(
            second,
            MatchOutcome::MatchedWithLeftover(entry("cap", &[&[6]], "any"), key(&[1]))
        );
        assert!(!m.has_pending());
    }

    #[test]
    fn deferred_none_when_nothing_matches_at_all() {
        let mut m = PrefixMatcher::new(MatchPolicy::Deferred, vec![entry("cap", &[&[6]], "any")]);
        let outcome = m.push(key(&[2]), |_| true);
        assert_eq!(outcome, MatchOutcome::None(vec![key(&[2])]));
    }

    #[test]
    fn immediate_waits_for_more_room_before_longer_entry_ruled_out() {
        let entries = vec![entry("open_paren", &[&[5], &[1, 2, 6]], "any")];
        let mut m = PrefixMatcher::new(MatchPolicy::Immediate, entries);
        let first = m.push(key(&[5]), |_| true);
        assert_eq!(first, MatchOutcome::Pending);
    }

    #[test]
    fn immediate_commits_exact_match_once_buffer_is_full() {
        let entries = vec![
            entry("slash2", &[&[3, 4], &[3, 4]], "any"),
            entry("slash3", &[&[3, 4], &[3, 4], &[3, 4]], "any"),
        ];
        let mut m = PrefixMatcher::new(MatchPolicy::Immediate, entries);
        assert_eq!(m.push(key(&[3, 4]), |_| true), MatchOutcome::Pending);
        assert_eq!(m.push(key(&[3, 4]), |_| true), MatchOutcome::Pending);
        let third = m.push(key(&[3, 4]), |_| true);
        assert_eq!(
            third,
            MatchOutcome::Matched(entry("slash3", &[&[3, 4], &[3, 4], &[3, 4]], "any"))
        );
    }

    #[test]
    fn immediate_recovers_leftover_by_dropping_last_cell() {
        let entries = vec![entry("open_paren", &[&[5], &[1, 2, 6]], "any")];
        let mut m = PrefixMatcher::new(MatchPolicy::Immediate, entries);
        assert_eq!(m.push(key(&[5]), |_| true), MatchOutcome::Pending);
        // Second cell doesn't continue "open_paren"; "5" alone isn't an entry either,
        // so this should fall through to None since dropping the last cell leaves
        // an empty prefix with no entry.
        let outcome = m.push(key(&[1]), |_| true);
        assert_eq!(outcome, MatchOutcome::None(vec![key(&[5]), key(&[1])]));
    }

    #[test]
    fn immediate_mode_filter_restricts_candidates() {
        let entries = vec![
            entry("kana_a", &[&[1], &[1]], "kana"),
            entry("grade1_fallback", &[&[1], &[1]], "grade1"),
        ];
        let mut m = PrefixMatcher::new(MatchPolicy::Immediate, entries);
        let filter = |e: &Entry| e.mode == "grade2" || e.mode == "grade1";
        assert_eq!(m.push(key(&[1]), filter), MatchOutcome::Pending);
        let outcome = m.push(key(&[1]), filter);
        assert_eq!(
            outcome,
            MatchOutcome::Matched(entry("grade1_fallback", &[&[1], &[1]], "grade1"))
        );
    }

    #[test]
    fn reset_clears_buffer_and_deferred() {
        let entries = vec![entry("cap", &[&[6]], "any"), entry("cap_word", &[&[6], &[6]], "any")];
        let mut m = PrefixMatcher::new(MatchPolicy::Deferred, entries);
        m.push(key(&[6]), |_| true);
        assert!(m.has_pending());
        m.reset();
        assert!(!m.has_pending());
    }

    #[test]
    fn flush_pending_returns_buffered_cells() {
        let entries = vec![entry("cap", &[&[6]], "any"), entry("cap_word", &[&[6], &[6]], "any")];
        let mut m = PrefixMatcher::new(MatchPolicy::Deferred, entries);
        m.push(key(&[6]), |_| true);
        let flushed = m.flush_pending();
        assert_eq!(flushed, vec![key(&[6])]);
        assert!(!m.has_pending());
    }
}
