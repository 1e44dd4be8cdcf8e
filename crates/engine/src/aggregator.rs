use std::time::Duration;

use braille_dots::{Dot, DotSet};
use smallvec::SmallVec;

/// Instruction the host's event loop must honor after a [`ChordAggregator`]
/// call: arm (or re-arm) the quiescence timer, or cancel it. The aggregator
/// owns no timer itself — per `spec.md` §4.1/§5, the timer belongs to the
/// host's event loop, and [`ChordAggregator::on_timer_fire`] is how the
/// host reports expiry back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Arm(Duration),
    Cancel,
}

/// Result of one [`ChordAggregator`] call: zero, one, or (only for a space
/// pressed while a chord is pending) two closed chords, plus what to do
/// with the timer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PressOutcome {
    pub chords: SmallVec<[DotSet; 2]>,
    pub timer: Option<TimerCommand>,
}

/// Groups simultaneous dot presses into one chord with a trailing-edge
/// quiescence timeout. See `spec.md` §4.1.
#[derive(Debug, Clone)]
pub struct ChordAggregator {
    pending: DotSet,
    timeout: Duration,
}

impl ChordAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { pending: DotSet::EMPTY, timeout }
    }

    /// Changes the quiescence duration; takes effect on the next `press`.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// A space commits any pending chord first, then closes its own
    /// space-only chord; a dot press accumulates into the pending set and
    /// (re)arms the timer.
    pub fn press(&mut self, dot: Dot) -> PressOutcome {
        if dot == 0 {
            let mut chords = SmallVec::new();
            if !self.pending.is_empty() {
                chords.push(std::mem::take(&mut self.pending));
            }
            chords.push(DotSet::from_dots([0]));
            return PressOutcome { chords, timer: Some(TimerCommand::Cancel) };
        }

        self.pending.insert(dot);
        PressOutcome { chords: SmallVec::new(), timer: Some(TimerCommand::Arm(self.timeout)) }
    }

    /// Commits the pending chord immediately. No-op on an empty buffer.
    pub fn flush(&mut self) -> PressOutcome {
        if self.pending.is_empty() {
            return PressOutcome::default();
        }
        let chord = std::mem::take(&mut self.pending);
        let mut chords = SmallVec::new();
        chords.push(chord);
        PressOutcome { chords, timer: Some(TimerCommand::Cancel) }
    }

    /// Discards pending state without emitting a chord.
    pub fn cancel(&mut self) -> TimerCommand {
        self.pending = DotSet::EMPTY;
        TimerCommand::Cancel
    }

    /// Call when the host's timer actually fires; commits the pending
    /// chord, or `None` if nothing is pending (a fired-but-stale timer).
    pub fn on_timer_fire(&mut self) -> Option<DotSet> {
        if self.pending.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn repeated_presses_of_same_dot_are_idempotent() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        agg.press(1);
        agg.press(1);
        let chord = agg.on_timer_fire().unwrap();
        assert_eq!(chord, DotSet::from_dots([1]));
    }

    #[test]
    fn press_arms_timer_on_every_call() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        let first = agg.press(1);
        assert_eq!(first.timer, Some(TimerCommand::Arm(Duration::from_millis(50))));
        let second = agg.press(4);
        assert_eq!(second.timer, Some(TimerCommand::Arm(Duration::from_millis(50))));
        assert!(first.chords.is_empty() && second.chords.is_empty());
    }

    #[test]
    fn space_with_no_pending_chord_closes_only_the_space() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        let outcome = agg.press(0);
        assert_eq!(outcome.chords.as_slice(), &[DotSet::from_dots([0])]);
    }

    #[test]
    fn space_with_pending_chord_commits_both() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        agg.press(1);
        agg.press(4);
        let outcome = agg.press(0);
        assert_eq!(
            outcome.chords.as_slice(),
            &[DotSet::from_dots([1, 4]), DotSet::from_dots([0])]
        );
        assert_eq!(outcome.timer, Some(TimerCommand::Cancel));
    }

    #[test]
    fn flush_on_empty_aggregator_is_a_no_op() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        let outcome = agg.flush();
        assert!(outcome.chords.is_empty());
        assert_eq!(outcome.timer, None);
    }

    #[test]
    fn flush_commits_pending_chord() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        agg.press(2);
        let outcome = agg.flush();
        assert_eq!(outcome.chords.as_slice(), &[DotSet::from_dots([2])]);
    }

    #[test]
    fn cancel_discards_without_emitting() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        agg.press(3);
        agg.cancel();
        assert!(!agg.has_pending());
        assert_eq!(agg.on_timer_fire(), None);
    }

    #[test]
    fn set_timeout_applies_to_next_press_only() {
        let mut agg = ChordAggregator::new(Duration::from_millis(50));
        agg.set_timeout(Duration::from_millis(120));
        let outcome = agg.press(1);
        assert_eq!(outcome.timer, Some(TimerCommand::Arm(Duration::from_millis(120))));
    }
}
