//! Tracks the active braille system, any pending format modifier, and
//! scope-based auto-return.
//!
//! [`ModeState`] owns the mode stack, the active scope, and the pending
//! modifier; it has no knowledge of indicators or profiles beyond the
//! small [`IndicatorEffect`] view its caller builds from them. Unlike
//! `xeno-input::handler::InputHandler` (which drives a callback directly
//! on a mode change), transitions here are reported back to the caller as
//! plain values — the pipeline driver decides what, if anything, to do
//! with a [`ModeChangeEvent`].

use tracing::debug;

/// The active braille system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The universal fallback target for lookups and mode filtering.
    #[default]
    Grade1,
    Grade2,
    Kana,
    Nemeth,
}

/// How long a mode switch persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Exactly one character.
    Symbol,
    /// Until the next space.
    Word,
    /// Until an explicit exit indicator.
    Passage,
}

/// A format modifier flagged without changing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Capital,
    Numeric,
    Typeform,
}

/// Whether an indicator enters or exits its target mode/modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorAction {
    Enter,
    Exit,
}

/// Whether an indicator switches the active mode or merely flags a
/// modifier for the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    ModeSwitch,
    Modifier,
}

/// Everything [`ModeState::process_indicator`] needs from an indicator
/// definition, independent of how that definition is represented upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorEffect {
    pub id: String,
    pub kind: IndicatorKind,
    pub action: IndicatorAction,
    pub target_mode: Mode,
    pub scope: Scope,
    pub modifier: Option<Modifier>,
}

/// Why a mode change happened, carried on a [`ModeChangeEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeChangeCause {
    /// Triggered by processing the named indicator.
    Indicator(String),
    /// Triggered by scope auto-return (no indicator cell involved).
    Auto,
}

/// A completed mode transition, fired strictly between the indicator (or
/// auto-return event) that triggered it and the next character emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChangeEvent {
    pub old_mode: Mode,
    pub new_mode: Mode,
    pub cause: ModeChangeCause,
}

/// Result of [`ModeState::process_indicator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// A modifier was armed or cleared; the mode itself did not change.
    ModifierUpdated,
    /// The mode (and/or scope) changed.
    ModeChanged(ModeChangeEvent),
    /// A no-op: entering the mode/scope already active, or exiting at
    /// base with an empty stack.
    NoChange,
}

/// Mode stack, active scope, symbol counter, and pending modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeState {
    current_mode: Mode,
    mode_stack: Vec<Mode>,
    active_scope: Option<Scope>,
    symbol_count: u32,
    pending_modifier: Option<Modifier>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeState {
    /// Initial state: grade 1, empty stack, no scope, no pending modifier.
    pub fn new() -> Self {
        Self {
            current_mode: Mode::Grade1,
            mode_stack: Vec::new(),
            active_scope: None,
            symbol_count: 0,
            pending_modifier: None,
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.current_mode
    }

    pub fn active_scope(&self) -> Option<Scope> {
        self.active_scope
    }

    pub fn mode_stack_depth(&self) -> usize {
        self.mode_stack.len()
    }

    pub fn pending_modifier(&self) -> Option<Modifier> {
        self.pending_modifier
    }

    /// Applies an indicator's effect. See `spec.md` §4.5 for the case
    /// table this implements.
    pub fn process_indicator(&mut self, effect: &IndicatorEffect) -> ProcessResult {
        if effect.kind == IndicatorKind::Modifier {
            match effect.action {
                IndicatorAction::Enter => self.pending_modifier = effect.modifier,
                IndicatorAction::Exit => self.pending_modifier = None,
            }
            debug!(id = %effect.id, modifier = ?self.pending_modifier, "modifier updated");
            return ProcessResult::ModifierUpdated;
        }

        match effect.action {
            IndicatorAction::Enter => {
                if self.current_mode == effect.target_mode && self.active_scope == Some(effect.scope) {
                    return ProcessResult::NoChange;
                }
                let old_mode = self.current_mode;
                self.mode_stack.push(self.current_mode);
                self.current_mode = effect.target_mode;
                self.active_scope = Some(effect.scope);
                self.symbol_count = 0;
                let event = ModeChangeEvent {
                    old_mode,
                    new_mode: self.current_mode,
                    cause: ModeChangeCause::Indicator(effect.id.clone()),
                };
                debug!(id = %effect.id, ?old_mode, new_mode = ?self.current_mode, "mode entered");
                ProcessResult::ModeChanged(event)
            }
            IndicatorAction::Exit => {
                if self.current_mode == Mode::Grade1 && self.mode_stack.is_empty() {
                    return ProcessResult::NoChange;
                }
                let old_mode = self.current_mode;
                self.current_mode = self.mode_stack.pop().unwrap_or(Mode::Grade1);
                self.active_scope = None;
                self.symbol_count = 0;
                let event = ModeChangeEvent {
                    old_mode,
                    new_mode: self.current_mode,
                    cause: ModeChangeCause::Indicator(effect.id.clone()),
                };
                debug!(id = %effect.id, ?old_mode, new_mode = ?self.current_mode, "mode exited");
                ProcessResult::ModeChanged(event)
            }
        }
    }

    /// Returns the pending modifier and clears it.
    pub fn consume_modifier(&mut self) -> Option<Modifier> {
        self.pending_modifier.take()
    }

    /// Call after every emitted character. Auto-returns out of a
    /// symbol-scoped mode after exactly one character.
    pub fn on_character_emitted(&mut self) -> Option<ModeChangeEvent> {
        if self.active_scope != Some(Scope::Symbol) {
            return None;
        }
        self.symbol_count += 1;
        Some(self.auto_return())
    }

    /// Call on every space chord. Auto-returns out of a word-scoped mode.
    pub fn on_space(&mut self) -> Option<ModeChangeEvent> {
        if self.active_scope != Some(Scope::Word) {
            return None;
        }
        Some(self.auto_return())
    }

    fn auto_return(&mut self) -> ModeChangeEvent {
        let old_mode = self.current_mode;
        self.current_mode = self.mode_stack.pop().unwrap_or(Mode::Grade1);
        self.active_scope = None;
        self.symbol_count = 0;
        debug!(?old_mode, new_mode = ?self.current_mode, "scope auto-return");
        ModeChangeEvent { old_mode, new_mode: self.current_mode, cause: ModeChangeCause::Auto }
    }

    /// Restores the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn enter(id: &str, target: Mode, scope: Scope) -> IndicatorEffect {
        IndicatorEffect {
            id: id.to_string(),
            kind: IndicatorKind::ModeSwitch,
            action: IndicatorAction::Enter,
            target_mode: target,
            scope,
            modifier: None,
        }
    }

    fn exit(id: &str, scope: Scope) -> IndicatorEffect {
        IndicatorEffect {
            id: id.to_string(),
            kind: IndicatorKind::ModeSwitch,
            action: IndicatorAction::Exit,
            target_mode: Mode::Grade1,
            scope,
            modifier: None,
        }
    }

    fn modifier(id: &str, action: IndicatorAction, modifier: Modifier) -> IndicatorEffect {
        IndicatorEffect {
            id: id.to_string(),
            kind: IndicatorKind::Modifier,
            action,
            target_mode: Mode::Grade1,
            scope: Scope::Symbol,
            modifier: Some(modifier),
        }
    }

    #[test]
    fn initial_state_is_grade1_with_no_scope() {
        let state = ModeState::new();
        assert_eq!(state.current_mode(), Mode::Grade1);
        assert_eq!(state.active_scope(), None);
        assert_eq!(state.mode_stack_depth(), 0);
    }

    #[test]
    fn modifier_enter_sets_pending_without_changing_mode() {
        let mut state = ModeState::new();
        let result = state.process_indicator(&modifier("cap", IndicatorAction::Enter, Modifier::Capital));
        assert_eq!(result, ProcessResult::ModifierUpdated);
        assert_eq!(state.current_mode(), Mode::Grade1);
        assert_eq!(state.consume_modifier(), Some(Modifier::Capital));
        assert_eq!(state.consume_modifier(), None);
    }

    #[test]
    fn enter_then_matching_exit_restores_prior_state() {
        let mut state = ModeState::new();
        let before = state.clone();

        let changed = state.process_indicator(&enter("kana_in", Mode::Kana, Scope::Passage));
        assert!(matches!(changed, ProcessResult::ModeChanged(_)));
        assert_eq!(state.current_mode(), Mode::Kana);

        let restored = state.process_indicator(&exit("kana_out", Scope::Passage));
        assert!(matches!(restored, ProcessResult::ModeChanged(_)));
        assert_eq!(state.current_mode(), before.current_mode());
        assert_eq!(state.mode_stack_depth(), before.mode_stack_depth());
        assert_eq!(state.active_scope(), before.active_scope());
    }

    #[test]
    fn re_entering_identical_mode_and_scope_is_a_no_op() {
        let mut state = ModeState::new();
        state.process_indicator(&enter("kana_in", Mode::Kana, Scope::Passage));
        let result = state.process_indicator(&enter("kana_in_again", Mode::Kana, Scope::Passage));
        assert_eq!(result, ProcessResult::NoChange);
    }

    #[test]
    fn exit_at_base_with_empty_stack_is_a_no_op() {
        let mut state = ModeState::new();
        let result = state.process_indicator(&exit("spurious_exit", Scope::Passage));
        assert_eq!(result, ProcessResult::NoChange);
    }

    #[test]
    fn symbol_scope_auto_returns_after_one_character() {
        let mut state = ModeState::new();
        state.process_indicator(&enter("cap_sym", Mode::Grade1, Scope::Symbol));
        assert_eq!(state.active_scope(), Some(Scope::Symbol));

        let event = state.on_character_emitted();
        assert!(event.is_some());
        assert_eq!(state.active_scope(), None);
    }

    #[test]
    fn word_scope_auto_returns_only_on_space_not_on_character() {
        let mut state = ModeState::new();
        state.process_indicator(&enter("kana_word", Mode::Kana, Scope::Word));

        assert_eq!(state.on_character_emitted(), None);
        assert_eq!(state.active_scope(), Some(Scope::Word));

        let event = state.on_space();
        assert!(event.is_some());
        assert_eq!(state.active_scope(), None);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut state = ModeState::new();
        state.process_indicator(&enter("kana_in", Mode::Kana, Scope::Passage));
        state.reset();
        assert_eq!(state, ModeState::new());
    }
}
