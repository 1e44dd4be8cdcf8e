use braille_dots::{dot_key_to_unicode, Dot, DotKey, DotSet};
use braille_matcher::{MatchOutcome, MatchPolicy, PrefixMatcher};
use braille_mode::{Mode, Modifier, ModeState, ProcessResult};
use braille_unify::{Indicator, MultiCellEntry, UnifiedTables};
use tracing::warn;

use crate::aggregator::{ChordAggregator, TimerCommand};
use crate::config::EngineConfig;
use crate::host::{Emission, Host};
use crate::overlay::OverlayTracker;

/// Wires the chord aggregator, the two prefix matchers, the mode state
/// machine, and the overlay tracker into the ordering law of `spec.md`
/// §4.6. One instance per embedded editor — per §5, hosts multiplexing
/// several editors instantiate separate engines rather than share one.
pub struct Engine {
    config: EngineConfig,
    aggregator: ChordAggregator,
    tables: UnifiedTables,
    multi_cell: PrefixMatcher<MultiCellEntry>,
    indicator: PrefixMatcher<Indicator>,
    mode_state: ModeState,
    numeric_mode: bool,
    kana_bracket_open: bool,
    overlay: OverlayTracker,
    cursor_line: u32,
    cursor_col: u32,
}

impl Engine {
    /// Builds the engine over a compiled table set. `config.initial_mode`
    /// is accepted for interface symmetry with `spec.md` §6 but the mode
    /// state machine always starts at `grade1` per §3's lifecycle — a
    /// non-default initial mode is the host's responsibility to enter via
    /// its own indicator-equivalent action, since the core has no
    /// standalone "set mode" operation outside indicator processing.
    pub fn new(tables: UnifiedTables, config: EngineConfig) -> Self {
        let multi_cell = PrefixMatcher::new(MatchPolicy::Immediate, tables.multi_cell.clone());
        let indicator = PrefixMatcher::new(MatchPolicy::Deferred, tables.indicators.clone());
        let aggregator = ChordAggregator::new(config.chord_timeout);
        Self {
            config,
            aggregator,
            tables,
            multi_cell,
            indicator,
            mode_state: ModeState::new(),
            numeric_mode: false,
            kana_bracket_open: false,
            overlay: OverlayTracker::new(),
            cursor_line: 0,
            cursor_col: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayTracker {
        &self.overlay
    }

    pub fn current_mode(&self) -> Mode {
        self.mode_state.current_mode()
    }

    /// Moves the driver's own column tracking to the start of a new line;
    /// the host calls this when its cursor moves to a new line for reasons
    /// outside dot input (arrow keys, mouse clicks).
    pub fn move_cursor(&mut self, line: u32, col: u32) {
        self.cursor_line = line;
        self.cursor_col = col;
    }

    /// Thin host command: flips the overlay visibility flag. Not part of
    /// the core contract (`spec.md` §6).
    pub fn toggle_overlay(&mut self) {
        self.config.show_braille_overlay = !self.config.show_braille_overlay;
    }

    /// Feeds one dot press through the chord aggregator, processing any
    /// chord(s) it closes. Returns the timer instruction the host's event
    /// loop must honor.
    pub fn dot_input(&mut self, dot: Dot, host: &mut dyn Host) -> Option<TimerCommand> {
        let outcome = self.aggregator.press(dot);
        for chord in outcome.chords {
            self.process_closed_chord(chord, host);
        }
        outcome.timer
    }

    /// Forces immediate emission of the pending chord.
    pub fn flush(&mut self, host: &mut dyn Host) -> Option<TimerCommand> {
        let outcome = self.aggregator.flush();
        for chord in outcome.chords {
            self.process_closed_chord(chord, host);
        }
        outcome.timer
    }

    /// Discards pending dot accumulation; no chord is emitted.
    pub fn cancel(&mut self) -> TimerCommand {
        self.aggregator.cancel()
    }

    pub fn set_chord_timeout(&mut self, timeout: std::time::Duration) {
        self.config.chord_timeout = timeout;
        self.aggregator.set_timeout(timeout);
    }

    /// Call when the host's quiescence timer fires.
    pub fn on_timer_fire(&mut self, host: &mut dyn Host) {
        if let Some(chord) = self.aggregator.on_timer_fire() {
            self.process_closed_chord(chord, host);
        }
    }

    /// Deactivation: flush matcher buffers, reset mode state, clear driver
    /// flags and the overlay (`spec.md` §3 lifecycles).
    pub fn deactivate(&mut self) {
        self.aggregator.cancel();
        self.multi_cell.reset();
        self.indicator.reset();
        self.mode_state.reset();
        self.numeric_mode = false;
        self.kana_bracket_open = false;
        self.overlay.clear();
    }

    fn process_closed_chord(&mut self, chord: DotSet, host: &mut dyn Host) {
        if chord.is_space() {
            self.process_space(host);
        } else {
            let key = DotKey::from_dot_set(&chord);
            self.offer_to_multi_cell(key, host);
        }
    }

    fn offer_to_multi_cell(&mut self, key: DotKey, host: &mut dyn Host) {
        let mode = self.mode_state.current_mode();
        let outcome = self.multi_cell.push(key, |entry: &MultiCellEntry| entry.mode == mode || entry.mode == Mode::Grade1);
        match outcome {
            MatchOutcome::Matched(entry) => self.emit_multi(&entry, host),
            MatchOutcome::MatchedWithLeftover(entry, leftover) => {
                self.emit_multi(&entry, host);
                self.offer_to_indicator(leftover, host);
            }
            MatchOutcome::Pending => {}
            MatchOutcome::None(buffer) => {
                for cell in buffer {
                    self.offer_to_indicator(cell, host);
                }
            }
        }
    }

    fn offer_to_indicator(&mut self, key: DotKey, host: &mut dyn Host) {
        let outcome = self.indicator.push(key, |_: &Indicator| true);
        match outcome {
            MatchOutcome::Matched(indicator) => self.apply_indicator(&indicator, host),
            MatchOutcome::MatchedWithLeftover(indicator, leftover) => {
                self.apply_indicator(&indicator, host);
                self.offer_to_single_cell(leftover, host);
            }
            MatchOutcome::Pending => {}
            MatchOutcome::None(buffer) => {
                for cell in buffer {
                    self.offer_to_single_cell(cell, host);
                }
            }
        }
    }

    fn apply_indicator(&mut self, indicator: &Indicator, host: &mut dyn Host) {
        let effect = indicator.effect();
        let result = self.mode_state.process_indicator(&effect);
        if let ProcessResult::ModeChanged(event) = &result {
            host.on_mode_change(event);
        }
        if effect.modifier == Some(Modifier::Numeric) {
            self.numeric_mode = true;
        }
    }

    fn offer_to_single_cell(&mut self, key: DotKey, host: &mut dyn Host) {
        let modifier = self.mode_state.consume_modifier();
        let is_kana_bracket = self.mode_state.current_mode() == Mode::Kana && key.as_str() == "36";

        let (mut print, via_numeric) = if is_kana_bracket {
            let text = if self.kana_bracket_open { "\u{300d}" } else { "\u{300c}" };
            self.kana_bracket_open = !self.kana_bracket_open;
            (text.to_string(), false)
        } else if self.numeric_mode || modifier == Some(Modifier::Numeric) {
            match self.tables.numeric.get(&key) {
                Some(mapping) => (mapping.print.clone(), true),
                None => (self.lookup_normal(&key), false),
            }
        } else {
            (self.lookup_normal(&key), false)
        };

        if !via_numeric {
            self.numeric_mode = false;
        }

        if modifier == Some(Modifier::Capital) {
            print = print.to_uppercase();
        }

        let dots_key = key.as_str().to_string();
        if let Err(err) = host.emit(Emission { print: &print, dots_key: &dots_key }) {
            warn!(?err, %dots_key, "host rejected single-cell emission");
        }
        self.overlay.record(self.cursor_line, self.cursor_col as usize, key);
        self.cursor_col += 1;

        if let Some(event) = self.mode_state.on_character_emitted() {
            host.on_mode_change(&event);
        }
    }

    fn lookup_normal(&self, key: &DotKey) -> String {
        if let Some(entry) = self.tables.single_cell.get(key) {
            if let Some(mapping) = entry.mappings.get(&self.mode_state.current_mode()) {
                return mapping.print.clone();
            }
            if let Some(mapping) = entry.mappings.get(&Mode::Grade1) {
                return mapping.print.clone();
            }
        }
        dot_key_to_unicode(key).to_string()
    }

    fn emit_multi(&mut self, entry: &MultiCellEntry, host: &mut dyn Host) {
        let dots_key = entry.dots_key.as_str().to_string();
        if let Err(err) = host.emit(Emission { print: &entry.print, dots_key: &dots_key }) {
            warn!(?err, %dots_key, "host rejected multi-cell emission");
        }
        self.overlay.record_multi(self.cursor_line, self.cursor_col as usize, entry.dots_key.clone());
        self.cursor_col += 1;
        self.numeric_mode = false;

        if let Some(event) = self.mode_state.on_character_emitted() {
            host.on_mode_change(&event);
        }
    }

    fn process_space(&mut self, host: &mut dyn Host) {
        let multi_leftover = self.multi_cell.flush_pending();
        for cell in multi_leftover {
            self.offer_to_indicator(cell, host);
        }
        let indicator_leftover = self.indicator.flush_pending();
        for cell in indicator_leftover {
            self.offer_to_single_cell(cell, host);
        }

        if let Err(err) = host.emit(Emission { print: " ", dots_key: "" }) {
            warn!(?err, "host rejected space emission");
        }
        self.overlay.record_space(self.cursor_line, self.cursor_col as usize);
        self.cursor_col += 1;

        if let Some(event) = self.mode_state.on_space() {
            host.on_mode_change(&event);
        }
        self.numeric_mode = false;
    }
}
