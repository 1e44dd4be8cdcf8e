use braille_mode::ModeChangeEvent;

use crate::error::EmissionError;

/// What the driver asks the host to emit: print text plus the canonical
/// dot fingerprint of its originating cell(s), carried as a plain string
/// so the host need not depend on `braille-dots` to receive it (for a
/// multi-cell emission this is the `|`-joined multi-cell key, per
/// `spec.md` §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission<'a> {
    pub print: &'a str,
    pub dots_key: &'a str,
}

/// The host embedding this engine: a text editor, terminal UI, or test
/// harness. Implemented by the caller, driven by [`crate::Engine`].
pub trait Host {
    /// One character (or multi-cell sequence) ready for insertion.
    /// Emission is best-effort (`spec.md` §7): a returned error is logged
    /// and otherwise ignored — it does not roll back matcher or mode
    /// state.
    fn emit(&mut self, emission: Emission<'_>) -> Result<(), EmissionError>;

    /// Fired strictly between the indicator (or auto-return) that
    /// triggered a mode change and the next character emission.
    fn on_mode_change(&mut self, event: &ModeChangeEvent) {
        let _ = event;
    }
}
