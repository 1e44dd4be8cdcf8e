use std::time::Duration;

use braille_mode::Mode;

/// Runtime-mutable engine configuration. See `spec.md` §6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub chord_timeout: Duration,
    pub show_braille_overlay: bool,
    pub initial_mode: Mode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chord_timeout: Duration::from_millis(50),
            show_braille_overlay: false,
            initial_mode: Mode::Grade1,
        }
    }
}
