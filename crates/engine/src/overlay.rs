use braille_dots::{dot_key_to_unicode, DotKey, MultiCellKey};
use rustc_hash::FxHashMap;

/// What one emitted character position records, so the overlay can render
/// both single-cell and multi-cell originating sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEntry {
    /// A space (or an unfilled gap).
    Empty,
    Single(DotKey),
    Multi(MultiCellKey),
}

impl OverlayEntry {
    fn to_unicode(&self) -> String {
        match self {
            OverlayEntry::Empty => '\u{2800}'.to_string(),
            OverlayEntry::Single(key) => dot_key_to_unicode(key).to_string(),
            OverlayEntry::Multi(key) => key
                .as_str()
                .split('|')
                .map(|cell| {
                    let dot_key = DotKey::from_digit_str(cell).unwrap_or_else(DotKey::space);
                    dot_key_to_unicode(&dot_key)
                })
                .collect(),
        }
    }
}

/// Per-line ordered record of the canonical dot key behind each emitted
/// character position, for the host's overlay display. See `spec.md` §4.7.
#[derive(Debug, Clone, Default)]
pub struct OverlayTracker {
    lines: FxHashMap<u32, Vec<OverlayEntry>>,
}

impl OverlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn line_mut(&mut self, line: u32, col: usize) -> &mut Vec<OverlayEntry> {
        let entries = self.lines.entry(line).or_default();
        if entries.len() <= col {
            entries.resize(col + 1, OverlayEntry::Empty);
        }
        entries
    }

    pub fn record(&mut self, line: u32, col: usize, dots: DotKey) {
        let entries = self.line_mut(line, col);
        entries[col] = OverlayEntry::Single(dots);
    }

    pub fn record_multi(&mut self, line: u32, col: usize, dots: MultiCellKey) {
        let entries = self.line_mut(line, col);
        entries[col] = OverlayEntry::Multi(dots);
    }

    pub fn record_space(&mut self, line: u32, col: usize) {
        let entries = self.line_mut(line, col);
        entries[col] = OverlayEntry::Empty;
    }

    pub fn get_line(&self, line: u32) -> Option<String> {
        self.lines.get(&line).map(|entries| entries.iter().map(OverlayEntry::to_unicode).collect())
    }

    pub fn has_line(&self, line: u32) -> bool {
        self.lines.contains_key(&line)
    }

    pub fn get_tracked_lines(&self) -> Vec<u32> {
        let mut lines: Vec<u32> = self.lines.keys().copied().collect();
        lines.sort_unstable();
        lines
    }

    /// Number of recorded columns (one per emitted character or space) on
    /// a line — unlike [`Self::get_line`], this counts overlay entries,
    /// not the rendered Unicode glyphs a multi-cell entry expands into.
    pub fn entry_count(&self, line: u32) -> usize {
        self.lines.get(&line).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
