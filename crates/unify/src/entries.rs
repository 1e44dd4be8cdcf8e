use std::collections::BTreeSet;

use braille_dots::{DotKey, MultiCellKey};
use braille_matcher::PrefixEntry;
use braille_mode::{IndicatorAction, IndicatorEffect, IndicatorKind, Mode, Modifier, Scope};
use rustc_hash::FxHashMap;

/// A single mode's interpretation of one dot key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleCellMapping {
    pub print: String,
    pub role: String,
    pub id: String,
}

/// All modes' mappings for one dot key. Globally unique per dot key within
/// a [`UnifiedTables::single_cell`] table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedSingleCellEntry {
    pub dots: DotKey,
    pub mappings: FxHashMap<Mode, SingleCellMapping>,
}

/// A mode/format indicator, possibly spanning several cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub id: String,
    pub dots: Vec<DotKey>,
    pub dots_key: MultiCellKey,
    pub action: IndicatorAction,
    pub target_mode: Mode,
    pub scope: Scope,
    pub kind: IndicatorKind,
    pub modifier: Option<Modifier>,
    pub tags: BTreeSet<String>,
}

impl Indicator {
    /// Narrows this definition to the view the mode state machine needs.
    pub fn effect(&self) -> IndicatorEffect {
        IndicatorEffect {
            id: self.id.clone(),
            kind: self.kind,
            action: self.action,
            target_mode: self.target_mode,
            scope: self.scope,
            modifier: self.modifier,
        }
    }
}

impl PrefixEntry for Indicator {
    fn dots_key(&self) -> &MultiCellKey {
        &self.dots_key
    }
}

/// A multi-cell character sequence (quotation marks, brackets, some
/// contractions) scoped to a single mode, or to `grade1` as the universal
/// fallback set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiCellEntry {
    pub id: String,
    pub dots: Vec<DotKey>,
    pub dots_key: MultiCellKey,
    pub print: String,
    pub mode: Mode,
    pub role: String,
}

impl PrefixEntry for MultiCellEntry {
    fn dots_key(&self) -> &MultiCellKey {
        &self.dots_key
    }
}

/// The four unified lookup structures the pipeline driver runs against.
#[derive(Debug, Clone, Default)]
pub struct UnifiedTables {
    pub single_cell: FxHashMap<DotKey, UnifiedSingleCellEntry>,
    pub numeric: FxHashMap<DotKey, SingleCellMapping>,
    pub indicators: Vec<Indicator>,
    pub multi_cell: Vec<MultiCellEntry>,
}
