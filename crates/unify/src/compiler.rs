use std::collections::HashMap;

use braille_dots::{DotKey, MultiCellKey};
use braille_mode::{IndicatorAction, IndicatorKind, Mode, Modifier};
use braille_profile::{ProfileRecord, RawEntry};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::entries::{Indicator, MultiCellEntry, SingleCellMapping, UnifiedSingleCellEntry, UnifiedTables};
use crate::role::RoleClass;

/// A reason a raw profile entry was silently discarded. Malformed profile
/// data is authored data, not a programming error (`spec.md` §7); these
/// are counted, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// A per-cell dots string contained a non-digit character.
    NonDigitDots,
    /// An entry needed a `print` value (single-cell or multi-cell) and had none.
    MissingPrint,
    /// An entry's `dots` list was empty, or had neither 1 nor ≥2 cells
    /// classifiable under the routing table.
    UnknownCellCount,
}

/// Per-reason discard counts, surfaced for host-side diagnostics.
#[derive(Debug, Clone, Default)]
pub struct UnifyReport {
    pub discarded: HashMap<DiscardReason, u32>,
}

impl UnifyReport {
    fn record(&mut self, reason: DiscardReason, entry_id: &str) {
        let first_time = !self.discarded.contains_key(&reason);
        *self.discarded.entry(reason).or_insert(0) += 1;
        if first_time {
            warn!(?reason, id = entry_id, "profile entries discarded for this reason");
        }
    }

    pub fn total_discarded(&self) -> u32 {
        self.discarded.values().sum()
    }
}

/// Compiles every system's profile records into the unified tables.
///
/// `profiles` maps a system id (`"ueb"`, `"kana"`, `"nemeth"`, ...) to the
/// list of profile records authored for it; a system id may carry more
/// than one record (e.g. separate grade1/grade2 files).
pub fn unify(profiles: &HashMap<String, Vec<ProfileRecord>>) -> (UnifiedTables, UnifyReport) {
    let mut tables = UnifiedTables::default();
    let mut report = UnifyReport::default();

    for records in profiles.values() {
        for record in records {
            let modes = modes_for_record(record);
            for raw in &record.entries {
                classify_entry(raw, &modes, &mut tables, &mut report);
            }
        }
    }

    (tables, report)
}

fn modes_for_record(record: &ProfileRecord) -> Vec<Mode> {
    match record.system_id.as_str() {
        "kana" => vec![Mode::Kana],
        "nemeth" => vec![Mode::Nemeth],
        _ => {
            let has_grade1 = record.braille_type.contains("grade1");
            let has_grade2 = record.braille_type.contains("grade2");
            match (has_grade1, has_grade2) {
                (true, true) => vec![Mode::Grade1, Mode::Grade2],
                (false, true) => vec![Mode::Grade2],
                _ => vec![Mode::Grade1],
            }
        }
    }
}

fn classify_entry(raw: &RawEntry, modes: &[Mode], tables: &mut UnifiedTables, report: &mut UnifyReport) {
    if raw.role == "indicator" || raw.category == "indicator" {
        let Some(dot_keys) = canonicalize_dots(&raw.dots) else {
            report.record(DiscardReason::NonDigitDots, &raw.id);
            return;
        };
        if dot_keys.is_empty() {
            report.record(DiscardReason::UnknownCellCount, &raw.id);
            return;
        }
        tables.indicators.push(build_indicator(raw, dot_keys));
        return;
    }

    let Some(dot_keys) = canonicalize_dots(&raw.dots) else {
        report.record(DiscardReason::NonDigitDots, &raw.id);
        return;
    };
    if dot_keys.is_empty() {
        report.record(DiscardReason::UnknownCellCount, &raw.id);
        return;
    }

    match dot_keys.len() {
        1 => classify_single_cell(raw, &dot_keys[0], modes, tables, report),
        _ => classify_multi_cell(raw, dot_keys, modes, tables, report),
    }
}

fn canonicalize_dots(raw_dots: &[String]) -> Option<Vec<DotKey>> {
    raw_dots.iter().map(|s| DotKey::from_digit_str(s)).collect()
}

fn classify_single_cell(
    raw: &RawEntry,
    dots: &DotKey,
    modes: &[Mode],
    tables: &mut UnifiedTables,
    report: &mut UnifyReport,
) {
    let Some(print) = raw.print.clone() else {
        report.record(DiscardReason::MissingPrint, &raw.id);
        return;
    };
    let mapping = SingleCellMapping { print, role: raw.role.clone(), id: raw.id.clone() };

    for mode in modes {
        insert_single_cell(&mut tables.single_cell, dots.clone(), *mode, mapping.clone());
    }

    if raw.role == "numbers" {
        tables.numeric.entry(dots.clone()).or_insert(mapping);
    }
}

fn classify_multi_cell(
    raw: &RawEntry,
    dot_keys: Vec<DotKey>,
    modes: &[Mode],
    tables: &mut UnifiedTables,
    report: &mut UnifyReport,
) {
    let Some(print) = raw.print.clone() else {
        report.record(DiscardReason::MissingPrint, &raw.id);
        return;
    };
    let dots_key = MultiCellKey::from_cells(dot_keys.iter());

    for mode in modes {
        tables.multi_cell.push(MultiCellEntry {
            id: raw.id.clone(),
            dots: dot_keys.clone(),
            dots_key: dots_key.clone(),
            print: print.clone(),
            mode: *mode,
            role: raw.role.clone(),
        });
    }
}

/// Inserts a mode's mapping for a dot key, resolving conflicts by the
/// [`RoleClass`] total order: the incoming mapping only overwrites an
/// existing one for the same mode if it outranks it; otherwise the first
/// writer keeps the slot.
fn insert_single_cell(
    table: &mut FxHashMap<DotKey, UnifiedSingleCellEntry>,
    dots: DotKey,
    mode: Mode,
    mapping: SingleCellMapping,
) {
    let entry = table
        .entry(dots.clone())
        .or_insert_with(|| UnifiedSingleCellEntry { dots, mappings: FxHashMap::default() });

    match entry.mappings.get(&mode) {
        None => {
            entry.mappings.insert(mode, mapping);
        }
        Some(existing) => {
            if RoleClass::classify(&mapping.role) > RoleClass::classify(&existing.role) {
                entry.mappings.insert(mode, mapping);
            }
        }
    }
}

fn build_indicator(raw: &RawEntry, dot_keys: Vec<DotKey>) -> Indicator {
    let dots_key = MultiCellKey::from_cells(dot_keys.iter());

    let action = if raw.tags.contains("terminator") || raw.id.contains("terminator") {
        IndicatorAction::Exit
    } else {
        IndicatorAction::Enter
    };

    let (kind, modifier) = match raw.subcategory.as_str() {
        "capital" => (IndicatorKind::Modifier, Some(Modifier::Capital)),
        "numeric" => (IndicatorKind::Modifier, Some(Modifier::Numeric)),
        "italic" | "bold" | "underline" | "script" => (IndicatorKind::Modifier, Some(Modifier::Typeform)),
        _ => (IndicatorKind::ModeSwitch, None),
    };

    let target_mode = if raw.tags.contains("kana") || raw.subcategory.contains("kana") {
        Mode::Kana
    } else if raw.tags.contains("nemeth") || raw.subcategory.contains("nemeth") {
        Mode::Nemeth
    } else {
        Mode::Grade1
    };

    let scope = if raw.tags.contains("passage") {
        braille_mode::Scope::Passage
    } else if raw.tags.contains("word") {
        braille_mode::Scope::Word
    } else {
        braille_mode::Scope::Symbol
    };

    Indicator {
        id: raw.id.clone(),
        dots: dot_keys,
        dots_key,
        action,
        target_mode,
        scope,
        kind,
        modifier,
        tags: raw.tags.iter().cloned().collect(),
    }
}
