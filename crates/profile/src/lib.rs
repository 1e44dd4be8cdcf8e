//! The profile record schema the data unifier consumes.
//!
//! This crate owns no behaviour. It is the boundary type for already-parsed
//! profile data (the YAML/JSON -> structured conversion and the separate
//! data-pipeline tool that produces it are out of scope for this
//! workspace — see `spec.md` §1). A [`ProfileRecord`] is one braille system
//! at one grade; [`RawEntry`] is one authored row within it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One authored braille system definition, as loaded from its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub schema_version: u32,
    pub system_id: String,
    pub system_name: String,
    pub locale: String,
    /// Free-form; may contain the tokens `"grade1"` and/or `"grade2"`.
    pub braille_type: String,
    /// Expected to be `6`; not otherwise validated by this crate.
    pub cell_size: u8,
    pub entries: Vec<RawEntry>,
}

/// One authored row within a [`ProfileRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub category: String,
    pub subcategory: String,
    pub role: String,
    #[serde(default)]
    pub print: Option<String>,
    /// Ordered per-cell digit strings, e.g. `["1"]`, `["16", "13"]`.
    pub dots: Vec<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub id: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub context: Option<EntryContext>,
}

/// Provenance metadata carried through from the authoring pipeline.
///
/// Retained on the parsed record for traceability; the matching core does
/// not consult any of these fields (see `spec.md` §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContext {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub requires_indicator: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
}
