/// A total order over single-cell roles, formalising the two ad-hoc rules
/// the source design used for conflict resolution (`spec.md` §4.2, §9):
/// paired punctuation beats a plain entry, and punctuation beats a
/// contraction-like entry. Resolved here as one ordering so a contested
/// dot key always has an unambiguous winner: `{open, close} > punctuation
/// > {groupsigns, wordsigns, contraction} > letter > numbers > other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoleClass {
    Other,
    Numbers,
    Letter,
    Contraction,
    Punctuation,
    OpenClose,
}

impl RoleClass {
    /// Classifies a raw entry's `role` string into its priority class.
    pub fn classify(role: &str) -> Self {
        match role {
            "open" | "close" => Self::OpenClose,
            "punctuation" => Self::Punctuation,
            "groupsigns" | "wordsigns" | "contraction" => Self::Contraction,
            "letter" => Self::Letter,
            "numbers" => Self::Numbers,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_outranks_punctuation() {
        assert!(RoleClass::classify("open") > RoleClass::classify("punctuation"));
    }

    #[test]
    fn punctuation_outranks_contraction_like_roles() {
        assert!(RoleClass::classify("punctuation") > RoleClass::classify("groupsigns"));
        assert!(RoleClass::classify("punctuation") > RoleClass::classify("wordsigns"));
    }

    #[test]
    fn unknown_roles_rank_lowest() {
        assert!(RoleClass::classify("letter") > RoleClass::classify("something_else"));
    }
}
