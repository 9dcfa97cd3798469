//! Organization records derived from the registry tree.

use std::collections::BTreeSet;
use std::fmt;

/// Identifier type an organization is keyed under in the IdM core.
///
/// Derived from the shape of the registry code, never declared by the
/// registry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeType {
    /// Two characters, leading digit (e.g. `10`, `0A`).
    Division,
    /// Two characters, leading non-digit (e.g. `QB`, `SM`).
    Finance,
    /// Anything else.
    Department,
}

impl CodeType {
    /// Identifier type string used by the IdM core.
    pub fn as_str(self) -> &'static str {
        match self {
            CodeType::Division => "pras:division",
            CodeType::Finance => "finance",
            CodeType::Department => "pras:department",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification tags this sync can assign.
///
/// Variants are declared alphabetically so that set iteration order matches
/// the sorted string order sent to the IdM core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrgTag {
    Bodleian,
    College,
    Division,
    Pph,
    Unit,
}

impl OrgTag {
    pub fn as_str(self) -> &'static str {
        match self {
            OrgTag::Bodleian => "bodleian",
            OrgTag::College => "college",
            OrgTag::Division => "division",
            OrgTag::Pph => "pph",
            OrgTag::Unit => "unit",
        }
    }
}

impl fmt::Display for OrgTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags owned by this sync. Anything else on an existing organization
/// belongs to someone else and is left alone.
pub const MANAGED_TAGS: [&str; 4] = ["unit", "college", "pph", "bodleian"];

/// Permanent private halls.
pub const PPH_CODES: [&str; 6] = ["SM", "SQ", "SR", "ST", "SV", "SY"];

/// Code of the Bodleian Libraries.
pub const BODLEIAN_CODE: &str = "QB";

/// Division whose descendants are not tagged as units.
pub const NON_UNIT_DIVISION: &str = "0A";

pub fn is_managed_tag(tag: &str) -> bool {
    MANAGED_TAGS.contains(&tag)
}

/// A registry entity flattened out of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRecord {
    /// Trimmed registry code; never empty.
    pub code: String,
    pub code_type: CodeType,
    pub name: String,
    pub full_name: String,
    pub tags: BTreeSet<OrgTag>,
}

impl OrganizationRecord {
    /// Tag names in sorted order.
    pub fn tag_names(&self) -> BTreeSet<String> {
        self.tags.iter().map(|t| t.as_str().to_string()).collect()
    }

    /// (identifier type, value) pair this record joins on.
    pub fn key(&self) -> (CodeType, &str) {
        (self.code_type, &self.code)
    }
}
