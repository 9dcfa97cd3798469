//! Flattens the registry tree into organization records.
//!
//! ```text
//! root
//!  ├─ 10 Medical Sciences        (division, unit)
//!  │   └─ 3C05 Pathology         (department, unit)   parent division = 10
//!  └─ 0A GLAM                    (division)
//!      └─ QB Bodleian Libraries  (finance, bodleian)  parent division = 0A
//! ```
//!
//! The parent division is threaded down the recursion explicitly; nodes with
//! an empty code are not emitted but their children are still walked.

use std::collections::BTreeSet;

use pras_client::SourceNode;

use super::models::{
    CodeType, OrgTag, OrganizationRecord, BODLEIAN_CODE, NON_UNIT_DIVISION, PPH_CODES,
};

/// Walk `node` and everything beneath it, returning records in pre-order.
pub fn flatten(node: &SourceNode, parent_division: Option<&str>) -> Vec<OrganizationRecord> {
    let mut records = Vec::new();
    collect(node, parent_division, &mut records);
    records
}

fn collect(node: &SourceNode, parent_division: Option<&str>, out: &mut Vec<OrganizationRecord>) {
    let code = node.code().trim();
    let (name, full_name) = cross_copy(node.name().trim(), node.full_name().trim());

    let code_type = classify(code);
    let division = match code_type {
        CodeType::Division => Some(code),
        _ => parent_division,
    };

    if !code.is_empty() {
        out.push(OrganizationRecord {
            code: code.to_string(),
            code_type,
            tags: tags_for(code, code_type, name, division),
            name: name.to_string(),
            full_name: full_name.to_string(),
        });
    }

    for child in node.children() {
        collect(child, division, out);
    }
}

/// Classify a registry code by its shape alone.
pub fn classify(code: &str) -> CodeType {
    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), Some(_), None) if first.is_numeric() => CodeType::Division,
        (Some(_), Some(_), None) => CodeType::Finance,
        _ => CodeType::Department,
    }
}

/// Each name stands in for the other when blank.
fn cross_copy<'a>(name: &'a str, full_name: &'a str) -> (&'a str, &'a str) {
    let short = if name.is_empty() { full_name } else { name };
    let full = if full_name.is_empty() { name } else { full_name };
    (short, full)
}

/// `division` is the division in effect for this node: its own code when it
/// is a division, otherwise the inherited one.
fn tags_for(code: &str, code_type: CodeType, name: &str, division: Option<&str>) -> BTreeSet<OrgTag> {
    let mut tags = BTreeSet::new();

    if code_type == CodeType::Division {
        tags.insert(OrgTag::Division);
    }
    if division != Some(NON_UNIT_DIVISION) {
        tags.insert(OrgTag::Unit);
    }
    if name.ends_with(" College") || name == "Christ Church" {
        tags.insert(OrgTag::College);
    }
    if PPH_CODES.contains(&code) {
        tags.insert(OrgTag::Pph);
    }
    if code == BODLEIAN_CODE {
        tags.insert(OrgTag::Bodleian);
    }

    tags
}
