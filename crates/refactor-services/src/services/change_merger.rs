//! Deduplication of changes reported by several compilation units
//!
//! A source file compiled into both a library and its test target is reported
//! once per unit. Applying both copies would edit the same range twice.

use refactor_foundation::model::Change;

/// Flatten per-unit change lists, keeping the first occurrence of each edit.
///
/// Edits are compared with [`Change::is_same_edit`]; survivors keep their
/// original order.
pub fn merge_changes<I, L>(change_lists: I) -> Vec<Change>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = Change>,
{
    let mut merged: Vec<Change> = Vec::new();
    for change in change_lists.into_iter().flatten() {
        if !merged.iter().any(|seen| seen.is_same_edit(&change)) {
            merged.push(change);
        }
    }
    merged
}

/// Keep one list per unit, dropping edits an earlier unit already made.
///
/// Units left without edits are removed.
pub fn split_change_sets(change_sets: Vec<Vec<Change>>) -> Vec<Vec<Change>> {
    let mut seen: Vec<Change> = Vec::new();
    let mut result = Vec::new();

    for set in change_sets {
        let mut unique = Vec::new();
        for change in set {
            if !seen.iter().any(|s| s.is_same_edit(&change)) {
                seen.push(change.clone());
                unique.push(change);
            }
        }
        if !unique.is_empty() {
            result.push(unique);
        }
    }

    result
}
