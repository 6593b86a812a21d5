//! Catalogue of refactorings offered as code actions

pub const COMPOSITE_REFACTORINGS: &[&str] = &["box-field", "extract-method"];

pub const MICRO_REFACTORINGS: &[&str] = &[
    "close-over-variables",
    "convert-closure-to-function",
    "extract-block",
    "inline-macro",
    "introduce-closure",
    "lift-function-declaration",
    "pull-up-item-declaration",
];

/// Refactorings to offer, sorted by name
pub fn list_refactorings(show_micro: bool) -> Vec<&'static str> {
    let mut refactorings: Vec<&'static str> = COMPOSITE_REFACTORINGS.to_vec();
    if show_micro {
        refactorings.extend_from_slice(MICRO_REFACTORINGS);
    }
    refactorings.sort_unstable();
    refactorings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_only() {
        assert_eq!(list_refactorings(false), vec!["box-field", "extract-method"]);
    }

    #[test]
    fn test_micro_refactorings_are_merged_and_sorted() {
        let all = list_refactorings(true);
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], "box-field");
        assert_eq!(all[1], "close-over-variables");
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
    }
}
