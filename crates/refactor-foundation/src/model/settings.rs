//! Client-side extension settings

use serde::{Deserialize, Serialize};

/// Settings read from the editor's `emRefactor` configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionSettings {
    pub is_generate_test_files_enabled: bool,
    pub is_micro_refactorings_shown: bool,
    pub is_unsafe_refactoring_shown: bool,
    pub is_hover_enabled: bool,
    /// Refactoring binary, or the `Cargo.toml` of the refactoring tool
    #[serde(alias = "refactoringCargoTomlPath")]
    pub refactoring_binary_path: String,
    /// Toolchain selector passed to cargo, e.g. `+nightly-2020-04-15`
    pub cargo_toolchain: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_accept_cargo_toml_alias() {
        let settings: ExtensionSettings = serde_json::from_value(json!({
            "isMicroRefactoringsShown": true,
            "refactoringCargoTomlPath": "/tools/em-refactor/Cargo.toml",
            "cargoToolchain": "+nightly"
        }))
        .unwrap();

        assert!(settings.is_micro_refactorings_shown);
        assert!(!settings.is_unsafe_refactoring_shown);
        assert_eq!(settings.refactoring_binary_path, "/tools/em-refactor/Cargo.toml");
        assert_eq!(settings.cargo_toolchain, "+nightly");
    }
}
