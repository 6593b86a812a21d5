//! Command lines for the external refactoring tool
//!
//! Builders only assemble strings; nothing here spawns a process. Every
//! builder that needs the tool validates its path first, so an unset path is
//! reported before any execution is attempted.

use refactor_foundation::model::ExtensionSettings;
use refactor_foundation::{ServerError, ServerResult};

/// Name of the cargo binary target that implements the refactorings
pub const TOOL_BIN: &str = "cargo-em-refactor";

/// How the refactoring tool is started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// `cargo <toolchain> run` on the tool's manifest
    CargoRun {
        manifest_path: String,
        toolchain: String,
    },
    /// A prebuilt binary
    Binary { path: String },
}

impl Launcher {
    /// Pick the launcher for a configured path.
    ///
    /// Paths ending in `Cargo.toml` are run through cargo; any other
    /// non-empty path is executed directly.
    pub fn new(binary_path: Option<&str>, toolchain: Option<&str>) -> ServerResult<Self> {
        let path = binary_path.map(str::trim).unwrap_or_default();
        if path.is_empty() {
            return Err(ServerError::invalid_binary_path(path));
        }

        if path.ends_with("Cargo.toml") {
            Ok(Self::CargoRun {
                manifest_path: path.to_string(),
                toolchain: toolchain.unwrap_or_default().trim().to_string(),
            })
        } else {
            Ok(Self::Binary {
                path: path.to_string(),
            })
        }
    }

    pub fn from_settings(settings: &ExtensionSettings) -> ServerResult<Self> {
        Self::new(
            Some(&settings.refactoring_binary_path),
            Some(&settings.cargo_toolchain),
        )
    }

    /// Command prefix after which the tool's own arguments follow
    fn prefix(&self) -> String {
        match self {
            Self::CargoRun {
                manifest_path,
                toolchain,
            } => format!(
                "{} run --bin {} --manifest-path={} --",
                cargo(toolchain),
                TOOL_BIN,
                quote(manifest_path)
            ),
            Self::Binary { path } => quote(path),
        }
    }
}

/// Builds tool command lines sharing one cargo target directory
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    target_dir: String,
}

impl CommandBuilder {
    pub fn new(target_dir: impl Into<String>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &str {
        &self.target_dir
    }

    /// `<launcher> --target-dir=<dir> refactor <kind> <file> <selection> [--unsafe]`
    pub fn build_refactor_command(
        &self,
        relative_file_path: &str,
        refactoring: &str,
        selection: &str,
        is_unsafe: bool,
        binary_path: Option<&str>,
        toolchain: Option<&str>,
    ) -> ServerResult<String> {
        let launcher = Launcher::new(binary_path, toolchain)?;
        let mut command = format!(
            "{} --target-dir={} refactor {} {} {}",
            launcher.prefix(),
            quote(&self.target_dir),
            quote(refactoring),
            quote(relative_file_path),
            quote(selection)
        );
        if is_unsafe {
            command.push_str(" --unsafe");
        }
        Ok(command)
    }

    /// `<launcher> --target-dir=<dir> candidates <kind>`
    pub fn build_candidate_query_command(
        &self,
        refactoring: &str,
        binary_path: Option<&str>,
        toolchain: Option<&str>,
    ) -> ServerResult<String> {
        let launcher = Launcher::new(binary_path, toolchain)?;
        Ok(format!(
            "{} --target-dir={} candidates {}",
            launcher.prefix(),
            quote(&self.target_dir),
            quote(refactoring)
        ))
    }

    /// Type-of-expression query used for hovers
    pub fn build_hover_type_command(
        &self,
        relative_file_path: &str,
        selection: &str,
        binary_path: Option<&str>,
        toolchain: Option<&str>,
    ) -> ServerResult<String> {
        let launcher = Launcher::new(binary_path, toolchain)?;
        Ok(format!(
            "{} --output-changes-as-json --ignore-missing-file --file={} --provide-type --selection={}",
            launcher.prefix(),
            quote(relative_file_path),
            quote(selection)
        ))
    }

    /// `cargo <toolchain> check --target-dir=<dir> --all-targets`
    pub fn build_cargo_check_command(&self, toolchain: Option<&str>) -> String {
        format!(
            "{} check --target-dir={} --all-targets",
            cargo(toolchain.unwrap_or_default().trim()),
            quote(&self.target_dir)
        )
    }
}

fn cargo(toolchain: &str) -> String {
    if toolchain.is_empty() {
        "cargo".to_string()
    } else {
        format!("cargo {}", toolchain)
    }
}

/// Single-quote an argument for `sh` when it contains anything but plain path characters
fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-:+=,@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "/tools/em-refactor/Cargo.toml";

    fn builder() -> CommandBuilder {
        CommandBuilder::new("./target/refactorings")
    }

    #[test]
    fn test_refactor_command_through_cargo() {
        let command = builder()
            .build_refactor_command(
                "src/main.rs",
                "extract-block",
                "10:42",
                false,
                Some(MANIFEST),
                Some("+nightly-2020-04-15"),
            )
            .unwrap();

        assert_eq!(
            command,
            "cargo +nightly-2020-04-15 run --bin cargo-em-refactor \
             --manifest-path=/tools/em-refactor/Cargo.toml -- \
             --target-dir=./target/refactorings refactor extract-block src/main.rs 10:42"
        );
    }

    #[test]
    fn test_refactor_command_with_binary_and_unsafe_flag() {
        let command = builder()
            .build_refactor_command(
                "src/lib.rs",
                "box-field",
                "3:9",
                true,
                Some("/usr/local/bin/cargo-em-refactor"),
                None,
            )
            .unwrap();

        assert_eq!(
            command,
            "/usr/local/bin/cargo-em-refactor --target-dir=./target/refactorings \
             refactor box-field src/lib.rs 3:9 --unsafe"
        );
    }

    #[test]
    fn test_empty_binary_path_is_rejected() {
        let err = builder()
            .build_refactor_command("src/main.rs", "box-field", "1:2", false, Some(""), None)
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidBinaryPath { .. }));

        let err = builder()
            .build_candidate_query_command("box-field", None, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "'' is not a path");

        assert!(builder()
            .build_hover_type_command("src/main.rs", "4:4", Some("   "), None)
            .is_err());
    }

    #[test]
    fn test_candidate_query_command() {
        let command = builder()
            .build_candidate_query_command("box-field", Some(MANIFEST), Some(""))
            .unwrap();
        assert_eq!(
            command,
            "cargo run --bin cargo-em-refactor --manifest-path=/tools/em-refactor/Cargo.toml -- \
             --target-dir=./target/refactorings candidates box-field"
        );
    }

    #[test]
    fn test_hover_type_command() {
        let command = builder()
            .build_hover_type_command("src/main.rs", "4:4", Some("/bin/em"), None)
            .unwrap();
        assert_eq!(
            command,
            "/bin/em --output-changes-as-json --ignore-missing-file --file=src/main.rs \
             --provide-type --selection=4:4"
        );
    }

    #[test]
    fn test_cargo_check_command() {
        assert_eq!(
            builder().build_cargo_check_command(Some("+nightly")),
            "cargo +nightly check --target-dir=./target/refactorings --all-targets"
        );
        assert_eq!(
            builder().build_cargo_check_command(None),
            "cargo check --target-dir=./target/refactorings --all-targets"
        );
    }

    #[test]
    fn test_arguments_with_spaces_are_quoted() {
        let command = builder()
            .build_refactor_command(
                "src/my file.rs",
                "box-field",
                "1:2",
                false,
                Some("/opt/it's here/em"),
                None,
            )
            .unwrap();
        assert!(command.starts_with(r"'/opt/it'\''s here/em' "));
        assert!(command.contains(" 'src/my file.rs' "));
    }
}
