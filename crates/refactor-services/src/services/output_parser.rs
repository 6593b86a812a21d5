//! Parsing of the refactoring tool's stdout
//!
//! The tool emits one of three shapes depending on its version. The shape is
//! chosen up front from configuration; stdout is never re-parsed
//! speculatively as another shape.

use refactor_foundation::model::{
    Change, CrateOutput, OutputFormat, RefactorError, RefactorOutputs,
};
use refactor_foundation::{ServerError, ServerResult};
use tracing::debug;

/// Parsed tool output, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutput {
    /// A bare array of changes
    ChangeList(Vec<Change>),
    /// One entry per compilation unit
    CrateStream(Vec<CrateOutput>),
    /// Container with per-unit change lists and top-level errors
    Structured(RefactorOutputs),
}

impl ParsedOutput {
    /// Tool-reported errors that block the edit, in emission order.
    ///
    /// Crate entries only count when `is_error` is set; any entry of the
    /// structured container does.
    pub fn errors(&self) -> Vec<&RefactorError> {
        match self {
            ParsedOutput::ChangeList(_) => Vec::new(),
            ParsedOutput::CrateStream(crates) => crates
                .iter()
                .flat_map(|c| c.errors.iter())
                .filter(|e| e.is_error)
                .collect(),
            ParsedOutput::Structured(outputs) => outputs.errors.iter().collect(),
        }
    }

    /// The error that aborts the apply step, if any
    pub fn first_error(&self) -> Option<&RefactorError> {
        self.errors().into_iter().next()
    }

    /// Change lists, one per compilation unit
    pub fn change_sets(&self) -> Vec<Vec<Change>> {
        match self {
            ParsedOutput::ChangeList(changes) => vec![changes.clone()],
            ParsedOutput::CrateStream(crates) => {
                crates.iter().map(|c| c.replacements.clone()).collect()
            }
            ParsedOutput::Structured(outputs) => outputs.changes.clone(),
        }
    }
}

/// Parse tool stdout in the given shape
pub fn parse_output(stdout: &str, format: OutputFormat) -> ServerResult<ParsedOutput> {
    let parsed = match format {
        OutputFormat::ChangeList => ParsedOutput::ChangeList(parse_json(stdout.trim())?),
        OutputFormat::CrateStream => ParsedOutput::CrateStream(parse_crate_stream(stdout)?),
        OutputFormat::Structured => ParsedOutput::Structured(parse_json(stdout.trim())?),
    };

    debug!(
        format = ?format,
        change_sets = parsed.change_sets().len(),
        errors = parsed.errors().len(),
        "Parsed refactoring output"
    );

    Ok(parsed)
}

/// One `CrateOutput` per non-blank line, parsed from the line's first `{`
fn parse_crate_stream(stdout: &str) -> ServerResult<Vec<CrateOutput>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            let start = line.find('{').ok_or_else(|| {
                ServerError::parse(format!("line {} has no JSON object: {}", index + 1, line))
            })?;
            parse_json(&line[start..])
        })
        .collect()
}

fn parse_json<T: serde::de::DeserializeOwned>(payload: &str) -> ServerResult<T> {
    serde_json::from_str(payload).map_err(|e| {
        ServerError::parse(format!("{} in output: {}", e, truncate(payload, 200)))
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}
