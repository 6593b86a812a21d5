//! Translation of tool changes into editor workspace edits

use super::workspace_paths::WorkspaceRoot;
use lsp_types::{
    AnnotatedTextEdit, ApplyWorkspaceEditParams, CreateFile, CreateFileOptions,
    DocumentChangeOperation, DocumentChanges, OneOf, OptionalVersionedTextDocumentIdentifier,
    Position, Range, ResourceOp, TextDocumentEdit, TextEdit, Uri, WorkspaceEdit,
};
use refactor_foundation::model::{Change, RefactorArgs};
use refactor_foundation::ServerResult;
use tracing::debug;

/// Build the workspace edit for one set of changes.
///
/// Changes are grouped into one document edit per resolved file, in order of
/// first appearance; edits within a file keep the order they were produced.
/// Documents are unversioned, so concurrent edits are not detected.
pub fn map_changes_to_workspace_edit(
    args: &RefactorArgs,
    changes: &[Change],
    workspace: &WorkspaceRoot,
) -> ServerResult<ApplyWorkspaceEditParams> {
    let mut documents: Vec<(Uri, Vec<OneOf<TextEdit, AnnotatedTextEdit>>)> = Vec::new();

    for change in changes {
        let uri = workspace.uri_for(&change.file_name)?;
        let edit = OneOf::Left(TextEdit {
            range: change.range(),
            new_text: change.replacement.clone(),
        });

        match documents.iter_mut().find(|(existing, _)| *existing == uri) {
            Some((_, edits)) => edits.push(edit),
            None => documents.push((uri, vec![edit])),
        }
    }

    debug!(
        refactoring = %args.refactoring,
        changes = changes.len(),
        documents = documents.len(),
        "Mapped changes to workspace edit"
    );

    let document_changes = documents
        .into_iter()
        .map(|(uri, edits)| TextDocumentEdit {
            text_document: OptionalVersionedTextDocumentIdentifier { uri, version: None },
            edits,
        })
        .collect();

    Ok(ApplyWorkspaceEditParams {
        label: Some(args.refactoring.clone()),
        edit: WorkspaceEdit {
            changes: None,
            document_changes: Some(DocumentChanges::Edits(document_changes)),
            change_annotations: None,
        },
    })
}

/// Edits that create (or overwrite) a file and fill it with `content`.
///
/// Creation and insertion are separate edits: the editor must know the file
/// before it accepts a text edit against it.
pub fn new_file_edits(uri: Uri, content: String, label: &str) -> Vec<ApplyWorkspaceEditParams> {
    let create = DocumentChanges::Operations(vec![DocumentChangeOperation::Op(
        ResourceOp::Create(CreateFile {
            uri: uri.clone(),
            options: Some(CreateFileOptions {
                overwrite: Some(true),
                ignore_if_exists: None,
            }),
            annotation_id: None,
        }),
    )]);

    let insert = DocumentChanges::Edits(vec![TextDocumentEdit {
        text_document: OptionalVersionedTextDocumentIdentifier { uri, version: None },
        edits: vec![OneOf::Left(TextEdit {
            range: Range::new(Position::new(0, 0), Position::new(0, 0)),
            new_text: content,
        })],
    }]);

    [create, insert]
        .into_iter()
        .map(|document_changes| ApplyWorkspaceEditParams {
            label: Some(label.to_string()),
            edit: WorkspaceEdit {
                changes: None,
                document_changes: Some(document_changes),
                change_annotations: None,
            },
        })
        .collect()
}
