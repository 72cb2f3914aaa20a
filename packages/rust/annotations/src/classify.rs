//! Definition classification from signature lines.

use nfdocs_shared::{DefinitionKind, NfDocsError, Result};

/// Name and kind read from a definition's signature line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub kind: DefinitionKind,
}

/// Classify the line that follows an annotation block.
///
/// Keywords are checked in fixed priority order (workflow, then process, then
/// function); the first one contained anywhere in the line wins, regardless of
/// where it occurs. The name is the line with the first occurrence of that
/// keyword and every `{` removed, trimmed.
pub fn classify(signature: &str) -> Result<Signature> {
    let kind = DefinitionKind::ALL
        .into_iter()
        .find(|kind| signature.contains(kind.keyword()))
        .ok_or_else(|| NfDocsError::UnrecognizedDefinitionKind {
            signature: signature.trim().to_string(),
        })?;

    let name = signature
        .replacen(kind.keyword(), "", 1)
        .replace('{', "")
        .trim()
        .to_string();

    Ok(Signature { name, kind })
}
