//! Pre-check gate run before any dialog opens.

use super::file::UploadFile;
use super::hooks::{HookError, HookVerdict, PreUploadHook};

/// Result of the pre-check gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// Open the editor on this file (the original or the predicate's replacement).
    Proceed(UploadFile),
    /// Skip editing and hand the original straight to the host hook.
    ProceedUnedited(UploadFile),
    /// Skip editing; the host hook decides what happens to the original.
    Reject,
    /// The predicate failed. Routed exactly like `Reject`.
    Failed(HookError),
}

impl Precheck {
    pub fn skips_editing(&self) -> bool {
        !matches!(self, Precheck::Proceed(_))
    }
}

/// Run the optional `before_crop` predicate.
///
/// A failing predicate never opens a dialog; its error is logged and kept
/// for the outcome but never surfaces as an upload failure.
pub async fn precheck(
    predicate: Option<&PreUploadHook>,
    file: UploadFile,
    batch: &[UploadFile],
) -> Precheck {
    let Some(predicate) = predicate else {
        return Precheck::Proceed(file);
    };

    match predicate.call(file.clone(), batch.to_vec()).await {
        Ok(HookVerdict::Replace(replacement)) => {
            tracing::debug!(uid = %file.uid, replacement = %replacement.name, "pre-check replaced file");
            Precheck::Proceed(replacement)
        }
        Ok(HookVerdict::Accept) => Precheck::ProceedUnedited(file),
        Ok(HookVerdict::Reject) => Precheck::Reject,
        Err(err) => {
            tracing::warn!(uid = %file.uid, error = %err, "pre-check predicate failed, skipping editor");
            Precheck::Failed(err)
        }
    }
}
