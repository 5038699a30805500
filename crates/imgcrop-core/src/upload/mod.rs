//! Crop-before-upload interception.
//!
//! The host's upload pipeline calls [`ImgCrop::before_upload`] (or the hook
//! returned by [`ImgCrop::wrap`]) once per selected file. Each call runs:
//!
//! 1. the optional `before_crop` pre-check
//! 2. an [`EditSession`] that decodes the file and presents the dialog
//! 3. on confirm, extraction and encoding, then the host's own hook
//!
//! and settles to exactly one [`Settlement`].

mod dialog;
mod file;
mod hooks;
mod orchestrator;
mod precheck;
mod session;

pub use dialog::{CropDialog, DialogDecision, DialogLease, DialogSlot, DialogView, EditorOptions};
pub use file::UploadFile;
pub use hooks::{
    run_host_hook, CancelInterceptor, CancelResolver, ConfirmObserver, CropHooks, HookError,
    HookVerdict, PreUploadHook, Settlement,
};
pub use orchestrator::{EditHandle, EditOutcome, EditRequest, ImgCrop, InterceptHook, Intercepted};
pub use precheck::{precheck, Precheck};
pub use session::{
    ConfirmedCrop, EditSession, EditorHandle, SessionError, SessionId, SessionState,
};
