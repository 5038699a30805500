//! Per-file interception: pre-check, edit session, host hook, settlement.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::dialog::{CropDialog, DialogDecision, DialogSlot};
use super::file::UploadFile;
use super::hooks::{run_host_hook, CropHooks, HookError, PreUploadHook, Settlement};
use super::precheck::{precheck, Precheck};
use super::session::{ConfirmedCrop, EditSession, SessionId};
use crate::config::{ConfigError, CropConfig, DialogText};
use crate::error::ImgCropError;

/// One intercepted upload event.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub file: UploadFile,
    /// The batch the file was selected with.
    pub file_list: Vec<UploadFile>,
    /// The host's own pre-upload hook, called exactly once.
    pub host_hook: Option<PreUploadHook>,
}

impl EditRequest {
    pub fn new(file: UploadFile, file_list: Vec<UploadFile>) -> Self {
        Self {
            file,
            file_list,
            host_hook: None,
        }
    }

    pub fn with_host_hook(mut self, hook: PreUploadHook) -> Self {
        self.host_hook = Some(hook);
        self
    }
}

/// How one request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The user confirmed; holds the edited file handed to the host hook.
    Confirmed(UploadFile),
    Cancelled,
    PrecheckRejected,
    /// The predicate skipped editing but accepted the file.
    PrecheckAccepted(UploadFile),
    PrecheckError(HookError),
    /// Decoding or encoding failed; the settlement carries the error.
    Failed,
}

/// Outcome plus the settlement handed back to the host.
#[derive(Debug)]
pub struct Intercepted {
    pub outcome: EditOutcome,
    pub settlement: Result<Settlement, ImgCropError>,
}

struct Inner {
    config: Arc<CropConfig>,
    text: DialogText,
    hooks: CropHooks,
    dialog: Arc<dyn CropDialog>,
    slot: DialogSlot,
    next_session: AtomicU64,
}

/// The crop-before-upload component.
///
/// Cheap to clone; clones share the dialog slot, so at most one dialog is
/// visible across all of them.
#[derive(Clone)]
pub struct ImgCrop {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ImgCrop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgCrop")
            .field("config", &self.inner.config)
            .field("hooks", &self.inner.hooks)
            .field("visible", &self.inner.slot.visible())
            .finish_non_exhaustive()
    }
}

impl ImgCrop {
    /// Validate the configuration and resolve dialog text.
    ///
    /// The OS locale is read here, once, and only when the configuration
    /// does not name a locale.
    pub fn new(
        config: CropConfig,
        hooks: CropHooks,
        dialog: Arc<dyn CropDialog>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let locale = config.resolve_locale();
        let text = config.resolve_text(locale);
        tracing::debug!(?locale, title = %text.title, "crop component ready");

        Ok(Self {
            inner: Arc::new(Inner {
                config: Arc::new(config),
                text,
                hooks,
                dialog,
                slot: DialogSlot::new(),
                next_session: AtomicU64::new(1),
            }),
        })
    }

    pub fn config(&self) -> &CropConfig {
        &self.inner.config
    }

    pub fn text(&self) -> &DialogText {
        &self.inner.text
    }

    /// Accept filter for the host's file picker.
    pub fn accept(&self) -> &str {
        &self.inner.config.accept
    }

    /// The session currently showing the dialog.
    pub fn visible_session(&self) -> Option<SessionId> {
        self.inner.slot.visible()
    }

    /// Wrap the host's pre-upload hook.
    pub fn wrap(&self, host_hook: Option<PreUploadHook>) -> InterceptHook {
        InterceptHook {
            crop: self.clone(),
            host_hook,
        }
    }

    /// Program-driven entry point sharing this component's dialog.
    pub fn handle(&self) -> EditHandle {
        EditHandle { crop: self.clone() }
    }

    /// Decide what happens to one file.
    pub async fn before_upload(&self, request: EditRequest) -> Result<Settlement, ImgCropError> {
        self.intercept(request).await.settlement
    }

    /// Like [`before_upload`](Self::before_upload) but also reports how the
    /// request ended.
    pub async fn intercept(&self, request: EditRequest) -> Intercepted {
        let EditRequest {
            file,
            file_list,
            host_hook,
        } = request;
        let host_hook = host_hook.as_ref();
        let uid = file.uid.clone();

        let checked = precheck(self.inner.hooks.before_crop.as_ref(), file.clone(), &file_list).await;
        let (outcome, settlement) = match checked {
            Precheck::ProceedUnedited(original) => (
                EditOutcome::PrecheckAccepted(original.clone()),
                call_host(host_hook, original).await,
            ),
            Precheck::Reject => (EditOutcome::PrecheckRejected, call_host(host_hook, file).await),
            Precheck::Failed(err) => (EditOutcome::PrecheckError(err), call_host(host_hook, file).await),
            Precheck::Proceed(candidate) => match self.open_session(candidate).await {
                Ok(Some(crop)) => {
                    let rendered = crop.render_off_thread(Arc::clone(&self.inner.config)).await;
                    let (outcome, settlement) = match rendered {
                        Ok(edited) => (
                            EditOutcome::Confirmed(edited.clone()),
                            call_host(host_hook, edited).await,
                        ),
                        Err(err) => (EditOutcome::Failed, Err(err)),
                    };
                    self.inner.hooks.observe(&settlement);
                    (outcome, settlement)
                }
                Ok(None) => (EditOutcome::Cancelled, Ok(self.inner.hooks.resolve_cancel())),
                Err(err) => (EditOutcome::Failed, Err(err)),
            },
        };

        match &settlement {
            Ok(settled) => tracing::info!(%uid, ?outcome, settlement = settlement_label(settled), "file settled"),
            Err(err) => tracing::error!(%uid, ?outcome, error = %err, "file settled with error"),
        }
        Intercepted {
            outcome,
            settlement,
        }
    }

    /// Run one edit session. `Ok(None)` means the user cancelled.
    async fn open_session(&self, file: UploadFile) -> Result<Option<ConfirmedCrop>, ImgCropError> {
        let id = SessionId(self.inner.next_session.fetch_add(1, Ordering::Relaxed));
        let mut session = EditSession::new(id, Arc::clone(&self.inner.config));

        // Decode before queueing so waiting sessions are ready to show
        session.load(file).await?;

        let lease = self.inner.slot.acquire(id).await;
        let view = session.present(&lease, &self.inner.text)?;
        match self.inner.dialog.present(view).await {
            DialogDecision::Confirm => Ok(Some(session.confirm(lease)?)),
            DialogDecision::Cancel => {
                session.cancel(lease)?;
                Ok(None)
            }
        }
    }
}

async fn call_host(
    hook: Option<&PreUploadHook>,
    file: UploadFile,
) -> Result<Settlement, ImgCropError> {
    let batch = vec![file.clone()];
    Ok(run_host_hook(hook, file, batch).await?)
}

fn settlement_label(settlement: &Settlement) -> &'static str {
    match settlement {
        Settlement::Upload(_) => "upload",
        Settlement::Reject => "reject",
        Settlement::Ignore => "ignore",
    }
}

/// The component's replacement for the host's pre-upload hook.
#[derive(Debug, Clone)]
pub struct InterceptHook {
    crop: ImgCrop,
    host_hook: Option<PreUploadHook>,
}

impl InterceptHook {
    pub async fn call(
        &self,
        file: UploadFile,
        file_list: Vec<UploadFile>,
    ) -> Result<Settlement, ImgCropError> {
        let request = EditRequest {
            file,
            file_list,
            host_hook: self.host_hook.clone(),
        };
        self.crop.before_upload(request).await
    }
}

/// Imperative edit entry point.
///
/// There is no host hook on this path; the confirm-observer is the only
/// place results go.
#[derive(Debug, Clone)]
pub struct EditHandle {
    crop: ImgCrop,
}

impl EditHandle {
    pub async fn edit_file(&self, file: UploadFile) {
        let inner = &self.crop.inner;
        let uid = file.uid.clone();
        let batch = vec![file.clone()];

        match precheck(inner.hooks.before_crop.as_ref(), file.clone(), &batch).await {
            Precheck::ProceedUnedited(original) => {
                inner.hooks.observe(&Ok(Settlement::Upload(original)));
            }
            Precheck::Reject | Precheck::Failed(_) => {
                inner.hooks.observe(&Ok(Settlement::Reject));
            }
            Precheck::Proceed(candidate) => match self.crop.open_session(candidate).await {
                Ok(Some(crop)) => {
                    let result = crop
                        .render_off_thread(Arc::clone(&inner.config))
                        .await
                        .map(Settlement::Upload);
                    if let Err(err) = &result {
                        tracing::error!(%uid, error = %err, "edit failed");
                    }
                    inner.hooks.observe(&result);
                }
                Ok(None) => {
                    let settlement = inner.hooks.resolve_cancel();
                    tracing::info!(%uid, settlement = settlement_label(&settlement), "edit cancelled");
                }
                Err(err) => tracing::error!(%uid, error = %err, "edit failed"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;
    use crate::geometry::CropRect;
    use crate::upload::dialog::DialogView;
    use crate::upload::hooks::HookVerdict;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Dialog driven by a script of steps, one per presentation.
    #[derive(Clone, Default)]
    struct ScriptedDialog {
        script: Arc<Mutex<Vec<Step>>>,
        shown: Arc<Mutex<Vec<DialogView>>>,
        max_concurrent: Arc<AtomicUsize>,
        open: Arc<AtomicUsize>,
    }

    #[derive(Clone)]
    enum Step {
        Confirm(Option<CropRect>),
        Cancel,
    }

    impl ScriptedDialog {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            let dialog = Self::default();
            *dialog.script.lock().unwrap() = steps.into_iter().rev().collect();
            Arc::new(dialog)
        }

        fn shown(&self) -> Vec<DialogView> {
            self.shown.lock().unwrap().clone()
        }
    }

    impl CropDialog for ScriptedDialog {
        fn present(&self, view: DialogView) -> BoxFuture<'static, DialogDecision> {
            let step = self.script.lock().unwrap().pop().unwrap_or(Step::Cancel);
            self.shown.lock().unwrap().push(view.clone());
            let open = Arc::clone(&self.open);
            let max = Arc::clone(&self.max_concurrent);

            async move {
                let now = open.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                open.fetch_sub(1, Ordering::SeqCst);

                match step {
                    Step::Confirm(rect) => {
                        if let Some(rect) = rect {
                            let mut g = view.initial;
                            g.rect = rect;
                            view.editor.report(g).unwrap();
                        }
                        DialogDecision::Confirm
                    }
                    Step::Cancel => DialogDecision::Cancel,
                }
            }
            .boxed()
        }
    }

    fn png_file(uid: &str, width: u32, height: u32) -> UploadFile {
        let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 9]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        UploadFile::new(uid, format!("{uid}.png"), "image/png", out.into_inner())
    }

    fn crop(hooks: CropHooks, dialog: Arc<ScriptedDialog>) -> ImgCrop {
        let mut config = CropConfig::default();
        config.locale = Some(crate::config::Locale::English);
        ImgCrop::new(config, hooks, dialog).unwrap()
    }

    /// Host hook that records every file it sees and accepts it.
    fn recording_hook() -> (PreUploadHook, Arc<Mutex<Vec<UploadFile>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let hook = PreUploadHook::new(move |file, _| {
            log.lock().unwrap().push(file);
            async { Ok(HookVerdict::Accept) }
        });
        (hook, seen)
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = CropConfig::default();
        config.quality = -0.1;
        let result = ImgCrop::new(config, CropHooks::new(), ScriptedDialog::new(vec![]));
        assert!(matches!(result, Err(ConfigError::Quality(_))));
    }

    #[tokio::test]
    async fn test_predicate_false_skips_dialog() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None)]);
        let hooks = CropHooks::new().before_crop(|_, _| async { Ok(HookVerdict::Reject) });
        let crop = crop(hooks, Arc::clone(&dialog));
        let (hook, seen) = recording_hook();

        let file = png_file("a", 10, 10);
        let result = crop
            .intercept(EditRequest::new(file.clone(), vec![file.clone()]).with_host_hook(hook))
            .await;

        assert_eq!(result.outcome, EditOutcome::PrecheckRejected);
        assert_eq!(result.settlement.unwrap(), Settlement::Upload(file.clone()));
        assert!(dialog.shown().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![file]);
    }

    #[tokio::test]
    async fn test_predicate_error_behaves_like_false() {
        let dialog = ScriptedDialog::new(vec![]);
        let hooks = CropHooks::new().before_crop(|_, _| async { Err(HookError::new("nope")) });
        let crop = crop(hooks, Arc::clone(&dialog));
        let (hook, seen) = recording_hook();

        let file = png_file("a", 10, 10);
        let result = crop
            .intercept(EditRequest::new(file.clone(), vec![]).with_host_hook(hook))
            .await;

        assert_eq!(result.outcome, EditOutcome::PrecheckError(HookError::new("nope")));
        assert_eq!(result.settlement.unwrap(), Settlement::Upload(file.clone()));
        assert!(dialog.shown().is_empty());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_predicate_true_uploads_unedited() {
        let dialog = ScriptedDialog::new(vec![]);
        let hooks = CropHooks::new().before_crop(|_, _| async { Ok(HookVerdict::Accept) });
        let crop = crop(hooks, Arc::clone(&dialog));

        let file = png_file("a", 10, 10);
        let result = crop.intercept(EditRequest::new(file.clone(), vec![])).await;
        assert_eq!(result.outcome, EditOutcome::PrecheckAccepted(file.clone()));
        assert_eq!(result.settlement.unwrap(), Settlement::Upload(file));
        assert!(dialog.shown().is_empty());
    }

    #[tokio::test]
    async fn test_predicate_replacement_is_edited() {
        let replacement = png_file("r", 6, 6);
        let r = replacement.clone();
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None)]);
        let hooks = CropHooks::new().before_crop(move |_, _| {
            let r = r.clone();
            async move { Ok(HookVerdict::Replace(r)) }
        });
        let crop = crop(hooks, Arc::clone(&dialog));

        let result = crop
            .intercept(EditRequest::new(png_file("a", 10, 10), vec![]))
            .await;
        assert_eq!(dialog.shown()[0].file_name, "r.png");
        match result.outcome {
            EditOutcome::Confirmed(edited) => assert_eq!(edited.uid, replacement.uid),
            other => panic!("expected Confirmed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_without_interceptor_ignores_and_skips_host_hook() {
        let dialog = ScriptedDialog::new(vec![Step::Cancel]);
        let crop = crop(CropHooks::new(), Arc::clone(&dialog));
        let (hook, seen) = recording_hook();

        let result = crop
            .intercept(EditRequest::new(png_file("a", 10, 10), vec![]).with_host_hook(hook))
            .await;

        assert_eq!(result.outcome, EditOutcome::Cancelled);
        assert_eq!(result.settlement.unwrap(), Settlement::Ignore);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(crop.visible_session(), None);
    }

    #[tokio::test]
    async fn test_cancel_interceptor_overrides() {
        let dialog = ScriptedDialog::new(vec![Step::Cancel]);
        let hooks = CropHooks::new().on_modal_cancel(|resolver| resolver.settle(Settlement::Reject));
        let crop = crop(hooks, dialog);

        let settlement = crop
            .before_upload(EditRequest::new(png_file("a", 10, 10), vec![]))
            .await
            .unwrap();
        assert_eq!(settlement, Settlement::Reject);
    }

    #[tokio::test]
    async fn test_confirm_uploads_crop_and_notifies_observer() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(Some(CropRect::new(2, 3, 4, 5)))]);
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let hooks = CropHooks::new().on_modal_ok(move |result| {
            sink.lock().unwrap().push(result.as_ref().ok().cloned());
        });
        let crop = crop(hooks, Arc::clone(&dialog));
        let (hook, seen) = recording_hook();

        let original = png_file("a", 20, 20);
        let settlement = crop
            .before_upload(EditRequest::new(original.clone(), vec![]).with_host_hook(hook))
            .await
            .unwrap();

        let Settlement::Upload(edited) = settlement.clone() else {
            panic!("expected upload, got {settlement:?}");
        };
        assert_eq!(edited.uid, original.uid);
        assert_eq!(edited.name, original.name);
        assert_eq!(edited.mime, original.mime);
        assert_ne!(edited.bytes, original.bytes);

        let pixels = decode_image(&edited.bytes).unwrap();
        assert_eq!((pixels.width, pixels.height), (4, 5));
        assert_eq!(pixels.pixel(0, 0), [2, 3, 9]);

        assert_eq!(*seen.lock().unwrap(), vec![edited]);
        assert_eq!(*observed.lock().unwrap(), vec![Some(settlement)]);
    }

    #[tokio::test]
    async fn test_host_hook_error_reaches_observer() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None)]);
        let observed = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&observed);
        let hooks = CropHooks::new().on_modal_ok(move |result| {
            assert!(matches!(result, Err(ImgCropError::Hook(_))));
            count.fetch_add(1, Ordering::SeqCst);
        });
        let crop = crop(hooks, dialog);
        let failing = PreUploadHook::new(|_, _| async { Err(HookError::new("offline")) });

        let result = crop
            .before_upload(EditRequest::new(png_file("a", 8, 8), vec![]).with_host_hook(failing))
            .await;
        assert!(matches!(result, Err(ImgCropError::Hook(_))));
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dialog_hidden_before_host_hook() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None)]);
        let crop = crop(CropHooks::new(), dialog);
        let visible_during_hook = Arc::new(Mutex::new(None));

        let watcher = crop.clone();
        let record = Arc::clone(&visible_during_hook);
        let hook = PreUploadHook::new(move |_, _| {
            *record.lock().unwrap() = Some(watcher.visible_session());
            async { Ok(HookVerdict::Accept) }
        });

        crop.before_upload(EditRequest::new(png_file("a", 8, 8), vec![]).with_host_hook(hook))
            .await
            .unwrap();
        assert_eq!(*visible_during_hook.lock().unwrap(), Some(None));
    }

    #[tokio::test]
    async fn test_decode_failure_settles_with_error() {
        let dialog = ScriptedDialog::new(vec![]);
        let crop = crop(CropHooks::new(), Arc::clone(&dialog));
        let broken = UploadFile::new("x", "x.png", "image/png", vec![1, 2, 3]);

        let result = crop.intercept(EditRequest::new(broken, vec![])).await;
        assert_eq!(result.outcome, EditOutcome::Failed);
        assert!(matches!(result.settlement, Err(ImgCropError::Decode { .. })));
        assert!(dialog.shown().is_empty());
    }

    #[tokio::test]
    async fn test_sequential_sessions_start_from_defaults() {
        let dialog = ScriptedDialog::new(vec![
            Step::Confirm(Some(CropRect::new(1, 1, 3, 3))),
            Step::Confirm(None),
        ]);
        let crop = crop(CropHooks::new(), Arc::clone(&dialog));

        crop.before_upload(EditRequest::new(png_file("a", 10, 10), vec![]))
            .await
            .unwrap();
        let second = crop
            .before_upload(EditRequest::new(png_file("b", 10, 10), vec![]))
            .await
            .unwrap();

        let shown = dialog.shown();
        assert_ne!(shown[0].session, shown[1].session);
        assert_eq!(shown[1].initial.rect, CropRect::new(0, 0, 10, 10));
        assert_eq!(shown[1].editor.snapshot(), shown[1].initial);

        let Settlement::Upload(file) = second else {
            panic!("expected upload");
        };
        let pixels = decode_image(&file.bytes).unwrap();
        assert_eq!((pixels.width, pixels.height), (10, 10));
    }

    #[tokio::test]
    async fn test_concurrent_sessions_show_one_dialog_at_a_time() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None), Step::Cancel, Step::Confirm(None)]);
        let crop = crop(CropHooks::new(), Arc::clone(&dialog));

        let requests = ["a", "b", "c"].map(|uid| {
            let crop = crop.clone();
            async move {
                crop.before_upload(EditRequest::new(png_file(uid, 8, 8), vec![]))
                    .await
            }
        });
        let results = futures::future::join_all(requests).await;

        assert_eq!(dialog.max_concurrent.load(Ordering::SeqCst), 1);
        assert_eq!(dialog.shown().len(), 3);
        assert_eq!(
            results.iter().filter(|r| matches!(r, Ok(Settlement::Ignore))).count(),
            1
        );
        assert_eq!(crop.visible_session(), None);
    }

    #[tokio::test]
    async fn test_wrap_calls_host_hook_with_single_file_batch() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None)]);
        let crop = crop(CropHooks::new(), dialog);
        let batch_len = Arc::new(AtomicUsize::new(0));
        let len = Arc::clone(&batch_len);
        let host = PreUploadHook::new(move |_, batch| {
            len.store(batch.len(), Ordering::SeqCst);
            async { Ok(HookVerdict::Reject) }
        });

        let hook = crop.wrap(Some(host));
        let a = png_file("a", 8, 8);
        let settlement = hook
            .call(a.clone(), vec![a, png_file("b", 8, 8)])
            .await
            .unwrap();
        assert_eq!(settlement, Settlement::Reject);
        assert_eq!(batch_len.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_edit_file_reports_to_observer_only() {
        let dialog = ScriptedDialog::new(vec![Step::Confirm(None), Step::Cancel]);
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let hooks = CropHooks::new()
            .on_modal_ok(move |result| sink.lock().unwrap().push(result.is_ok()))
            .on_modal_cancel(|resolver| resolver.settle(Settlement::Reject));
        let handle = crop(hooks, dialog).handle();

        handle.edit_file(png_file("a", 8, 8)).await;
        handle.edit_file(png_file("b", 8, 8)).await;

        // Cancel ran the interceptor but nothing reached the observer
        assert_eq!(*observed.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn test_edit_file_precheck_skip_reports_settlement() {
        let dialog = ScriptedDialog::new(vec![]);
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let hooks = CropHooks::new()
            .before_crop(|_, _| async { Ok(HookVerdict::Reject) })
            .on_modal_ok(move |result| sink.lock().unwrap().push(result.as_ref().ok().cloned()));
        let handle = crop(hooks, Arc::clone(&dialog)).handle();

        handle.edit_file(png_file("a", 8, 8)).await;
        assert_eq!(*observed.lock().unwrap(), vec![Some(Settlement::Reject)]);
        assert!(dialog.shown().is_empty());
    }

    #[tokio::test]
    async fn test_large_file_does_not_stall_other_tasks() {
        use std::sync::atomic::AtomicBool;
        use tokio::time::Instant;

        let dialog = ScriptedDialog::new(vec![Step::Confirm(None)]);
        let crop = crop(CropHooks::new(), dialog);
        let file = png_file("big", 1500, 1500);
        let done = AtomicBool::new(false);

        let ticker = async {
            let mut worst = Duration::ZERO;
            let mut last = Instant::now();
            while !done.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(1)).await;
                let now = Instant::now();
                worst = worst.max(now - last);
                last = now;
            }
            worst
        };
        let upload = async {
            let settled = crop.before_upload(EditRequest::new(file, vec![])).await;
            done.store(true, Ordering::SeqCst);
            settled
        };

        let (worst, settled) = tokio::join!(ticker, upload);
        assert!(matches!(settled, Ok(Settlement::Upload(_))));
        assert!(worst < Duration::from_millis(200), "ticker stalled for {worst:?}");
    }
}
