//! Strategy functions supplied by the host.
//!
//! There are exactly four extension points:
//!
//! - the host's own pre-upload hook, which this component wraps
//! - `before_crop`, the pre-check predicate (same contract as a pre-upload hook)
//! - `on_modal_cancel`, which may override what a cancel settles to
//! - `on_modal_ok`, which observes the final settlement after a confirm

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;

use super::file::UploadFile;
use crate::error::ImgCropError;

/// Failure raised by a host-supplied hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// What a pre-upload hook may return: `true`, `false`, or a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookVerdict {
    Accept,
    Reject,
    Replace(UploadFile),
}

/// The final decision handed back to the host pipeline for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Upload this file (the original, an edited crop, or a hook's replacement).
    Upload(UploadFile),
    /// Do not upload; the host keeps the entry as rejected.
    Reject,
    /// Silently drop the file from the batch.
    Ignore,
}

type HookFn = dyn Fn(UploadFile, Vec<UploadFile>) -> BoxFuture<'static, Result<HookVerdict, HookError>>
    + Send
    + Sync;

/// An async `(file, batch) -> verdict` hook.
#[derive(Clone)]
pub struct PreUploadHook(Arc<HookFn>);

impl PreUploadHook {
    pub fn new<F, Fut>(hook: F) -> Self
    where
        F: Fn(UploadFile, Vec<UploadFile>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HookVerdict, HookError>> + Send + 'static,
    {
        Self(Arc::new(move |file, batch| hook(file, batch).boxed()))
    }

    pub async fn call(
        &self,
        file: UploadFile,
        batch: Vec<UploadFile>,
    ) -> Result<HookVerdict, HookError> {
        (self.0)(file, batch).await
    }
}

impl fmt::Debug for PreUploadHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PreUploadHook(..)")
    }
}

/// Run the host's hook (if any) and turn its verdict into a settlement.
///
/// - no hook: upload `file` as-is
/// - `Accept`: upload `file`
/// - `Reject`: reject
/// - `Replace(other)`: upload `other`
pub async fn run_host_hook(
    hook: Option<&PreUploadHook>,
    file: UploadFile,
    batch: Vec<UploadFile>,
) -> Result<Settlement, HookError> {
    let Some(hook) = hook else {
        return Ok(Settlement::Upload(file));
    };

    let settlement = match hook.call(file.clone(), batch).await? {
        HookVerdict::Accept => Settlement::Upload(file),
        HookVerdict::Reject => Settlement::Reject,
        HookVerdict::Replace(replacement) => Settlement::Upload(replacement),
    };
    Ok(settlement)
}

#[derive(Debug)]
enum ResolverSlot {
    Pending,
    Settled(Settlement),
    Closed,
}

/// One-shot settlement function handed to the cancel-interceptor.
///
/// Only a call made before the interceptor returns counts; later calls are
/// ignored and the drop sentinel stands.
#[derive(Debug)]
pub struct CancelResolver {
    slot: Arc<Mutex<ResolverSlot>>,
}

impl CancelResolver {
    pub fn settle(self, settlement: Settlement) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match *slot {
            ResolverSlot::Pending => *slot = ResolverSlot::Settled(settlement),
            _ => tracing::debug!("late cancel settlement ignored"),
        }
    }
}

type CancelFn = dyn Fn(CancelResolver) + Send + Sync;

/// Decides what a cancelled edit settles to.
#[derive(Clone)]
pub struct CancelInterceptor(Arc<CancelFn>);

impl CancelInterceptor {
    pub fn new<F>(interceptor: F) -> Self
    where
        F: Fn(CancelResolver) + Send + Sync + 'static,
    {
        Self(Arc::new(interceptor))
    }

    /// Call the interceptor and collect what it settled synchronously,
    /// falling back to [`Settlement::Ignore`].
    pub fn resolve(&self) -> Settlement {
        let slot = Arc::new(Mutex::new(ResolverSlot::Pending));
        (self.0)(CancelResolver {
            slot: Arc::clone(&slot),
        });

        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *slot, ResolverSlot::Closed) {
            ResolverSlot::Settled(settlement) => settlement,
            _ => Settlement::Ignore,
        }
    }
}

impl fmt::Debug for CancelInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CancelInterceptor(..)")
    }
}

type ObserverFn = dyn Fn(&Result<Settlement, ImgCropError>) + Send + Sync;

/// Sees the final settlement of a confirmed edit. Cannot change it.
#[derive(Clone)]
pub struct ConfirmObserver(Arc<ObserverFn>);

impl ConfirmObserver {
    pub fn new<F>(observer: F) -> Self
    where
        F: Fn(&Result<Settlement, ImgCropError>) + Send + Sync + 'static,
    {
        Self(Arc::new(observer))
    }

    pub fn notify(&self, result: &Result<Settlement, ImgCropError>) {
        (self.0)(result)
    }
}

impl fmt::Debug for ConfirmObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfirmObserver(..)")
    }
}

/// The optional strategies, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct CropHooks {
    pub before_crop: Option<PreUploadHook>,
    pub on_modal_cancel: Option<CancelInterceptor>,
    pub on_modal_ok: Option<ConfirmObserver>,
}

impl CropHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_crop<F, Fut>(mut self, predicate: F) -> Self
    where
        F: Fn(UploadFile, Vec<UploadFile>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HookVerdict, HookError>> + Send + 'static,
    {
        self.before_crop = Some(PreUploadHook::new(predicate));
        self
    }

    pub fn on_modal_cancel<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(CancelResolver) + Send + Sync + 'static,
    {
        self.on_modal_cancel = Some(CancelInterceptor::new(interceptor));
        self
    }

    pub fn on_modal_ok<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Result<Settlement, ImgCropError>) + Send + Sync + 'static,
    {
        self.on_modal_ok = Some(ConfirmObserver::new(observer));
        self
    }

    /// Settlement for a cancelled edit.
    pub(crate) fn resolve_cancel(&self) -> Settlement {
        match &self.on_modal_cancel {
            Some(interceptor) => interceptor.resolve(),
            None => Settlement::Ignore,
        }
    }

    pub(crate) fn observe(&self, result: &Result<Settlement, ImgCropError>) {
        if let Some(observer) = &self.on_modal_ok {
            observer.notify(result);
        }
    }
}
