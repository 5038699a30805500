//! The edit dialog as seen from the state machine.
//!
//! Rendering, sliders and drag handling live outside this crate behind
//! [`CropDialog`]. The state machine hands the dialog a [`DialogView`] and
//! waits for the user's decision; the crop widget pushes geometry updates
//! through the view's [`EditorHandle`](super::session::EditorHandle).
//!
//! Only one dialog is visible at a time. [`DialogSlot`] is the single shared
//! visibility resource and also the FIFO queue sessions wait in.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::session::{EditorHandle, SessionId};
use crate::config::{DialogText, ModalOptions};
use crate::decode::DecodedImage;
use crate::geometry::{Bounds, CropGeometry, CropShape};

/// What the user did with the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogDecision {
    Confirm,
    Cancel,
}

/// Widget settings forwarded from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    pub crop_shape: CropShape,
    pub show_grid: bool,
    pub zoom_enabled: bool,
    pub zoom_bounds: Bounds,
    pub rotation_enabled: bool,
    pub aspect_adjustable: bool,
    pub aspect_bounds: Bounds,
    pub show_reset: bool,
    pub modal: ModalOptions,
}

/// Everything the presentation layer needs to show one session.
#[derive(Debug, Clone)]
pub struct DialogView {
    pub session: SessionId,
    pub file_name: String,
    pub image: Arc<DecodedImage>,
    /// Geometry the widget starts from; also what "reset" restores.
    pub initial: CropGeometry,
    pub text: DialogText,
    pub options: EditorOptions,
    /// Live geometry channel for this session only.
    pub editor: EditorHandle,
}

/// Presentation layer for the edit dialog.
pub trait CropDialog: Send + Sync {
    /// Show the dialog and resolve once the user confirms or cancels.
    fn present(&self, view: DialogView) -> BoxFuture<'static, DialogDecision>;
}

/// The one dialog-visibility resource shared by every session.
#[derive(Debug, Default)]
pub struct DialogSlot {
    queue: Arc<AsyncMutex<()>>,
    visible: Arc<Mutex<Option<SessionId>>>,
}

impl DialogSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session whose dialog is currently shown, if any.
    pub fn visible(&self) -> Option<SessionId> {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for the slot and mark `session` as visible.
    ///
    /// Waiters are served in arrival order.
    pub async fn acquire(&self, session: SessionId) -> DialogLease {
        let guard = Arc::clone(&self.queue).lock_owned().await;
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
        tracing::debug!(%session, "dialog shown");
        DialogLease {
            session,
            visible: Arc::clone(&self.visible),
            _guard: guard,
        }
    }
}

/// Exclusive right to show the dialog. Dropping it hides the dialog and
/// lets the next queued session in.
#[derive(Debug)]
pub struct DialogLease {
    session: SessionId,
    visible: Arc<Mutex<Option<SessionId>>>,
    _guard: OwnedMutexGuard<()>,
}

impl DialogLease {
    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl Drop for DialogLease {
    fn drop(&mut self) {
        let mut visible = self.visible.lock().unwrap_or_else(PoisonError::into_inner);
        if *visible == Some(self.session) {
            *visible = None;
        }
        tracing::debug!(session = %self.session, "dialog hidden");
    }
}
