//! Edit session state machine.
//!
//! One [`EditSession`] per candidate file:
//!
//! ```text
//! Idle -> Loading -> Presenting -> Confirmed
//!                 \            \-> Cancelled
//!                  \-> Failed (decode error)
//! ```
//!
//! Geometry changes while presenting are not transitions; they flow through
//! the session's [`EditorHandle`]. Terminal states are never left.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use super::dialog::{DialogLease, DialogView, EditorOptions};
use super::file::UploadFile;
use crate::config::{CropConfig, DialogText};
use crate::decode::{decode_image_onto, DecodedImage};
use crate::encode::{encode_image, OutputFormat};
use crate::error::ImgCropError;
use crate::geometry::{CropGeometry, GeometryError};
use crate::transform::extract;

/// Identifies one session for logging and dialog visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Presenting,
    Confirmed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Confirmed | SessionState::Cancelled | SessionState::Failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("session {session}: cannot {action} while {state:?}")]
    InvalidTransition {
        session: SessionId,
        action: &'static str,
        state: SessionState,
    },

    #[error("session {0} is closed")]
    Closed(SessionId),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Debug)]
struct EditorState {
    initial: CropGeometry,
    live: CropGeometry,
    open: bool,
}

/// Live geometry channel between the crop widget and one session.
///
/// The widget reports every drag, zoom and rotation through
/// [`report`](Self::report); the session reads [`snapshot`](Self::snapshot)
/// exactly once, at confirm time.
#[derive(Debug, Clone)]
pub struct EditorHandle {
    session: SessionId,
    config: Arc<CropConfig>,
    state: Arc<Mutex<EditorState>>,
}

impl EditorHandle {
    fn new(session: SessionId, config: Arc<CropConfig>, initial: CropGeometry) -> Self {
        Self {
            session,
            config,
            state: Arc::new(Mutex::new(EditorState {
                initial,
                live: initial,
                open: true,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept a geometry update from the widget.
    ///
    /// Zoom and aspect are clamped to their configured bounds when their
    /// sliders are enabled and pinned to the configured values otherwise.
    /// Returns the geometry actually stored.
    pub fn report(&self, geometry: CropGeometry) -> Result<CropGeometry, SessionError> {
        geometry.validate().inspect_err(|err| {
            tracing::warn!(session = %self.session, error = %err, "rejected geometry update");
        })?;

        let mut effective = geometry;
        effective.zoom = if self.config.zoom_enabled {
            self.config.zoom_bounds().clamp(geometry.zoom)
        } else {
            self.config.zoom
        };
        effective.aspect = if self.config.aspect_adjustable {
            self.config.aspect_bounds().clamp(geometry.aspect)
        } else {
            self.config.aspect
        };

        let mut state = self.lock();
        if !state.open {
            return Err(SessionError::Closed(self.session));
        }
        state.live = effective;
        Ok(effective)
    }

    /// Current geometry.
    pub fn snapshot(&self) -> CropGeometry {
        self.lock().live
    }

    /// Restore the session's initial geometry (the dialog's reset button).
    pub fn reset(&self) {
        let mut state = self.lock();
        state.live = state.initial;
    }

    /// Reset and refuse further updates.
    fn close(&self) {
        let mut state = self.lock();
        state.live = state.initial;
        state.open = false;
    }
}

/// Geometry and source captured at confirm time, ready to render.
#[derive(Debug)]
pub struct ConfirmedCrop {
    pub session: SessionId,
    pub file: UploadFile,
    pub image: Arc<DecodedImage>,
    pub geometry: CropGeometry,
}

impl ConfirmedCrop {
    /// Extract and encode the crop into a file with the original identity.
    pub fn render(&self, config: &CropConfig) -> Result<UploadFile, ImgCropError> {
        let rotation = if config.rotation_enabled {
            self.geometry.rotation
        } else {
            0.0
        };

        let output = extract(&self.image, &self.geometry.rect, rotation, config.fill_color);
        let format = OutputFormat::from_mime(&self.file.mime);
        let bytes =
            encode_image(&output, format, config.quality).map_err(|source| ImgCropError::Encode {
                name: self.file.name.clone(),
                source,
            })?;

        tracing::debug!(
            session = %self.session,
            width = output.width,
            height = output.height,
            bytes = bytes.len(),
            ?format,
            "rendered crop"
        );
        Ok(self.file.with_bytes(bytes))
    }

    /// [`render`](Self::render) on the blocking thread pool.
    pub async fn render_off_thread(self, config: Arc<CropConfig>) -> Result<UploadFile, ImgCropError> {
        tokio::task::spawn_blocking(move || self.render(&config)).await?
    }
}

/// One file's trip through the editor.
#[derive(Debug)]
pub struct EditSession {
    id: SessionId,
    config: Arc<CropConfig>,
    state: SessionState,
    file: Option<UploadFile>,
    image: Option<Arc<DecodedImage>>,
    editor: Option<EditorHandle>,
}

impl EditSession {
    pub fn new(id: SessionId, config: Arc<CropConfig>) -> Self {
        Self {
            id,
            config,
            state: SessionState::Idle,
            file: None,
            image: None,
            editor: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn require(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::InvalidTransition {
                session: self.id,
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(session = %self.id, from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }

    /// Idle -> Loading: decode the candidate file on the blocking pool,
    /// flattening transparency onto the configured fill color.
    ///
    /// The session stays in Loading after a successful decode until a dialog
    /// lease is available; a decode failure moves it to Failed.
    pub async fn load(&mut self, file: UploadFile) -> Result<(), ImgCropError> {
        self.require(SessionState::Idle, "load")?;
        self.transition(SessionState::Loading);

        let background = self.config.fill_color;
        let decoded = tokio::task::spawn_blocking(move || {
            let result = decode_image_onto(&file.bytes, background);
            (file, result)
        })
        .await;
        let (file, result) = match decoded {
            Ok(done) => done,
            Err(err) => {
                self.transition(SessionState::Failed);
                return Err(err.into());
            }
        };

        match result {
            Ok(image) => {
                tracing::debug!(
                    session = %self.id,
                    name = %file.name,
                    width = image.width,
                    height = image.height,
                    "decoded candidate"
                );
                self.image = Some(Arc::new(image));
                self.file = Some(file);
                Ok(())
            }
            Err(source) => {
                self.transition(SessionState::Failed);
                Err(ImgCropError::Decode {
                    name: file.name,
                    source,
                })
            }
        }
    }

    /// Loading -> Presenting: build the dialog view with fresh default
    /// geometry.
    pub fn present(
        &mut self,
        lease: &DialogLease,
        text: &DialogText,
    ) -> Result<DialogView, SessionError> {
        self.require(SessionState::Loading, "present")?;
        let (Some(file), Some(image)) = (&self.file, &self.image) else {
            return Err(SessionError::InvalidTransition {
                session: self.id,
                action: "present",
                state: self.state,
            });
        };
        debug_assert_eq!(lease.session(), self.id);

        let config = &self.config;
        let initial = CropGeometry::initial(image.width, image.height, config.aspect, config.zoom);
        let editor = EditorHandle::new(self.id, Arc::clone(config), initial);

        let view = DialogView {
            session: self.id,
            file_name: file.name.clone(),
            image: Arc::clone(image),
            initial,
            text: text.clone(),
            options: EditorOptions {
                crop_shape: config.crop_shape,
                show_grid: config.show_grid,
                zoom_enabled: config.zoom_enabled,
                zoom_bounds: config.zoom_bounds(),
                rotation_enabled: config.rotation_enabled,
                aspect_adjustable: config.aspect_adjustable,
                aspect_bounds: config.aspect_bounds(),
                show_reset: config.show_reset,
                modal: config.modal.clone(),
            },
            editor: editor.clone(),
        };

        self.editor = Some(editor);
        self.transition(SessionState::Presenting);
        Ok(view)
    }

    /// Presenting -> Confirmed.
    ///
    /// Takes the current geometry, then hides the dialog and resets the
    /// editor before returning, so rendering happens with the dialog gone.
    pub fn confirm(&mut self, lease: DialogLease) -> Result<ConfirmedCrop, SessionError> {
        self.require(SessionState::Presenting, "confirm")?;
        let (Some(editor), Some(file), Some(image)) =
            (self.editor.take(), self.file.take(), self.image.take())
        else {
            return Err(SessionError::InvalidTransition {
                session: self.id,
                action: "confirm",
                state: self.state,
            });
        };

        let geometry = editor.snapshot();
        geometry.validate()?;

        drop(lease);
        editor.close();
        self.transition(SessionState::Confirmed);

        Ok(ConfirmedCrop {
            session: self.id,
            file,
            image,
            geometry,
        })
    }

    /// Presenting -> Cancelled. Hides the dialog and resets the editor.
    pub fn cancel(&mut self, lease: DialogLease) -> Result<(), SessionError> {
        self.require(SessionState::Presenting, "cancel")?;

        drop(lease);
        if let Some(editor) = self.editor.take() {
            editor.close();
        }
        self.file = None;
        self.image = None;
        self.transition(SessionState::Cancelled);
        Ok(())
    }
}
