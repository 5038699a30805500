//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::upload::{HookError, SessionError};

/// Anything that can go wrong between a file being selected and its
/// settlement being handed back to the host.
#[derive(Debug, Error)]
pub enum ImgCropError {
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("failed to encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: EncodeError,
    },

    /// The host's pre-upload hook failed
    #[error("upload hook failed: {0}")]
    Hook(#[from] HookError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A decode or render job on the blocking pool panicked or was cancelled
    #[error("background image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
