//! Error type shared by the backends and the gauge lifecycle.

use std::ffi::NulError;

/// Errors surfaced by rendering backends and host bindings.
///
/// The gauge itself never recovers from these; it logs them and reports the
/// lifecycle phase as unhandled.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host refused to create a rendering context.
    #[error("rendering backend could not be created")]
    BackendUnavailable,
    /// The backend rejected a font file.
    #[error("unable to load font `{name}` from {path}")]
    FontLoad {
        /// Face name the font was registered under.
        name: String,
        /// Path the font was loaded from.
        path: String,
    },
    /// The font file could not be read from disk.
    #[error("failed to read font file {path}: {source}")]
    FontRead {
        /// Path the font was loaded from.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A name passed across the C boundary contained an interior NUL.
    #[error("string contains interior NUL: {0}")]
    Nul(#[from] NulError),
    /// An OpenGL object could not be created or a shader failed to build.
    #[error("GL error: {0}")]
    Gl(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
