//! Error types for outline-to-deck generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a generation run.
///
/// Degraded formatting (a missing placeholder, a rejected indent) is not an
/// error; see the render notices reported by the assembler.
#[derive(Error, Debug)]
pub enum Error {
    /// The input has no non-blank blocks after segmentation.
    #[error("No content: the outline has no non-blank blocks")]
    NoContent,

    /// A template was supplied but could not be read as a presentation.
    #[error("Template unreadable: {path}: {reason}")]
    TemplateUnreadable {
        /// Path of the template that failed to load.
        path: PathBuf,
        /// What went wrong while loading it.
        reason: String,
    },

    /// Writing the serialized deck failed.
    #[error(transparent)]
    WriteFailed(#[from] WriteError),

    /// Malformed XML in a package part.
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP container error.
    #[error("ZIP error: {0}")]
    Zip(String),
}

impl Error {
    /// Whether this failure is the user-actionable "output file is in use" case.
    pub fn is_locked(&self) -> bool {
        matches!(self, Error::WriteFailed(WriteError::Locked { .. }))
    }
}

/// Sub-kinds of a failed output write.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The target file is held open by another program.
    #[error("Output file is locked by another program: {path} (close it and retry)")]
    Locked {
        /// The output path that could not be replaced.
        path: PathBuf,
    },

    /// Any other serialization or I/O failure.
    #[error("Failed to write {path}: {source}")]
    Other {
        /// The output path being written.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Classify an I/O error raised while writing `path`.
    ///
    /// Permission denials and Windows sharing/lock violations are reported
    /// as [`WriteError::Locked`].
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let locked = source.kind() == std::io::ErrorKind::PermissionDenied
            || is_sharing_violation(&source);

        if locked {
            WriteError::Locked { path }
        } else {
            WriteError::Other { path, source }
        }
    }
}

/// ERROR_SHARING_VIOLATION (32) and ERROR_LOCK_VIOLATION (33).
#[cfg(windows)]
fn is_sharing_violation(err: &std::io::Error) -> bool {
    matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(not(windows))]
fn is_sharing_violation(_err: &std::io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_permission_denied_is_locked() {
        let err = WriteError::from_io(
            "deck.pptx",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, WriteError::Locked { .. }));
        assert!(Error::from(err).is_locked());
    }

    #[cfg(windows)]
    #[test]
    fn test_sharing_violation_is_locked() {
        let err = WriteError::from_io("deck.pptx", io::Error::from_raw_os_error(32));
        assert!(matches!(err, WriteError::Locked { .. }));
    }

    #[test]
    fn test_other_io_error_keeps_source() {
        let err = WriteError::from_io("deck.pptx", io::Error::new(io::ErrorKind::Other, "disk full"));
        match err {
            WriteError::Other { path, source } => {
                assert_eq!(path, PathBuf::from("deck.pptx"));
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
